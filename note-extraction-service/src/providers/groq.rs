/// Groq chat-completion backend.
///
/// Single POST with bearer-token auth; the extraction instructions and the
/// note travel together as one user message.
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{self, ProviderConfig};
use crate::error::{NoteError, NoteResult};
use crate::prompt::NotePrompt;
use crate::providers::{read_completion, CompletionProvider};

pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GroqProvider {
    pub fn new(config: &ProviderConfig) -> NoteResult<Self> {
        let ProviderConfig::Groq {
            api_key,
            model,
            api_url,
        } = config
        else {
            return Err(NoteError::Config(
                "Groq provider requires groq configuration".to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(config::request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            model: model.clone(),
            api_url: api_url.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, prompt: &NotePrompt) -> NoteResult<String> {
        if self.api_key.is_empty() {
            return Err(NoteError::Config("GROQ_API_KEY is not set".to_string()));
        }

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt.combined() }
            ]
        });

        debug!(model = %self.model, "Requesting Groq completion");
        let started = Instant::now();

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let completion = read_completion(response).await?;

        info!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = completion.len(),
            "Groq completion received"
        );
        Ok(completion)
    }
}
