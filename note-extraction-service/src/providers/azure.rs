/// Azure OpenAI chat-completion backend.
///
/// POST to a deployment-templated URL with a header-based API key. The
/// extraction instructions ride as the system message; the note text goes
/// untouched into the user message.
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{self, ProviderConfig};
use crate::error::{NoteError, NoteResult};
use crate::prompt::NotePrompt;
use crate::providers::{read_completion, CompletionProvider};

pub struct AzureOpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiProvider {
    pub fn new(config: &ProviderConfig) -> NoteResult<Self> {
        let ProviderConfig::AzureOpenAi {
            api_key,
            endpoint,
            deployment,
            api_version,
        } = config
        else {
            return Err(NoteError::Config(
                "Azure provider requires azure configuration".to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(config::request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            endpoint: endpoint.clone(),
            deployment: deployment.clone(),
            api_version: api_version.clone(),
        })
    }

    fn completion_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        format!(
            "{base}/openai/deployments/{}/chat/completions?api-version={}",
            self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl CompletionProvider for AzureOpenAiProvider {
    async fn complete(&self, prompt: &NotePrompt) -> NoteResult<String> {
        if self.api_key.is_empty() || self.endpoint.is_empty() || self.deployment.is_empty() {
            return Err(NoteError::Config(
                "Azure OpenAI configuration incomplete: AZURE_OPENAI_API_KEY, \
                 AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_DEPLOYMENT are required"
                    .to_string(),
            ));
        }

        let body = json!({
            "messages": [
                { "role": "system", "content": prompt.instructions },
                { "role": "user", "content": prompt.note }
            ]
        });

        debug!(deployment = %self.deployment, "Requesting Azure OpenAI completion");
        let started = Instant::now();

        let response = self
            .client
            .post(self.completion_url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let completion = read_completion(response).await?;

        info!(
            deployment = %self.deployment,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chars = completion.len(),
            "Azure OpenAI completion received"
        );
        Ok(completion)
    }
}
