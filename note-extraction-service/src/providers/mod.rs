pub mod azure;
pub mod groq;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::error::{NoteError, NoteResult};
use crate::prompt::NotePrompt;

/// Capability contract over "get me a completion for this prompt".
///
/// Callers never branch on the active backend; the variant is chosen once at
/// configuration load via [`create_provider`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request one completion. Non-2xx responses surface as
    /// [`NoteError::Provider`] with status and body; transport failures as
    /// [`NoteError::Network`].
    async fn complete(&self, prompt: &NotePrompt) -> NoteResult<String>;
}

/// Create a provider instance based on configuration.
pub fn create_provider(config: &ProviderConfig) -> NoteResult<Box<dyn CompletionProvider>> {
    match config {
        ProviderConfig::Groq { .. } => Ok(Box::new(groq::GroqProvider::new(config)?)),
        ProviderConfig::AzureOpenAi { .. } => {
            Ok(Box::new(azure::AzureOpenAiProvider::new(config)?))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub(crate) choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessage {
    pub(crate) content: String,
}

/// Fold a chat-completion HTTP response into the raw completion text.
pub(crate) async fn read_completion(response: reqwest::Response) -> NoteResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unreadable body".to_string());
        return Err(NoteError::Provider {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| NoteError::Provider {
            status: status.as_u16(),
            body: "completion response contained no choices".to_string(),
        })
}
