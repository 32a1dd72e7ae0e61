use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NoteError, NoteResult};

pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Completion provider configuration, selected once at startup.
///
/// Credentials may be absent here; each provider validates them when a
/// completion is actually requested, so a misconfigured deployment fails at
/// submit time with a configuration error rather than at process start.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    /// Groq chat completions (bearer token, single user message)
    Groq {
        api_key: String,
        model: String,
        api_url: String,
    },
    /// Azure OpenAI deployment (api-key header, system + user messages)
    #[serde(rename = "azure")]
    AzureOpenAi {
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
    },
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    ///
    /// `NOTE_PROVIDER` selects the variant (`groq` by default). Unknown
    /// provider names are the only load-time error.
    pub fn from_env() -> NoteResult<Self> {
        let provider = std::env::var("NOTE_PROVIDER").unwrap_or_else(|_| "groq".to_string());

        match provider.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq {
                api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
                model: std::env::var("GROQ_MODEL")
                    .unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string()),
                api_url: std::env::var("GROQ_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GROQ_URL.to_string()),
            }),
            "azure" => Ok(Self::AzureOpenAi {
                api_key: std::env::var("AZURE_OPENAI_API_KEY").unwrap_or_default(),
                endpoint: std::env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
                deployment: std::env::var("AZURE_OPENAI_DEPLOYMENT").unwrap_or_default(),
                api_version: std::env::var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|_| DEFAULT_AZURE_API_VERSION.to_string()),
            }),
            other => Err(NoteError::Config(format!(
                "Unknown note provider: {other}"
            ))),
        }
    }
}

/// Outbound request timeout for completion calls.
pub fn request_timeout() -> Duration {
    let secs = std::env::var("NOTE_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}
