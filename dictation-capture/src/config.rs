use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transcription client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionConfig {
    /// Endpoint accepting a multipart `audio` upload and returning `{"text": ...}`
    pub endpoint: String,
    /// Request timeout in seconds for the transcription call
    pub timeout_secs: u64,
}

impl TranscriptionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let endpoint = std::env::var("TRANSCRIBE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:5005/transcribe".to_string());

        let timeout_secs = std::env::var("TRANSCRIBE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            endpoint,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5005/transcribe".to_string(),
            timeout_secs: 30,
        }
    }
}
