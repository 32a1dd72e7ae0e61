use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, info};

use crate::capture::AudioPayload;
use crate::config::TranscriptionConfig;
use crate::error::{CaptureError, CaptureResult};

/// Turns a finished recording into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// One attempt, no retry. The payload is consumed by the upload; the
    /// caller decides whether the user re-records on failure.
    async fn transcribe(&self, payload: AudioPayload) -> CaptureResult<String>;
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    text: String,
}

/// HTTP client for the transcription endpoint.
///
/// Uploads the recording as a multipart `audio` part and expects a
/// `{"text": ...}` reply. The returned text is passed through verbatim.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriptionClient {
    pub fn new(config: TranscriptionConfig) -> CaptureResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CaptureError::Transcription(format!("client setup: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl Transcriber for HttpTranscriptionClient {
    async fn transcribe(&self, payload: AudioPayload) -> CaptureResult<String> {
        debug!(
            bytes = payload.bytes.len(),
            mime = %payload.mime_type,
            "Uploading recording for transcription"
        );

        let part = multipart::Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)
            .map_err(|e| CaptureError::Transcription(format!("mime: {e}")))?;
        let form = multipart::Form::new().part("audio", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CaptureError::Transcription(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable body".to_string());
            return Err(CaptureError::Transcription(format!(
                "status {status}: {body}"
            )));
        }

        let parsed: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| CaptureError::Transcription(format!("response body: {e}")))?;

        info!(chars = parsed.text.len(), "Transcription completed");
        Ok(parsed.text)
    }
}
