use dictation_capture::CaptureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Microphone unavailable: {0}")]
    MicUnavailable(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),
}

pub type NoteResult<T> = Result<T, NoteError>;

impl From<CaptureError> for NoteError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::MicUnavailable(msg) => NoteError::MicUnavailable(msg),
            CaptureError::Transcription(msg) => NoteError::Transcription(msg),
            CaptureError::AudioProcessing(msg) => NoteError::AudioProcessing(msg),
            CaptureError::NoSession => {
                NoteError::AudioProcessing("no active capture session".to_string())
            }
        }
    }
}

/// Error category bound to the `Failed` submission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MicUnavailable,
    TranscriptionFailed,
    ProviderError,
    NetworkError,
    Configuration,
    Internal,
}

/// Cheap-to-clone error summary for the UI-facing state.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&NoteError> for ErrorInfo {
    fn from(e: &NoteError) -> Self {
        let kind = match e {
            NoteError::MicUnavailable(_) => ErrorKind::MicUnavailable,
            NoteError::Transcription(_) => ErrorKind::TranscriptionFailed,
            NoteError::Provider { .. } => ErrorKind::ProviderError,
            NoteError::Network(_) => ErrorKind::NetworkError,
            NoteError::Config(_) => ErrorKind::Configuration,
            NoteError::Serialization(_) | NoteError::AudioProcessing(_) => ErrorKind::Internal,
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}
