use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Microphone unavailable: {0}")]
    MicUnavailable(String),

    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    #[error("No active capture session")]
    NoSession,

    #[error("Transcription failed: {0}")]
    Transcription(String),
}

pub type CaptureResult<T> = Result<T, CaptureError>;
