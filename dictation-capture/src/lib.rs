//! Microphone capture and transcription for clinical dictation.
//!
//! Owns the two leaf concerns of the note-submission pipeline: recording a
//! dictated note into one [`AudioPayload`] and sending it to a transcription
//! endpoint that answers with plain text.
//!
//! Capture is scoped: the device is acquired on [`AudioCapture::start`] and
//! released on every exit path, including a denied or aborted request. The
//! transcription client makes exactly one attempt per call; retrying is the
//! caller's decision.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dictation_capture::{
//!     AudioCapture, CpalRecorder, HttpTranscriptionClient, Transcriber, TranscriptionConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = CpalRecorder::new();
//! recorder.start().await?;
//! // ... clinician dictates ...
//! let payload = recorder.stop().await?;
//!
//! let client = HttpTranscriptionClient::new(TranscriptionConfig::from_env())?;
//! let text = client.transcribe(payload).await?;
//! println!("Dictated note: {text}");
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod transcription;

pub use capture::*;
pub use config::*;
pub use error::*;
pub use transcription::*;
