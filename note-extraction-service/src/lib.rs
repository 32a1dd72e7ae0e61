//! Clinical note extraction pipeline.
//!
//! Takes a clinician's free-text note (typed or dictated), sends it to a
//! configurable chat-completion provider wrapped in a fixed extraction
//! template, and parses the reply into a structured clinical record with a
//! plain-text safety net.
//!
//! # Provider Variants
//!
//! - **Groq** - bearer-token auth, instructions and note in one user message
//! - **Azure OpenAI** - header API key, deployment-templated URL,
//!   instructions as the system message
//!
//! Both are selected once at configuration load and hidden behind the
//! [`CompletionProvider`] capability; nothing downstream branches on the
//! active backend.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dictation_capture::{CpalRecorder, HttpTranscriptionClient, TranscriptionConfig};
//! use note_extraction_service::{ProviderConfig, SubmissionController, SubmissionState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::from_env()?;
//! let transcriber = Arc::new(HttpTranscriptionClient::new(TranscriptionConfig::from_env())?);
//! let recorder = Arc::new(CpalRecorder::new());
//!
//! let controller = SubmissionController::new(&config, transcriber, recorder)?;
//! controller.set_note("Patient reports headache");
//!
//! if let SubmissionState::Success(result) = controller.submit().await {
//!     println!("Extracted: {result:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extraction;
pub mod prompt;
pub mod providers;
pub mod service;

pub use config::*;
pub use error::*;
pub use extraction::*;
pub use prompt::*;
pub use providers::*;
pub use service::*;
