//! Submission controller: the single owner of UI-facing state.
//!
//! One request lifecycle at a time. Submitting is disabled while recording or
//! transcribing, the microphone is disabled while a completion is loading,
//! and a completion or transcription that outlives its request (superseded
//! by [`reset`]) is discarded instead of clobbering newer state.
//!
//! [`reset`]: SubmissionController::reset

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use dictation_capture::{AudioCapture, Transcriber};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::{ErrorInfo, NoteError, NoteResult};
use crate::extraction::{extract, ExtractionResult};
use crate::prompt::build_prompt;
use crate::providers::{create_provider, CompletionProvider};

/// The single source of UI truth. Exactly one state is active at a time, so
/// illegal combinations (loading and error at once) are unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Recording,
    Transcribing,
    Loading,
    Success(ExtractionResult),
    Failed(ErrorInfo),
}

impl SubmissionState {
    /// True while an exclusive operation (mic or completion) is in flight.
    fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Recording | Self::Transcribing | Self::Loading
        )
    }
}

struct Inner {
    state: SubmissionState,
    note: String,
    /// Monotonic request sequence. A pipeline outcome is applied only if the
    /// sequence has not moved past its token.
    seq: u64,
}

/// Orchestrates capture, transcription, prompting, completion, and
/// extraction into one request lifecycle.
pub struct SubmissionController {
    provider: Arc<dyn CompletionProvider>,
    transcriber: Arc<dyn Transcriber>,
    capture: Arc<dyn AudioCapture>,
    inner: Mutex<Inner>,
}

impl SubmissionController {
    /// Build a controller for the configured provider variant.
    pub fn new(
        config: &ProviderConfig,
        transcriber: Arc<dyn Transcriber>,
        capture: Arc<dyn AudioCapture>,
    ) -> NoteResult<Self> {
        let provider: Arc<dyn CompletionProvider> = Arc::from(create_provider(config)?);
        Ok(Self::from_parts(provider, transcriber, capture))
    }

    /// Assemble a controller from already-constructed collaborators.
    pub fn from_parts(
        provider: Arc<dyn CompletionProvider>,
        transcriber: Arc<dyn Transcriber>,
        capture: Arc<dyn AudioCapture>,
    ) -> Self {
        Self {
            provider,
            transcriber,
            capture,
            inner: Mutex::new(Inner {
                state: SubmissionState::Idle,
                note: String::new(),
                seq: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state snapshot.
    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    /// Current note text.
    pub fn note(&self) -> String {
        self.lock().note.clone()
    }

    /// Replace the note text (typed input). Never cleared automatically.
    pub fn set_note(&self, text: impl Into<String>) {
        self.lock().note = text.into();
    }

    /// Discard any pending result and return to `Idle`. An in-flight request
    /// that completes afterwards is ignored.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.seq += 1;
        inner.state = SubmissionState::Idle;
    }

    /// Send the current note through prompt, provider, and extractor.
    ///
    /// No-op while recording, transcribing, or already loading. Any prior
    /// result or error is cleared the moment the request starts. The note
    /// text itself is never cleared, so a failed request leaves it intact
    /// for resubmission.
    pub async fn submit(&self) -> SubmissionState {
        let (token, note) = {
            let mut inner = self.lock();
            if inner.state.is_busy() {
                debug!(state = ?inner.state, "Submit ignored while busy");
                return inner.state.clone();
            }
            inner.seq += 1;
            inner.state = SubmissionState::Loading;
            (inner.seq, inner.note.clone())
        };

        info!(chars = note.len(), "Submitting note for extraction");
        let prompt = build_prompt(&note);
        let started = Instant::now();
        let outcome = self.provider.complete(&prompt).await;

        let mut inner = self.lock();
        if inner.seq != token {
            debug!("Discarding stale completion");
            return inner.state.clone();
        }

        inner.state = match outcome {
            Ok(raw) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Completion received, extracting record"
                );
                SubmissionState::Success(extract(&raw))
            }
            Err(e) => {
                warn!(error = %e, "Note submission failed");
                SubmissionState::Failed(ErrorInfo::from(&e))
            }
        };
        inner.state.clone()
    }

    /// Begin a dictation session. No-op while busy; a denied microphone
    /// surfaces as `Failed(MicUnavailable)` without touching the note.
    pub async fn start_recording(&self) -> SubmissionState {
        {
            let inner = self.lock();
            if inner.state.is_busy() {
                debug!(state = ?inner.state, "Recording ignored while busy");
                return inner.state.clone();
            }
        }

        match self.capture.start().await {
            Ok(()) => {
                {
                    let mut inner = self.lock();
                    // A submission may have started while the device was
                    // being acquired; it keeps the state machine.
                    if !inner.state.is_busy() {
                        inner.state = SubmissionState::Recording;
                        return inner.state.clone();
                    }
                    debug!(state = ?inner.state, "Submission started during mic acquisition, backing out");
                }
                // Release the device that was just acquired.
                let _ = self.capture.stop().await;
                self.state()
            }
            Err(e) => {
                let err = NoteError::from(e);
                warn!(error = %err, "Could not start recording");
                let mut inner = self.lock();
                if inner.state.is_busy() {
                    return inner.state.clone();
                }
                inner.state = SubmissionState::Failed(ErrorInfo::from(&err));
                inner.state.clone()
            }
        }
    }

    /// Finish the dictation session and transcribe it. On success the
    /// transcribed text replaces the note verbatim; on failure the note is
    /// left untouched and the state carries the error.
    pub async fn stop_recording(&self) -> SubmissionState {
        let token = {
            let mut inner = self.lock();
            if inner.state != SubmissionState::Recording {
                debug!(state = ?inner.state, "Stop ignored, not recording");
                return inner.state.clone();
            }
            inner.seq += 1;
            inner.state = SubmissionState::Transcribing;
            inner.seq
        };

        let outcome = match self.capture.stop().await {
            Ok(payload) => self.transcriber.transcribe(payload).await,
            Err(e) => Err(e),
        };

        let mut inner = self.lock();
        if inner.seq != token {
            debug!("Discarding stale transcription");
            return inner.state.clone();
        }
        inner.state = match outcome {
            Ok(text) => {
                info!(chars = text.len(), "Transcription applied to note");
                inner.note = text;
                SubmissionState::Idle
            }
            Err(e) => {
                let err = NoteError::from(e);
                warn!(error = %err, "Dictation failed");
                SubmissionState::Failed(ErrorInfo::from(&err))
            }
        };
        inner.state.clone()
    }
}
