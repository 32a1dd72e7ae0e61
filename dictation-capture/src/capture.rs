use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, info, warn};

use crate::error::{CaptureError, CaptureResult};

/// A finished audio recording ready for upload.
///
/// The payload carries its own mime type and filename so the transcription
/// client never has to guess the container format. Recordings forwarded from
/// a browser front-end are webm; the native recorder produces WAV.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl AudioPayload {
    /// Browser `MediaRecorder` output.
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "audio/webm".to_string(),
            file_name: "recording.webm".to_string(),
        }
    }

    /// Native recorder output.
    pub fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "audio/wav".to_string(),
            file_name: "recording.wav".to_string(),
        }
    }
}

/// Microphone capture lifecycle.
///
/// At most one session may be active at a time. `start` while already
/// recording is a no-op; `stop` without a prior `start` is an error.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Request the microphone and begin buffering audio.
    async fn start(&self) -> CaptureResult<()>;

    /// Finalize the buffered audio into one payload and release the device.
    async fn stop(&self) -> CaptureResult<AudioPayload>;
}

struct ActiveCapture {
    stop: Arc<AtomicBool>,
    handle: thread::JoinHandle<CaptureResult<AudioPayload>>,
}

/// cpal-backed microphone recorder.
///
/// The cpal input stream is not `Send`, so each session runs on a dedicated
/// thread that owns the stream for its whole lifetime. The stream is dropped
/// when that thread exits on any path, which releases the device.
pub struct CpalRecorder {
    session: Arc<Mutex<Option<ActiveCapture>>>,
}

impl CpalRecorder {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for CpalRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCapture for CpalRecorder {
    async fn start(&self) -> CaptureResult<()> {
        let session = Arc::clone(&self.session);

        // The handshake blocks on the capture thread opening the device, so
        // the whole lock-and-wait runs off the async executor. The lock is
        // held across the handshake so a racing start cannot open a second
        // device.
        tokio::task::spawn_blocking(move || {
            let mut session = session
                .lock()
                .map_err(|_| CaptureError::AudioProcessing("capture state poisoned".to_string()))?;

            if session.is_some() {
                debug!("Capture already active, ignoring start");
                return Ok(());
            }

            let stop = Arc::new(AtomicBool::new(false));
            let (ready_tx, ready_rx) = mpsc::channel();

            let thread_stop = Arc::clone(&stop);
            let handle = thread::spawn(move || run_capture(thread_stop, ready_tx));

            match ready_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(Ok(())) => {
                    info!("Microphone capture started");
                    *session = Some(ActiveCapture { stop, handle });
                    Ok(())
                }
                Ok(Err(e)) => {
                    // The thread has already sent its error and is exiting;
                    // reap it so no handle is leaked.
                    let _ = handle.join();
                    Err(e)
                }
                Err(_) => {
                    stop.store(true, Ordering::Relaxed);
                    warn!("Capture thread did not answer within 5s, detaching it with the stop flag raised");
                    Err(CaptureError::MicUnavailable(
                        "capture thread did not open the device".to_string(),
                    ))
                }
            }
        })
        .await
        .map_err(|e| CaptureError::AudioProcessing(format!("start task: {e}")))?
    }

    async fn stop(&self) -> CaptureResult<AudioPayload> {
        let active = {
            let mut session = self.session.lock().map_err(|_| {
                CaptureError::AudioProcessing("capture state poisoned".to_string())
            })?;
            session.take().ok_or(CaptureError::NoSession)?
        };

        active.stop.store(true, Ordering::Relaxed);

        let joined = tokio::task::spawn_blocking(move || active.handle.join())
            .await
            .map_err(|e| CaptureError::AudioProcessing(format!("join task: {e}")))?;

        let payload = joined
            .map_err(|_| CaptureError::AudioProcessing("capture thread panicked".to_string()))??;

        info!(bytes = payload.bytes.len(), "Microphone capture finished");
        Ok(payload)
    }
}

/// Body of the capture thread: open the input stream, buffer samples until
/// the stop flag is raised, then encode the buffer as WAV.
fn run_capture(
    stop: Arc<AtomicBool>,
    ready: mpsc::Sender<CaptureResult<()>>,
) -> CaptureResult<AudioPayload> {
    let samples: Arc<Mutex<Vec<i16>>> = Arc::new(Mutex::new(Vec::new()));

    let (stream, channels, sample_rate) = match open_input_stream(Arc::clone(&samples)) {
        Ok(opened) => opened,
        Err(e) => {
            // start() surfaces this error; the thread's own return value is
            // never observed on this path.
            let _ = ready.send(Err(e));
            return Err(CaptureError::NoSession);
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready.send(Err(CaptureError::AudioProcessing(format!(
            "failed to start input stream: {e}"
        ))));
        return Err(CaptureError::NoSession);
    }

    let _ = ready.send(Ok(()));

    while !stop.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(20));
    }

    // Dropping the stream releases the device before encoding.
    drop(stream);

    let buffered = samples
        .lock()
        .map_err(|_| CaptureError::AudioProcessing("sample buffer poisoned".to_string()))?;

    debug!(samples = buffered.len(), sample_rate, "Encoding captured audio");
    let wav = encode_wav(&buffered, channels, sample_rate)?;
    Ok(AudioPayload::wav(wav))
}

fn open_input_stream(
    samples: Arc<Mutex<Vec<i16>>>,
) -> CaptureResult<(cpal::Stream, u16, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::MicUnavailable("no input device found".to_string()))?;

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::MicUnavailable(format!("input config: {e}")))?;

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels;
    let sample_rate = config.sample_rate.0;

    let err_fn = |e| warn!(error = %e, "Input stream error");

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let buf = samples;
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buf.lock() {
                        buf.extend(data.iter().map(|&s| float_to_i16(s)));
                    }
                },
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let buf = samples;
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buf.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::U16 => {
            let buf = samples;
            device.build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buf.lock() {
                        buf.extend(data.iter().map(|&s| (i32::from(s) - 32768) as i16));
                    }
                },
                err_fn,
                None,
            )
        }
        other => {
            return Err(CaptureError::AudioProcessing(format!(
                "unsupported sample format: {other:?}"
            )))
        }
    }
    .map_err(|e| CaptureError::MicUnavailable(format!("failed to open input stream: {e}")))?;

    Ok((stream, channels, sample_rate))
}

fn float_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

fn encode_wav(samples: &[i16], channels: u16, sample_rate: u32) -> CaptureResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| CaptureError::AudioProcessing(format!("wav header: {e}")))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| CaptureError::AudioProcessing(format!("wav sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| CaptureError::AudioProcessing(format!("wav finalize: {e}")))?;
    }

    Ok(cursor.into_inner())
}
