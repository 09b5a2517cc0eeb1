// lib/src/triage/audio_capture.rs
// Bounded voice capture. A recording ends at the first of: the capture
// window elapsing, a user stop, the device running dry, or a device error.
// The device is released on every one of those paths, and also when the
// recording future itself is dropped.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

use models::AudioClip;

use crate::errors::{Result, TriageError};

/// Something that can be opened for capture, e.g. a microphone.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CaptureStream>>;
}

/// An open capture device.
#[async_trait]
pub trait CaptureStream: Send {
    /// Next chunk of encoded audio, or `None` once the device has nothing more.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;

    fn mime_type(&self) -> &str;

    /// Frees the underlying device. Called exactly once.
    fn release(&mut self);
}

/// Owns an open stream and releases it when dropped.
struct DeviceGuard {
    stream: Option<Box<dyn CaptureStream>>,
}

impl DeviceGuard {
    fn new(stream: Box<dyn CaptureStream>) -> Self {
        Self { stream: Some(stream) }
    }

    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        match self.stream.as_mut() {
            Some(stream) => stream.next_chunk().await,
            None => Ok(None),
        }
    }

    fn mime_type(&self) -> String {
        self.stream
            .as_ref()
            .map(|s| s.mime_type().to_string())
            .unwrap_or_else(|| "audio/wav".to_string())
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("Capture device released");
        }
    }
}

async fn stop_requested(stop: &mut Option<oneshot::Receiver<()>>) {
    if let Some(rx) = stop.as_mut() {
        if rx.await.is_ok() {
            return;
        }
        // Sender dropped without asking to stop: only the window ends the capture now.
        *stop = None;
    }
    std::future::pending::<()>().await
}

#[derive(Clone)]
pub struct AudioRecorder {
    source: Arc<dyn AudioSource>,
    max_duration: Duration,
}

impl AudioRecorder {
    pub fn new(source: Arc<dyn AudioSource>, max_duration: Duration) -> Self {
        Self { source, max_duration }
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Records until the capture window closes or `stop` fires.
    pub async fn record(&self, mut stop: Option<oneshot::Receiver<()>>) -> Result<AudioClip> {
        let stream = self.source.open().await.map_err(|err| match err {
            TriageError::InvalidInput(_) => err,
            other => TriageError::CaptureUnavailable(other.to_string()),
        })?;
        let mut device = DeviceGuard::new(stream);
        let mime_type = device.mime_type();

        let started = Instant::now();
        let window = sleep(self.max_duration);
        tokio::pin!(window);

        let mut bytes = Vec::new();
        loop {
            tokio::select! {
                _ = &mut window => {
                    info!("Capture window of {:?} reached, stopping", self.max_duration);
                    break;
                }
                _ = stop_requested(&mut stop) => {
                    debug!("Capture stopped by user");
                    break;
                }
                chunk = device.next_chunk() => match chunk {
                    Ok(Some(data)) => bytes.extend_from_slice(&data),
                    Ok(None) => break,
                    Err(err) => {
                        warn!("Capture device failed: {}", err);
                        return Err(TriageError::CaptureUnavailable(err.to_string()));
                    }
                },
            }
        }
        drop(device);

        let duration = started.elapsed().min(self.max_duration);
        AudioClip::new(bytes, mime_type, duration)
            .map_err(|_| TriageError::CaptureUnavailable("no audio was captured".to_string()))
    }
}

/// Replays a WAV recording as if it were being spoken: chunks are paced at
/// the file's byte rate, so the capture window truncates long recordings just
/// as it would a live microphone. Other formats carry no byte rate to pace by
/// and are refused.
#[derive(Debug, Clone)]
pub struct FileAudioSource {
    path: PathBuf,
}

impl FileAudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

const CHUNKS_PER_SECOND: u32 = 10;

/// Byte rate from a canonical RIFF/WAVE header, if there is one.
fn wav_byte_rate(data: &[u8]) -> Option<u32> {
    if data.len() < 44 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return None;
    }
    let rate = u32::from_le_bytes([data[28], data[29], data[30], data[31]]);
    (rate > 0).then_some(rate)
}

struct FileStream {
    data: Vec<u8>,
    offset: usize,
    chunk_size: usize,
}

#[async_trait]
impl CaptureStream for FileStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.offset >= self.data.len() {
            return Ok(None);
        }
        if self.offset > 0 {
            sleep(Duration::from_millis(1000 / CHUNKS_PER_SECOND as u64)).await;
        }
        let end = (self.offset + self.chunk_size).min(self.data.len());
        let chunk = self.data[self.offset..end].to_vec();
        self.offset = end;
        Ok(Some(chunk))
    }

    fn mime_type(&self) -> &str {
        "audio/wav"
    }

    fn release(&mut self) {
        self.data = Vec::new();
    }
}

#[async_trait]
impl AudioSource for FileAudioSource {
    async fn open(&self) -> Result<Box<dyn CaptureStream>> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| TriageError::CaptureUnavailable(format!("{}: {}", self.path.display(), e)))?;
        let rate = wav_byte_rate(&data).ok_or_else(|| {
            TriageError::InvalidInput(format!("{} is not a WAV recording", self.path.display()))
        })?;
        // The header travels in the first chunk.
        let chunk_size = ((rate / CHUNKS_PER_SECOND) as usize).max(1);
        Ok(Box::new(FileStream { data, offset: 0, chunk_size }))
    }
}
