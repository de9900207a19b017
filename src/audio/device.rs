use super::chunk::AudioChunk;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

/// Bounded chunk channel; overflowing chunks are dropped with a warning
/// rather than blocking the audio callback.
const CHUNK_CHANNEL_CAPACITY: usize = 64;

/// Configuration for a capture device
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Duration of each emitted chunk in milliseconds (affects latency)
    pub chunk_duration_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            chunk_duration_ms: 100, // 100ms chunks
        }
    }
}

/// Capture device abstraction
///
/// The device is a scoped resource: acquired by `start`, released by
/// `stop`. `start` hands back the chunk channel; the channel closing is
/// the terminal flush event — once the receiver yields `None`, the device
/// has emitted its final chunk.
#[async_trait::async_trait]
pub trait AudioDevice: Send + Sync {
    /// Acquire the device and begin streaming chunks.
    ///
    /// Fails with [`Error::Permission`] when access is denied or no
    /// capture device exists.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>>;

    /// Flush pending data, emit the final chunk, and release the device.
    ///
    /// The chunk channel is closed on every exit path of this call,
    /// including failure.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the device is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get device name for logging
    fn name(&self) -> &str;
}

/// Default-input microphone backed by cpal.
///
/// The `cpal::Stream` is not `Send`, so a dedicated thread owns it for the
/// lifetime of one capture. Chunks are 16-bit little-endian PCM at the
/// device's native rate and channel count.
pub struct MicrophoneDevice {
    config: DeviceConfig,
    stop_signal: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl MicrophoneDevice {
    pub fn new(config: DeviceConfig) -> Self {
        Self {
            config,
            stop_signal: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioDevice for MicrophoneDevice {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        if self.worker.is_some() {
            return Err(Error::Device("capture already in progress".to_string()));
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = oneshot::channel();
        let stop_signal = Arc::clone(&self.stop_signal);
        let config = self.config.clone();

        let worker = std::thread::spawn(move || {
            capture_thread(config, stop_signal, chunk_tx, ready_tx);
        });

        // The thread reports once the stream is up (or why it is not).
        match ready_rx.await {
            Ok(Ok(())) => {
                self.worker = Some(worker);
                Ok(chunk_rx)
            }
            Ok(Err(e)) => {
                let _ = tokio::task::spawn_blocking(move || worker.join()).await;
                Err(e)
            }
            Err(_) => {
                let _ = tokio::task::spawn_blocking(move || worker.join()).await;
                Err(Error::Device(
                    "capture thread exited before the stream came up".to_string(),
                ))
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            warn!("microphone stop called while not capturing");
            return Ok(());
        };

        self.stop_signal.store(true, Ordering::SeqCst);

        // Joining flushes the remainder and drops the chunk sender; the
        // device is released whether or not the join succeeds.
        tokio::task::spawn_blocking(move || worker.join())
            .await
            .map_err(|e| Error::Device(format!("failed to join capture thread: {e}")))?
            .map_err(|_| Error::Device("capture thread panicked".to_string()))
    }

    fn is_capturing(&self) -> bool {
        self.worker.is_some()
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}

/// Owns the cpal stream for one capture: builds it, reports readiness,
/// parks until the stop signal, then flushes and drops the chunk sender.
#[allow(deprecated)] // cpal 0.17 deprecates name() but description() is not yet stable
fn capture_thread(
    config: DeviceConfig,
    stop_signal: Arc<AtomicBool>,
    chunk_tx: mpsc::Sender<AudioChunk>,
    ready_tx: oneshot::Sender<Result<()>>,
) {
    let host = cpal::default_host();
    let Some(device) = host.default_input_device() else {
        let _ = ready_tx.send(Err(Error::Permission(
            "no default input device available".to_string(),
        )));
        return;
    };

    let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

    let supported = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = ready_tx.send(Err(Error::Permission(format!(
                "no usable input config for '{device_name}': {e}"
            ))));
            return;
        }
    };

    let sample_rate = supported.sample_rate();
    let channels = supported.channels();
    info!(
        "capturing from '{}': {}Hz, {} channels",
        device_name, sample_rate, channels
    );

    // i16 PCM bytes per chunk at the native format.
    let chunk_bytes = (u64::from(sample_rate) * u64::from(channels) * 2
        * config.chunk_duration_ms
        / 1000)
        .max(2) as usize;

    let pending: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let callback_pending = Arc::clone(&pending);
    let callback_tx = chunk_tx.clone();

    let stream = match device.build_input_stream(
        &supported.config(),
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let Ok(mut buf) = callback_pending.lock() else {
                return;
            };
            for &sample in data {
                let s = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                buf.extend_from_slice(&s.to_le_bytes());
            }
            if buf.len() >= chunk_bytes {
                let chunk = AudioChunk::new(std::mem::take(&mut *buf));
                if callback_tx.try_send(chunk).is_err() {
                    warn!("audio chunk channel full, dropping chunk");
                }
            }
        },
        |err| {
            error!("audio input stream error: {}", err);
        },
        None,
    ) {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(Error::Permission(format!(
                "failed to open input stream on '{device_name}': {e}"
            ))));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(Error::Permission(format!(
            "failed to start input stream on '{device_name}': {e}"
        ))));
        return;
    }

    let _ = ready_tx.send(Ok(()));

    while !stop_signal.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(20));
    }

    // Tear down the stream first so the callback can no longer run, then
    // emit whatever accumulated since the last full chunk.
    drop(stream);
    if let Ok(mut buf) = pending.lock() {
        let rest = std::mem::take(&mut *buf);
        if !rest.is_empty() && chunk_tx.blocking_send(AudioChunk::new(rest)).is_err() {
            warn!("chunk receiver dropped before final flush");
        }
    }
    info!("capture stream on '{}' released", device_name);
    // chunk_tx drops here, closing the channel: the terminal flush event.
}
