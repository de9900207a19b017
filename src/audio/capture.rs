use super::chunk::{AudioArtifact, RecordingSession};
use super::device::{AudioDevice, DeviceConfig, MicrophoneDevice};
use crate::error::Result;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Observable capture state for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Not currently recording.
    Idle,
    /// Currently recording audio.
    Recording {
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

/// Microphone recording state machine: `Idle → start → Recording → stop → Idle`.
///
/// While `Recording`, the device emits zero-or-more chunks which a collector
/// task accumulates into the current [`RecordingSession`]. `stop` awaits the
/// device flush, finalizes the session into one [`AudioArtifact`], and
/// releases the device on every exit path.
pub struct AudioCapture {
    device: Box<dyn AudioDevice>,
    state: CaptureState,
    session_seq: u64,
    collector: Option<JoinHandle<RecordingSession>>,
}

impl AudioCapture {
    pub fn new(device: Box<dyn AudioDevice>) -> Self {
        Self {
            device,
            state: CaptureState::Idle,
            session_seq: 0,
            collector: None,
        }
    }

    /// Capture from the default microphone.
    pub fn microphone(config: DeviceConfig) -> Self {
        Self::new(Box::new(MicrophoneDevice::new(config)))
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, CaptureState::Recording { .. })
    }

    /// Acquire the device and begin accumulating chunks.
    ///
    /// On permission failure the state stays `Idle`. Starting while a
    /// session is active is a no-op: the device is exclusively owned by
    /// the session in flight.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_recording() {
            warn!("recording already in progress");
            return Ok(());
        }

        self.session_seq += 1;
        let seq = self.session_seq;

        let mut chunk_rx = self.device.start().await?;

        let session_id = Uuid::new_v4();
        info!(%session_id, seq, device = self.device.name(), "recording started");

        // The previous chunk sequence is gone: a fresh session owns this
        // cycle's chunks. The collector finishes when the device drops its
        // sender after the terminal flush.
        let collector = tokio::spawn(async move {
            let mut session = RecordingSession::new(seq);
            while let Some(chunk) = chunk_rx.recv().await {
                session.push(chunk);
            }
            session
        });

        self.collector = Some(collector);
        self.state = CaptureState::Recording { session_id };

        Ok(())
    }

    /// Stop recording and finalize the artifact.
    ///
    /// Resolves once the device has flushed its final chunk. With no
    /// active session this is a no-op yielding no artifact. The device is
    /// released on every exit path, including flush failure.
    pub async fn stop(&mut self) -> Result<Option<AudioArtifact>> {
        let CaptureState::Recording { session_id } = self.state else {
            warn!("stop called with no active recording");
            return Ok(None);
        };

        // Release the device first. Its teardown closes the chunk channel,
        // so the collector completes even when the flush itself fails.
        let flush = self.device.stop().await;
        self.state = CaptureState::Idle;

        let session = match self.collector.take() {
            Some(handle) => match handle.await {
                Ok(session) => Some(session),
                Err(e) => {
                    error!(%session_id, "chunk collector task failed: {}", e);
                    None
                }
            },
            None => None,
        };

        flush?;

        let Some(session) = session else {
            return Ok(None);
        };

        let chunk_count = session.chunk_count();
        let artifact = session.finish();
        info!(
            %session_id,
            chunks = chunk_count,
            bytes = artifact.len(),
            "recording finalized"
        );

        Ok(Some(artifact))
    }
}
