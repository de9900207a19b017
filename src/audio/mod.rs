//! Microphone capture: device abstraction, chunk accumulation, and
//! artifact finalization.

pub mod capture;
pub mod chunk;
pub mod device;

pub use capture::{AudioCapture, CaptureState};
pub use chunk::{AudioArtifact, AudioChunk, RecordingSession, ARTIFACT_FILE_NAME, ARTIFACT_MIME};
pub use device::{AudioDevice, DeviceConfig, MicrophoneDevice};
