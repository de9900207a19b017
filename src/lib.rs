pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod pipeline;

pub use audio::{
    AudioArtifact, AudioCapture, AudioChunk, AudioDevice, CaptureState, DeviceConfig,
    MicrophoneDevice, RecordingSession,
};
pub use backend::{AdviceGenerator, BackendClient, EmotionClassifier, EmotionLabel, Transcriber};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{create_router, AppState};
pub use pipeline::{Analysis, AnalysisPipeline, AnalysisRequest, PipelineState};
