//! HTTP clients for the inference backend stages.
//!
//! One [`BackendClient`] implements all three stage traits; the traits
//! exist so the orchestrator can be exercised against scripted
//! implementations.

mod client;
pub mod messages;

pub use client::BackendClient;
pub use messages::{advice_instruction, EMOTION_INSTRUCTION};

use crate::audio::AudioArtifact;
use crate::error::Result;

/// Short string naming the primary emotion. Opaque: no closed set is
/// enforced client-side.
pub type EmotionLabel = String;

/// Speech-to-text stage
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String>;
}

/// Emotion classification stage
#[async_trait::async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<EmotionLabel>;
}

/// Advice generation stage, conditioned on (text, emotion)
#[async_trait::async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn generate_advice(&self, text: &str, emotion: &str) -> Result<String>;
}
