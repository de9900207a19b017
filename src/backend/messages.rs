use serde::{Deserialize, Serialize};

/// Classifier prompt. Part of the contract with the backend: sent verbatim
/// on every classify call — changing it changes classifier behavior.
pub const EMOTION_INSTRUCTION: &str = "You are a psychiatrist. Your task is ONLY to identify the patient's primary emotion from their text. Do not write explanations or extra text.";

/// Persona prompt for advice generation, interpolating the detected
/// emotion.
pub fn advice_instruction(emotion: &str) -> String {
    format!(
        "You are a psychiatrist. The patient is experiencing this emotion: {emotion}. Respond empathetically."
    )
}

/// Request body for `POST /emotion_detection`
#[derive(Debug, Serialize, Deserialize)]
pub struct EmotionRequest {
    pub text: String,
    pub system_instruction: String,
    /// Always empty on classify requests; the backend fills it in.
    pub emotion: String,
}

/// Response body from `POST /emotion_detection`
#[derive(Debug, Serialize, Deserialize)]
pub struct EmotionResponse {
    pub emotion: Option<String>,
}

/// Request body for `POST /gemini`
#[derive(Debug, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub system_instruction: String,
    pub contents: String,
    pub emotion: String,
}

/// Response body from `POST /gemini`
#[derive(Debug, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub response: Option<String>,
}

/// Response body from `POST /stt`
///
/// The field is optional because the backend answers `{"error": ...}` with
/// HTTP 200 on transcription failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct SttResponse {
    pub text: Option<String>,
}

/// Request body for `POST /tts`
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    pub system_instruction: String,
    pub emotion: String,
}

/// Response body from `POST /tts`
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsResponse {
    /// Base64-encoded audio bytes
    pub audio_data: Option<String>,
}
