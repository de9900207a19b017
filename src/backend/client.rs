use super::messages::{
    advice_instruction, AdviceRequest, AdviceResponse, EmotionRequest, EmotionResponse,
    SttResponse, TtsRequest, TtsResponse, EMOTION_INSTRUCTION,
};
use super::{AdviceGenerator, EmotionClassifier, EmotionLabel, Transcriber};
use crate::audio::AudioArtifact;
use crate::error::{Error, Result};
use base64::Engine;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for backend requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the inference backend.
///
/// One connected client, one method per stage. No retry at any layer: a
/// single failure surfaces immediately.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Probe the backend's health-check endpoint.
    pub async fn is_available(&self) -> bool {
        match self.client.get(self.url("/")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("backend not available: {}", e);
                false
            }
        }
    }

    /// Speech synthesis: `POST /tts`, base64 `audio_data` decoded to bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = TtsRequest {
            text: text.to_string(),
            system_instruction: String::new(),
            emotion: String::new(),
        };

        let body: TtsResponse = self.post_json("tts", &request).await?;
        let encoded = body
            .audio_data
            .ok_or_else(|| Error::MalformedResponse("missing field `audio_data`".to_string()))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::MalformedResponse(format!("invalid base64 audio_data: {e}")))?;

        info!(bytes = bytes.len(), "speech synthesized");
        Ok(bytes)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON from {path}: {e}")))
    }
}

#[async_trait::async_trait]
impl Transcriber for BackendClient {
    /// `POST /stt`: upload the artifact as multipart form data, field
    /// `audio`, and decode the recognized text.
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<String> {
        let part = Part::bytes(artifact.bytes.clone())
            .file_name(artifact.file_name.clone())
            .mime_str(&artifact.mime_type)
            .map_err(|e| Error::Device(format!("failed to build multipart audio part: {e}")))?;
        let form = Form::new().part("audio", part);

        debug!(bytes = artifact.len(), "sending recording for transcription");

        let response = self
            .client
            .post(self.url("stt"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body: SttResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON from stt: {e}")))?;

        let text = body
            .text
            .ok_or_else(|| Error::MalformedResponse("missing field `text`".to_string()))?;

        info!(chars = text.len(), "transcription received");
        Ok(text)
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for BackendClient {
    /// `POST /emotion_detection` with the fixed classifier prompt; returns
    /// the single primary-emotion label.
    async fn classify(&self, text: &str) -> Result<EmotionLabel> {
        let request = EmotionRequest {
            text: text.to_string(),
            system_instruction: EMOTION_INSTRUCTION.to_string(),
            emotion: String::new(),
        };

        let body: EmotionResponse = self.post_json("emotion_detection", &request).await?;
        body.emotion
            .ok_or_else(|| Error::MalformedResponse("missing field `emotion`".to_string()))
    }
}

#[async_trait::async_trait]
impl AdviceGenerator for BackendClient {
    /// `POST /gemini` with the persona prompt embedding the emotion;
    /// returns the generated empathetic reply.
    async fn generate_advice(&self, text: &str, emotion: &str) -> Result<String> {
        let request = AdviceRequest {
            system_instruction: advice_instruction(emotion),
            contents: text.to_string(),
            emotion: emotion.to_string(),
        };

        let body: AdviceResponse = self.post_json("gemini", &request).await?;
        body.response
            .ok_or_else(|| Error::MalformedResponse("missing field `response`".to_string()))
    }
}
