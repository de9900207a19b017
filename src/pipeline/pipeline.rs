use super::state::PipelineState;
use crate::backend::{AdviceGenerator, BackendClient, EmotionClassifier};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Immutable snapshot of the user's text at the moment analysis was
/// requested, not a live reference to the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Final result of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub emotion: String,
    pub advice: String,
}

/// Sequences classify → advise for one request and owns the observable
/// [`PipelineState`].
///
/// Each run carries a monotonically increasing token; a run whose token is
/// stale by the time it writes state has been superseded and its writes
/// are discarded, so overlapping runs cannot clobber the newest one's
/// observable state. A superseded run still returns its own result to its
/// caller.
pub struct AnalysisPipeline {
    classifier: Arc<dyn EmotionClassifier>,
    advisor: Arc<dyn AdviceGenerator>,
    state: RwLock<PipelineState>,
    run_seq: AtomicU64,
}

impl AnalysisPipeline {
    pub fn new(classifier: Arc<dyn EmotionClassifier>, advisor: Arc<dyn AdviceGenerator>) -> Self {
        Self {
            classifier,
            advisor,
            state: RwLock::new(PipelineState::Idle),
            run_seq: AtomicU64::new(0),
        }
    }

    /// Both stages served by one [`BackendClient`].
    pub fn with_client(client: BackendClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Current observable state. Read-only to callers.
    pub async fn state(&self) -> PipelineState {
        self.state.read().await.clone()
    }

    /// Run the two-stage pipeline for one request.
    ///
    /// Empty (whitespace-only) text short-circuits with zero network
    /// calls. The emotion label becomes observable as soon as
    /// classification succeeds, before advice is ready. Advice is always
    /// generated from the label classified for this exact request, never a
    /// cached or default one.
    pub async fn run(&self, text: &str) -> Result<Analysis> {
        let token = self.run_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let request = AnalysisRequest::new(text);

        if request.is_empty() {
            warn!(token, "analysis requested with empty text");
            let error = Error::EmptyInput;
            self.publish(
                token,
                PipelineState::Failed {
                    emotion: None,
                    error: error.to_string(),
                },
            )
            .await;
            return Err(error);
        }

        info!(token, chars = request.text.len(), "analysis started");
        self.publish(token, PipelineState::Classifying).await;

        let emotion = match self.classifier.classify(&request.text).await {
            Ok(emotion) => emotion,
            Err(e) => {
                warn!(token, "emotion classification failed: {}", e);
                self.publish(
                    token,
                    PipelineState::Failed {
                        emotion: None,
                        error: e.to_string(),
                    },
                )
                .await;
                return Err(e);
            }
        };

        info!(token, %emotion, "primary emotion identified");
        self.publish(
            token,
            PipelineState::AwaitingAdvice {
                emotion: emotion.clone(),
            },
        )
        .await;

        let advice = match self.advisor.generate_advice(&request.text, &emotion).await {
            Ok(advice) => advice,
            Err(e) => {
                warn!(token, "advice generation failed: {}", e);
                // The classified emotion stays visible alongside the failure.
                self.publish(
                    token,
                    PipelineState::Failed {
                        emotion: Some(emotion),
                        error: e.to_string(),
                    },
                )
                .await;
                return Err(e);
            }
        };

        info!(token, chars = advice.len(), "advice generated");
        self.publish(
            token,
            PipelineState::Done {
                emotion: emotion.clone(),
                advice: advice.clone(),
            },
        )
        .await;

        Ok(Analysis { emotion, advice })
    }

    async fn publish(&self, token: u64, next: PipelineState) {
        if self.run_seq.load(Ordering::SeqCst) != token {
            debug!(token, "discarding state write from superseded run");
            return;
        }
        *self.state.write().await = next;
    }
}
