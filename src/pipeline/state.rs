/// The single observable analysis state, updated only by the orchestrator
/// and read-only to the presentation layer.
///
/// Intermediate results recorded by successful stages stay visible when a
/// later stage fails: `Failed` keeps the classified emotion if
/// classification succeeded before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// No analysis requested yet.
    Idle,
    /// Classification in flight.
    Classifying,
    /// Emotion known, advice generation in flight.
    AwaitingAdvice { emotion: String },
    /// Both stages complete.
    Done { emotion: String, advice: String },
    /// A stage failed; the remaining stages were aborted.
    Failed {
        emotion: Option<String>,
        error: String,
    },
}

impl PipelineState {
    /// The emotion label, if one has been recorded for the current run.
    pub fn emotion(&self) -> Option<&str> {
        match self {
            PipelineState::AwaitingAdvice { emotion } | PipelineState::Done { emotion, .. } => {
                Some(emotion)
            }
            PipelineState::Failed { emotion, .. } => emotion.as_deref(),
            PipelineState::Idle | PipelineState::Classifying => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            PipelineState::Classifying | PipelineState::AwaitingAdvice { .. }
        )
    }
}
