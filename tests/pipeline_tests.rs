// Integration tests for the analysis orchestrator.
//
// Scripted stage implementations record every call so the ordering and
// data-dependency properties can be asserted without a network.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use sukoon_client::{
    AdviceGenerator, AnalysisPipeline, EmotionClassifier, Error, PipelineState, Result,
};
use tokio::sync::Notify;

enum ClassifyOutcome {
    Label(&'static str),
    Status(u16),
}

struct ScriptedClassifier {
    outcome: ClassifyOutcome,
    calls: Mutex<Vec<String>>,
}

impl ScriptedClassifier {
    fn label(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            outcome: ClassifyOutcome::Label(label),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn status(status: u16) -> Arc<Self> {
        Arc::new(Self {
            outcome: ClassifyOutcome::Status(status),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmotionClassifier for ScriptedClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        match &self.outcome {
            ClassifyOutcome::Label(label) => Ok((*label).to_string()),
            ClassifyOutcome::Status(status) => Err(Error::Backend {
                status: *status,
                message: "internal server error".to_string(),
            }),
        }
    }
}

struct ScriptedAdvisor {
    fail: bool,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedAdvisor {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdviceGenerator for ScriptedAdvisor {
    async fn generate_advice(&self, text: &str, emotion: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), emotion.to_string()));
        if self.fail {
            return Err(Error::BackendUnavailable("connection refused".to_string()));
        }
        Ok(format!("it is okay to feel {emotion}"))
    }
}

#[tokio::test]
async fn run_classifies_then_advises_with_the_returned_label() {
    let classifier = ScriptedClassifier::label("sadness");
    let advisor = ScriptedAdvisor::ok();
    let pipeline = AnalysisPipeline::new(classifier.clone(), advisor.clone());

    let analysis = pipeline.run("I feel hopeless").await.unwrap();

    assert_eq!(analysis.emotion, "sadness");
    assert_eq!(analysis.advice, "it is okay to feel sadness");

    // Exactly one classify, then exactly one advice call carrying the
    // label that classify returned.
    assert_eq!(classifier.calls(), vec!["I feel hopeless".to_string()]);
    assert_eq!(
        advisor.calls(),
        vec![("I feel hopeless".to_string(), "sadness".to_string())]
    );

    assert_eq!(
        pipeline.state().await,
        PipelineState::Done {
            emotion: "sadness".to_string(),
            advice: "it is okay to feel sadness".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_input_makes_no_stage_calls() {
    let classifier = ScriptedClassifier::label("sadness");
    let advisor = ScriptedAdvisor::ok();
    let pipeline = AnalysisPipeline::new(classifier.clone(), advisor.clone());

    let err = pipeline.run("").await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput));

    let err = pipeline.run("   \n").await.unwrap_err();
    assert!(matches!(err, Error::EmptyInput));

    assert!(classifier.calls().is_empty());
    assert!(advisor.calls().is_empty());
}

#[tokio::test]
async fn classify_failure_skips_advice_generation() {
    let classifier = ScriptedClassifier::status(500);
    let advisor = ScriptedAdvisor::ok();
    let pipeline = AnalysisPipeline::new(classifier.clone(), advisor.clone());

    let err = pipeline.run("I feel hopeless").await.unwrap_err();
    assert!(matches!(err, Error::Backend { status: 500, .. }));

    assert_eq!(classifier.calls().len(), 1);
    assert!(advisor.calls().is_empty(), "advice must never run after a classify failure");

    match pipeline.state().await {
        PipelineState::Failed { emotion, .. } => assert_eq!(emotion, None),
        other => panic!("expected Failed state, got {other:?}"),
    }
}

#[tokio::test]
async fn advice_failure_keeps_the_classified_emotion_visible() {
    let classifier = ScriptedClassifier::label("sadness");
    let advisor = ScriptedAdvisor::failing();
    let pipeline = AnalysisPipeline::new(classifier.clone(), advisor.clone());

    let err = pipeline.run("I feel hopeless").await.unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable(_)));

    let state = pipeline.state().await;
    assert_eq!(state.emotion(), Some("sadness"));
    assert!(matches!(state, PipelineState::Failed { .. }));
}

/// Advisor that samples the observable pipeline state at the moment it is
/// invoked, to show the label is visible before advice is ready.
#[derive(Default)]
struct StateProbeAdvisor {
    pipeline: Mutex<Option<Arc<AnalysisPipeline>>>,
    observed: Mutex<Option<PipelineState>>,
}

#[async_trait]
impl AdviceGenerator for StateProbeAdvisor {
    async fn generate_advice(&self, _text: &str, emotion: &str) -> Result<String> {
        let pipeline = self.pipeline.lock().unwrap().clone().unwrap();
        let state = pipeline.state().await;
        *self.observed.lock().unwrap() = Some(state);
        Ok(format!("stay with that {emotion}"))
    }
}

#[tokio::test]
async fn emotion_is_observable_before_advice_is_ready() {
    let classifier = ScriptedClassifier::label("sadness");
    let advisor = Arc::new(StateProbeAdvisor::default());
    let pipeline = Arc::new(AnalysisPipeline::new(classifier, advisor.clone()));
    *advisor.pipeline.lock().unwrap() = Some(pipeline.clone());

    pipeline.run("I feel hopeless").await.unwrap();

    let observed = advisor.observed.lock().unwrap().clone();
    assert_eq!(
        observed,
        Some(PipelineState::AwaitingAdvice {
            emotion: "sadness".to_string()
        })
    );
}

/// Classifier whose first call parks until released, so a second run can
/// overtake it.
struct GatedClassifier {
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedClassifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EmotionClassifier for GatedClassifier {
    async fn classify(&self, _text: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            self.gate.notified().await;
            Ok("sadness".to_string())
        } else {
            Ok("calm".to_string())
        }
    }
}

#[tokio::test]
async fn superseded_run_does_not_overwrite_newer_state() {
    let classifier = GatedClassifier::new();
    let advisor = ScriptedAdvisor::ok();
    let pipeline = Arc::new(AnalysisPipeline::new(classifier.clone(), advisor.clone()));

    let first = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.run("I feel hopeless").await }
    });

    // Let the first run reach its classify call before starting the second.
    while classifier.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let second = pipeline.run("I am at peace").await.unwrap();
    assert_eq!(second.emotion, "calm");

    classifier.gate.notify_one();
    let first = first.await.unwrap().unwrap();

    // The overtaken run still answers its own caller, but its state
    // writes were stale and discarded.
    assert_eq!(first.emotion, "sadness");
    assert_eq!(
        pipeline.state().await,
        PipelineState::Done {
            emotion: "calm".to_string(),
            advice: second.advice,
        }
    );
}
