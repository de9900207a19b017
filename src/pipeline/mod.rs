//! The analysis orchestrator: classify → advise over one request, with a
//! single observable state value.

mod pipeline;
mod state;

pub use pipeline::{Analysis, AnalysisPipeline, AnalysisRequest};
pub use state::PipelineState;
