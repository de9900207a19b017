//! Presentation-tier HTTP surface
//!
//! - POST /analyze - opaque JSON relay to the inference backend
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
