use std::time::Duration;

/// Default timeout for relayed requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Base URL of the inference backend the `/analyze` relay targets
    pub backend_base_url: String,
    /// Shared HTTP client for relayed requests
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(backend_base_url: impl Into<String>) -> Self {
        Self::with_timeout(backend_base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(backend_base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            backend_base_url: backend_base_url.into(),
            client,
        }
    }
}
