use thiserror::Error;

pub type Result<T> = std::result::Result<T, self::Error>;

/// Failure taxonomy for the capture and analysis flows.
///
/// Every variant surfaces to the caller; nothing is retried or swallowed at
/// this layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Microphone access was denied or no capture device is available.
    /// Terminal for that recording attempt; the user must retry.
    #[error("microphone permission denied or capture unsupported: {0}")]
    Permission(String),

    /// Capture teardown fault that is not a permission denial.
    #[error("audio device failure: {0}")]
    Device(String),

    /// Transport-level failure: the backend could not be reached or the
    /// connection broke mid-request.
    #[error("backend unreachable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Backend { status: u16, message: String },

    /// The backend answered 2xx but the expected field was absent.
    #[error("backend response malformed: {0}")]
    MalformedResponse(String),

    /// Analysis was requested with empty text; no network call was made.
    /// Recoverable, user-correctable.
    #[error("input text is empty")]
    EmptyInput,
}
