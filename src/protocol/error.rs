//! Error taxonomy shared by every layer of the client.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Common result type returned by the client.
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// The service answered, but signalled a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unexpected http status {0}")]
    Status(u16),
    #[error("service reported {0}")]
    Service(String),
    #[error("malformed response: {0:?}")]
    Malformed(String),
}

/// Errors surfaced by the captcha client.
#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("captcha solving timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("client misconfigured: {0}")]
    Configuration(String),
}

impl CaptchaError {
    /// Network failures are the only errors the polling loop tolerates.
    pub fn is_network(&self) -> bool {
        matches!(self, CaptchaError::Network(_))
    }
}
