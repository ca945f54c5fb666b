//! Transport abstraction used by the submission and polling layers.
//!
//! Keeps the protocol independent of the HTTP stack so callers (and tests)
//! can plug in their own client.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use url::Url;

use super::error::{ApiError, CaptchaError};

/// Contract implemented by the HTTP client talking to the captcha service.
///
/// Implementations must apply their request timeout to every call and report
/// connection level failures as [`TransportError::Network`].
#[async_trait]
pub trait CaptchaHttpClient: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;

    async fn post_form(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError>;

    /// Each file becomes a part named by its field key, using the file's base
    /// name as filename. Every file is read before anything is sent.
    async fn post_multipart(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
        files: &HashMap<String, PathBuf>,
    ) -> Result<HttpResponse, TransportError>;
}

/// Raw status and body returned by the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as UTF-8. Undecodable bodies are malformed rather than repaired,
    /// so a mangled token can never pass as a success.
    pub fn text(&self) -> Result<&str, ApiError> {
        std::str::from_utf8(&self.body)
            .map_err(|_| ApiError::Malformed(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http transport error: {0}")]
    Network(String),
    #[error("failed to read {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<TransportError> for CaptchaError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(message) => CaptchaError::Network(message),
            TransportError::Attachment { path, source } => {
                CaptchaError::Attachment { path, source }
            }
        }
    }
}
