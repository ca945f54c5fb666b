//! Classification of the service's plain-text responses.
//!
//! The service answers `OK|<payload>` on success, `ERROR_<CODE>` on failure
//! and `CAPCHA_NOT_READY` while a task is still being worked on.

use http::StatusCode;

use super::error::ApiError;
use super::transport::HttpResponse;

pub const SUCCESS_PREFIX: &str = "OK|";
pub const ERROR_PREFIX: &str = "ERROR_";
pub const NOT_READY: &str = "CAPCHA_NOT_READY";

/// Which call produced the response being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseContext {
    /// `in.php` task creation; payload is the task id.
    Submit,
    /// `res.php?action=get`; may still be pending.
    Poll,
    /// Other `res.php` actions answering with a bare value.
    Plain,
}

/// Interpreted state of a single service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Pending,
    Error(ApiError),
}

impl Outcome {
    pub fn into_result(self) -> Result<Option<String>, ApiError> {
        match self {
            Outcome::Success(payload) => Ok(Some(payload)),
            Outcome::Pending => Ok(None),
            Outcome::Error(err) => Err(err),
        }
    }
}

/// Interprets a raw transport response. The body is only decoded once the
/// status is known to be OK; undecodable bodies are malformed.
pub fn interpret_response(context: ResponseContext, response: &HttpResponse) -> Outcome {
    if response.status != StatusCode::OK.as_u16() {
        return Outcome::Error(ApiError::Status(response.status));
    }

    match response.text() {
        Ok(body) => interpret(context, response.status, body),
        Err(err) => Outcome::Error(err),
    }
}

pub fn interpret(context: ResponseContext, status: u16, body: &str) -> Outcome {
    if status != StatusCode::OK.as_u16() {
        return Outcome::Error(ApiError::Status(status));
    }

    if body.starts_with(ERROR_PREFIX) {
        return Outcome::Error(ApiError::Service(body.trim().to_string()));
    }

    match context {
        ResponseContext::Plain => Outcome::Success(body.to_string()),
        ResponseContext::Poll if body == NOT_READY => Outcome::Pending,
        ResponseContext::Submit | ResponseContext::Poll => {
            match body.strip_prefix(SUCCESS_PREFIX) {
                Some(payload) => Outcome::Success(payload.to_string()),
                None => Outcome::Error(ApiError::Malformed(body.to_string())),
            }
        }
    }
}
