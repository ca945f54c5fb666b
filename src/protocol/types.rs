//! Generic request and task identifiers consumed by the protocol layer.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Parameter carrying the submission method discriminator.
pub const METHOD_PARAM: &str = "method";

/// Method value identifying reCAPTCHA tasks.
pub const RECAPTCHA_METHOD: &str = "userrecaptcha";

/// A captcha task ready to be submitted: plain parameters plus optional
/// file attachments keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub params: HashMap<String, String>,
    pub files: HashMap<String, PathBuf>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request for the given submission method.
    pub fn with_method(method: impl Into<String>) -> Self {
        Self::new().param(METHOD_PARAM, method)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.insert(field.into(), path.into());
        self
    }

    pub fn method(&self) -> Option<&str> {
        self.params.get(METHOD_PARAM).map(String::as_str)
    }

    pub fn is_recaptcha(&self) -> bool {
        self.method() == Some(RECAPTCHA_METHOD)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Opaque identifier of a task accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
