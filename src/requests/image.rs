use std::path::PathBuf;

use crate::protocol::Request;

const IMAGE_METHOD: &str = "post";
const IMAGE_FIELD: &str = "file";

/// Normal image captcha uploaded from a local file.
#[derive(Debug, Clone)]
pub struct ImageCaptcha {
    pub path: PathBuf,
    pub case_sensitive: bool,
    pub hint: Option<String>,
}

impl ImageCaptcha {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            case_sensitive: false,
            hint: None,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Free-text instruction shown to the worker.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn to_request(&self) -> Request {
        let mut request = Request::with_method(IMAGE_METHOD).file(IMAGE_FIELD, self.path.clone());
        if self.case_sensitive {
            request = request.param("regsense", "1");
        }
        if let Some(hint) = &self.hint {
            request = request.param("textinstructions", hint.as_str());
        }
        request
    }
}
