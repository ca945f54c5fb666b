use url::Url;

use crate::protocol::{CaptchaError, CaptchaResult, RECAPTCHA_METHOD, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReCaptchaVersion {
    V2,
    V3,
}

impl ReCaptchaVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ReCaptchaVersion::V2 => "v2",
            ReCaptchaVersion::V3 => "v3",
        }
    }
}

/// Google reCAPTCHA task (`method=userrecaptcha`).
#[derive(Debug, Clone)]
pub struct ReCaptcha {
    pub site_key: String,
    pub page_url: Url,
    pub invisible: bool,
    pub version: Option<ReCaptchaVersion>,
    pub action: Option<String>,
    /// Minimum v3 score, within `0.0..=1.0`.
    pub min_score: Option<f64>,
}

impl ReCaptcha {
    pub fn new(site_key: impl Into<String>, page_url: Url) -> Self {
        Self {
            site_key: site_key.into(),
            page_url,
            invisible: false,
            version: None,
            action: None,
            min_score: None,
        }
    }

    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    pub fn with_version(mut self, version: ReCaptchaVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn to_request(&self) -> CaptchaResult<Request> {
        if self.site_key.trim().is_empty() {
            return Err(CaptchaError::InvalidRequest("recaptcha site key is empty".into()));
        }

        let mut request = Request::with_method(RECAPTCHA_METHOD)
            .param("googlekey", self.site_key.as_str())
            .param("pageurl", self.page_url.as_str());

        if self.invisible {
            request = request.param("invisible", "1");
        }
        if let Some(version) = self.version {
            request = request.param("version", version.as_str());
        }
        if let Some(action) = &self.action {
            request = request.param("action", action.as_str());
        }
        if let Some(score) = self.min_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(CaptchaError::InvalidRequest(format!(
                    "recaptcha min score {score} outside 0.0..=1.0"
                )));
            }
            request = request.param("min_score", score.to_string());
        }

        Ok(request)
    }
}
