//! Client configuration.
//!
//! Provides the settings every call reads:
//! - Service endpoint and API key
//! - Default and reCAPTCHA polling timeouts
//! - Polling interval
//! - JSON loading

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::protocol::{CaptchaError, CaptchaResult};

pub const DEFAULT_BASE_URL: &str = "https://2captcha.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_RECAPTCHA_TIMEOUT_SECS: u64 = 600;

const SUBMIT_PATH: &str = "/in.php";
const RESULT_PATH: &str = "/res.php";

/// Read-only settings shared by every request made through a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub api_key: String,
    /// Overall polling budget, also applied to each HTTP request.
    pub default_timeout: Duration,
    pub polling_interval: Duration,
    /// Polling budget used for `userrecaptcha` tasks.
    pub recaptcha_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            polling_interval: Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
            recaptcha_timeout: Duration::from_secs(DEFAULT_RECAPTCHA_TIMEOUT_SECS),
        }
    }

    /// Loads settings from JSON. Durations are whole seconds; only `api_key`
    /// is required.
    ///
    /// ```
    /// use api2captcha::ClientConfig;
    ///
    /// let config = ClientConfig::from_json_str(r#"{"api_key": "abc", "polling_interval": 2}"#)?;
    /// assert_eq!(config.polling_interval.as_secs(), 2);
    /// # Ok::<(), api2captcha::CaptchaError>(())
    /// ```
    pub fn from_json_str(raw: &str) -> CaptchaResult<Self> {
        let file: ConfigFile = serde_json::from_str(raw)
            .map_err(|err| CaptchaError::Configuration(format!("invalid config json: {err}")))?;

        let mut config = Self::new(file.api_key);
        if let Some(base_url) = file.base_url {
            config.base_url = parse_base_url(&base_url)?;
        }
        if let Some(secs) = file.default_timeout {
            config.default_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.polling_interval {
            config.polling_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = file.recaptcha_timeout {
            config.recaptcha_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CaptchaResult<()> {
        if self.api_key.is_empty() {
            return Err(CaptchaError::Configuration("api key is empty".into()));
        }
        if self.polling_interval.is_zero() {
            return Err(CaptchaError::Configuration(
                "polling interval must be non-zero".into(),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(CaptchaError::Configuration(format!(
                "base url {} cannot be a base",
                self.base_url
            )));
        }
        Ok(())
    }

    /// `POST` target for task submission.
    pub fn submit_url(&self) -> CaptchaResult<Url> {
        self.endpoint(SUBMIT_PATH)
    }

    /// `GET` target for a `res.php` action, with the API key attached.
    pub fn result_url(&self, params: &[(&str, &str)]) -> CaptchaResult<Url> {
        let mut url = self.endpoint(RESULT_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.api_key);
            for (name, value) in params {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> CaptchaResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| CaptchaError::Configuration(format!("invalid endpoint {path}: {err}")))
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    api_key: String,
    base_url: Option<String>,
    default_timeout: Option<u64>,
    polling_interval: Option<u64>,
    recaptcha_timeout: Option<u64>,
}

pub(crate) fn parse_base_url(raw: &str) -> CaptchaResult<Url> {
    Url::parse(raw).map_err(|err| CaptchaError::Configuration(format!("invalid base url {raw}: {err}")))
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}
