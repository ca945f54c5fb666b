//! High level client orchestration.
//!
//! Wires the submission protocol and the polling loop together behind a
//! cloneable handle that solves one captcha per call.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::config::{ClientConfig, parse_base_url};
use crate::protocol::{
	ApiError, CaptchaError, CaptchaHttpClient, CaptchaResult, ReqwestCaptchaHttpClient, Request,
	ResponseContext, TaskId, interpret_response, polling, submit,
};

/// Fluent builder for [`CaptchaClient`].
pub struct ClientBuilder {
	config: ClientConfig,
	http: Option<Arc<dyn CaptchaHttpClient>>,
	base_url: Option<String>,
}

impl ClientBuilder {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self::from_config(ClientConfig::new(api_key))
	}

	pub fn from_config(config: ClientConfig) -> Self {
		Self {
			config,
			http: None,
			base_url: None,
		}
	}

	/// Points the client at another 2captcha-compatible endpoint.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into());
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.config.default_timeout = timeout;
		self
	}

	pub fn with_polling_interval(mut self, interval: Duration) -> Self {
		self.config.polling_interval = interval;
		self
	}

	pub fn with_recaptcha_timeout(mut self, timeout: Duration) -> Self {
		self.config.recaptcha_timeout = timeout;
		self
	}

	/// Replaces the default reqwest transport.
	pub fn with_http_client(mut self, http: Arc<dyn CaptchaHttpClient>) -> Self {
		self.http = Some(http);
		self
	}

	pub fn build(mut self) -> CaptchaResult<CaptchaClient> {
		if let Some(raw) = &self.base_url {
			self.config.base_url = parse_base_url(raw)?;
		}
		self.config.validate()?;

		let http: Arc<dyn CaptchaHttpClient> = match self.http {
			Some(http) => http,
			None => Arc::new(ReqwestCaptchaHttpClient::new(self.config.default_timeout)?),
		};

		Ok(CaptchaClient {
			config: Arc::new(self.config),
			http,
		})
	}
}

/// Handle to the captcha service.
///
/// Cloning is cheap; clones share the configuration and transport.
#[derive(Clone)]
pub struct CaptchaClient {
	config: Arc<ClientConfig>,
	http: Arc<dyn CaptchaHttpClient>,
}

impl CaptchaClient {
	/// Construct a client with default settings for the given API key.
	pub fn new(api_key: impl Into<String>) -> CaptchaResult<Self> {
		ClientBuilder::new(api_key).build()
	}

	/// Obtain a builder to customise the client instance.
	pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
		ClientBuilder::new(api_key)
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Submits the task and waits for its answer.
	///
	/// reCAPTCHA tasks are polled for up to the reCAPTCHA timeout, everything
	/// else for the default timeout.
	pub async fn solve(&self, request: Request) -> CaptchaResult<String> {
		let timeout = self.timeout_for(&request);
		let task_id = self.send(request).await?;

		self.wait_for_result(&task_id, timeout, self.config.polling_interval)
			.await
	}

	/// Submits the task without waiting for it.
	pub async fn send(&self, request: Request) -> CaptchaResult<TaskId> {
		submit(self.http.as_ref(), &self.config, request).await
	}

	pub async fn wait_for_result(
		&self,
		task_id: &TaskId,
		timeout: Duration,
		interval: Duration,
	) -> CaptchaResult<String> {
		polling::wait_for_result(self.http.as_ref(), &self.config, task_id, timeout, interval).await
	}

	/// Single status query; `None` while the task is not ready.
	pub async fn get_result(&self, task_id: &TaskId) -> CaptchaResult<Option<String>> {
		polling::get_result(self.http.as_ref(), &self.config, task_id).await
	}

	/// Current account balance.
	pub async fn get_balance(&self) -> CaptchaResult<f64> {
		let body = self.res_action("getbalance").await?;
		body.trim()
			.parse::<f64>()
			.map_err(|_| CaptchaError::Api(ApiError::Malformed(body)))
	}

	fn timeout_for(&self, request: &Request) -> Duration {
		if request.is_recaptcha() {
			self.config.recaptcha_timeout
		} else {
			self.config.default_timeout
		}
	}

	async fn res_action(&self, action: &str) -> CaptchaResult<String> {
		let url = self.config.result_url(&[("action", action)])?;
		debug!("res.php action={action}");
		let response = self.http.get(&url).await?;

		match interpret_response(ResponseContext::Plain, &response).into_result()? {
			Some(body) => Ok(body),
			None => {
				let body = String::from_utf8_lossy(&response.body).into_owned();
				Err(ApiError::Malformed(body).into())
			}
		}
	}
}
