//! Core protocol shared by every captcha type: transport, response
//! interpretation, submission and polling.

pub mod error;
pub mod polling;
pub mod reqwest_client;
pub mod response;
pub mod submit;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ApiError, CaptchaError, CaptchaResult};
pub use polling::{get_result, wait_for_result};
pub use reqwest_client::ReqwestCaptchaHttpClient;
pub use response::{Outcome, ResponseContext, interpret, interpret_response};
pub use submit::submit;
pub use transport::{CaptchaHttpClient, HttpResponse, TransportError};
pub use types::{METHOD_PARAM, RECAPTCHA_METHOD, Request, TaskId};
