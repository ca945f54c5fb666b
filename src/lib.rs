//! # api2captcha
//!
//! An async client for 2captcha-compatible captcha solving services.
//!
//! A task is submitted to `in.php`, then `res.php` is polled at a fixed
//! interval until the service answers with the solved token, reports an
//! error, or the timeout elapses. Network failures while polling are
//! tolerated; anything the service itself reports as an error is not.
//!
//! ## Example
//!
//! ```no_run
//! use api2captcha::{CaptchaClient, ReCaptcha};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CaptchaClient::new("YOUR_API_KEY")?;
//!     let request = ReCaptcha::new(
//!         "6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-",
//!         Url::parse("https://www.google.com/recaptcha/api2/demo")?,
//!     )
//!     .to_request()?;
//!     let token = client.solve(request).await?;
//!     println!("token: {token}");
//!     Ok(())
//! }
//! ```

mod client;

pub mod config;
pub mod protocol;
pub mod requests;

pub use crate::client::{CaptchaClient, ClientBuilder};

pub use crate::config::ClientConfig;

pub use crate::protocol::{
    ApiError,
    CaptchaError,
    CaptchaHttpClient,
    CaptchaResult,
    HttpResponse,
    Outcome,
    ReqwestCaptchaHttpClient,
    Request,
    ResponseContext,
    TaskId,
    TransportError,
    interpret,
    interpret_response,
};

pub use crate::requests::{ImageCaptcha, Proxy, ProxyType, ReCaptcha, ReCaptchaVersion};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
