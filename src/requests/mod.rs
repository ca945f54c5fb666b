//! Typed builders producing generic [`Request`](crate::protocol::Request)
//! values for specific captcha types.
//!
//! The protocol layer never looks inside these; it only sees the resulting
//! parameter and file mappings.

mod image;
mod proxy;
mod recaptcha;

pub use image::ImageCaptcha;
pub use proxy::{Proxy, ProxyType};
pub use recaptcha::{ReCaptcha, ReCaptchaVersion};
