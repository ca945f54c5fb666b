//! Reqwest-based implementation of the `CaptchaHttpClient` trait.
//!
//! Provides a thin adapter around `reqwest::Client` that converts responses
//! into the raw representation consumed by the response interpreter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use url::Url;

use super::error::{CaptchaError, CaptchaResult};
use super::transport::{CaptchaHttpClient, HttpResponse, TransportError};

/// Reqwest-backed HTTP client used to talk to the captcha service.
#[derive(Debug, Clone)]
pub struct ReqwestCaptchaHttpClient {
    client: Client,
}

impl ReqwestCaptchaHttpClient {
    /// Creates a client applying `timeout` to every request.
    pub fn new(timeout: Duration) -> CaptchaResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| CaptchaError::Configuration(err.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client. Its own timeout settings are used
    /// as-is.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CaptchaHttpClient for ReqwestCaptchaHttpClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(network)?;

        to_http_response(response).await
    }

    async fn post_form(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url.as_str())
            .form(params)
            .send()
            .await
            .map_err(network)?;

        to_http_response(response).await
    }

    async fn post_multipart(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
        files: &HashMap<String, PathBuf>,
    ) -> Result<HttpResponse, TransportError> {
        let form = build_form(params, files).await?;

        let response = self
            .client
            .post(url.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(network)?;

        to_http_response(response).await
    }
}

/// Reads every attachment up front; the first unreadable file aborts the
/// whole submission.
async fn build_form(
    params: &HashMap<String, String>,
    files: &HashMap<String, PathBuf>,
) -> Result<Form, TransportError> {
    let mut form = Form::new();

    for (field, path) in files {
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| TransportError::Attachment {
                path: path.clone(),
                source,
            })?;
        let part = Part::bytes(contents).file_name(base_name(path));
        form = form.part(field.clone(), part);
    }

    for (key, value) in params {
        form = form.text(key.clone(), value.clone());
    }

    Ok(form)
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn network(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

async fn to_http_response(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(network)?;

    Ok(HttpResponse { status, body })
}
