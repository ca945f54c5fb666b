//! Scripted transport shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;
use url::Url;

use super::transport::{CaptchaHttpClient, HttpResponse, TransportError};

#[derive(Debug, Clone)]
pub enum Call {
    Get {
        url: Url,
    },
    Form {
        url: Url,
        params: HashMap<String, String>,
    },
    Multipart {
        url: Url,
        params: HashMap<String, String>,
        files: HashMap<String, PathBuf>,
    },
}

impl Call {
    pub fn url(&self) -> &Url {
        match self {
            Call::Get { url } | Call::Form { url, .. } | Call::Multipart { url, .. } => url,
        }
    }
}

/// Pops one scripted response per call, then repeats `fallback` forever.
pub struct StubClient {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Option<HttpResponse>,
    hang: bool,
    calls: Mutex<Vec<(Instant, Call)>>,
}

impl StubClient {
    pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fallback: None,
            hang: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, response: HttpResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Once scripted responses run out, every call stays pending forever.
    pub fn hang_when_exhausted(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    async fn respond(&self, call: Call) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push((Instant::now(), call));
        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(response) => response,
            None if self.hang => std::future::pending().await,
            None => Ok(self
                .fallback
                .clone()
                .expect("no more stub responses")),
        }
    }
}

#[async_trait]
impl CaptchaHttpClient for StubClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.respond(Call::Get { url: url.clone() }).await
    }

    async fn post_form(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
    ) -> Result<HttpResponse, TransportError> {
        self.respond(Call::Form {
            url: url.clone(),
            params: params.clone(),
        })
        .await
    }

    async fn post_multipart(
        &self,
        url: &Url,
        params: &HashMap<String, String>,
        files: &HashMap<String, PathBuf>,
    ) -> Result<HttpResponse, TransportError> {
        self.respond(Call::Multipart {
            url: url.clone(),
            params: params.clone(),
            files: files.clone(),
        })
        .await
    }
}
