//! `reqwest`-backed [`HttpClient`].

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;

use super::{HttpClient, HttpResponse, ResponseBody};
use crate::config::ClientConfig;
use crate::{FederationError, Result};

/// HTTP client built on `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with the default configuration.
    pub fn new() -> Result<Self> {
        Self::from_config(&ClientConfig::default())
    }

    /// Create a client honouring the timeout and user agent in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FederationError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FederationError::Transport(error_chain(&e)))?;

        Ok(HttpResponse::new(
            response.status().as_u16(),
            ReqwestBody { inner: response },
        ))
    }
}

struct ReqwestBody {
    inner: reqwest::Response,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>> {
        self.inner
            .chunk()
            .await
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .map_err(|e| FederationError::Transport(error_chain(&e)))
    }
}

/// `reqwest` keeps the interesting part (DNS, TLS, connect) in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
