//! Mock HTTP network for lookup tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::http::{BufferedBody, HttpClient, HttpResponse};
use crate::{FederationError, Result};

/// Canned outcome for a URL.
#[derive(Clone, Debug)]
enum MockReply {
    Response { status: u16, body: Vec<u8> },
    Error(String),
}

/// In-memory [`HttpClient`] answering `GET`s from canned responses.
///
/// A URL registered without a query string also matches requests that carry
/// one, so `https://payshares.org/federation` answers
/// `https://payshares.org/federation?q=...&type=name`. Bodies are handed out
/// in chunks like a real socket. Unregistered URLs fail with a transport
/// error.
pub struct MockHttpClient {
    routes: Mutex<HashMap<String, MockReply>>,
    requests: Mutex<Vec<String>>,
    chunk_size: usize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create an empty mock network.
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            chunk_size: BufferedBody::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Change the chunk size bodies are served in.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Answer `GET url` with `status` and a raw body.
    pub fn on_get(&self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        lock(&self.routes).insert(
            url.into(),
            MockReply::Response {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Answer `GET url` with `status` and `value` serialized as JSON.
    pub fn on_get_json(
        &self,
        url: impl Into<String>,
        status: u16,
        value: &serde_json::Value,
    ) -> &Self {
        self.on_get(url, status, value.to_string())
    }

    /// Answer `GET url` with an empty 404.
    pub fn not_found(&self, url: impl Into<String>) -> &Self {
        self.on_get(url, 404, "")
    }

    /// Fail `GET url` as if the connection broke with `message`.
    pub fn on_error(&self, url: impl Into<String>, message: impl Into<String>) -> &Self {
        lock(&self.routes).insert(url.into(), MockReply::Error(message.into()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    fn reply_for(&self, url: &str) -> Option<MockReply> {
        let routes = lock(&self.routes);
        routes.get(url).cloned().or_else(|| {
            url.split_once('?')
                .and_then(|(base, _)| routes.get(base).cloned())
        })
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        lock(&self.requests).push(url.to_string());

        match self.reply_for(url) {
            Some(MockReply::Response { status, body }) => Ok(HttpResponse::new(
                status,
                BufferedBody::new(body).with_chunk_size(self.chunk_size),
            )),
            Some(MockReply::Error(message)) => Err(FederationError::Transport(message)),
            None => Err(FederationError::Transport(format!(
                "no mock registered for GET {url}"
            ))),
        }
    }
}
