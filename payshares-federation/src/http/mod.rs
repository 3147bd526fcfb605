//! HTTP transport abstraction.
//!
//! The federation protocol only ever issues `GET` requests and must be able to
//! stop reading a body part way through, so the transport is modelled as a
//! status code plus a pull-based chunk stream rather than a fully buffered
//! response.

use async_trait::async_trait;

mod limited;
#[cfg(feature = "http-client")]
mod reqwest_client;

pub use limited::LimitedReader;
#[cfg(feature = "http-client")]
pub use reqwest_client::ReqwestHttpClient;

use crate::errors::Stage;
use crate::{FederationError, Result};

/// Trait describing the HTTP client a federation client issues requests with.
///
/// Implementations must be safe to share between concurrent lookups. Timeouts,
/// redirects and cancellation are the implementation's responsibility; any
/// failure to obtain a response is reported as [`FederationError::Transport`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a `GET` request for `url`.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Streaming response body.
#[async_trait]
pub trait ResponseBody: Send {
    /// Pull the next chunk of the body, or `None` once it is finished.
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Status line and body of an HTTP response.
pub struct HttpResponse {
    status: u16,
    body: Box<dyn ResponseBody>,
}

impl HttpResponse {
    /// Wrap a status code and a streaming body.
    pub fn new(status: u16, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Build a response whose body is already in memory.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, BufferedBody::new(body))
    }

    /// The status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for `2xx` status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Mutable access to the body stream.
    pub fn body_mut(&mut self) -> &mut dyn ResponseBody {
        self.body.as_mut()
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// In-memory body handed out in fixed-size chunks.
#[derive(Clone, Debug)]
pub struct BufferedBody {
    data: Vec<u8>,
    offset: usize,
    chunk_size: usize,
}

impl BufferedBody {
    /// Default chunk size, roughly what a socket read hands back.
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;

    /// Create a body over `data`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }

    /// Change how many bytes each `chunk()` call yields (minimum 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

#[async_trait]
impl ResponseBody for BufferedBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.offset >= self.data.len() {
            return Ok(None);
        }
        let end = (self.offset + self.chunk_size).min(self.data.len());
        let chunk = self.data[self.offset..end].to_vec();
        self.offset = end;
        Ok(Some(chunk))
    }
}

/// Issue a `GET`, reject non-`2xx` answers and read at most `limit` bytes of the body.
///
/// The returned reader is used to decode the body and to tell a truncated
/// document from a malformed one.
pub(crate) async fn get_limited(
    http: &dyn HttpClient,
    url: &str,
    stage: Stage,
    limit: usize,
) -> Result<LimitedReader> {
    #[cfg(feature = "tracing")]
    tracing::debug!(%url, %stage, "fetching");

    let mut response = http.get(url).await?;
    if !response.is_success() {
        return Err(FederationError::HttpStatus {
            stage,
            status: response.status(),
        });
    }

    let mut reader = LimitedReader::new(limit);
    reader.read_from(response.body_mut()).await?;

    #[cfg(feature = "tracing")]
    {
        if reader.is_exhausted() {
            tracing::warn!(%url, %stage, limit, "response body reached the size limit");
        }
    }

    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_buffered_body_chunks() {
        let mut body = BufferedBody::new("abcdefg").with_chunk_size(3);
        assert_eq!(body.chunk().await.unwrap(), Some(b"abc".to_vec()));
        assert_eq!(body.remaining(), 4);
        assert_eq!(body.chunk().await.unwrap(), Some(b"def".to_vec()));
        assert_eq!(body.chunk().await.unwrap(), Some(b"g".to_vec()));
        assert_eq!(body.chunk().await.unwrap(), None);
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::from_bytes(200, "").is_success());
        assert!(HttpResponse::from_bytes(204, "").is_success());
        assert!(!HttpResponse::from_bytes(301, "").is_success());
        assert!(!HttpResponse::from_bytes(404, "").is_success());
        assert!(!HttpResponse::from_bytes(199, "").is_success());
    }

    struct FixedClient(u16, &'static str);

    #[async_trait]
    impl HttpClient for FixedClient {
        async fn get(&self, _url: &str) -> Result<HttpResponse> {
            Ok(HttpResponse::from_bytes(self.0, self.1))
        }
    }

    #[tokio::test]
    async fn test_get_limited_rejects_non_success_before_reading() {
        let client = FixedClient(500, "FEDERATION_SERVER=\"https://ok\"");
        let err = get_limited(&client, "https://x", Stage::Discovery, 16)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FederationError::HttpStatus {
                stage: Stage::Discovery,
                status: 500
            }
        );
    }

    #[tokio::test]
    async fn test_get_limited_caps_body() {
        let client = FixedClient(200, "0123456789");
        let reader = get_limited(&client, "https://x", Stage::Federation, 4)
            .await
            .unwrap();
        assert_eq!(reader.bytes(), b"0123");
        assert!(reader.is_exhausted());
    }
}
