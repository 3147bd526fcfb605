//! Size-bounded body reader.
//!
//! Remote servers are untrusted: a discovery or federation response is never
//! buffered beyond its protocol cap, whatever the server claims or sends.
//! Whether the cap was reached is kept as an observable post-condition so a
//! failed decode can be attributed to truncation rather than to bad content.

use std::fmt;

use super::ResponseBody;
use crate::errors::Stage;
use crate::{FederationError, Result};

/// Reads at most `limit` bytes from a [`ResponseBody`].
#[derive(Clone, Debug)]
pub struct LimitedReader {
    limit: usize,
    remaining: usize,
    buf: Vec<u8>,
}

impl LimitedReader {
    /// Create a reader that will buffer at most `limit` bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            remaining: limit,
            buf: Vec::new(),
        }
    }

    /// Pull chunks from `body` until it ends or the cap is reached.
    ///
    /// A chunk crossing the cap is truncated and no further chunks are
    /// requested. Body read failures are transport errors.
    pub async fn read_from(&mut self, body: &mut dyn ResponseBody) -> Result<()> {
        while self.remaining > 0 {
            let Some(chunk) = body.chunk().await? else {
                break;
            };
            let take = chunk.len().min(self.remaining);
            self.buf.extend_from_slice(&chunk[..take]);
            self.remaining -= take;
        }
        Ok(())
    }

    /// Bytes buffered so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns true once `limit` bytes have been consumed.
    ///
    /// A body of exactly `limit` bytes also counts as exhausted: the reader
    /// cannot tell it apart from a longer body cut at the cap.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Decode the buffered bytes, classifying a failure for `stage`.
    ///
    /// A parse error on an exhausted reader becomes
    /// [`FederationError::ResponseTooLarge`]; any other parse error becomes
    /// [`FederationError::Decode`] carrying the parser's diagnostic.
    pub fn decode<T, E, F>(&self, stage: Stage, parse: F) -> Result<T>
    where
        F: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        parse(&self.buf).map_err(|err| {
            if self.is_exhausted() {
                FederationError::ResponseTooLarge {
                    stage,
                    limit: self.limit,
                }
            } else {
                FederationError::Decode {
                    stage,
                    message: err.to_string(),
                }
            }
        })
    }
}
