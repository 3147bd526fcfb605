//! payshares.toml discovery.
//!
//! Every domain taking part in federation publishes a small TOML document at
//! `/.well-known/payshares.toml`. The only key lookups depend on is
//! `FEDERATION_SERVER`; the other keys are decoded and kept so the document can
//! be passed on or written back unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address;
use crate::errors::Stage;
use crate::http::{get_limited, HttpClient};
use crate::Result;

/// Maximum size of a payshares.toml document in bytes.
pub const PAYSHARES_TOML_MAX_SIZE: usize = 5 * 1024;

/// URL path at which a domain serves its payshares.toml.
pub const WELL_KNOWN_PATH: &str = "/.well-known/payshares.toml";

/// Decoded payshares.toml document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    /// `AUTH_SERVER`
    #[serde(rename = "AUTH_SERVER", default, skip_serializing_if = "Option::is_none")]
    pub auth_server: Option<String>,
    /// `FEDERATION_SERVER`: endpoint federation queries are sent to.
    #[serde(
        rename = "FEDERATION_SERVER",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub federation_server: Option<String>,
    /// `ENCRYPTION_KEY`
    #[serde(
        rename = "ENCRYPTION_KEY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub encryption_key: Option<String>,
    /// `SIGNING_KEY`
    #[serde(rename = "SIGNING_KEY", default, skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,
}

impl DiscoveryDocument {
    /// Parse a payshares.toml document.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Render the document back to TOML, omitting absent keys.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// The federation server, if one is named and non-empty.
    pub fn federation_server(&self) -> Option<&str> {
        self.federation_server
            .as_deref()
            .filter(|server| !server.is_empty())
    }
}

/// Trait describing anything that can resolve a domain to its payshares.toml.
///
/// [`Client`](crate::Client) uses it to find the federation server a query
/// should be made against.
#[async_trait]
pub trait DiscoveryResolver: Send + Sync {
    /// Fetch and decode the payshares.toml served by `domain`.
    async fn fetch(&self, domain: &str) -> Result<DiscoveryDocument>;
}

/// Resolves payshares.toml documents over HTTP.
#[derive(Clone)]
pub struct DiscoveryClient {
    http: Arc<dyn HttpClient>,
    use_http: bool,
}

impl DiscoveryClient {
    /// Create a client issuing requests through `http`, over https.
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            use_http: false,
        }
    }

    /// Fetch payshares.toml over plain HTTP. Useful for debugging.
    pub fn with_use_http(mut self, use_http: bool) -> Self {
        self.use_http = use_http;
        self
    }

    /// URL of the payshares.toml for `domain`.
    pub fn url(&self, domain: &str) -> String {
        let scheme = if self.use_http { "http" } else { "https" };
        format!("{scheme}://{domain}{WELL_KNOWN_PATH}")
    }

    /// Fetch the payshares.toml of the domain part of a `name*domain` address.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn fetch_by_address(&self, address: &str) -> Result<DiscoveryDocument> {
        let (_, domain) = address::split(address)?;
        self.fetch(domain).await
    }
}

impl std::fmt::Debug for DiscoveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryClient")
            .field("use_http", &self.use_http)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DiscoveryResolver for DiscoveryClient {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn fetch(&self, domain: &str) -> Result<DiscoveryDocument> {
        let url = self.url(domain);
        let reader = get_limited(
            self.http.as_ref(),
            &url,
            Stage::Discovery,
            PAYSHARES_TOML_MAX_SIZE,
        )
        .await?;

        // A body of exactly PAYSHARES_TOML_MAX_SIZE bytes that is also invalid
        // TOML is reported as too large; the reader cannot tell the cases apart.
        reader.decode(Stage::Discovery, |bytes| {
            let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
            DiscoveryDocument::from_toml_str(text).map_err(|e| e.to_string())
        })
    }
}
