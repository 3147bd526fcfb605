//! Forward and reverse federation lookups.
//!
//! [`Client`] ties the protocol together: it finds a domain's federation
//! server through its payshares.toml, then queries that server. Every lookup
//! re-runs discovery; nothing is cached between calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::address;
use crate::discovery::{DiscoveryDocument, DiscoveryResolver};
use crate::http::HttpClient;
use crate::query::{FederationResponse, QueryClient, QueryType};
use crate::{FederationError, Result};

/// Trait describing the account directory consulted for reverse lookups.
#[async_trait]
pub trait HomeDomainResolver: Send + Sync {
    /// Home domain registered for `account_id`.
    ///
    /// An account without a home domain yields an empty string, not an error.
    async fn home_domain(&self, account_id: &str) -> Result<String>;
}

/// Federation client.
///
/// Holds shared handles to its three collaborators and no mutable state, so
/// one instance can serve any number of concurrent lookups as long as the
/// collaborators themselves are safe to share.
///
/// # Example
///
/// ```rust,ignore
/// use payshares_federation::Client;
///
/// let client = Client::public_net()?;
/// let record = client.lookup_by_address("scott*payshares.org").await?;
/// println!("{} memo={}", record.account_id, record.memo);
/// ```
#[derive(Clone)]
pub struct Client {
    discovery: Arc<dyn DiscoveryResolver>,
    query: QueryClient,
    home_domain: Arc<dyn HomeDomainResolver>,
    allow_http: bool,
}

impl Client {
    /// Assemble a client from its collaborators. Plain HTTP federation servers
    /// are rejected until [`Client::with_allow_http`] says otherwise.
    pub fn new(
        discovery: Arc<dyn DiscoveryResolver>,
        http: Arc<dyn HttpClient>,
        home_domain: Arc<dyn HomeDomainResolver>,
    ) -> Self {
        Self {
            discovery,
            query: QueryClient::new(http),
            home_domain,
            allow_http: false,
        }
    }

    /// Accept federation servers reached over plain HTTP. Useful for debugging.
    pub fn with_allow_http(mut self, allow_http: bool) -> Self {
        self.allow_http = allow_http;
        self
    }

    /// Whether plain HTTP federation servers are accepted.
    pub fn allows_http(&self) -> bool {
        self.allow_http
    }

    /// Resolve a `name*domain` address to its account and memo.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn lookup_by_address(&self, address: &str) -> Result<FederationResponse> {
        let (_, domain) = address::split(address)?;
        let server = self.federation_server(domain).await?;

        self.query.query(&server, QueryType::Name, address).await
    }

    /// Reverse lookup: resolve an account ID through its home domain's
    /// federation server.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn lookup_by_account_id(&self, account_id: &str) -> Result<FederationResponse> {
        let domain = self.home_domain.home_domain(account_id).await?;
        if domain.is_empty() {
            return Err(FederationError::HomeDomainNotSet);
        }
        let server = self.federation_server(&domain).await?;

        self.query.query(&server, QueryType::Id, account_id).await
    }

    /// Discover the federation server of `domain` and check it can be used.
    async fn federation_server(&self, domain: &str) -> Result<String> {
        let doc = self.discovery.fetch(domain).await?;
        self.check_server(&doc).map(str::to_string)
    }

    fn check_server<'a>(&self, doc: &'a DiscoveryDocument) -> Result<&'a str> {
        let server = doc
            .federation_server()
            .ok_or(FederationError::MissingFederationServer)?;

        if !self.allow_http && !server.starts_with("https://") {
            return Err(FederationError::InsecureFederationServer(
                server.to_string(),
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(%server, "using federation server");

        Ok(server)
    }
}

#[cfg(feature = "http-client")]
impl Client {
    /// Client for the public network, backed by `reqwest`.
    pub fn public_net() -> Result<Self> {
        Self::from_config(&crate::config::ClientConfig::public_net())
    }

    /// Client for the test network, backed by `reqwest`.
    pub fn test_net() -> Result<Self> {
        Self::from_config(&crate::config::ClientConfig::test_net())
    }

    /// Build a `reqwest`-backed client from `config`.
    ///
    /// One HTTP client is shared by discovery, queries and Horizon.
    pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self> {
        let http: Arc<dyn HttpClient> =
            Arc::new(crate::http::ReqwestHttpClient::from_config(config)?);
        let discovery = crate::discovery::DiscoveryClient::new(http.clone())
            .with_use_http(config.discovery_use_http);
        let horizon = crate::horizon::HorizonClient::new(http.clone(), config.horizon.clone());

        Ok(Self::new(Arc::new(discovery), http, Arc::new(horizon))
            .with_allow_http(config.allow_http))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("allow_http", &self.allow_http)
            .finish_non_exhaustive()
    }
}
