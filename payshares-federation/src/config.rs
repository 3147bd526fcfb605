//! Configuration types for federation clients.
//!
//! All types deserialize with defaults for missing fields, so a partially
//! filled configuration file is enough:
//!
//! ```
//! use payshares_federation::config::ClientConfig;
//!
//! let config: ClientConfig = serde_json::from_str(r#"{ "timeout_secs": 5 }"#)?;
//! assert_eq!(config.timeout_secs, 5);
//! assert!(!config.allow_http);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// Payshares network selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// The public network.
    #[default]
    Public,
    /// The test network.
    Test,
}

impl Network {
    /// Get the network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Test => "test",
        }
    }

    /// Horizon server consulted for account home domains on this network.
    pub fn horizon_url(&self) -> &'static str {
        match self {
            Self::Public => "https://horizon.payshares.org",
            Self::Test => "https://horizon-testnet.payshares.org",
        }
    }
}

/// Configuration for the Horizon home-domain resolver.
///
/// The account record is read through the same bounded reader as the
/// federation documents. Accounts with many balances, signers or data entries
/// produce large records; raise `max_response_bytes` if reverse lookups on
/// such accounts fail with [`FederationError::ResponseTooLarge`].
///
/// [`FederationError::ResponseTooLarge`]: crate::FederationError::ResponseTooLarge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonConfig {
    /// Horizon base URL (e.g., "https://horizon.payshares.org").
    pub horizon_url: String,

    /// Cap on the account response body in bytes (default 1 MiB).
    #[serde(default = "default_horizon_max_response_bytes")]
    pub max_response_bytes: usize,
}

fn default_horizon_max_response_bytes() -> usize {
    1024 * 1024
}

impl HorizonConfig {
    /// Create a configuration for a custom Horizon URL.
    pub fn new(horizon_url: impl Into<String>) -> Self {
        Self {
            horizon_url: horizon_url.into(),
            max_response_bytes: default_horizon_max_response_bytes(),
        }
    }

    /// Preset for the given network.
    pub fn for_network(network: Network) -> Self {
        Self::new(network.horizon_url())
    }

    /// Preset for the public network.
    pub fn public_net() -> Self {
        Self::for_network(Network::Public)
    }

    /// Preset for the test network.
    pub fn test_net() -> Self {
        Self::for_network(Network::Test)
    }

    /// Set the response cap.
    pub fn with_max_response_bytes(mut self, bytes: usize) -> Self {
        self.max_response_bytes = bytes;
        self
    }
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self::public_net()
    }
}

/// Configuration for a federation [`Client`](crate::Client).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Accept federation servers that are not served over `https://`.
    ///
    /// Debug escape hatch; never enable it against real domains.
    #[serde(default)]
    pub allow_http: bool,

    /// Fetch payshares.toml over plain HTTP instead of HTTPS.
    ///
    /// Independent of `allow_http`; local test servers usually need both.
    #[serde(default)]
    pub discovery_use_http: bool,

    /// Request timeout in seconds, applied by the HTTP client.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Home-domain resolver settings.
    #[serde(default)]
    pub horizon: HorizonConfig,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("payshares-federation/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Configuration for the given network.
    pub fn for_network(network: Network) -> Self {
        Self {
            horizon: HorizonConfig::for_network(network),
            ..Self::default()
        }
    }

    /// Configuration for the public network.
    pub fn public_net() -> Self {
        Self::for_network(Network::Public)
    }

    /// Configuration for the test network.
    pub fn test_net() -> Self {
        Self::for_network(Network::Test)
    }

    /// Accept plain HTTP federation servers.
    pub fn with_allow_http(mut self, allow: bool) -> Self {
        self.allow_http = allow;
        self
    }

    /// Fetch payshares.toml over plain HTTP.
    pub fn with_discovery_use_http(mut self, use_http: bool) -> Self {
        self.discovery_use_http = use_http;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the Horizon settings.
    pub fn with_horizon(mut self, horizon: HorizonConfig) -> Self {
        self.horizon = horizon;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            allow_http: false,
            discovery_use_http: false,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            horizon: HorizonConfig::default(),
        }
    }
}
