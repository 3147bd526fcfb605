//! Payshares federation client.
//!
//! Resolves human-readable `name*domain` addresses (and, in reverse, account
//! IDs) to account IDs plus optional memo routing data. A lookup is a short
//! pipeline:
//!
//! 1. find the domain (split the address, or ask the account directory for
//!    the account's home domain);
//! 2. fetch `https://{domain}/.well-known/payshares.toml` and read its
//!    `FEDERATION_SERVER`;
//! 3. query that server with `?q={value}&type={name|id}` and decode the JSON
//!    record.
//!
//! Both remote documents are read through a size-bounded reader (5 KiB for
//! payshares.toml, 100 KiB for federation responses). Collaborators are
//! injected as traits ([`HttpClient`], [`DiscoveryResolver`],
//! [`HomeDomainResolver`]) so callers can swap the transport or the account
//! directory without touching protocol code.
//!
//! # Features
//!
//! - **`http-client`** (default): `reqwest`-backed [`http::ReqwestHttpClient`]
//!   and the [`Client::public_net`] / [`Client::test_net`] factories
//! - **`tracing`**: spans and events via the `tracing` crate
//! - **`test-utils`**: mock collaborators in [`test_utils`]
//!
//! # Example
//!
//! ```rust,ignore
//! use payshares_federation::Client;
//!
//! let client = Client::public_net()?;
//!
//! let record = client.lookup_by_address("scott*payshares.org").await?;
//! println!("account={} memo_type={} memo={}", record.account_id, record.memo_type, record.memo);
//!
//! let reverse = client.lookup_by_account_id(&record.account_id).await?;
//! println!("address={}", reverse.payshares_address);
//! ```

pub mod address;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod horizon;
pub mod http;
pub mod prelude;
pub mod query;
pub mod resolver;

/// Test utilities for federation lookups.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use address::Address;
pub use config::{ClientConfig, HorizonConfig, Network};
pub use discovery::{
    DiscoveryClient, DiscoveryDocument, DiscoveryResolver, PAYSHARES_TOML_MAX_SIZE,
    WELL_KNOWN_PATH,
};
pub use errors::{FederationError, Stage};
pub use horizon::HorizonClient;
pub use http::{HttpClient, HttpResponse, ResponseBody};
pub use query::{FederationResponse, Memo, QueryClient, QueryType, FEDERATION_RESPONSE_MAX_SIZE};
pub use resolver::{Client, HomeDomainResolver};

/// Common result alias for federation operations.
pub type Result<T> = std::result::Result<T, FederationError>;
