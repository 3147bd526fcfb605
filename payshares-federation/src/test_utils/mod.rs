//! Test utilities for federation lookups.
//!
//! This module provides mock implementations of every collaborator a
//! [`Client`](crate::Client) is built from:
//! - [`MockHttpClient`]: canned HTTP responses keyed by URL, with a request log
//! - [`MockDiscovery`]: canned payshares.toml documents keyed by domain
//! - [`MockHomeDomain`]: canned home domains keyed by account ID
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use payshares_federation::test_utils::{MockDiscovery, MockHomeDomain, MockHttpClient, TestFixtures};
//! use payshares_federation::Client;
//!
//! let http = Arc::new(MockHttpClient::new());
//! let toml = Arc::new(MockDiscovery::new());
//! toml.on_fetch("payshares.org", Ok(TestFixtures::discovery_document("https://payshares.org/federation")));
//! http.on_get_json("https://payshares.org/federation", 200, &serde_json::json!({ "account_id": "GA..." }));
//!
//! let client = Client::new(toml, http, Arc::new(MockHomeDomain::new()));
//! let record = client.lookup_by_address("scott*payshares.org").await?;
//! ```

mod fixtures;
mod mock_network;

pub use fixtures::{MockDiscovery, MockHomeDomain, TestFixtures};
pub use mock_network::MockHttpClient;
