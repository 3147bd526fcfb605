//! Mock collaborators and shared test data.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::discovery::{DiscoveryDocument, DiscoveryResolver};
use crate::resolver::HomeDomainResolver;
use crate::{FederationError, Result};

/// Commonly used test values.
pub struct TestFixtures;

impl TestFixtures {
    /// A well-formed account ID.
    pub const ACCOUNT_ID: &'static str =
        "GASTNVNLHVR3NFO3QACMHCJT3JUSIV4NBXDHDO4VTPDTNN65W3B2766C";

    /// A federation address on the example domain.
    pub const ADDRESS: &'static str = "scott*payshares.org";

    /// The example domain.
    pub const DOMAIN: &'static str = "payshares.org";

    /// Federation server of the example domain.
    pub const FEDERATION_SERVER: &'static str = "https://payshares.org/federation";

    /// payshares.toml naming `server` as the federation server.
    pub fn payshares_toml(server: &str) -> String {
        format!("FEDERATION_SERVER=\"{server}\"\n")
    }

    /// Discovery document naming `server` as the federation server.
    pub fn discovery_document(server: &str) -> DiscoveryDocument {
        DiscoveryDocument {
            federation_server: Some(server.to_string()),
            ..DiscoveryDocument::default()
        }
    }

    /// Federation record JSON with the given memo.
    pub fn federation_record(
        address: &str,
        account_id: &str,
        memo_type: &str,
        memo: serde_json::Value,
    ) -> serde_json::Value {
        serde_json::json!({
            "payshares_address": address,
            "account_id": account_id,
            "memo_type": memo_type,
            "memo": memo,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mockable [`DiscoveryResolver`] with per-domain canned results.
#[derive(Default)]
pub struct MockDiscovery {
    results: Mutex<HashMap<String, Result<DiscoveryDocument>>>,
    calls: Mutex<Vec<String>>,
}

impl MockDiscovery {
    /// Create a mock with no domains registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `result` when `domain` is fetched.
    pub fn on_fetch(&self, domain: impl Into<String>, result: Result<DiscoveryDocument>) -> &Self {
        lock(&self.results).insert(domain.into(), result);
        self
    }

    /// Domains fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl DiscoveryResolver for MockDiscovery {
    async fn fetch(&self, domain: &str) -> Result<DiscoveryDocument> {
        lock(&self.calls).push(domain.to_string());
        lock(&self.results)
            .get(domain)
            .cloned()
            .unwrap_or_else(|| {
                Err(FederationError::Transport(format!(
                    "no payshares.toml mocked for {domain}"
                )))
            })
    }
}

/// Mockable [`HomeDomainResolver`] with per-account canned results.
#[derive(Default)]
pub struct MockHomeDomain {
    results: Mutex<HashMap<String, Result<String>>>,
    calls: Mutex<Vec<String>>,
}

impl MockHomeDomain {
    /// Create a mock with no accounts registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `result` when the home domain of `account_id` is requested.
    pub fn on_account(&self, account_id: impl Into<String>, result: Result<String>) -> &Self {
        lock(&self.results).insert(account_id.into(), result);
        self
    }

    /// Account IDs looked up so far, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl HomeDomainResolver for MockHomeDomain {
    async fn home_domain(&self, account_id: &str) -> Result<String> {
        lock(&self.calls).push(account_id.to_string());
        lock(&self.results)
            .get(account_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(FederationError::Transport(format!(
                    "no home domain mocked for {account_id}"
                )))
            })
    }
}
