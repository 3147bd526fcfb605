//! Horizon-backed [`HomeDomainResolver`].
//!
//! Reverse lookups need the home domain an account registered. Horizon serves
//! it as the `home_domain` field of `GET /accounts/{id}`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::HorizonConfig;
use crate::errors::Stage;
use crate::http::{get_limited, HttpClient};
use crate::resolver::HomeDomainResolver;
use crate::Result;

/// The part of a Horizon account record this crate reads.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    #[serde(default)]
    home_domain: Option<String>,
}

/// Resolves home domains through a Horizon server.
#[derive(Clone)]
pub struct HorizonClient {
    http: Arc<dyn HttpClient>,
    config: HorizonConfig,
}

impl HorizonClient {
    /// Create a resolver issuing requests through `http`.
    pub fn new(http: Arc<dyn HttpClient>, config: HorizonConfig) -> Self {
        Self { http, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    /// URL of the account record for `account_id`.
    pub fn account_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}",
            self.config.horizon_url.trim_end_matches('/'),
            urlencoding::encode(account_id)
        )
    }
}

impl std::fmt::Debug for HorizonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HorizonClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HomeDomainResolver for HorizonClient {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    async fn home_domain(&self, account_id: &str) -> Result<String> {
        let url = self.account_url(account_id);
        let reader = get_limited(
            self.http.as_ref(),
            &url,
            Stage::HomeDomain,
            self.config.max_response_bytes,
        )
        .await?;

        let record: AccountRecord = reader.decode(Stage::HomeDomain, |bytes| {
            serde_json::from_slice::<AccountRecord>(bytes)
        })?;
        Ok(record.home_domain.unwrap_or_default())
    }
}
