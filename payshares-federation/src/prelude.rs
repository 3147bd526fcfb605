//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use payshares_federation::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - The resolver: `Client`
//! - Records: `FederationResponse`, `Memo`, `DiscoveryDocument`, `Address`
//! - Error types: `FederationError`, `Stage`, `Result`
//! - Collaborator traits: `HttpClient`, `DiscoveryResolver`, `HomeDomainResolver`
//! - Configuration: `ClientConfig`, `HorizonConfig`, `Network`

// Resolver
pub use crate::resolver::{Client, HomeDomainResolver};

// Records
pub use crate::address::Address;
pub use crate::discovery::{DiscoveryDocument, DiscoveryResolver};
pub use crate::query::{FederationResponse, Memo, QueryType};

// Error handling
pub use crate::errors::{FederationError, Stage};
pub use crate::Result;

// Transport
pub use crate::http::HttpClient;

// Configuration
pub use crate::config::{ClientConfig, HorizonConfig, Network};

#[cfg(feature = "http-client")]
pub use crate::http::ReqwestHttpClient;
