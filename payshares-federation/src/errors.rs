//! Error types for federation lookups.
//!
//! Every failure a lookup can hit is classified into one [`FederationError`]
//! variant. Collaborator errors (discovery, transport, home-domain lookup) are
//! propagated to the caller unchanged; nothing in this crate retries.

use std::fmt;

/// The protocol stage that fetched the document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fetching `/.well-known/payshares.toml`.
    Discovery,
    /// Querying the federation server.
    Federation,
    /// Looking up an account's home domain.
    HomeDomain,
}

impl Stage {
    /// Human readable name of the document fetched by this stage.
    pub fn document(&self) -> &'static str {
        match self {
            Self::Discovery => "payshares.toml",
            Self::Federation => "federation",
            Self::HomeDomain => "horizon account",
        }
    }

    /// Wire format of the document fetched by this stage.
    pub fn format(&self) -> &'static str {
        match self {
            Self::Discovery => "toml",
            Self::Federation | Self::HomeDomain => "json",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.document())
    }
}

/// Error type for federation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FederationError {
    /// The address is not of the form `name*domain`.
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    /// The underlying HTTP call failed (DNS, connect, TLS, timeout, body read).
    #[error("http request errored: {0}")]
    Transport(String),

    /// The server answered with a status outside `2xx`.
    #[error("http request failed with ({status}) status code")]
    HttpStatus {
        /// Stage that issued the request
        stage: Stage,
        /// Status code returned by the server
        status: u16,
    },

    /// Decoding failed after the size-bounded reader hit its cap.
    #[error("{} response exceeds {limit} bytes limit", .stage.document())]
    ResponseTooLarge {
        /// Stage whose document was too large
        stage: Stage,
        /// Cap in bytes
        limit: usize,
    },

    /// The response was small enough but could not be decoded.
    #[error("{} decode failed: {message}", .stage.format())]
    Decode {
        /// Stage whose document was malformed
        stage: Stage,
        /// Parser diagnostic
        message: String,
    },

    /// The account has no home domain registered.
    #[error("homedomain not set")]
    HomeDomainNotSet,

    /// The discovery document does not name a federation server.
    #[error("payshares.toml is missing federation server info")]
    MissingFederationServer,

    /// The federation server is not reached over https and plain http is not allowed.
    #[error("remote is not using https: {0}")]
    InsecureFederationServer(String),

    /// A client could not be built from the supplied configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl FederationError {
    /// Create a transport error from anything printable, keeping its text verbatim.
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a malformed address error.
    pub fn malformed_address(reason: impl Into<String>) -> Self {
        Self::MalformedAddress(reason.into())
    }

    /// The stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::HttpStatus { stage, .. }
            | Self::ResponseTooLarge { stage, .. }
            | Self::Decode { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The HTTP status code, for [`FederationError::HttpStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the server answered but its body was cut off at the cap.
    pub fn is_too_large(&self) -> bool {
        matches!(self, Self::ResponseTooLarge { .. })
    }
}
