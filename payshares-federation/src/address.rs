//! Federation addresses (`name*domain`).
//!
//! # Examples
//!
//! ```
//! use payshares_federation::address::{split, Address};
//!
//! let (name, domain) = split("scott*payshares.org")?;
//! assert_eq!(name, "scott");
//! assert_eq!(domain, "payshares.org");
//!
//! let address: Address = "scott*payshares.org".parse()?;
//! assert_eq!(address.to_string(), "scott*payshares.org");
//! # Ok::<(), payshares_federation::FederationError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use crate::{FederationError, Result};

/// Separator between the name and domain parts of an address.
pub const SEPARATOR: char = '*';

/// A parsed federation address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// Part before the separator. May itself contain `@`, `+` and so on.
    pub name: String,
    /// Domain whose payshares.toml names the federation server.
    pub domain: String,
}

impl Address {
    /// Build an address from already separated parts.
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }
}

impl FromStr for Address {
    type Err = FederationError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, domain) = split(s)?;
        Ok(Self::new(name, domain))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, SEPARATOR, self.domain)
    }
}

/// Split an address into its name and domain parts.
///
/// The address must contain exactly one `*` with non-empty text on both sides.
pub fn split(address: &str) -> Result<(&str, &str)> {
    let mut parts = address.split(SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(domain), None) => {
            if name.is_empty() {
                return Err(FederationError::malformed_address(format!(
                    "{address:?} has an empty name"
                )));
            }
            if domain.is_empty() {
                return Err(FederationError::malformed_address(format!(
                    "{address:?} has an empty domain"
                )));
            }
            Ok((name, domain))
        }
        _ => Err(FederationError::malformed_address(format!(
            "{address:?} must contain exactly one '{SEPARATOR}'"
        ))),
    }
}
