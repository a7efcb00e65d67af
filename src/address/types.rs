use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    #[default]
    Strict,
    Relaxed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

/// Raised when an input string is not a usable `local@domain` address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid email syntax for '{input}': {}", .reasons.join("; "))]
pub struct InvalidSyntax {
    pub input: String,
    pub reasons: Vec<String>,
}

/// A syntactically valid address, split on its single `@`.
///
/// Only [`parse_address`](crate::address::parse_address) (or `FromStr`) builds
/// one, so holding an `EmailAddress` means the invariants already hold: one `@`,
/// non-empty local part, and a dotted domain with an IDNA ASCII form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmailAddress {
    local: String,
    domain: String,
    ascii_domain: String,
}

impl EmailAddress {
    pub(crate) fn new(local: &str, domain: &str, ascii_domain: String) -> Self {
        Self {
            local: local.to_string(),
            domain: domain.to_string(),
            ascii_domain,
        }
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    /// Domain exactly as typed.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Punycode form of the domain, used for DNS queries and SMTP commands.
    pub fn ascii_domain(&self) -> &str {
        &self.ascii_domain
    }

    /// The address as it goes on the wire (`local@ascii-domain`).
    pub fn to_ascii(&self) -> String {
        format!("{}@{}", self.local, self.ascii_domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl FromStr for EmailAddress {
    type Err = InvalidSyntax;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_address(s, ValidationMode::Strict)
    }
}
