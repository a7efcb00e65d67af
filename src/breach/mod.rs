//! Breach-directory lookup (RapidAPI `breachdirectory`).
//!
//! Purely informational: callers log a [`BreachError`] and carry on.

mod client;
mod error;
mod types;

pub use client::{BreachClient, BreachConfig, BreachLookup, DEFAULT_API_HOST, DEFAULT_ENDPOINT};
pub use error::BreachError;
pub use types::{BreachStatus, BreachSummary};

#[cfg(test)]
pub(crate) use client::decode;
