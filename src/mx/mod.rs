//! DNS MX resolution.
//!
//! The public entry points are [`resolve_mx`] and [`resolve_with`], which
//! return the non-empty, priority-ordered [`MxRecords`] of a domain or an
//! [`Error`] telling "no mail server" apart from "lookup failed".

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{LookupMx, resolve_mx, resolve_with, system_resolver};
pub use types::{MxRecord, MxRecords};
