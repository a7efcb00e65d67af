//! SMTP mailbox probing.
//!
//! [`probe_mailbox`] walks a plaintext session through
//! `Disconnected → Connected → Greeted → SenderSet` and stops at `RCPT TO`,
//! reporting the server's answer as a [`ProbeResult`]. No message is ever
//! delivered.

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use options::ProbeOptions;
pub use probe::probe_mailbox;
pub use types::{ProbeReport, ProbeResult, SmtpEvent, SmtpReply, Stage};
