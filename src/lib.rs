#![forbid(unsafe_code)]
//! mailprobe: checks whether an e-mail address is plausibly real without
//! sending mail: syntax, MX records, breach-directory exposure and an SMTP
//! `RCPT TO` probe.

pub mod address;
pub mod breach;
pub mod mx;
pub mod pipeline;
pub mod smtp;

pub use address::{
    EmailAddress, InvalidSyntax, ValidationMode, ValidationReport, parse_address, validate_email,
};
pub use breach::{
    BreachClient, BreachConfig, BreachError, BreachLookup, BreachStatus, BreachSummary,
};
pub use mx::{Error as MxError, LookupMx, MxRecord, MxRecords, resolve_mx, system_resolver};
pub use pipeline::{
    BreachReport, PipelineStage, VerificationReport, Verifier, VerifierOptions, VerifyError,
};
pub use smtp::{ProbeOptions, ProbeReport, ProbeResult, SmtpEvent, SmtpReply, Stage, probe_mailbox};
