use std::fmt;

use serde::Serialize;

use crate::address::{EmailAddress, ValidationMode};
use crate::breach::BreachSummary;
use crate::mx::MxRecords;
use crate::smtp::{ProbeOptions, ProbeReport, ProbeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Syntax,
    Domain,
    Breach,
    Mailbox,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "syntax",
            Self::Domain => "domain",
            Self::Breach => "breach",
            Self::Mailbox => "mailbox",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifierOptions {
    pub mode: ValidationMode,
    pub probe: ProbeOptions,
}

/// What the breach stage contributed to a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreachReport {
    /// No breach lookup configured.
    Skipped,
    NotFound,
    Found(BreachSummary),
    Failed { reason: String },
}

impl BreachReport {
    pub fn summary(&self) -> Option<&BreachSummary> {
        match self {
            Self::Found(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Output of a verification that reached the SMTP stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub address: EmailAddress,
    pub mx: MxRecords,
    pub breach: BreachReport,
    pub probe: ProbeReport,
}

impl VerificationReport {
    /// The probe's terminal state, which is the verification verdict.
    pub fn verdict(&self) -> &ProbeResult {
        &self.probe.result
    }

    pub fn breach_summary(&self) -> Option<&BreachSummary> {
        self.breach.summary()
    }
}
