//! Orchestration of the four checks: syntax, MX, breach lookup, SMTP probe.

mod error;
mod types;

pub use error::VerifyError;
pub use types::{BreachReport, PipelineStage, VerificationReport, VerifierOptions};

use tracing::{info, warn};

use crate::address::{EmailAddress, parse_address};
use crate::breach::{BreachLookup, BreachStatus};
use crate::mx::{LookupMx, resolve_with};
use crate::smtp::probe_mailbox;

/// Runs the verification stages in order for one address at a time.
///
/// Syntax and MX failures stop the run with a [`VerifyError`]. A breach lookup
/// failure is logged and recorded in the report. Whatever the SMTP probe ends
/// with is the verdict.
pub struct Verifier<R, B> {
    resolver: R,
    breach: Option<B>,
    options: VerifierOptions,
}

impl<R, B> Verifier<R, B>
where
    R: LookupMx,
    B: BreachLookup,
{
    pub fn new(resolver: R, breach: Option<B>, options: VerifierOptions) -> Self {
        Self {
            resolver,
            breach,
            options,
        }
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    pub fn verify(&self, raw: &str) -> Result<VerificationReport, VerifyError> {
        let address = parse_address(raw, self.options.mode)?;
        info!(stage = %PipelineStage::Syntax, %address, "address syntax ok");

        let mx = resolve_with(&self.resolver, address.ascii_domain())?;
        let host = mx.primary().exchange.clone();
        info!(stage = %PipelineStage::Domain, records = mx.len(), %host, "mail server found");

        let breach = self.check_breaches(&address);

        let probe = probe_mailbox(&host, &address, &self.options.probe);
        info!(stage = %PipelineStage::Mailbox, verdict = %probe.result, "verification finished");

        Ok(VerificationReport {
            address,
            mx,
            breach,
            probe,
        })
    }

    fn check_breaches(&self, address: &EmailAddress) -> BreachReport {
        let Some(lookup) = &self.breach else {
            info!(stage = %PipelineStage::Breach, "breach lookup not configured, skipped");
            return BreachReport::Skipped;
        };
        match lookup.lookup(&address.to_string()) {
            Ok(BreachStatus::Found(summary)) => {
                let count = summary.count;
                info!(stage = %PipelineStage::Breach, count, "address found in breaches");
                BreachReport::Found(summary)
            }
            Ok(BreachStatus::NotFound) => BreachReport::NotFound,
            Err(err) => {
                let stage = PipelineStage::Breach;
                warn!(%stage, error = %err, "breach lookup failed, continuing");
                BreachReport::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
