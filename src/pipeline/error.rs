use thiserror::Error;

use super::types::PipelineStage;
use crate::address::InvalidSyntax;
use crate::mx::Error as MxError;

/// Hard failures that stop a verification before the SMTP probe.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    InvalidSyntax(#[from] InvalidSyntax),
    #[error("DNS lookup failed: {source}")]
    DnsLookupFailed {
        #[source]
        source: MxError,
    },
    #[error("no mail server found for {domain}")]
    NoMailServer { domain: String },
}

impl VerifyError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::InvalidSyntax(_) => PipelineStage::Syntax,
            Self::DnsLookupFailed { .. } | Self::NoMailServer { .. } => PipelineStage::Domain,
        }
    }
}

impl From<MxError> for VerifyError {
    fn from(source: MxError) -> Self {
        match source {
            MxError::NoMailServer { domain } => Self::NoMailServer { domain },
            source => Self::DnsLookupFailed { source },
        }
    }
}
