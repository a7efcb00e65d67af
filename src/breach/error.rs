use thiserror::Error;

/// Failures of the breach-directory lookup. Never fatal to a verification.
#[derive(Debug, Error)]
pub enum BreachError {
    #[error("HTTP client initialization failed: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("breach directory request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("breach directory answered HTTP {status}")]
    Status { status: u16, body: String },
    #[error("malformed breach directory response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("breach directory reported {found} breaches but no 'result' list")]
    MissingResult { found: u64 },
}

impl BreachError {
    /// Connect failures and timeouts; the only errors worth one more attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { source } => source.is_connect() || source.is_timeout(),
            _ => false,
        }
    }
}
