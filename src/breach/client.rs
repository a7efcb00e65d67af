use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::BreachError;
use super::types::{BreachResponse, BreachStatus, BreachSummary, ResultEntry};

pub const DEFAULT_ENDPOINT: &str = "https://breachdirectory.p.rapidapi.com/";
pub const DEFAULT_API_HOST: &str = "breachdirectory.p.rapidapi.com";

/// Anything able to tell whether an address appeared in known breaches.
pub trait BreachLookup {
    fn lookup(&self, email: &str) -> Result<BreachStatus, BreachError>;
}

/// Connection settings for the RapidAPI breach directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachConfig {
    pub endpoint: String,
    pub api_host: String,
    pub api_key: String,
    pub timeout: Duration,
    pub retry_transient: bool,
}

impl BreachConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            retry_transient: true,
        }
    }
}

/// Blocking HTTP client for the breach directory.
#[derive(Debug, Clone)]
pub struct BreachClient {
    http: Client,
    config: BreachConfig,
}

impl BreachClient {
    pub fn new(config: BreachConfig) -> Result<Self, BreachError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("mailprobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| BreachError::Client { source })?;
        Ok(Self { http, config })
    }

    /// One GET, body included. A timeout while reading the body counts as a
    /// failed request like any other.
    fn fetch(&self, email: &str) -> Result<(StatusCode, String), BreachError> {
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[("func", "auto"), ("term", email)])
            .header("x-rapidapi-key", &self.config.api_key)
            .header("x-rapidapi-host", &self.config.api_host)
            .send()
            .map_err(|source| BreachError::Request { source })?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|source| BreachError::Request { source })?;
        Ok((status, body))
    }
}

impl BreachLookup for BreachClient {
    fn lookup(&self, email: &str) -> Result<BreachStatus, BreachError> {
        debug!(endpoint = %self.config.endpoint, "querying breach directory");
        let (status, body) = match self.fetch(email) {
            Err(err) if self.config.retry_transient && err.is_transient() => {
                warn!(error = %err, "breach lookup failed, retrying once");
                self.fetch(email)?
            }
            other => other?,
        };

        if !status.is_success() {
            return Err(BreachError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        decode(&body)
    }
}

pub(crate) fn decode(body: &str) -> Result<BreachStatus, BreachError> {
    let response: BreachResponse =
        serde_json::from_str(body).map_err(|source| BreachError::Decode { source })?;

    let found = match response.found {
        Some(found) if found > 0 => found,
        _ => return Ok(BreachStatus::NotFound),
    };
    let entries = response
        .result
        .ok_or(BreachError::MissingResult { found })?;

    let mut sources: Vec<String> = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let raw = match entry {
            ResultEntry::Record(record) => record.sources,
            ResultEntry::Other(value) => {
                debug!(index, %value, "breach record is not an object, skipped");
                continue;
            }
        };
        let Some(raw) = raw else {
            debug!(index, "breach record has no 'sources', skipped");
            continue;
        };
        for name in source_names(raw) {
            if !sources.contains(&name) {
                sources.push(name);
            }
        }
    }

    Ok(BreachStatus::Found(BreachSummary {
        count: found,
        sources,
    }))
}

fn source_names(raw: Value) -> Vec<String> {
    match raw {
        Value::Null => Vec::new(),
        Value::String(name) => vec![name],
        Value::Array(items) => items.into_iter().flat_map(source_names).collect(),
        other => vec![other.to_string()],
    }
}
