use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prior exposure of an address: how many breaches and where it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreachSummary {
    pub count: u64,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "summary", rename_all = "snake_case")]
pub enum BreachStatus {
    Found(BreachSummary),
    NotFound,
}

/// Body of `GET /?func=auto&term=<email>`.
#[derive(Debug, Deserialize)]
pub(crate) struct BreachResponse {
    #[serde(default)]
    pub found: Option<u64>,
    #[serde(default)]
    pub result: Option<Vec<ResultEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ResultEntry {
    Record(BreachRecord),
    Other(Value),
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreachRecord {
    #[serde(default)]
    pub sources: Option<Value>,
}
