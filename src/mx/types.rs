use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Non-empty MX set for a domain, ascending preference.
///
/// Records sharing a preference keep the order the resolver answered them in,
/// so [`MxRecords::primary`] is the first lowest-preference record seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MxRecords(Vec<MxRecord>);

impl MxRecords {
    /// Returns `None` for an empty answer. Null MX records (RFC 7505, `0 .`,
    /// an empty exchange once normalized) are dropped first, so a domain that
    /// declares it takes no mail has no exchanger either.
    pub fn from_answer(mut records: Vec<MxRecord>) -> Option<Self> {
        let mut seen = std::collections::HashSet::new();
        records.retain(|record| !record.exchange.is_empty() && seen.insert(record.clone()));
        records.sort_by_key(|record| record.preference);
        if records.is_empty() {
            None
        } else {
            Some(Self(records))
        }
    }

    pub fn primary(&self) -> &MxRecord {
        &self.0[0]
    }

    pub fn records(&self) -> &[MxRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: [`MxRecords::from_answer`] never builds an empty set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
