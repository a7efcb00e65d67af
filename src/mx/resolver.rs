use std::time::Duration;

use tracing::debug;
use trust_dns_resolver::{
    Resolver,
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    system_conf::read_system_conf,
};

use super::{Error, MxRecord, MxRecords};

/// Builds a resolver from the system configuration (`/etc/resolv.conf` on
/// unix), optionally capping the per-query timeout.
pub fn system_resolver(timeout: Option<Duration>) -> Result<Resolver, Error> {
    let (config, mut opts) = read_system_conf().map_err(Error::resolver_init)?;
    if let Some(timeout) = timeout {
        opts.timeout = timeout;
    }
    Resolver::new(config, opts).map_err(Error::resolver_init)
}

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxRecords`] is sorted by ascending preference.
pub fn resolve_mx(domain: &str) -> Result<MxRecords, Error> {
    let resolver = system_resolver(None)?;
    resolve_with(&resolver, domain)
}

pub fn resolve_with<R>(resolver: &R, domain: &str) -> Result<MxRecords, Error>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let records = resolver.lookup_mx(&ascii)?;
    debug!(domain = %ascii, answers = records.len(), "MX lookup answered");

    MxRecords::from_answer(records).ok_or(Error::NoMailServer { domain: ascii })
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

/// Source of MX answers. Implemented for the blocking trust-dns [`Resolver`].
pub trait LookupMx {
    /// Returns the raw answer, in response order. An empty answer is `Ok`.
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let lookup = match Resolver::mx_lookup(self, domain) {
            Ok(lookup) => lookup,
            Err(err) if is_empty_answer(&err) => return Ok(Vec::new()),
            Err(err) => return Err(Error::lookup(domain, err)),
        };
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}

// NOERROR with no MX answer; NXDOMAIN stays a lookup failure.
fn is_empty_answer(err: &ResolveError) -> bool {
    matches!(
        err.kind(),
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code != ResponseCode::NXDomain
    )
}
