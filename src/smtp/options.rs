use std::borrow::Cow;
use std::time::Duration;

/// Controls how [`probe_mailbox`](crate::smtp::probe_mailbox) talks to the
/// mail exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub port: u16,
    pub helo_domain: Option<String>,
    pub envelope_sender: Option<String>,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: None,
            envelope_sender: None,
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(10),
        }
    }
}

impl ProbeOptions {
    /// Returns the hostname used in `EHLO`/`HELO`. Defaults to the ASCII domain
    /// of the probed mailbox when none is provided.
    pub fn helo_domain<'a>(&'a self, ascii_domain: &'a str) -> Cow<'a, str> {
        self.helo_domain
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Borrowed(ascii_domain))
    }

    /// Returns the envelope sender used in `MAIL FROM`. When unspecified a
    /// `validator@domain` address on the probed domain is synthesised.
    pub fn envelope_sender(&self, ascii_domain: &str) -> String {
        self.envelope_sender
            .as_ref()
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("validator@{ascii_domain}"))
    }
}
