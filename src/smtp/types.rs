use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static ENHANCED_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([245])\.\d{1,3}\.\d{1,3}(?:\s+|$)").expect("enhanced status pattern")
});

/// Point of the SMTP dialogue an event or outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Connect,
    Greeting,
    Hello,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Greeting => "greeting",
            Self::Hello => "EHLO/HELO",
            Self::MailFrom => "MAIL FROM",
            Self::RcptTo => "RCPT TO",
            Self::Quit => "QUIT",
        })
    }
}

/// A raw SMTP reply: the numeric status code and the text of every line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// RFC 3463 status (`5.1.1`) leading the first line, when its class
    /// agrees with the reply code.
    pub fn enhanced_code(&self) -> Option<&str> {
        self.split_first_line().0
    }

    /// First line of server text, without the enhanced status code.
    pub fn text(&self) -> &str {
        self.split_first_line().1
    }

    fn split_first_line(&self) -> (Option<&str>, &str) {
        let first = self.lines.first().map(String::as_str).unwrap_or("");
        match ENHANCED_STATUS.captures(first) {
            Some(caps) if caps[1].parse::<u16>().ok() == Some(self.code / 100) => {
                let end = caps.get(0).map_or(0, |m| m.end());
                (Some(first[..end].trim_end()), &first[end..])
            }
            _ => (None, first),
        }
    }
}

impl fmt::Display for SmtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lines.first() {
            Some(line) if !line.is_empty() => write!(f, "{} {}", self.code, line),
            _ => write!(f, "{}", self.code),
        }
    }
}

/// A recorded transcript event used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SmtpEvent {
    Sent { stage: Stage, command: String },
    Received { stage: Stage, reply: SmtpReply },
    Error { stage: Stage, message: String },
}

impl fmt::Display for SmtpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { command, .. } => write!(f, "C: {command}"),
            Self::Received { reply, .. } => {
                let mut lines = reply.lines.iter().peekable();
                if lines.peek().is_none() {
                    return write!(f, "S: {}", reply.code);
                }
                let mut first = true;
                while let Some(line) = lines.next() {
                    if !first {
                        f.write_str("\n")?;
                    }
                    first = false;
                    let sep = if lines.peek().is_some() { '-' } else { ' ' };
                    write!(f, "S: {}{sep}{line}", reply.code)?;
                }
                Ok(())
            }
            Self::Error { stage, message } => write!(f, "!  {stage}: {message}"),
        }
    }
}

/// Terminal state of a mailbox probe.
///
/// `Rejected` is the normal way a server says the mailbox is unknown; it is
/// not an error. Servers with a catch-all policy answer `Accepted` for any
/// recipient and are reported as such.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeResult {
    Accepted {
        code: u16,
        message: String,
    },
    Rejected {
        stage: Stage,
        code: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        enhanced_code: Option<String>,
        message: String,
    },
    ConnectionFailed {
        stage: Stage,
        reason: String,
    },
}

impl ProbeResult {
    pub(crate) fn accepted(reply: &SmtpReply) -> Self {
        Self::Accepted {
            code: reply.code,
            message: reply.text().to_string(),
        }
    }

    pub(crate) fn rejected(stage: Stage, reply: &SmtpReply) -> Self {
        Self::Rejected {
            stage,
            code: reply.code,
            enhanced_code: reply.enhanced_code().map(str::to_string),
            message: reply.text().to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { code, message } => write!(f, "Accepted ({code} {message})"),
            Self::Rejected {
                stage,
                code,
                enhanced_code,
                message,
            } => {
                write!(f, "Rejected at {stage} ({code}")?;
                if let Some(enhanced) = enhanced_code {
                    write!(f, " {enhanced}")?;
                }
                write!(f, " {message})")
            }
            Self::ConnectionFailed { stage, reason } => {
                write!(f, "ConnectionFailed during {stage} ({reason})")
            }
        }
    }
}

/// Everything a single probe produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
    pub sender: String,
    pub result: ProbeResult,
    pub transcript: Vec<SmtpEvent>,
}
