use serde::Serialize;

use mailprobe::{BreachReport, PipelineStage, ProbeResult, VerificationReport, VerifyError};

pub type Outcome = Result<VerificationReport, VerifyError>;

/// Report body for `--format json`.
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a VerificationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

#[derive(Serialize)]
pub struct JsonError {
    pub stage: PipelineStage,
    pub message: String,
}

impl<'a> JsonOutput<'a> {
    pub fn new(input: &'a str, outcome: &'a Outcome) -> Self {
        match outcome {
            Ok(report) => Self {
                input,
                report: Some(report),
                error: None,
            },
            Err(err) => Self {
                input,
                report: None,
                error: Some(JsonError {
                    stage: err.stage(),
                    message: err.to_string(),
                }),
            },
        }
    }
}

/// One line per pipeline stage, plus the SMTP transcript when `verbose`.
pub fn human_lines(input: &str, outcome: &Outcome, verbose: bool) -> Vec<String> {
    let report = match outcome {
        Ok(report) => report,
        Err(err) => return human_error_lines(input.trim(), err),
    };

    let mut out = vec![format!("[OK]       syntax: {}", report.address)];
    let records = report
        .mx
        .records()
        .iter()
        .map(|r| format!("{} {}", r.preference, r.exchange))
        .collect::<Vec<_>>()
        .join(", ");
    out.push(format!(
        "[OK]       domain: {} MX record(s): {records}; probing {}",
        report.mx.len(),
        report.mx.primary().exchange
    ));
    out.push(match &report.breach {
        BreachReport::Skipped => "[SKIPPED]  breach: no API key configured".to_string(),
        BreachReport::NotFound => "[OK]       breach: not found in known breaches".to_string(),
        BreachReport::Found(summary) if summary.sources.is_empty() => {
            format!("[WARN]     breach: found in {} breach(es)", summary.count)
        }
        BreachReport::Found(summary) => format!(
            "[WARN]     breach: found in {} breach(es): {}",
            summary.count,
            summary.sources.join(", ")
        ),
        BreachReport::Failed { reason } => format!("[ERROR]    breach: lookup failed: {reason}"),
    });

    let probe = &report.probe;
    let via = probe.peer.as_deref().unwrap_or(&probe.host);
    out.push(match &probe.result {
        ProbeResult::Accepted { .. } => {
            format!("[ACCEPTED] mailbox: {} (via {via})", probe.result)
        }
        ProbeResult::Rejected { .. } => {
            format!("[REJECTED] mailbox: {} (via {via})", probe.result)
        }
        ProbeResult::ConnectionFailed { .. } => {
            format!("[FAILED]   mailbox: {} (via {via})", probe.result)
        }
    });
    if verbose {
        out.push(format!("           sender: {}", probe.sender));
        for event in &probe.transcript {
            for line in event.to_string().lines() {
                out.push(format!("           {line}"));
            }
        }
    }
    out
}

fn human_error_lines(input: &str, err: &VerifyError) -> Vec<String> {
    match err {
        VerifyError::InvalidSyntax(invalid) => vec![format!(
            "[INVALID]  syntax: {input} :: {}",
            invalid.reasons.join("; ")
        )],
        VerifyError::NoMailServer { .. } => vec![
            format!("[OK]       syntax: {input}"),
            format!("[NO MX]    domain: {err}"),
        ],
        VerifyError::DnsLookupFailed { .. } => vec![
            format!("[OK]       syntax: {input}"),
            format!("[ERROR]    domain: {err}"),
        ],
    }
}

// codes de sortie : 0 accepté, 2 invalide/rejeté, 1 non concluant
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Ok(report) => match report.verdict() {
            ProbeResult::Accepted { .. } => 0,
            ProbeResult::Rejected { .. } => 2,
            ProbeResult::ConnectionFailed { .. } => 1,
        },
        Err(VerifyError::InvalidSyntax(_) | VerifyError::NoMailServer { .. }) => 2,
        Err(VerifyError::DnsLookupFailed { .. }) => 1,
    }
}
