use std::cell::RefCell;
use std::time::Duration;

use serde_json::Value;

use super::*;
use crate::breach::{BreachError, BreachStatus, BreachSummary};
use crate::mx::MxRecord;
use crate::mx::tests::StubResolver;
use crate::smtp::tests::MockSmtpServer;
use crate::smtp::{ProbeOptions, ProbeResult, Stage};

const BANNER: &str = "220 mock.smtp.test ESMTP\r\n";

type LookupFn = dyn Fn(&str) -> Result<BreachStatus, BreachError>;

struct StubBreach {
    on_lookup: Box<LookupFn>,
    calls: RefCell<Vec<String>>,
}

impl StubBreach {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<BreachStatus, BreachError> + 'static,
    {
        Self {
            on_lookup: Box::new(f),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl BreachLookup for StubBreach {
    fn lookup(&self, email: &str) -> Result<BreachStatus, BreachError> {
        self.calls.borrow_mut().push(email.to_string());
        (self.on_lookup)(email)
    }
}

fn options_for(port: u16) -> VerifierOptions {
    VerifierOptions {
        probe: ProbeOptions {
            port,
            connect_timeout: Duration::from_secs(2),
            command_timeout: Duration::from_secs(2),
            ..ProbeOptions::default()
        },
        ..VerifierOptions::default()
    }
}

fn loopback_mx() -> StubResolver {
    StubResolver::answering(vec![MxRecord::new(10, "127.0.0.1")])
}

fn rcpt_script(rcpt_reply: &'static str) -> Vec<(&'static str, &'static str)> {
    vec![
        ("EHLO", "250 mock.smtp.test\r\n"),
        ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
        ("RCPT TO:", rcpt_reply),
    ]
}

fn not_found() -> StubBreach {
    StubBreach::new(|_| Ok(BreachStatus::NotFound))
}

#[test]
fn not_an_email_stops_at_syntax() {
    let resolver = StubResolver::new(|domain| panic!("resolver must not run, got {domain}"));
    let breach = StubBreach::new(|_| panic!("breach lookup must not run"));
    let verifier = Verifier::new(resolver, Some(breach), VerifierOptions::default());

    let err = verifier.verify("not-an-email").expect_err("invalid syntax");
    assert!(matches!(err, VerifyError::InvalidSyntax(_)));
    assert_eq!(err.stage(), PipelineStage::Syntax);
}

#[test]
fn zero_mx_records_stop_at_domain() {
    let resolver = StubResolver::new(|domain| {
        assert_eq!(domain, "nodomain.invalid");
        Ok(Vec::new())
    });
    let breach = StubBreach::new(|_| panic!("breach lookup must not run"));
    let verifier = Verifier::new(resolver, Some(breach), VerifierOptions::default());

    let err = verifier
        .verify("user@nodomain.invalid")
        .expect_err("no mail server");
    match &err {
        VerifyError::NoMailServer { domain } => assert_eq!(domain, "nodomain.invalid"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.stage(), PipelineStage::Domain);
}

#[test]
fn dns_failure_stops_at_domain() {
    let verifier = Verifier::new(
        StubResolver::failing("request timed out"),
        None::<StubBreach>,
        VerifierOptions::default(),
    );
    let err = verifier.verify("user@example.com").expect_err("dns failure");
    assert!(matches!(err, VerifyError::DnsLookupFailed { .. }));
    assert!(err.to_string().starts_with("DNS lookup failed"), "{err}");
}

#[test]
fn zero_found_leaves_no_summary_and_probes() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("250 2.1.5 Ok\r\n"));
    let breach = StubBreach::new(|_| crate::breach::decode(r#"{"found":0}"#));
    let verifier = Verifier::new(loopback_mx(), Some(breach), options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    assert_eq!(report.breach, BreachReport::NotFound);
    assert!(report.breach_summary().is_none());
    assert!(report.verdict().is_accepted());
    assert_eq!(server.received().len(), 4);
}

#[test]
fn rcpt_250_yields_accepted() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("250 OK\r\n"));
    let verifier = Verifier::new(loopback_mx(), Some(not_found()), options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    assert_eq!(
        report.verdict(),
        &ProbeResult::Accepted {
            code: 250,
            message: "OK".to_string(),
        }
    );
    server.received();
}

#[test]
fn rcpt_550_yields_rejected_with_code_and_text() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("550 5.1.1 User unknown\r\n"));
    let verifier = Verifier::new(loopback_mx(), Some(not_found()), options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    match report.verdict() {
        ProbeResult::Rejected {
            stage,
            code,
            message,
            ..
        } => {
            assert_eq!(*stage, Stage::RcptTo);
            assert_eq!(*code, 550);
            assert_eq!(message, "User unknown");
        }
        other => panic!("unexpected verdict: {other:?}"),
    }
    server.received();
}

#[test]
fn breach_failure_does_not_block_probe() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("250 Ok\r\n"));
    let breach = StubBreach::new(|_| crate::breach::decode("{not json"));
    let verifier = Verifier::new(loopback_mx(), Some(breach), options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    match &report.breach {
        BreachReport::Failed { reason } => {
            assert!(reason.starts_with("malformed breach directory response"), "{reason}")
        }
        other => panic!("unexpected breach report: {other:?}"),
    }
    assert!(report.verdict().is_accepted());
    assert!(
        server
            .received()
            .iter()
            .any(|line| line == "RCPT TO:<user@example.com>")
    );
}

#[test]
fn found_breaches_are_reported_alongside_verdict() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("550 5.1.1 User unknown\r\n"));
    let breach = StubBreach::new(|_| {
        Ok(BreachStatus::Found(BreachSummary {
            count: 2,
            sources: vec!["Canva.com".to_string(), "Zynga.com".to_string()],
        }))
    });
    let verifier = Verifier::new(loopback_mx(), Some(breach), options_for(server.port));

    let report = verifier.verify(" user@example.com ").expect("verification");
    let summary = report.breach_summary().expect("summary");
    assert_eq!(summary.count, 2);
    assert!(report.verdict().is_rejected());
    assert_eq!(
        verifier.breach.as_ref().expect("stub").calls.borrow().as_slice(),
        ["user@example.com".to_string()]
    );
    server.received();
}

#[test]
fn missing_breach_client_is_skipped() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("250 Ok\r\n"));
    let verifier = Verifier::new(loopback_mx(), None::<StubBreach>, options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    assert_eq!(report.breach, BreachReport::Skipped);
    server.received();
}

#[test]
fn lowest_preference_exchanger_is_probed() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("250 Ok\r\n"));
    let resolver = StubResolver::answering(vec![
        MxRecord::new(20, "backup.invalid"),
        MxRecord::new(5, "127.0.0.1"),
        MxRecord::new(5, "tie.invalid"),
    ]);
    let verifier = Verifier::new(resolver, None::<StubBreach>, options_for(server.port));

    let report = verifier.verify("user@example.com").expect("verification");
    assert_eq!(report.probe.host, "127.0.0.1");
    assert_eq!(report.mx.len(), 3);
    assert!(report.verdict().is_accepted());
    server.received();
}

#[test]
fn connection_failure_is_the_verdict() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let verifier = Verifier::new(loopback_mx(), Some(not_found()), options_for(port));

    let report = verifier.verify("user@example.com").expect("verification");
    assert!(matches!(
        report.verdict(),
        ProbeResult::ConnectionFailed {
            stage: Stage::Connect,
            ..
        }
    ));
}

#[test]
fn report_serializes_for_json_output() {
    let server = MockSmtpServer::spawn(BANNER, rcpt_script("550 5.1.1 User unknown\r\n"));
    let verifier = Verifier::new(loopback_mx(), Some(not_found()), options_for(server.port));
    let report = verifier.verify("user@example.com").expect("verification");
    server.received();

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["address"]["ascii_domain"], "example.com");
    assert_eq!(json["mx"][0]["exchange"], "127.0.0.1");
    assert_eq!(json["breach"]["status"], "not_found");
    assert_eq!(json["probe"]["result"]["outcome"], "rejected");
    assert_eq!(json["probe"]["result"]["code"], 550);
    assert_eq!(json["probe"]["result"]["enhanced_code"], "5.1.1");
    assert!(matches!(json["probe"]["transcript"], Value::Array(_)));
}

#[test]
fn null_mx_stops_at_domain() {
    let resolver = StubResolver::answering(vec![MxRecord::new(0, "")]);
    let verifier = Verifier::new(resolver, None::<StubBreach>, VerifierOptions::default());

    let err = verifier.verify("user@example.com").expect_err("domain takes no mail");
    assert!(matches!(err, VerifyError::NoMailServer { ref domain } if domain == "example.com"));
}
