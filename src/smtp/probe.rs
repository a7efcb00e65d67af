use tracing::{debug, info};

use crate::address::EmailAddress;

use super::error::SessionError;
use super::options::ProbeOptions;
use super::session::SmtpSession;
use super::types::{ProbeReport, ProbeResult, SmtpEvent, SmtpReply, Stage};

/// Non-terminal states of the dialogue. `Disconnected` ends as soon as the
/// TCP connection is up; terminal states are [`ProbeResult`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeState {
    Connected,
    Greeted,
    SenderSet,
}

struct Envelope<'a> {
    helo: &'a str,
    sender: &'a str,
    recipient: &'a str,
}

/// Asks the exchanger `host` whether it would accept mail for `target`.
///
/// Runs `EHLO` (falling back to `HELO` after a 5xx), `MAIL FROM` and
/// `RCPT TO`, then leaves with `QUIT`. `DATA` is never sent and nothing is
/// retried: a single call opens at most one connection.
pub fn probe_mailbox(host: &str, target: &EmailAddress, options: &ProbeOptions) -> ProbeReport {
    let helo = options.helo_domain(target.ascii_domain());
    let sender = options.envelope_sender(target.ascii_domain());
    let recipient = target.to_ascii();
    info!(host, port = options.port, %sender, %recipient, "probing mailbox");

    let mut session = match SmtpSession::connect(
        host,
        options.port,
        options.connect_timeout,
        options.command_timeout,
    ) {
        Ok(session) => session,
        Err(err) => {
            let reason = err.to_string();
            return ProbeReport {
                host: host.to_string(),
                peer: None,
                sender,
                result: ProbeResult::ConnectionFailed {
                    stage: Stage::Connect,
                    reason: reason.clone(),
                },
                transcript: vec![SmtpEvent::Error {
                    stage: Stage::Connect,
                    message: reason,
                }],
            };
        }
    };
    let peer = session.peer();

    let envelope = Envelope {
        helo: helo.as_ref(),
        sender: &sender,
        recipient: &recipient,
    };
    let mut state = ProbeState::Connected;
    let result = loop {
        match advance(&mut session, state, &envelope) {
            Ok(next) => {
                debug!(host, from = ?state, to = ?next, "SMTP state advanced");
                state = next;
            }
            Err(terminal) => break terminal,
        }
    };
    session.quit();
    info!(host, verdict = %result, "probe finished");

    ProbeReport {
        host: host.to_string(),
        peer: Some(peer.to_string()),
        sender,
        result,
        transcript: session.into_transcript(),
    }
}

/// Runs the command(s) leaving `state`. `Err` carries the terminal outcome.
fn advance(
    session: &mut SmtpSession,
    state: ProbeState,
    envelope: &Envelope<'_>,
) -> Result<ProbeState, ProbeResult> {
    match state {
        ProbeState::Connected => {
            let banner = session
                .read_reply(Stage::Greeting)
                .map_err(|err| failed(Stage::Greeting, err))?;
            require_positive(Stage::Greeting, &banner)?;
            greet(session, envelope.helo)?;
            Ok(ProbeState::Greeted)
        }
        ProbeState::Greeted => {
            let command = format!("MAIL FROM:<{}>", envelope.sender);
            let reply = exchange(session, Stage::MailFrom, &command)?;
            require_positive(Stage::MailFrom, &reply)?;
            Ok(ProbeState::SenderSet)
        }
        ProbeState::SenderSet => {
            let command = format!("RCPT TO:<{}>", envelope.recipient);
            let reply = exchange(session, Stage::RcptTo, &command)?;
            if reply.is_positive_completion() {
                Err(ProbeResult::accepted(&reply))
            } else {
                Err(ProbeResult::rejected(Stage::RcptTo, &reply))
            }
        }
    }
}

fn greet(session: &mut SmtpSession, helo: &str) -> Result<(), ProbeResult> {
    let ehlo = exchange(session, Stage::Hello, &format!("EHLO {helo}"))?;
    if !ehlo.is_permanent_failure() {
        return require_positive(Stage::Hello, &ehlo);
    }
    // Servers without ESMTP answer EHLO with 5xx but still speak HELO.
    let helo_reply = exchange(session, Stage::Hello, &format!("HELO {helo}"))?;
    require_positive(Stage::Hello, &helo_reply)
}

fn exchange(
    session: &mut SmtpSession,
    stage: Stage,
    command: &str,
) -> Result<SmtpReply, ProbeResult> {
    session
        .command(stage, command)
        .map_err(|err| failed(stage, err))
}

fn require_positive(stage: Stage, reply: &SmtpReply) -> Result<(), ProbeResult> {
    if reply.is_positive_completion() {
        Ok(())
    } else {
        Err(ProbeResult::rejected(stage, reply))
    }
}

fn failed(stage: Stage, err: SessionError) -> ProbeResult {
    ProbeResult::ConnectionFailed {
        stage,
        reason: err.to_string(),
    }
}
