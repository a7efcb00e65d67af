use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use super::error::SessionError;
use super::types::{SmtpEvent, SmtpReply, Stage};

/// One plaintext SMTP connection plus the transcript of everything exchanged
/// on it. Dropping the session closes the socket.
pub(crate) struct SmtpSession {
    host: String,
    peer: SocketAddr,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    healthy: bool,
    transcript: Vec<SmtpEvent>,
}

impl SmtpSession {
    /// Resolves `host:port` and connects to the first address that answers
    /// within `connect_timeout`.
    pub(crate) fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Result<Self, SessionError> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|source| SessionError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(command_timeout))?;
                    stream.set_write_timeout(Some(command_timeout))?;
                    let reader = BufReader::new(stream.try_clone()?);
                    debug!(host, peer = %addr, "SMTP connection established");
                    return Ok(Self {
                        host: host.to_string(),
                        peer: addr,
                        stream,
                        reader,
                        healthy: true,
                        transcript: Vec::new(),
                    });
                }
                Err(source) => {
                    debug!(host, peer = %addr, error = %source, "SMTP connect attempt failed");
                    last_err = Some(SessionError::Connect { addr, source });
                }
            }
        }
        Err(last_err.unwrap_or_else(|| SessionError::NoAddress {
            host: host.to_string(),
        }))
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) fn read_reply(&mut self, stage: Stage) -> Result<SmtpReply, SessionError> {
        let outcome = self.read_reply_inner();
        self.observe(stage, outcome)
    }

    /// Sends `command` and waits for the matching reply.
    pub(crate) fn command(
        &mut self,
        stage: Stage,
        command: &str,
    ) -> Result<SmtpReply, SessionError> {
        debug!(host = %self.host, "C: {command}");
        self.transcript.push(SmtpEvent::Sent {
            stage,
            command: command.to_string(),
        });
        let written = self.write_line(command);
        if let Err(err) = written {
            return self.observe(stage, Err(err));
        }
        self.read_reply(stage)
    }

    /// Best-effort `QUIT`. Skipped once the transport has failed; any error is
    /// recorded in the transcript and otherwise ignored.
    pub(crate) fn quit(&mut self) {
        if self.healthy {
            let _ = self.command(Stage::Quit, "QUIT");
        }
    }

    pub(crate) fn into_transcript(self) -> Vec<SmtpEvent> {
        self.transcript
    }

    fn observe(
        &mut self,
        stage: Stage,
        outcome: Result<SmtpReply, SessionError>,
    ) -> Result<SmtpReply, SessionError> {
        match &outcome {
            Ok(reply) => {
                debug!(host = %self.host, "S: {reply}");
                self.transcript.push(SmtpEvent::Received {
                    stage,
                    reply: reply.clone(),
                });
            }
            Err(err) => {
                debug!(host = %self.host, %stage, error = %err, "SMTP session failed");
                self.healthy = false;
                self.transcript.push(SmtpEvent::Error {
                    stage,
                    message: err.to_string(),
                });
            }
        }
        outcome
    }

    fn write_line(&mut self, command: &str) -> Result<(), SessionError> {
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line)?;
        self.stream.flush()?;
        Ok(())
    }

    fn read_reply_inner(&mut self) -> Result<SmtpReply, SessionError> {
        let mut code = None;
        let mut lines = Vec::new();
        loop {
            let mut bytes = Vec::new();
            if self.reader.read_until(b'\n', &mut bytes)? == 0 {
                return Err(SessionError::Closed);
            }
            // reply text is not always UTF-8
            let mut raw = String::from_utf8_lossy(&bytes).into_owned();
            if raw.ends_with('\n') {
                raw.pop();
                if raw.ends_with('\r') {
                    raw.pop();
                }
            }

            let code_part = raw
                .get(..3)
                .ok_or_else(|| SessionError::Protocol(format!("invalid SMTP reply: '{raw}'")))?;
            let parsed_code = code_part.parse::<u16>().map_err(|_| {
                SessionError::Protocol(format!("invalid SMTP status code: '{code_part}'"))
            })?;
            if let Some(existing) = code {
                if existing != parsed_code {
                    return Err(SessionError::Protocol(format!(
                        "inconsistent SMTP reply codes: {existing} vs {parsed_code}"
                    )));
                }
            } else {
                code = Some(parsed_code);
            }

            let continuation = raw.as_bytes().get(3).copied() == Some(b'-');
            lines.push(raw.get(4..).unwrap_or_default().to_string());
            if !continuation {
                break;
            }
        }
        let code = code
            .ok_or_else(|| SessionError::Protocol("SMTP reply missing status code".into()))?;
        Ok(SmtpReply { code, lines })
    }
}
