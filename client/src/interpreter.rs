//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Telnet protocol interpreter
//!
//! A [`ProtocolInterpreter`] performs a single read: it pulls bytes from a
//! [`Transport`], answers negotiation inline, translates a handful of control
//! characters and returns the payload text it collected.
//!
//! The read loop runs under two deadlines. The *initial* deadline
//! (`now + timeout`) bounds how long to wait while nothing has been
//! collected. The *rolling* deadline (`now + timeout / 100`) is pushed forward
//! every time a byte is consumed, so a read returns shortly after the remote
//! side goes quiet.

use crate::config::TerminalSettings;
use crate::control::{self, ControlAction};
use crate::scope::{SessionScope, deadline_after};
use crate::transport::Transport;
use bytes::BytesMut;
use metrics::counter;
use std::io::Write;
use std::time::Duration;
use telscript_telnetcodec::consts;
use telscript_telnetcodec::negotiation::{self, NegotiationVerb};
use telscript_telnetcodec::{TelnetCodec, TelnetFrame, TelnetOption};
use tokio::select;
use tokio::time::Instant;
use tokio_util::codec::Encoder;
use tracing::{debug, trace, warn};

const MIN_QUANTUM: Duration = Duration::from_millis(1);
const MAX_QUANTUM: Duration = Duration::from_millis(10);

/// One read operation against a transport
///
/// The interpreter borrows the transport and scope for the duration of
/// [`ProtocolInterpreter::read`] and keeps nothing afterwards.
pub struct ProtocolInterpreter<'a> {
    transport: &'a dyn Transport,
    scope: &'a SessionScope,
    terminal: &'a TerminalSettings,
    buffer: String,
}

impl<'a> ProtocolInterpreter<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        scope: &'a SessionScope,
        terminal: &'a TerminalSettings,
    ) -> Self {
        Self {
            transport,
            scope,
            terminal,
            buffer: String::new(),
        }
    }

    /// Read payload text for up to `timeout`
    ///
    /// Returns an empty string straight away if the transport is not
    /// connected. Cancellation of the scope ends the read at the next check
    /// and returns whatever was collected.
    pub async fn read(mut self, timeout: Duration) -> String {
        if !self.transport.is_connected() {
            return String::new();
        }
        self.transport.set_receive_timeout(timeout);

        let started = Instant::now();
        let initial_deadline = deadline_after(started, timeout);
        let mut rolling_deadline = deadline_after(started, timeout / 100);
        let mut consumed = 0u64;

        loop {
            if self.scope.is_cancelled() {
                break;
            }
            if self.transport.available() > 0 {
                if let Some(byte) = self.next_byte().await {
                    consumed += 1;
                    self.dispatch(byte).await;
                }
                rolling_deadline = deadline_after(Instant::now(), timeout / 100);
                continue;
            }

            let now = Instant::now();
            let waiting_for_first = self.buffer.is_empty() && now < initial_deadline;
            if !waiting_for_first && now >= rolling_deadline {
                break;
            }
            let until = if waiting_for_first {
                initial_deadline.max(rolling_deadline)
            } else {
                rolling_deadline
            };
            let quantum = (until - now).clamp(MIN_QUANTUM, MAX_QUANTUM);
            if !self.scope.pause(quantum).await {
                break;
            }
        }

        counter!("telscript.bytes.received").increment(consumed);
        if self.terminal.echo_to_console && !self.buffer.is_empty() {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(self.buffer.as_bytes());
            let _ = stdout.flush();
        }
        self.buffer
    }

    /// Next byte from the transport, or `None` on the end marker or
    /// cancellation.
    async fn next_byte(&self) -> Option<u8> {
        select! {
            biased;
            _ = self.scope.token().cancelled() => None,
            byte = self.transport.read_byte() => byte,
        }
    }

    async fn dispatch(&mut self, byte: u8) {
        if byte == consts::IAC {
            self.command().await;
            return;
        }
        match control::translate(byte) {
            Some(ControlAction::Substitute(text)) => self.buffer.push_str(text),
            Some(ControlAction::Reply(reply)) => {
                trace!(byte, reply, "Answering control byte");
                send_bytes(self.transport, self.scope, &[reply]).await;
            }
            Some(ControlAction::Bell) => {
                if self.terminal.echo_to_console {
                    let mut stdout = std::io::stdout().lock();
                    let _ = stdout.write_all(&[consts::control::BEL]);
                    let _ = stdout.flush();
                }
            }
            None => self.buffer.push(char::from(byte)),
        }
    }

    async fn command(&mut self) {
        let Some(verb) = self.next_byte().await else {
            return;
        };
        trace!(command = verb, "Telnet command");
        match verb {
            consts::IAC => self.buffer.push_str(&consts::IAC.to_string()),
            consts::IP => {
                debug!("Remote interrupt received, cancelling session");
                self.scope.cancel();
            }
            consts::DO | consts::DONT | consts::WILL | consts::WONT => {
                let Some(option) = self.next_byte().await else {
                    return;
                };
                let Some(verb) = NegotiationVerb::from_u8(verb) else {
                    return;
                };
                let option = TelnetOption::from_u8(option);
                let frames = negotiation::reply_to(verb, option, self.terminal);
                if !frames.is_empty() {
                    debug!(%verb, %option, "Answering negotiation");
                    send_frames(self.transport, self.scope, frames).await;
                }
            }
            consts::SB => self.subnegotiation().await,
            _ => {}
        }
    }

    /// `IAC SB <option> <command> IAC SE`, read as a fixed four-byte frame.
    async fn subnegotiation(&mut self) {
        let Some(option) = self.next_byte().await else {
            return;
        };
        let Some(command) = self.next_byte().await else {
            return;
        };
        for _ in 0..2 {
            if self.next_byte().await.is_none() {
                break;
            }
        }
        let option = TelnetOption::from_u8(option);
        if let Some(reply) = negotiation::reply_to_subnegotiation(option, command, self.terminal) {
            debug!(%option, command, "Answering subnegotiation");
            send_frames(self.transport, self.scope, vec![reply]).await;
        }
    }
}

impl std::fmt::Debug for ProtocolInterpreter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProtocolInterpreter")
            .field("collected", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

/// Encode `frames` and write them under the scope's write permit.
///
/// Returns `false` if nothing was written.
pub(crate) async fn send_frames(
    transport: &dyn Transport,
    scope: &SessionScope,
    frames: Vec<TelnetFrame>,
) -> bool {
    let mut codec = TelnetCodec::new();
    let mut bytes = BytesMut::new();
    for frame in frames {
        if let Err(error) = codec.encode(frame, &mut bytes) {
            warn!(%error, "Unable to encode frame");
            return false;
        }
    }
    let sent = send_bytes(transport, scope, &bytes).await;
    if sent {
        counter!("telscript.negotiation.replies").increment(1);
    }
    sent
}

/// Write raw bytes under the scope's write permit.
pub(crate) async fn send_bytes(transport: &dyn Transport, scope: &SessionScope, bytes: &[u8]) -> bool {
    let Some(_permit) = scope.acquire_write().await else {
        return false;
    };
    trace!(len = bytes.len(), "Writing to transport");
    match transport.write(bytes).await {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "Write failed");
            false
        }
    }
}
