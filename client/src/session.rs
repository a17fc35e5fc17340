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

//! Scriptable Telnet session

use crate::config::{ClientConfig, ConnectMode, LineFeed};
use crate::interpreter::{ProtocolInterpreter, send_bytes, send_frames};
use crate::scope::{SessionScope, deadline_after};
use crate::terminator::Terminator;
use crate::transport::{TcpTransport, Transport};
use crate::{ClientError, Result};
use metrics::counter;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;
use telscript_telnetcodec::{TelnetFrame, TelnetOption};
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

const CONNECT_POLL: Duration = Duration::from_millis(2);

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionState {
    /// Waiting for the transport to connect
    Constructing = 0,
    /// Connected; reads and writes are allowed
    Connected = 1,
    /// Torn down
    Disposed = 2,
}

impl SessionState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Constructing,
            1 => Self::Connected,
            _ => Self::Disposed,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructing => write!(f, "constructing"),
            Self::Connected => write!(f, "connected"),
            Self::Disposed => write!(f, "disposed"),
        }
    }
}

/// A scriptable Telnet session
///
/// The session owns its transport, a cancellation scope derived from the
/// caller's token and the write permit inside that scope. Reads return
/// whatever payload text arrived; the terminated-read and login helpers are
/// built on top of them and never fail, they return what they collected.
///
/// ```no_run
/// use telscript_client::{CancellationToken, ClientConfig, TelnetSession};
/// use std::time::Duration;
///
/// # async fn example() -> telscript_client::Result<()> {
/// let shutdown = CancellationToken::new();
/// let session = TelnetSession::connect(ClientConfig::new("10.0.0.1", 23), &shutdown).await?;
/// if session.try_login("admin", "secret", Duration::from_secs(5)).await {
///     session.write_line("show version").await;
///     let output = session.terminated_read(">", Duration::from_secs(2)).await;
///     println!("{output}");
/// }
/// session.shutdown().await;
/// # Ok(())
/// # }
/// ```
pub struct TelnetSession {
    config: ClientConfig,
    address: String,
    transport: Arc<dyn Transport>,
    scope: SessionScope,
    state: AtomicU8,
    established: OnceCell<bool>,
    released: AtomicBool,
}

impl TelnetSession {
    /// Connect to `config.host:config.port` over TCP.
    ///
    /// In [`ConnectMode::Eager`] this waits up to `config.connect_timeout`
    /// for the connection and fails with [`ClientError::ConnectionTimeout`]
    /// if it never comes up.
    pub async fn connect(config: ClientConfig, cancel: &CancellationToken) -> Result<Self> {
        let transport = Arc::new(TcpTransport::open(config.address()));
        Self::with_transport(transport, config, cancel).await
    }

    /// Build a session over an existing transport.
    pub async fn with_transport(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let session = Self {
            address: config.address(),
            config,
            transport,
            scope: SessionScope::new(cancel),
            state: AtomicU8::new(SessionState::Constructing.as_u8()),
            established: OnceCell::new(),
            released: AtomicBool::new(false),
        };
        counter!("telscript.sessions.total").increment(1);
        if session.config.connect_mode == ConnectMode::Eager {
            session.establish().await?;
        }
        Ok(session)
    }

    /// Wait for the transport and send the initial negotiation.
    ///
    /// Runs once per session; later calls report the first outcome. Lazy
    /// sessions call this on first use, and callers may call it to observe
    /// a connection failure.
    pub async fn establish(&self) -> Result<()> {
        let connected = *self
            .established
            .get_or_init(|| self.wait_for_transport())
            .await;
        if connected {
            Ok(())
        } else {
            Err(ClientError::ConnectionTimeout {
                address: self.address.clone(),
                timeout: self.config.connect_timeout,
            })
        }
    }

    #[instrument(skip(self), fields(address = %self.address))]
    async fn wait_for_transport(&self) -> bool {
        let deadline = deadline_after(Instant::now(), self.config.connect_timeout);
        while !self.transport.is_connected() {
            if Instant::now() >= deadline || !self.scope.pause(CONNECT_POLL).await {
                warn!(timeout = ?self.config.connect_timeout, "Unable to connect to the host");
                counter!("telscript.sessions.connect_failures").increment(1);
                return false;
            }
        }
        if self
            .state
            .compare_exchange(
                SessionState::Constructing.as_u8(),
                SessionState::Connected.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return false;
        }
        info!("Session connected");
        self.negotiate();
        true
    }

    /// Push `DO SUPPRESS-GO-AHEAD` and any configured negotiations without
    /// waiting for them.
    fn negotiate(&self) {
        if self.config.terminal.skip_negotiation {
            debug!("Skipping initial negotiation");
            return;
        }
        let mut frames = vec![TelnetFrame::Do(TelnetOption::SuppressGoAhead)];
        frames.extend(
            self.config
                .extra_negotiations
                .iter()
                .map(|(verb, option)| verb.frame(*option)),
        );
        for frame in frames {
            let transport = self.transport.clone();
            let scope = self.scope.clone();
            tokio::spawn(async move {
                debug!(%frame, "Sending negotiation");
                send_frames(transport.as_ref(), &scope, vec![frame]).await;
            });
        }
    }

    async fn ensure_established(&self) -> bool {
        match self.establish().await {
            Ok(()) => true,
            Err(error) => {
                debug!(%error, "Session is not established");
                false
            }
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the session is live and its transport connected
    pub fn is_connected(&self) -> bool {
        self.state() != SessionState::Disposed && self.transport.is_connected()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session's cancellation scope
    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// Write `command` as-is.
    ///
    /// Does nothing and returns `false` when the session is not connected or
    /// has been cancelled. Concurrent writes are serialized and never
    /// interleave on the wire.
    #[instrument(skip(self, command), fields(address = %self.address, len = command.len()))]
    pub async fn write(&self, command: &str) -> bool {
        if !self.ensure_established().await {
            return false;
        }
        if !self.is_connected() || self.scope.is_cancelled() {
            debug!("Write skipped");
            return false;
        }
        let sent = send_bytes(self.transport.as_ref(), &self.scope, command.as_bytes()).await;
        if sent {
            counter!("telscript.bytes.written").increment(command.len() as u64);
        }
        sent
    }

    /// Write `command` followed by the configured line feed.
    pub async fn write_line(&self, command: &str) -> bool {
        self.write_line_with(command, self.config.line_feed.as_str())
            .await
    }

    /// Write `command` followed by `"\r\n"`.
    pub async fn write_line_rfc854(&self, command: &str) -> bool {
        self.write_line_with(command, LineFeed::Rfc854.as_str())
            .await
    }

    /// Write `command` followed by `line_feed`.
    pub async fn write_line_with(&self, command: &str, line_feed: &str) -> bool {
        self.write(&format!("{command}{line_feed}")).await
    }

    /// Read whatever arrives within `timeout`.
    pub async fn read(&self, timeout: Duration) -> String {
        if !self.ensure_established().await {
            return String::new();
        }
        ProtocolInterpreter::new(self.transport.as_ref(), &self.scope, &self.config.terminal)
            .read(timeout)
            .await
    }

    /// Read until `terminator` is satisfied or `timeout` elapses.
    ///
    /// Polls with the configured poll interval. On timeout the text collected
    /// so far is returned and a warning is logged.
    pub async fn terminated_read(&self, terminator: impl Into<Terminator>, timeout: Duration) -> String {
        self.terminated_read_with(terminator, timeout, self.config.poll_interval)
            .await
    }

    /// [`TelnetSession::terminated_read`] with an explicit poll interval.
    #[instrument(skip(self, terminator), fields(address = %self.address))]
    pub async fn terminated_read_with(
        &self,
        terminator: impl Into<Terminator>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> String {
        let terminator = terminator.into();
        let started = Instant::now();
        let deadline = deadline_after(started, timeout);
        let mut collected = String::new();
        loop {
            if terminator.is_satisfied(&collected) {
                return collected;
            }
            if Instant::now() >= deadline || self.scope.is_cancelled() {
                break;
            }
            if self.is_connected() {
                collected.push_str(&self.read(poll_interval).await);
            } else if !self.scope.pause(poll_interval).await {
                break;
            }
        }
        warn!(%terminator, elapsed = ?started.elapsed(), "Terminator not found");
        counter!("telscript.reads.timeouts").increment(1);
        collected
    }

    /// Log in with `username` and `password`, expecting a `">"` prompt.
    pub async fn try_login(&self, username: &str, password: &str, timeout: Duration) -> bool {
        self.try_login_with(username, password, timeout, ">", self.config.line_feed.as_str())
            .await
    }

    /// Log in against a `:`-terminated username prompt and password prompt.
    ///
    /// Each of the three waits gets up to `timeout`. Returns `true` only when
    /// `terminator` shows up after the password was sent.
    #[instrument(skip(self, password, terminator, line_feed), fields(address = %self.address))]
    pub async fn try_login_with(
        &self,
        username: &str,
        password: &str,
        timeout: Duration,
        terminator: impl Into<Terminator>,
        line_feed: &str,
    ) -> bool {
        let terminator = terminator.into();
        match self
            .login_sequence(username, password, timeout, &terminator, line_feed)
            .await
        {
            Ok(()) => {
                info!("Login succeeded");
                true
            }
            Err(step) => {
                warn!(step, "Login failed");
                counter!("telscript.logins.failed").increment(1);
                false
            }
        }
    }

    async fn login_sequence(
        &self,
        username: &str,
        password: &str,
        timeout: Duration,
        terminator: &Terminator,
        line_feed: &str,
    ) -> std::result::Result<(), &'static str> {
        let prompt = Terminator::from(":");
        if !prompt.is_satisfied(&self.terminated_read(prompt.clone(), timeout).await) {
            return Err("username prompt");
        }
        if !self.write_line_with(username, line_feed).await {
            return Err("send username");
        }
        if !prompt.is_satisfied(&self.terminated_read(prompt.clone(), timeout).await) {
            return Err("password prompt");
        }
        if !self.write_line_with(password, line_feed).await {
            return Err("send password");
        }
        if !terminator.is_satisfied(&self.terminated_read(terminator.clone(), timeout).await) {
            return Err("command prompt");
        }
        Ok(())
    }

    /// Tear the session down and pause briefly so background negotiation
    /// writes can finish.
    pub async fn shutdown(self) {
        self.teardown();
        tokio::time::sleep(self.config.drain_pause).await;
    }

    /// Close the transport, then cancel the scope and close the write permit.
    fn teardown(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.transport.close();
        self.scope.release();
        self.state
            .store(SessionState::Disposed.as_u8(), Ordering::Release);
        info!(address = %self.address, "Session closed");
    }
}

impl Drop for TelnetSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for TelnetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelnetSession")
            .field("address", &self.address)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
