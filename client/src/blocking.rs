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

//! Blocking wrapper around [`TelnetSession`]

use crate::config::ClientConfig;
use crate::session::{SessionState, TelnetSession};
use crate::terminator::Terminator;
use crate::transport::Transport;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio_util::sync::CancellationToken;

/// A [`TelnetSession`] driven to completion on a private runtime
///
/// Each call blocks the calling thread. Must not be used from inside an
/// async context.
pub struct BlockingSession {
    session: TelnetSession,
    runtime: Runtime,
}

impl BlockingSession {
    /// Connect over TCP, blocking until connected or timed out.
    pub fn connect(config: ClientConfig, cancel: &CancellationToken) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let session = runtime.block_on(TelnetSession::connect(config, cancel))?;
        Ok(Self { session, runtime })
    }

    /// Build over an existing transport.
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let session = runtime.block_on(TelnetSession::with_transport(transport, config, cancel))?;
        Ok(Self { session, runtime })
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn write(&self, command: &str) -> bool {
        self.runtime.block_on(self.session.write(command))
    }

    pub fn write_line(&self, command: &str) -> bool {
        self.runtime.block_on(self.session.write_line(command))
    }

    pub fn read(&self, timeout: Duration) -> String {
        self.runtime.block_on(self.session.read(timeout))
    }

    pub fn terminated_read(&self, terminator: impl Into<Terminator>, timeout: Duration) -> String {
        self.runtime
            .block_on(self.session.terminated_read(terminator, timeout))
    }

    pub fn try_login(&self, username: &str, password: &str, timeout: Duration) -> bool {
        self.runtime
            .block_on(self.session.try_login(username, password, timeout))
    }

    /// Tear down and wait out the drain pause.
    pub fn shutdown(self) {
        let Self { session, runtime } = self;
        runtime.block_on(session.shutdown());
    }
}

impl std::fmt::Debug for BlockingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BlockingSession").field(&self.session).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[test]
    fn drives_a_session_without_an_outer_runtime() {
        let transport = Arc::new(MemoryTransport::new());
        transport.feed(b"ready>");
        let session = BlockingSession::with_transport(
            transport.clone(),
            ClientConfig::new("fixture", 23).with_skip_negotiation(true),
            &CancellationToken::new(),
        )
        .unwrap();

        assert!(session.is_connected());
        assert_eq!(session.terminated_read(">", Duration::from_millis(200)), "ready>");
        assert!(session.write_line("status"));
        assert_eq!(transport.written(), b"status\n");

        session.shutdown();
        assert!(transport.is_closed());
    }
}
