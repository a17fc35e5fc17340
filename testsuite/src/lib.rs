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

//! # Telscript Test Suite
//!
//! A scripted Telnet host for exercising the client end to end. The host
//! listens on an ephemeral loopback port, plays a fixed [`Step`] script to
//! each connection and records every line and protocol frame the client
//! sends back.
//!
//! ```no_run
//! use telscript_testsuite::{FixtureHost, Step};
//!
//! # async fn example() -> std::io::Result<()> {
//! let host = FixtureHost::start(vec![Step::send("Account:"), Step::ExpectLine, Step::Hold]).await?;
//! let config = host.config();
//! # Ok(())
//! # }
//! ```

use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use telscript_client::ClientConfig;
use telscript_telnetcodec::{TelnetCodec, TelnetFrame, consts};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// One step of a host script
#[derive(Clone, Debug)]
pub enum Step {
    /// Send raw payload bytes, IAC-escaped on the wire
    Send(Vec<u8>),
    /// Send a protocol frame
    Frame(TelnetFrame),
    /// Wait for the client to send a full line
    ExpectLine,
    /// Do nothing for a while
    Pause(Duration),
    /// Keep reading until the client disconnects or the host stops
    Hold,
}

impl Step {
    pub fn send(text: impl AsRef<[u8]>) -> Self {
        Step::Send(text.as_ref().to_vec())
    }
}

#[derive(Debug, Default)]
struct Observed {
    lines: Vec<String>,
    frames: Vec<TelnetFrame>,
    connections: usize,
}

/// Scripted Telnet host on `127.0.0.1`
#[derive(Debug)]
pub struct FixtureHost {
    address: SocketAddr,
    observed: Arc<Mutex<Observed>>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl FixtureHost {
    /// Bind an ephemeral port and serve `script` to every connection.
    pub async fn start(script: Vec<Step>) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        let observed = Arc::new(Mutex::new(Observed::default()));
        let shutdown = CancellationToken::new();
        info!(%address, "Fixture host listening");

        let task = tokio::spawn(accept_loop(
            listener,
            Arc::new(script),
            observed.clone(),
            shutdown.clone(),
        ));
        Ok(Self {
            address,
            observed,
            shutdown,
            task,
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Client configuration pointing at this host
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.address.ip().to_string(), self.address.port())
            .with_connect_timeout(Duration::from_secs(2))
            .with_drain_pause(Duration::from_millis(5))
    }

    /// Lines received so far, without line terminators
    pub fn received_lines(&self) -> Vec<String> {
        self.observed().lines.clone()
    }

    /// Protocol frames received so far
    pub fn received_frames(&self) -> Vec<TelnetFrame> {
        self.observed().frames.clone()
    }

    pub fn connections(&self) -> usize {
        self.observed().connections
    }

    /// Poll until `frame` has been received or `timeout` passes.
    pub async fn wait_for_frame(&self, frame: &TelnetFrame, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.observed().frames.contains(frame) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    /// Stop accepting and drop all connections.
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        let _ = (&mut self.task).await;
    }

    fn observed(&self) -> MutexGuard<'_, Observed> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FixtureHost {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn accept_loop(
    listener: TcpListener,
    script: Arc<Vec<Step>>,
    observed: Arc<Mutex<Observed>>,
    shutdown: CancellationToken,
) {
    loop {
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(error) => {
                    debug!(%error, "Accept failed");
                    continue;
                }
            },
        };
        debug!(%peer, "Fixture host accepted connection");
        observed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .connections += 1;

        let connection = Connection {
            framed: Framed::new(stream, TelnetCodec::new()),
            observed: observed.clone(),
            line: Vec::new(),
        };
        let script = script.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                result = connection.play(&script) => {
                    if let Err(error) = result {
                        debug!(%error, "Fixture connection ended");
                    }
                }
            }
        });
    }
}

struct Connection {
    framed: Framed<TcpStream, TelnetCodec>,
    observed: Arc<Mutex<Observed>>,
    line: Vec<u8>,
}

impl Connection {
    async fn play(mut self, script: &[Step]) -> io::Result<()> {
        for step in script {
            trace!(?step, "Fixture step");
            match step {
                Step::Send(bytes) => {
                    for byte in bytes {
                        self.framed.feed(TelnetFrame::Data(*byte)).await.map_err(to_io)?;
                    }
                    self.framed.flush().await.map_err(to_io)?;
                }
                Step::Frame(frame) => self.framed.send(frame.clone()).await.map_err(to_io)?,
                Step::ExpectLine => {
                    if !self.next_line().await? {
                        return Ok(());
                    }
                }
                Step::Pause(duration) => tokio::time::sleep(*duration).await,
                Step::Hold => while self.next_frame().await?.is_some() {},
            }
        }
        Ok(())
    }

    /// Read frames until a line feed. Returns `false` on end of stream.
    async fn next_line(&mut self) -> io::Result<bool> {
        while let Some(frame) = self.next_frame().await? {
            if frame == TelnetFrame::Data(consts::LF) {
                let mut line = std::mem::take(&mut self.line);
                if line.last() == Some(&consts::CR) {
                    line.pop();
                }
                let line = String::from_utf8_lossy(&line).into_owned();
                debug!(%line, "Fixture received line");
                self.observed().lines.push(line);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Next frame from the client, recording data and protocol frames.
    async fn next_frame(&mut self) -> io::Result<Option<TelnetFrame>> {
        let Some(frame) = self.framed.next().await.transpose().map_err(to_io)? else {
            return Ok(None);
        };
        match &frame {
            TelnetFrame::Data(byte) if *byte != consts::LF => self.line.push(*byte),
            TelnetFrame::Data(_) => {}
            other => {
                debug!(frame = %other, "Fixture received frame");
                self.observed().frames.push(other.clone());
            }
        }
        Ok(Some(frame))
    }

    fn observed(&self) -> MutexGuard<'_, Observed> {
        self.observed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn to_io(error: telscript_telnetcodec::CodecError) -> io::Error {
    io::Error::other(error.to_string())
}
