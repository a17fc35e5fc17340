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

//! TCP transport

use super::Transport;
use crate::scope::deadline_after;
use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use metrics::counter;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::select;
use tokio::time::{Instant, timeout_at};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const READ_CHUNK: usize = 4096;

/// Transport over a `tokio` TCP stream
///
/// [`TcpTransport::open`] returns at once; the connection is made by a
/// background task, so [`Transport::is_connected`] starts out `false` and
/// flips once the stream is up. The same task keeps filling a receive buffer
/// until the peer closes the stream or the transport is closed.
pub struct TcpTransport {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
}

struct Shared {
    address: String,
    connected: AtomicBool,
    peer_closed: AtomicBool,
    received: Mutex<BytesMut>,
    arrived: Notify,
    receive_timeout: Mutex<Duration>,
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
}

impl TcpTransport {
    /// Start connecting to `address` (`host:port`).
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(address: impl Into<String>) -> Self {
        let shared = Arc::new(Shared {
            address: address.into(),
            connected: AtomicBool::new(false),
            peer_closed: AtomicBool::new(false),
            received: Mutex::new(BytesMut::with_capacity(READ_CHUNK)),
            arrived: Notify::new(),
            receive_timeout: Mutex::new(Duration::from_secs(1)),
            writer: tokio::sync::Mutex::new(None),
        });
        let shutdown = CancellationToken::new();
        tokio::spawn(run(shared.clone(), shutdown.clone()));
        Self { shared, shutdown }
    }

    /// The address this transport connects to
    pub fn address(&self) -> &str {
        &self.shared.address
    }
}

impl Shared {
    fn received(&self) -> std::sync::MutexGuard<'_, BytesMut> {
        self.received.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pop(&self) -> Option<u8> {
        let mut received = self.received();
        received.has_remaining().then(|| received.get_u8())
    }
}

async fn run(shared: Arc<Shared>, shutdown: CancellationToken) {
    let stream = select! {
        _ = shutdown.cancelled() => return,
        result = TcpStream::connect(&shared.address) => result,
    };
    let stream = match stream {
        Ok(stream) => stream,
        Err(error) => {
            warn!(address = %shared.address, %error, "Failed to connect");
            return;
        }
    };
    if let Err(error) = stream.set_nodelay(true) {
        debug!(%error, "Unable to disable Nagle's algorithm");
    }

    let (mut reader, writer) = stream.into_split();
    *shared.writer.lock().await = Some(writer);
    shared.connected.store(true, Ordering::SeqCst);
    // close() cancels before clearing the flag, so one of the two sides sees the other.
    if shutdown.is_cancelled() {
        shared.connected.store(false, Ordering::SeqCst);
    } else {
        info!(address = %shared.address, "Transport connected");
    }

    let mut chunk = [0u8; READ_CHUNK];
    while !shutdown.is_cancelled() {
        select! {
            _ = shutdown.cancelled() => break,
            result = reader.read(&mut chunk) => match result {
                Ok(0) => {
                    debug!(address = %shared.address, "Peer closed the stream");
                    shared.peer_closed.store(true, Ordering::Release);
                    break;
                }
                Ok(count) => {
                    shared.received().extend_from_slice(&chunk[..count]);
                    counter!("telscript.transport.bytes_received").increment(count as u64);
                    shared.arrived.notify_waiters();
                }
                Err(error) => {
                    warn!(address = %shared.address, %error, "Read failed");
                    shared.peer_closed.store(true, Ordering::Release);
                    break;
                }
            }
        }
    }

    shared.arrived.notify_waiters();
    if let Some(mut writer) = shared.writer.lock().await.take() {
        let _ = writer.shutdown().await;
    }
}

#[async_trait]
impl Transport for TcpTransport {
    /// Connected until closed, or until the stream has ended and every byte
    /// received before that has been consumed.
    fn is_connected(&self) -> bool {
        if !self.shared.connected.load(Ordering::Acquire) {
            return false;
        }
        !self.shared.peer_closed.load(Ordering::Acquire) || self.available() > 0
    }

    fn available(&self) -> usize {
        self.shared.received().remaining()
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        *self
            .shared
            .receive_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = timeout;
    }

    async fn read_byte(&self) -> Option<u8> {
        let timeout = *self
            .shared
            .receive_timeout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let deadline = deadline_after(Instant::now(), timeout);
        loop {
            let arrived = self.shared.arrived.notified();
            if let Some(byte) = self.shared.pop() {
                return Some(byte);
            }
            if !self.is_connected() {
                return None;
            }
            if timeout_at(deadline, arrived).await.is_err() {
                return None;
            }
        }
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.shared.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "transport is not connected",
            ));
        };
        writer.write_all(bytes).await?;
        writer.flush().await?;
        counter!("telscript.transport.bytes_written").increment(bytes.len() as u64);
        Ok(())
    }

    fn close(&self) {
        self.shutdown.cancel();
        if self.shared.connected.swap(false, Ordering::SeqCst) {
            debug!(address = %self.shared.address, "Closing transport");
        }
        self.shared.arrived.notify_waiters();
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("address", &self.shared.address)
            .field("connected", &self.is_connected())
            .field("available", &self.available())
            .finish()
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn wait_connected(transport: &TcpTransport) {
        for _ in 0..500 {
            if transport.is_connected() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("transport never connected");
    }

    #[tokio::test]
    async fn connects_in_background_and_exchanges_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        let transport = TcpTransport::open(address.clone());
        assert_eq!(transport.address(), address);

        let (mut peer, _) = listener.accept().await.unwrap();
        wait_connected(&transport).await;

        peer.write_all(b"ok").await.unwrap();
        transport.set_receive_timeout(Duration::from_millis(500));
        assert_eq!(transport.read_byte().await, Some(b'o'));
        assert_eq!(transport.read_byte().await, Some(b'k'));

        transport.write(b"ping").await.unwrap();
        let mut echoed = [0u8; 4];
        peer.read_exact(&mut echoed).await.unwrap();
        assert_eq!(&echoed, b"ping");
    }

    #[tokio::test]
    async fn read_byte_times_out_with_end_marker() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let transport = TcpTransport::open(listener.local_addr().unwrap().to_string());
        let (_peer, _) = listener.accept().await.unwrap();
        wait_connected(&transport).await;

        transport.set_receive_timeout(Duration::from_millis(20));
        let started = std::time::Instant::now();
        assert_eq!(transport.read_byte().await, None);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn peer_close_drains_before_disconnecting() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let transport = TcpTransport::open(listener.local_addr().unwrap().to_string());
        let (mut peer, _) = listener.accept().await.unwrap();
        wait_connected(&transport).await;

        peer.write_all(b"bye").await.unwrap();
        drop(peer);
        transport.set_receive_timeout(Duration::from_millis(500));

        let mut text = Vec::new();
        while let Some(byte) = transport.read_byte().await {
            text.push(byte);
        }
        assert_eq!(text, b"bye");
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn close_marks_disconnected_and_rejects_writes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let transport = TcpTransport::open(listener.local_addr().unwrap().to_string());
        let (_peer, _) = listener.accept().await.unwrap();
        wait_connected(&transport).await;

        transport.close();
        transport.close();
        assert!(!transport.is_connected());
        assert_eq!(transport.read_byte().await, None);

        let mut rejected = false;
        for _ in 0..100 {
            if let Err(error) = transport.write(b"x").await {
                assert_eq!(error.kind(), io::ErrorKind::NotConnected);
                rejected = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(rejected, "write still accepted after close");
    }

    #[tokio::test]
    async fn close_during_connect_stays_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let transport = TcpTransport::open(listener.local_addr().unwrap().to_string());
        transport.close();

        let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!transport.is_connected());
        assert_eq!(transport.read_byte().await, None);
        drop(accepted);
    }
}
