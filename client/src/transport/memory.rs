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

//! In-memory transport

use super::Transport;
use crate::scope::deadline_after;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{Instant, timeout_at};

/// Scriptable [`Transport`] backed by memory
///
/// Incoming bytes are queued with [`MemoryTransport::feed`]. Every call to
/// [`Transport::write`] is kept as its own record, and the bytes are also
/// appended one at a time to a shared wire log, yielding between bytes so
/// that overlapping writers would show up interleaved.
#[derive(Debug)]
pub struct MemoryTransport {
    connected: AtomicBool,
    closed: AtomicBool,
    state: Mutex<State>,
    arrived: Notify,
    write_delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct State {
    incoming: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    wire: Vec<u8>,
    receive_timeout: Duration,
}

impl MemoryTransport {
    /// A connected transport with nothing queued
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            closed: AtomicBool::new(false),
            state: Mutex::new(State::default()),
            arrived: Notify::new(),
            write_delay: None,
        }
    }

    /// A transport that reports itself disconnected
    pub fn disconnected() -> Self {
        let transport = Self::new();
        transport.set_connected(false);
        transport
    }

    /// Pause for `delay` between each written byte
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
        self.arrived.notify_waiters();
    }

    /// Queue bytes for the reader
    pub fn feed(&self, bytes: impl AsRef<[u8]>) {
        self.state().incoming.extend(bytes.as_ref());
        self.arrived.notify_waiters();
    }

    /// Each write call, in the order they completed
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state().writes.clone()
    }

    /// Every written byte, in the order it reached the wire
    pub fn written(&self) -> Vec<u8> {
        self.state().wire.clone()
    }

    /// The receive timeout last set by a reader
    pub fn receive_timeout(&self) -> Duration {
        self.state().receive_timeout
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn available(&self) -> usize {
        self.state().incoming.len()
    }

    fn set_receive_timeout(&self, timeout: Duration) {
        self.state().receive_timeout = timeout;
    }

    async fn read_byte(&self) -> Option<u8> {
        let deadline = deadline_after(Instant::now(), self.receive_timeout());
        loop {
            let arrived = self.arrived.notified();
            if let Some(byte) = self.state().incoming.pop_front() {
                return Some(byte);
            }
            if !self.is_connected() || timeout_at(deadline, arrived).await.is_err() {
                return None;
            }
        }
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if !self.is_connected() {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "transport is not connected",
            ));
        }
        for byte in bytes {
            self.state().wire.push(*byte);
            match self.write_delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }
        }
        self.state().writes.push(bytes.to_vec());
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.set_connected(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn feeds_bytes_in_order() {
        let transport = MemoryTransport::new();
        transport.feed(b"ab");
        assert_eq!(transport.available(), 2);
        assert_eq!(transport.read_byte().await, Some(b'a'));
        assert_eq!(transport.read_byte().await, Some(b'b'));
        assert_eq!(transport.read_byte().await, None);
    }

    #[tokio::test]
    async fn read_byte_wakes_on_feed() {
        let transport = std::sync::Arc::new(MemoryTransport::new());
        transport.set_receive_timeout(Duration::from_secs(5));
        let reader = tokio::spawn({
            let transport = transport.clone();
            async move { transport.read_byte().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        transport.feed([7u8]);
        assert_eq!(reader.await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn records_each_write() {
        let transport = MemoryTransport::new();
        transport.write(b"one").await.unwrap();
        transport.write_byte(b'!').await.unwrap();
        assert_eq!(transport.writes(), vec![b"one".to_vec(), b"!".to_vec()]);
        assert_eq!(transport.written(), b"one!");
    }

    #[tokio::test]
    async fn disconnected_rejects_writes() {
        let transport = MemoryTransport::disconnected();
        assert!(!transport.is_connected());
        assert!(transport.write(b"x").await.is_err());
        assert!(transport.writes().is_empty());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let transport = MemoryTransport::new();
        transport.close();
        transport.close();
        assert!(transport.is_closed());
        assert!(!transport.is_connected());
    }
}
