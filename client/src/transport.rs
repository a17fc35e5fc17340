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

//! Byte transports the protocol interpreter reads from and writes to
//!
//! A [`Transport`] is a duplex byte channel: it reports whether it is
//! connected and how many received bytes are waiting, hands them out one at a
//! time, and accepts buffered writes. Two implementations are provided:
//!
//! - [`TcpTransport`] connects over TCP in the background.
//! - [`MemoryTransport`] is scripted by hand and records every write.

use async_trait::async_trait;
use std::io;
use std::time::Duration;

mod memory;
mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

/// Duplex byte channel owned by a session
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Whether the channel is currently connected
    fn is_connected(&self) -> bool;

    /// Number of received bytes ready to be read without waiting
    fn available(&self) -> usize;

    /// Set how long [`Transport::read_byte`] waits for a byte to arrive
    fn set_receive_timeout(&self, timeout: Duration);

    /// Take the next received byte
    ///
    /// Waits up to the receive timeout when nothing is buffered. `None` is
    /// the end marker: nothing arrived in time or the channel is closed.
    async fn read_byte(&self) -> Option<u8>;

    /// Write all of `bytes` to the channel
    async fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Write a single byte to the channel
    async fn write_byte(&self, byte: u8) -> io::Result<()> {
        self.write(&[byte]).await
    }

    /// Close the channel
    ///
    /// Closing twice is harmless.
    fn close(&self);
}
