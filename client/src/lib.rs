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

//! # Telscript Telnet Client
//!
//! Scriptable Telnet client for driving interactive hosts: wait for a
//! prompt, send a command, read until the next prompt.
//!
//! ## Features
//!
//! - **Inline Protocol Handling** - IAC sequences are stripped from the text and negotiation is answered as it arrives
//! - **Terminated Reads** - Read until a literal string or a regular expression shows up, or a timeout passes
//! - **Fail-Soft Scripting** - Reads, writes and logins return what they got instead of erroring
//! - **Serialized Writes** - Concurrent writers never interleave bytes on the wire
//! - **Cancellation** - Every wait observes a [`CancellationToken`] derived from the caller's
//!
//! ## Quick Start
//!
//! ```no_run
//! use telscript_client::{CancellationToken, ClientConfig, LineFeed, TelnetSession};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("192.168.1.1", 23)
//!         .with_line_feed(LineFeed::Rfc854)
//!         .with_terminal_type("xterm");
//!
//!     let shutdown = CancellationToken::new();
//!     let session = TelnetSession::connect(config, &shutdown).await?;
//!
//!     if session.try_login("admin", "admin", Duration::from_secs(5)).await {
//!         session.write_line("show interfaces").await;
//!         print!("{}", session.terminated_read(">", Duration::from_secs(2)).await);
//!     }
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Pattern Terminators
//!
//! ```no_run
//! # use telscript_client::{TelnetSession, Terminator};
//! # use std::time::Duration;
//! # async fn example(session: &TelnetSession) -> telscript_client::Result<()> {
//! let prompt = Terminator::pattern(r"\[\w+@[\w-]+ [^\]]+\][$#] $")?;
//! let listing = session.terminated_read(prompt, Duration::from_secs(3)).await;
//! # Ok(())
//! # }
//! ```

#![warn(
    clippy::cargo,
    missing_debug_implementations,
    future_incompatible,
    rust_2018_idioms
)]

mod blocking;
mod config;
pub mod control;
mod error;
mod interpreter;
mod scope;
mod session;
mod terminator;
mod transport;

pub use blocking::BlockingSession;
pub use config::{ClientConfig, ConnectMode, LineFeed, TerminalSettings};
pub use control::ControlAction;
pub use error::{ClientError, Result};
pub use interpreter::ProtocolInterpreter;
pub use scope::SessionScope;
pub use session::{SessionState, TelnetSession};
pub use terminator::Terminator;
pub use transport::{MemoryTransport, TcpTransport, Transport};

pub use tokio_util::sync::CancellationToken;

// Re-export protocol types from telscript_telnetcodec
pub use telscript_telnetcodec::negotiation::{NegotiationVerb, TerminalIdentity};
pub use telscript_telnetcodec::{TelnetFrame, TelnetOption, naws};
