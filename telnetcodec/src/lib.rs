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

//! # Telscript Telnet Protocol Codec
//!
//! Protocol vocabulary shared by the telscript client and its test fixtures.
//! Nothing in this crate performs I/O.
//!
//! ## Overview
//!
//! The Telnet protocol (RFC 854) interleaves command sequences with payload
//! text on a single byte stream. This crate provides:
//!
//! - **Constants**: command bytes (`IAC`, `DO`, `SB`, ...) and option codes in [`consts`]
//! - **Options**: the [`TelnetOption`] enum and the set of options this client accepts
//! - **Frames**: [`TelnetFrame`] with a `tokio_util::codec` [`TelnetCodec`] that
//!   encodes outbound frames and splits inbound streams into frames
//! - **Subnegotiation**: [`TelnetArgument`] payloads, including NAWS [`naws::WindowSize`]
//! - **Negotiation policy**: the stateless reply rules in [`negotiation`]
//!
//! ## Usage Example
//!
//! ```rust
//! use telscript_telnetcodec::{TelnetCodec, TelnetFrame, TelnetOption};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! let mut codec = TelnetCodec::new();
//!
//! let mut buffer = BytesMut::new();
//! codec.encode(TelnetFrame::Will(TelnetOption::TTYPE), &mut buffer).unwrap();
//! assert_eq!(&buffer[..], &[0xFF, 0xFB, 24]);
//!
//! let mut input = BytesMut::from(&b"Hi\xFF\xFD\x03"[..]);
//! let mut frames = Vec::new();
//! while let Some(frame) = codec.decode(&mut input).unwrap() {
//!     frames.push(frame);
//! }
//! assert_eq!(frames.last(), Some(&TelnetFrame::Do(TelnetOption::SuppressGoAhead)));
//! ```
//!
//! ## IAC Escaping
//!
//! Since 0xFF (IAC) is a special byte, it must be escaped when transmitted as data by
//! sending it twice: `IAC IAC` represents a literal 0xFF byte in the data stream. The
//! encoder applies this to data frames and subnegotiation payloads alike.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 858: Telnet Suppress Go Ahead Option
//! - RFC 1073: Telnet Window Size Option
//! - RFC 1079: Telnet Terminal Speed Option
//! - RFC 1091: Telnet Terminal-Type Option
//! - RFC 1143: The Q Method of Implementing TELNET Option Negotiation

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod args;
mod codec;
pub mod consts;
mod frame;
pub mod negotiation;
mod options;
mod result;

pub use self::args::{TelnetArgument, naws};
pub use self::codec::TelnetCodec;
pub use self::frame::TelnetFrame;
pub use self::options::TelnetOption;
pub use self::result::{CodecError, CodecResult};
