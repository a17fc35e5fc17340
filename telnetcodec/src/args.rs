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

use crate::args::naws::WindowSize;
use crate::result::{CodecError, CodecResult};
use crate::{TelnetOption, consts};
use bytes::{Buf, BufMut, BytesMut};

pub mod naws;

///
/// Telnet Subnegotiation Argument
///
/// Payloads are held unescaped; [`crate::TelnetCodec`] applies and removes
/// IAC doubling at the framing layer.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// A subnegotiation for the window size, where the first value is the width
    /// and the second value is the height. The values are in characters.
    NAWSWindowSize(WindowSize),
    /// `IS <value>` report for a value-carrying option such as TERMINAL-TYPE
    /// or TERMINAL-SPEED.
    Is(TelnetOption, BytesMut),
    /// `SEND` request for a value-carrying option.
    Send(TelnetOption),
    /// A subnegotiation for an unknown option.
    Unknown(TelnetOption, BytesMut),
}

impl TelnetArgument {
    /// Builds an `IS` report carrying a textual value.
    ///
    /// ```
    /// use telscript_telnetcodec::{TelnetArgument, TelnetOption};
    ///
    /// let arg = TelnetArgument::is(TelnetOption::TTYPE, "vt100");
    /// assert_eq!(arg.len(), 6);
    /// ```
    pub fn is(option: TelnetOption, value: &str) -> Self {
        TelnetArgument::Is(option, BytesMut::from(value.as_bytes()))
    }

    /// The option this argument belongs to.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::NAWSWindowSize(_) => TelnetOption::NAWS,
            TelnetArgument::Is(option, _) => *option,
            TelnetArgument::Send(option) => *option,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }

    /// Returns the unescaped payload length in bytes, excluding the option byte.
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.len(),
            TelnetArgument::Is(_, value) => 1 + value.len(),
            TelnetArgument::Send(_) => 1,
            TelnetArgument::Unknown(_, payload) => payload.len(),
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the unescaped payload into `dst`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the unescaped payload to a `std::io::Write` writer.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TelnetArgument::NAWSWindowSize(inner) => inner.write(writer),
            TelnetArgument::Is(_, value) => {
                writer.write_all(&[consts::IS])?;
                writer.write_all(value)?;
                Ok(1 + value.len())
            }
            TelnetArgument::Send(_) => {
                writer.write_all(&[consts::SEND])?;
                Ok(1)
            }
            TelnetArgument::Unknown(_, payload) => {
                writer.write_all(payload)?;
                Ok(payload.len())
            }
        }
    }

    /// Parses an unescaped payload received for `option`.
    ///
    /// # Errors
    /// NAWS payloads shorter than four bytes and TERMINAL-TYPE/TERMINAL-SPEED
    /// payloads without a valid qualifier are rejected.
    pub fn decode(option: TelnetOption, mut payload: BytesMut) -> CodecResult<Self> {
        match option {
            TelnetOption::NAWS => Ok(TelnetArgument::NAWSWindowSize(WindowSize::decode(
                &mut payload,
            )?)),
            option if option.is_reportable() => {
                if !payload.has_remaining() {
                    return Err(CodecError::InsufficientData {
                        option: option.to_u8(),
                        required: 1,
                        available: 0,
                    });
                }
                match payload.get_u8() {
                    consts::IS => Ok(TelnetArgument::Is(option, payload)),
                    consts::SEND => Ok(TelnetArgument::Send(option)),
                    qualifier => Err(CodecError::InvalidQualifier {
                        option: option.to_u8(),
                        qualifier,
                    }),
                }
            }
            option => Ok(TelnetArgument::Unknown(option, payload)),
        }
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::NAWSWindowSize(size) => write!(f, "NAWS {size}"),
            TelnetArgument::Is(option, value) => {
                write!(f, "{option} IS {}", String::from_utf8_lossy(value))
            }
            TelnetArgument::Send(option) => write!(f, "{option} SEND"),
            TelnetArgument::Unknown(option, payload) => {
                write!(f, "{option} ({} bytes)", payload.len())
            }
        }
    }
}
