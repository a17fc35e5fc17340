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

//! Telnet command, option and control byte values.

/// Subnegotiation End
pub const SE: u8 = 240;
/// No Operation
pub const NOP: u8 = 241;
/// Data Mark, the data stream portion of a Synch
pub const DM: u8 = 242;
/// Break
pub const BRK: u8 = 243;
/// Interrupt Process
pub const IP: u8 = 244;
/// Abort Output
pub const AO: u8 = 245;
/// Are You There
pub const AYT: u8 = 246;
/// Erase Character
pub const EC: u8 = 247;
/// Erase Line
pub const EL: u8 = 248;
/// Go Ahead
pub const GA: u8 = 249;
/// Subnegotiation Begin
pub const SB: u8 = 250;
/// Sender wants to enable, or confirms it is now performing, an option
pub const WILL: u8 = 251;
/// Sender refuses, or stops performing, an option
pub const WONT: u8 = 252;
/// Sender asks the receiver to enable an option
pub const DO: u8 = 253;
/// Sender asks the receiver to disable an option
pub const DONT: u8 = 254;
/// Interpret As Command
pub const IAC: u8 = 255;

/// Subnegotiation `IS` qualifier (RFC 1091, RFC 1079)
pub const IS: u8 = 0;
/// Subnegotiation `SEND` qualifier (RFC 1091, RFC 1079)
pub const SEND: u8 = 1;

/// Carriage Return
pub const CR: u8 = 13;
/// Line Feed
pub const LF: u8 = 10;

/// ASCII control characters that receive a printable substitute.
pub mod control {
    /// Start of Heading
    pub const SOH: u8 = 1;
    /// Start of Text
    pub const STX: u8 = 2;
    /// End of Text (Ctrl-C)
    pub const ETX: u8 = 3;
    /// End of Transmission
    pub const EOT: u8 = 4;
    /// Enquiry
    pub const ENQ: u8 = 5;
    /// Acknowledge
    pub const ACK: u8 = 6;
    /// Bell
    pub const BEL: u8 = 7;
    /// Backspace
    pub const BS: u8 = 8;
    /// Vertical Tab
    pub const VT: u8 = 11;
    /// Form Feed
    pub const FF: u8 = 12;
    /// Negative Acknowledge
    pub const NAK: u8 = 21;
    /// Unit Separator
    pub const US: u8 = 31;
}

/// Telnet option codes
pub mod option {
    /// Binary Transmission
    pub const BINARY: u8 = 0;
    /// Echo
    pub const ECHO: u8 = 1;
    /// Suppress Go Ahead
    pub const SGA: u8 = 3;
    /// Status
    pub const STATUS: u8 = 5;
    /// Timing Mark
    pub const TM: u8 = 6;
    /// Terminal Type
    pub const TTYPE: u8 = 24;
    /// Negotiate About Window Size
    pub const NAWS: u8 = 31;
    /// Terminal Speed
    pub const TSPEED: u8 = 32;
    /// Remote Flow Control
    pub const LFLOW: u8 = 33;
    /// Linemode
    pub const LINEMODE: u8 = 34;
    /// X Display Location
    pub const XDISPLOC: u8 = 35;
    /// Environment Option
    pub const OLD_ENVIRONMENT: u8 = 36;
    /// Authentication
    pub const AUTHENTICATION: u8 = 37;
    /// Encryption
    pub const ENCRYPTION: u8 = 38;
    /// New Environment Option
    pub const NEW_ENVIRONMENT: u8 = 39;
    /// Charset
    pub const CHARSET: u8 = 42;
}
