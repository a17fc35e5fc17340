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

use super::TelnetOption;
use crate::args::TelnetArgument;

///
/// A single unit of the Telnet byte stream: a data byte, a two-byte command,
/// a three-byte negotiation, or a complete subnegotiation.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetFrame {
    /// Telnet Data Byte
    Data(u8),
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// Request the other side enable an option
    Do(TelnetOption),
    /// Request the other side disable an option
    Dont(TelnetOption),
    /// Offer to enable an option locally
    Will(TelnetOption),
    /// Refuse or disable an option locally
    Wont(TelnetOption),
    /// Subnegotiation Payload
    Subnegotiate(TelnetArgument),
}

impl TelnetFrame {
    /// The option a negotiation or subnegotiation frame refers to.
    pub fn option(&self) -> Option<TelnetOption> {
        match self {
            TelnetFrame::Do(option)
            | TelnetFrame::Dont(option)
            | TelnetFrame::Will(option)
            | TelnetFrame::Wont(option) => Some(*option),
            TelnetFrame::Subnegotiate(argument) => Some(argument.option()),
            _ => None,
        }
    }
}

impl std::fmt::Display for TelnetFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetFrame::Data(byte) => write!(f, "Data(0x{byte:02X})"),
            TelnetFrame::NoOperation => write!(f, "IAC NOP"),
            TelnetFrame::DataMark => write!(f, "IAC DM"),
            TelnetFrame::Break => write!(f, "IAC BRK"),
            TelnetFrame::InterruptProcess => write!(f, "IAC IP"),
            TelnetFrame::AbortOutput => write!(f, "IAC AO"),
            TelnetFrame::AreYouThere => write!(f, "IAC AYT"),
            TelnetFrame::EraseCharacter => write!(f, "IAC EC"),
            TelnetFrame::EraseLine => write!(f, "IAC EL"),
            TelnetFrame::GoAhead => write!(f, "IAC GA"),
            TelnetFrame::Do(option) => write!(f, "IAC DO {option}"),
            TelnetFrame::Dont(option) => write!(f, "IAC DONT {option}"),
            TelnetFrame::Will(option) => write!(f, "IAC WILL {option}"),
            TelnetFrame::Wont(option) => write!(f, "IAC WONT {option}"),
            TelnetFrame::Subnegotiate(argument) => write!(f, "IAC SB {argument} IAC SE"),
        }
    }
}
