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

//! Control-character translation table

use telscript_telnetcodec::consts::control;

/// What the interpreter does with a control byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// Append this text in place of the byte
    Substitute(&'static str),
    /// Write this byte back to the transport
    Reply(u8),
    /// Ring the console bell
    Bell,
}

/// Looks up the action for `byte`, or `None` if it is ordinary payload.
pub fn translate(byte: u8) -> Option<ControlAction> {
    let action = match byte {
        control::SOH => ControlAction::Substitute("[SOH]"),
        control::STX => ControlAction::Substitute("[STX]"),
        control::ETX => ControlAction::Substitute("^C"),
        control::EOT => ControlAction::Substitute("[EOT]"),
        control::ENQ => ControlAction::Reply(control::ACK),
        control::ACK => ControlAction::Substitute("[ACK]"),
        control::BEL => ControlAction::Bell,
        control::BS => ControlAction::Substitute("^H"),
        control::VT | control::FF => ControlAction::Substitute("\n"),
        control::NAK => ControlAction::Substitute("[NAK: negative acknowledge received]"),
        control::US => ControlAction::Substitute(","),
        _ => return None,
    };
    Some(action)
}
