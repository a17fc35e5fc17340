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

//! Stateless option negotiation policy.
//!
//! Every reply is decided from the command that triggered it alone. No table
//! of previously negotiated options is kept, so a repeated request is answered
//! again each time it arrives.
//!
//! | Received        | Supported option       | Any other option |
//! |-----------------|------------------------|------------------|
//! | `DO <opt>`      | `WILL <opt>`           | `WONT <opt>`     |
//! | `WILL <opt>`    | `DO <opt>`             | `DONT <opt>`     |
//! | `DONT`/`WONT`   | nothing                | nothing          |
//!
//! The supported options are SUPPRESS-GO-AHEAD, TERMINAL-TYPE,
//! TERMINAL-SPEED and WINDOW-SIZE. Agreeing to `DO WINDOW-SIZE` is followed
//! immediately by the NAWS report.

use crate::args::TelnetArgument;
use crate::naws::WindowSize;
use crate::{TelnetFrame, TelnetOption, consts};

/// The four negotiation verbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NegotiationVerb {
    /// Ask the other side to enable an option
    Do,
    /// Ask the other side to disable an option
    Dont,
    /// Offer to enable an option locally
    Will,
    /// Refuse an option locally
    Wont,
}

impl NegotiationVerb {
    /// Maps a command byte to its verb, if it is one.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            consts::DO => Some(NegotiationVerb::Do),
            consts::DONT => Some(NegotiationVerb::Dont),
            consts::WILL => Some(NegotiationVerb::Will),
            consts::WONT => Some(NegotiationVerb::Wont),
            _ => None,
        }
    }

    /// The command byte for this verb.
    pub fn to_u8(self) -> u8 {
        match self {
            NegotiationVerb::Do => consts::DO,
            NegotiationVerb::Dont => consts::DONT,
            NegotiationVerb::Will => consts::WILL,
            NegotiationVerb::Wont => consts::WONT,
        }
    }

    /// Builds the negotiation frame `IAC <verb> <option>`.
    pub fn frame(self, option: TelnetOption) -> TelnetFrame {
        match self {
            NegotiationVerb::Do => TelnetFrame::Do(option),
            NegotiationVerb::Dont => TelnetFrame::Dont(option),
            NegotiationVerb::Will => TelnetFrame::Will(option),
            NegotiationVerb::Wont => TelnetFrame::Wont(option),
        }
    }
}

impl std::fmt::Display for NegotiationVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NegotiationVerb::Do => write!(f, "DO"),
            NegotiationVerb::Dont => write!(f, "DONT"),
            NegotiationVerb::Will => write!(f, "WILL"),
            NegotiationVerb::Wont => write!(f, "WONT"),
        }
    }
}

/// Values this side reports during subnegotiation.
pub trait TerminalIdentity {
    /// Terminal type reported for `TERMINAL-TYPE SEND`.
    fn terminal_type(&self) -> &str;
    /// Terminal speed reported for `TERMINAL-SPEED SEND`.
    fn terminal_speed(&self) -> &str;
    /// Window size pushed after agreeing to `DO WINDOW-SIZE`.
    fn window_size(&self) -> WindowSize;
}

/// Decides the frames to send back for a received `IAC <verb> <option>`.
///
/// ```
/// use telscript_telnetcodec::negotiation::{NegotiationVerb, TerminalIdentity, reply_to};
/// use telscript_telnetcodec::naws::WindowSize;
/// use telscript_telnetcodec::{TelnetFrame, TelnetOption};
///
/// struct Vt100;
/// impl TerminalIdentity for Vt100 {
///     fn terminal_type(&self) -> &str { "vt100" }
///     fn terminal_speed(&self) -> &str { "19200,19200" }
///     fn window_size(&self) -> WindowSize { WindowSize::default() }
/// }
///
/// let frames = reply_to(NegotiationVerb::Do, TelnetOption::Echo, &Vt100);
/// assert_eq!(frames, vec![TelnetFrame::Wont(TelnetOption::Echo)]);
/// ```
pub fn reply_to<T>(verb: NegotiationVerb, option: TelnetOption, identity: &T) -> Vec<TelnetFrame>
where
    T: TerminalIdentity + ?Sized,
{
    match (verb, option.is_supported()) {
        (NegotiationVerb::Do, true) => {
            let mut frames = vec![TelnetFrame::Will(option)];
            if option == TelnetOption::NAWS {
                frames.push(TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(
                    identity.window_size(),
                )));
            }
            frames
        }
        (NegotiationVerb::Do, false) => vec![TelnetFrame::Wont(option)],
        (NegotiationVerb::Will, true) => vec![TelnetFrame::Do(option)],
        (NegotiationVerb::Will, false) => vec![TelnetFrame::Dont(option)],
        (NegotiationVerb::Dont | NegotiationVerb::Wont, _) => Vec::new(),
    }
}

/// Decides the reply to a received `IAC SB <option> <command> ...`.
///
/// `SEND` for TERMINAL-TYPE or TERMINAL-SPEED is answered with an `IS` report.
/// Subnegotiation for any other option is abandoned with `WONT <option>`.
pub fn reply_to_subnegotiation<T>(
    option: TelnetOption,
    command: u8,
    identity: &T,
) -> Option<TelnetFrame>
where
    T: TerminalIdentity + ?Sized,
{
    match option {
        TelnetOption::TTYPE if command == consts::SEND => Some(TelnetFrame::Subnegotiate(
            TelnetArgument::is(option, identity.terminal_type()),
        )),
        TelnetOption::TSPEED if command == consts::SEND => Some(TelnetFrame::Subnegotiate(
            TelnetArgument::is(option, identity.terminal_speed()),
        )),
        option if option.is_reportable() => None,
        option => Some(TelnetFrame::Wont(option)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl TerminalIdentity for Fixed {
        fn terminal_type(&self) -> &str {
            "vt100"
        }
        fn terminal_speed(&self) -> &str {
            "19200,19200"
        }
        fn window_size(&self) -> WindowSize {
            WindowSize::new(120, 40)
        }
    }

    #[test]
    fn do_supported_option_is_accepted() {
        for option in [
            TelnetOption::SuppressGoAhead,
            TelnetOption::TTYPE,
            TelnetOption::TSPEED,
        ] {
            assert_eq!(
                reply_to(NegotiationVerb::Do, option, &Fixed),
                vec![TelnetFrame::Will(option)]
            );
        }
    }

    #[test]
    fn do_window_size_pushes_naws_report() {
        assert_eq!(
            reply_to(NegotiationVerb::Do, TelnetOption::NAWS, &Fixed),
            vec![
                TelnetFrame::Will(TelnetOption::NAWS),
                TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(
                    120, 40
                ))),
            ]
        );
    }

    #[test]
    fn will_is_mirrored_with_do_or_dont() {
        assert_eq!(
            reply_to(NegotiationVerb::Will, TelnetOption::SuppressGoAhead, &Fixed),
            vec![TelnetFrame::Do(TelnetOption::SuppressGoAhead)]
        );
        assert_eq!(
            reply_to(NegotiationVerb::Will, TelnetOption::Echo, &Fixed),
            vec![TelnetFrame::Dont(TelnetOption::Echo)]
        );
    }

    #[test]
    fn refusals_are_never_answered() {
        for code in 0..=u8::MAX {
            let option = TelnetOption::from(code);
            assert!(reply_to(NegotiationVerb::Dont, option, &Fixed).is_empty());
            assert!(reply_to(NegotiationVerb::Wont, option, &Fixed).is_empty());
        }
    }

    #[test]
    fn repeated_requests_get_the_same_answer() {
        let first = reply_to(NegotiationVerb::Do, TelnetOption::TTYPE, &Fixed);
        let second = reply_to(NegotiationVerb::Do, TelnetOption::TTYPE, &Fixed);
        assert_eq!(first, second);
    }

    #[test]
    fn terminal_values_are_reported_on_send() {
        assert_eq!(
            reply_to_subnegotiation(TelnetOption::TTYPE, consts::SEND, &Fixed),
            Some(TelnetFrame::Subnegotiate(TelnetArgument::is(
                TelnetOption::TTYPE,
                "vt100"
            )))
        );
        assert_eq!(
            reply_to_subnegotiation(TelnetOption::TSPEED, consts::SEND, &Fixed),
            Some(TelnetFrame::Subnegotiate(TelnetArgument::is(
                TelnetOption::TSPEED,
                "19200,19200"
            )))
        );
    }

    #[test]
    fn other_subnegotiations_are_abandoned() {
        assert_eq!(
            reply_to_subnegotiation(TelnetOption::NewEnvironment, consts::SEND, &Fixed),
            Some(TelnetFrame::Wont(TelnetOption::NewEnvironment))
        );
        assert_eq!(
            reply_to_subnegotiation(TelnetOption::TTYPE, consts::IS, &Fixed),
            None
        );
    }

    #[test]
    fn verbs_map_to_command_bytes() {
        for verb in [
            NegotiationVerb::Do,
            NegotiationVerb::Dont,
            NegotiationVerb::Will,
            NegotiationVerb::Wont,
        ] {
            assert_eq!(NegotiationVerb::from_u8(verb.to_u8()), Some(verb));
        }
        assert_eq!(NegotiationVerb::from_u8(consts::SB), None);
    }
}
