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

use super::{CodecError, TelnetFrame, TelnetOption, consts};
use crate::args::TelnetArgument;
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// Frames Telnet protocol bytes.
///
/// The encoder turns [`TelnetFrame`]s into wire bytes, doubling IAC in data
/// and subnegotiation payloads. The decoder splits an inbound byte stream
/// into frames and keeps no negotiation state of its own; deciding how to
/// answer a negotiation is left to [`crate::negotiation`].
#[derive(Debug)]
pub struct TelnetCodec {
    decoder_buffer: BytesMut,
    decoder_state: DecoderState,
}

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec`.
    ///
    /// # Example
    /// ```
    /// use telscript_telnetcodec::TelnetCodec;
    ///
    /// let codec = TelnetCodec::new();
    /// ```
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Encodes `frame` into a freshly allocated buffer.
    pub fn to_bytes(frame: TelnetFrame) -> Result<BytesMut, CodecError> {
        let mut buffer = BytesMut::new();
        TelnetCodec::new().encode(frame, &mut buffer)?;
        Ok(buffer)
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            decoder_buffer: BytesMut::new(),
            decoder_state: DecoderState::NormalData,
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetFrame;
    type Error = CodecError;

    /// Decodes the next frame from `src`, consuming bytes one at a time.
    ///
    /// Returns `Ok(None)` when `src` runs dry in the middle of a sequence; the
    /// partial state is kept and resumed on the next call. Unknown commands and
    /// malformed subnegotiations are logged and surface as
    /// [`TelnetFrame::NoOperation`].
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetFrame>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.decoder_state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    return Ok(Some(TelnetFrame::Data(byte)));
                }
                (DecoderState::InterpretAsCommand, command) => {
                    self.decoder_state = DecoderState::NormalData;
                    let frame = match command {
                        consts::IAC => TelnetFrame::Data(consts::IAC),
                        consts::NOP => TelnetFrame::NoOperation,
                        consts::DM => TelnetFrame::DataMark,
                        consts::BRK => TelnetFrame::Break,
                        consts::IP => TelnetFrame::InterruptProcess,
                        consts::AO => TelnetFrame::AbortOutput,
                        consts::AYT => TelnetFrame::AreYouThere,
                        consts::EC => TelnetFrame::EraseCharacter,
                        consts::EL => TelnetFrame::EraseLine,
                        consts::GA => TelnetFrame::GoAhead,
                        consts::DO => {
                            self.decoder_state = DecoderState::NegotiateDo;
                            continue;
                        }
                        consts::DONT => {
                            self.decoder_state = DecoderState::NegotiateDont;
                            continue;
                        }
                        consts::WILL => {
                            self.decoder_state = DecoderState::NegotiateWill;
                            continue;
                        }
                        consts::WONT => {
                            self.decoder_state = DecoderState::NegotiateWont;
                            continue;
                        }
                        consts::SB => {
                            self.decoder_state = DecoderState::Subnegotiate;
                            continue;
                        }
                        _ => {
                            warn!("Received Unknown Command {:#X}", command);
                            TelnetFrame::NoOperation
                        }
                    };
                    return Ok(Some(frame));
                }
                (DecoderState::NegotiateDo, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::Do(byte.into())));
                }
                (DecoderState::NegotiateDont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::Dont(byte.into())));
                }
                (DecoderState::NegotiateWill, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::Will(byte.into())));
                }
                (DecoderState::NegotiateWont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::Wont(byte.into())));
                }
                (DecoderState::Subnegotiate, _) => {
                    self.decoder_buffer.clear();
                    self.decoder_state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC(option);
                }
                (DecoderState::SubnegotiateArgument(_), _) => {
                    self.decoder_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::IAC) => {
                    self.decoder_buffer.put_u8(consts::IAC);
                    self.decoder_state = DecoderState::SubnegotiateArgument(option);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    let payload = self.decoder_buffer.split();
                    return match TelnetArgument::decode(TelnetOption::from(option), payload) {
                        Ok(argument) => Ok(Some(TelnetFrame::Subnegotiate(argument))),
                        Err(error) => {
                            warn!("Discarding malformed subnegotiation: {}", error);
                            Ok(Some(TelnetFrame::NoOperation))
                        }
                    };
                }
                (DecoderState::SubnegotiateArgumentIAC(option), _) => {
                    warn!(
                        "Aborting subnegotiation for option {} on unexpected command {:#X}",
                        option, byte
                    );
                    self.decoder_buffer.clear();
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetFrame::NoOperation));
                }
            }
        }
        Ok(None)
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a `TelnetFrame` into its wire representation.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(ch) => {
                dst.reserve(2);
                if ch == consts::IAC {
                    dst.put_u8(consts::IAC);
                }
                dst.put_u8(ch);
            }
            TelnetFrame::NoOperation => put_command(dst, consts::NOP),
            TelnetFrame::DataMark => put_command(dst, consts::DM),
            TelnetFrame::Break => put_command(dst, consts::BRK),
            TelnetFrame::InterruptProcess => put_command(dst, consts::IP),
            TelnetFrame::AbortOutput => put_command(dst, consts::AO),
            TelnetFrame::AreYouThere => put_command(dst, consts::AYT),
            TelnetFrame::EraseCharacter => put_command(dst, consts::EC),
            TelnetFrame::EraseLine => put_command(dst, consts::EL),
            TelnetFrame::GoAhead => put_command(dst, consts::GA),
            TelnetFrame::Do(option) => put_negotiation(dst, consts::DO, option),
            TelnetFrame::Dont(option) => put_negotiation(dst, consts::DONT, option),
            TelnetFrame::Will(option) => put_negotiation(dst, consts::WILL, option),
            TelnetFrame::Wont(option) => put_negotiation(dst, consts::WONT, option),
            TelnetFrame::Subnegotiate(argument) => {
                let mut payload = BytesMut::with_capacity(argument.len());
                argument.encode(&mut payload)?;
                dst.reserve(payload.len() * 2 + 5);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                for &byte in payload.iter() {
                    if byte == consts::IAC {
                        dst.put_u8(consts::IAC);
                    }
                    dst.put_u8(byte);
                }
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

fn put_command(dst: &mut BytesMut, command: u8) {
    dst.reserve(2);
    dst.put_u8(consts::IAC);
    dst.put_u8(command);
}

fn put_negotiation(dst: &mut BytesMut, verb: u8, option: TelnetOption) {
    dst.reserve(3);
    dst.put_u8(consts::IAC);
    dst.put_u8(verb);
    dst.put_u8(option.to_u8());
}

///
/// Internal state of the frame decoder.
///
#[derive(Clone, Copy, Debug)]
enum DecoderState {
    /// Normal Data
    NormalData,
    /// Received IAC, Next byte is Command
    InterpretAsCommand,
    /// Received DO Command, Next Byte is the option
    NegotiateDo,
    /// Received DONT Command, Next Byte is the option
    NegotiateDont,
    /// Received WILL Command, Next Byte is the option
    NegotiateWill,
    /// Received WONT Command, Next Byte is the option
    NegotiateWont,
    /// Received Subnegotiate Command, Next Byte is the option
    Subnegotiate,
    /// Received Subnegotiate Option, Next Bytes are arguments
    SubnegotiateArgument(u8),
    /// Received IAC during Subnegotiation, Next Byte is command
    SubnegotiateArgumentIAC(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naws::WindowSize;
    use tracing_test::traced_test;

    fn collect_all(codec: &mut TelnetCodec, mut src: BytesMut) -> Vec<TelnetFrame> {
        let mut frames = Vec::new();
        while let Some(frame) = codec.decode(&mut src).unwrap() {
            frames.push(frame);
        }
        frames
    }

    #[test]
    fn decode_data_and_negotiation() {
        let mut codec = TelnetCodec::new();
        let frames = collect_all(
            &mut codec,
            BytesMut::from(&[b'o', b'k', consts::IAC, consts::DO, consts::option::SGA][..]),
        );
        assert_eq!(
            frames,
            vec![
                TelnetFrame::Data(b'o'),
                TelnetFrame::Data(b'k'),
                TelnetFrame::Do(TelnetOption::SuppressGoAhead),
            ]
        );
    }

    #[test]
    fn decode_escaped_iac_is_data() {
        let mut codec = TelnetCodec::new();
        let frames = collect_all(&mut codec, BytesMut::from(&[consts::IAC, consts::IAC][..]));
        assert_eq!(frames, vec![TelnetFrame::Data(consts::IAC)]);
    }

    #[test]
    fn decode_resumes_split_sequences() {
        let mut codec = TelnetCodec::new();
        let mut first = BytesMut::from(&[consts::IAC, consts::WILL][..]);
        assert_eq!(codec.decode(&mut first).unwrap(), None);
        let mut second = BytesMut::from(&[consts::option::ECHO][..]);
        assert_eq!(
            codec.decode(&mut second).unwrap(),
            Some(TelnetFrame::Will(TelnetOption::Echo))
        );
    }

    #[test]
    fn decode_subnegotiation_unescapes_payload() {
        let mut codec = TelnetCodec::new();
        let frames = collect_all(
            &mut codec,
            BytesMut::from(
                &[
                    consts::IAC,
                    consts::SB,
                    consts::option::NAWS,
                    0x00,
                    consts::IAC,
                    consts::IAC,
                    0x00,
                    0x18,
                    consts::IAC,
                    consts::SE,
                ][..],
            ),
        );
        assert_eq!(
            frames,
            vec![TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(
                WindowSize::new(255, 24)
            ))]
        );
    }

    #[test]
    fn decode_aborted_subnegotiation_yields_noop() {
        let mut codec = TelnetCodec::new();
        let frames = collect_all(
            &mut codec,
            BytesMut::from(
                &[consts::IAC, consts::SB, consts::option::TTYPE, consts::SEND, consts::IAC, consts::NOP, b'x'][..],
            ),
        );
        assert_eq!(frames, vec![TelnetFrame::NoOperation, TelnetFrame::Data(b'x')]);
    }

    #[test]
    #[traced_test]
    fn decode_unknown_command_is_logged() {
        let mut codec = TelnetCodec::new();
        let frames = collect_all(&mut codec, BytesMut::from(&[consts::IAC, 0x7A][..]));
        assert_eq!(frames, vec![TelnetFrame::NoOperation]);
        assert!(logs_contain("Received Unknown Command"));
    }

    #[test]
    fn encode_negotiation_frames() {
        let bytes = TelnetCodec::to_bytes(TelnetFrame::Wont(TelnetOption::Echo)).unwrap();
        assert_eq!(&bytes[..], &[consts::IAC, consts::WONT, consts::option::ECHO]);
    }

    #[test]
    fn encode_subnegotiation_doubles_iac() {
        let bytes = TelnetCodec::to_bytes(TelnetFrame::Subnegotiate(
            TelnetArgument::NAWSWindowSize(WindowSize::new(255, 24)),
        ))
        .unwrap();
        assert_eq!(
            &bytes[..],
            &[
                consts::IAC,
                consts::SB,
                consts::option::NAWS,
                0x00,
                consts::IAC,
                consts::IAC,
                0x00,
                0x18,
                consts::IAC,
                consts::SE,
            ]
        );
    }
}
