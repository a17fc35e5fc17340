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

//! Frame exchange tests over an in-memory duplex stream

use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use telscript_telnetcodec::naws::WindowSize;
use telscript_telnetcodec::negotiation::{NegotiationVerb, TerminalIdentity, reply_to};
use telscript_telnetcodec::{TelnetArgument, TelnetCodec, TelnetFrame, TelnetOption, consts};
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio_util::codec::{Decoder, Framed, FramedWrite};

struct Identity;

impl TerminalIdentity for Identity {
    fn terminal_type(&self) -> &str {
        "xterm"
    }
    fn terminal_speed(&self) -> &str {
        "38400,38400"
    }
    fn window_size(&self) -> WindowSize {
        WindowSize::new(100, 30)
    }
}

#[tokio::test]
async fn framed_stream_carries_negotiation_replies() {
    let (client, server) = duplex(1024);
    let mut writer = FramedWrite::new(client, TelnetCodec::new());
    let mut reader = Framed::new(server, TelnetCodec::new());

    for frame in reply_to(NegotiationVerb::Do, TelnetOption::NAWS, &Identity) {
        writer.send(frame).await.unwrap();
    }

    assert_eq!(
        reader.next().await.unwrap().unwrap(),
        TelnetFrame::Will(TelnetOption::NAWS)
    );
    assert_eq!(
        reader.next().await.unwrap().unwrap(),
        TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(100, 30)))
    );
}

#[tokio::test]
async fn raw_prompt_with_inline_commands_decodes_in_order() {
    let (mut host, client) = duplex(1024);
    host.write_all(b"login\xFF\xFB\x01\xFF\xFA\x18\x01\xFF\xF0:")
        .await
        .unwrap();
    drop(host);

    let mut framed = Framed::new(client, TelnetCodec::new());
    let mut frames = Vec::new();
    while let Some(frame) = framed.next().await {
        frames.push(frame.unwrap());
    }

    let text: Vec<u8> = frames
        .iter()
        .filter_map(|frame| match frame {
            TelnetFrame::Data(byte) => Some(*byte),
            _ => None,
        })
        .collect();
    assert_eq!(text, b"login:");
    assert!(frames.contains(&TelnetFrame::Will(TelnetOption::Echo)));
    assert!(frames.contains(&TelnetFrame::Subnegotiate(TelnetArgument::Send(
        TelnetOption::TTYPE
    ))));
}

#[tokio::test]
async fn encoded_terminal_type_report_reaches_the_wire() {
    let (client, mut host) = duplex(1024);
    let mut writer = FramedWrite::new(client, TelnetCodec::new());
    writer
        .send(TelnetFrame::Subnegotiate(TelnetArgument::is(
            TelnetOption::TTYPE,
            Identity.terminal_type(),
        )))
        .await
        .unwrap();
    drop(writer);

    let mut wire = Vec::new();
    host.read_to_end(&mut wire).await.unwrap();
    assert_eq!(
        wire,
        vec![
            consts::IAC,
            consts::SB,
            consts::option::TTYPE,
            consts::IS,
            b'x',
            b't',
            b'e',
            b'r',
            b'm',
            consts::IAC,
            consts::SE,
        ]
    );
}

#[test]
fn decoder_ignores_unknown_commands() {
    let mut codec = TelnetCodec::new();
    let mut input = BytesMut::from(&[consts::IAC, 0x10, b'a'][..]);
    assert_eq!(
        codec.decode(&mut input).unwrap(),
        Some(TelnetFrame::NoOperation)
    );
    assert_eq!(codec.decode(&mut input).unwrap(), Some(TelnetFrame::Data(b'a')));
}
