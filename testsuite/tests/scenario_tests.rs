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

//! End-to-end scenarios against the scripted fixture host

use std::sync::Arc;
use std::time::{Duration, Instant};
use telscript_client::naws::WindowSize;
use telscript_client::{
    BlockingSession, CancellationToken, MemoryTransport, TelnetFrame, TelnetOption, TelnetSession,
};
use telscript_telnetcodec::TelnetArgument;
use telscript_testsuite::{FixtureHost, Step};
use tokio::net::TcpListener;
use tracing_test::traced_test;

async fn connect(host: &FixtureHost) -> TelnetSession {
    TelnetSession::connect(host.config(), &CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_prompt_read_ends_with_terminator() {
    let host = FixtureHost::start(vec![Step::send("Account:"), Step::Hold])
        .await
        .unwrap();
    let session = connect(&host).await;

    let text = session.terminated_read(":", Duration::from_millis(500)).await;
    assert!(text.ends_with(':'), "{text:?}");
    assert_eq!(text, "Account:");

    session.shutdown().await;
    host.stop().await;
}

#[tokio::test]
async fn test_login_then_command() {
    let host = FixtureHost::start(vec![
        Step::send("\r\nUser Access Verification\r\n\r\nUsername:"),
        Step::ExpectLine,
        Step::send("Password:"),
        Step::ExpectLine,
        Step::send("\r\nrouter>"),
        Step::ExpectLine,
        Step::send("\r\nInput packets: 1024\r\nOutput packets: 512\r\nrouter>"),
        Step::Hold,
    ])
    .await
    .unwrap();
    let session = connect(&host).await;

    assert!(session.try_login("user", "pass", Duration::from_millis(5000)).await);
    assert!(session.write_line("show stats").await);
    let text = session.terminated_read(">", Duration::from_millis(1000)).await;

    assert!(text.contains('>'), "{text:?}");
    assert!(text.contains("Input packets: 1024"), "{text:?}");
    assert_eq!(host.received_lines(), vec!["user", "pass", "show stats"]);

    session.shutdown().await;
    host.stop().await;
}

#[tokio::test]
#[traced_test]
async fn test_silent_host_times_out() {
    let host = FixtureHost::start(vec![Step::send("banner\r\n"), Step::Hold])
        .await
        .unwrap();
    let session = connect(&host).await;

    let started = Instant::now();
    let text = session.terminated_read("X", Duration::from_millis(200)).await;
    let elapsed = started.elapsed();

    assert!(!text.contains('X'));
    assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1000), "{elapsed:?}");
    assert!(logs_contain("Terminator not found"));

    session.shutdown().await;
    host.stop().await;
}

#[tokio::test]
async fn test_concurrent_writers_never_interleave() {
    let transport = Arc::new(MemoryTransport::new().with_write_delay(Duration::from_micros(200)));
    let config = telscript_client::ClientConfig::new("memory", 23).with_skip_negotiation(true);
    let session = Arc::new(
        TelnetSession::with_transport(transport.clone(), config, &CancellationToken::new())
            .await
            .unwrap(),
    );

    let writers: Vec<_> = (0..8u8)
        .map(|index| {
            let session = session.clone();
            tokio::spawn(async move {
                let command = char::from(b'a' + index).to_string().repeat(16);
                session.write_line(&command).await
            })
        })
        .collect();
    for writer in writers {
        assert!(writer.await.unwrap());
    }

    let records = transport.writes();
    assert_eq!(records.len(), 8);
    assert_eq!(transport.written(), records.concat());
    for record in records {
        let line = String::from_utf8(record).unwrap();
        let first = line.chars().next().unwrap();
        assert!(line.trim_end().chars().all(|ch| ch == first), "{line:?}");
    }
}

#[tokio::test]
async fn test_negotiation_probe() {
    let host = FixtureHost::start(vec![
        Step::Frame(TelnetFrame::Do(TelnetOption::TTYPE)),
        Step::Frame(TelnetFrame::Subnegotiate(TelnetArgument::Send(TelnetOption::TTYPE))),
        Step::Frame(TelnetFrame::Do(TelnetOption::NAWS)),
        Step::Frame(TelnetFrame::Will(TelnetOption::Echo)),
        Step::Frame(TelnetFrame::Dont(TelnetOption::Linemode)),
        Step::send("ready"),
        Step::Hold,
    ])
    .await
    .unwrap();
    let config = host.config().with_terminal_size(132, 50);
    let session = TelnetSession::connect(config, &CancellationToken::new())
        .await
        .unwrap();

    let text = session.terminated_read("ready", Duration::from_millis(1000)).await;
    assert_eq!(text, "ready");

    let wait = Duration::from_millis(1000);
    for expected in [
        TelnetFrame::Do(TelnetOption::SuppressGoAhead),
        TelnetFrame::Will(TelnetOption::TTYPE),
        TelnetFrame::Subnegotiate(TelnetArgument::is(TelnetOption::TTYPE, "vt100")),
        TelnetFrame::Will(TelnetOption::NAWS),
        TelnetFrame::Subnegotiate(TelnetArgument::NAWSWindowSize(WindowSize::new(132, 50))),
        TelnetFrame::Dont(TelnetOption::Echo),
    ] {
        assert!(host.wait_for_frame(&expected, wait).await, "missing {expected}");
    }
    assert!(
        !host
            .received_frames()
            .iter()
            .any(|frame| frame.option() == Some(TelnetOption::Linemode))
    );

    session.shutdown().await;
    host.stop().await;
}

#[tokio::test]
async fn test_remote_interrupt_cancels_session() {
    let host = FixtureHost::start(vec![
        Step::send("working"),
        Step::Frame(TelnetFrame::InterruptProcess),
        Step::Hold,
    ])
    .await
    .unwrap();
    let session = connect(&host).await;

    let started = Instant::now();
    let text = session.terminated_read(">", Duration::from_secs(5)).await;
    assert_eq!(text, "working");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(session.scope().is_cancelled());
    assert!(!session.write_line("ignored").await);

    session.shutdown().await;
    host.stop().await;
}

#[tokio::test]
async fn test_unreachable_host_fails_to_connect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = telscript_client::ClientConfig::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_millis(200));
    let error = TelnetSession::connect(config, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(error.is_connection_timeout());
}

#[tokio::test]
async fn test_host_disconnect_drains_then_disconnects() {
    let host = FixtureHost::start(vec![Step::send("goodbye\r\n")]).await.unwrap();
    let config = host.config().with_skip_negotiation(true);
    let session = TelnetSession::connect(config, &CancellationToken::new())
        .await
        .unwrap();

    let text = session.terminated_read("\n", Duration::from_millis(1000)).await;
    assert_eq!(text, "goodbye\r\n");

    let started = Instant::now();
    while session.is_connected() && started.elapsed() < Duration::from_secs(2) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(!session.is_connected());
    assert!(!session.write("anyone?").await);
    host.stop().await;
}

#[test]
fn test_blocking_session_logs_in() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let host = runtime
        .block_on(FixtureHost::start(vec![
            Step::send("login:"),
            Step::ExpectLine,
            Step::send("password:"),
            Step::ExpectLine,
            Step::send("\r\nswitch>"),
            Step::Hold,
        ]))
        .unwrap();

    let session = BlockingSession::connect(host.config(), &CancellationToken::new()).unwrap();
    assert!(session.try_login("ops", "secret", Duration::from_secs(2)));
    session.shutdown();

    assert_eq!(host.received_lines(), vec!["ops", "secret"]);
    drop(host);
}
