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

//! # Scripted Login Example
//!
//! Logs in to a Telnet host, runs one command and prints its output.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example scripted_login -- 192.168.1.1 23 admin secret "show version"
//! ```

use std::time::Duration;
use telscript_client::{CancellationToken, ClientConfig, LineFeed, TelnetSession};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "localhost".to_string());
    let port = args.next().map(|port| port.parse()).transpose()?.unwrap_or(23);
    let username = args.next().unwrap_or_else(|| "admin".to_string());
    let password = args.next().unwrap_or_default();
    let command = args.next().unwrap_or_else(|| "help".to_string());

    let config = ClientConfig::new(host, port)
        .with_connect_timeout(Duration::from_secs(5))
        .with_line_feed(LineFeed::Rfc854);

    // Ctrl-C cancels whatever the session is waiting on
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    let session = TelnetSession::connect(config, &shutdown).await?;
    info!(address = session.address(), "Connected");

    if !session
        .try_login(&username, &password, Duration::from_secs(10))
        .await
    {
        error!("Login rejected or prompt not recognised");
        session.shutdown().await;
        return Ok(());
    }

    session.write_line(&command).await;
    let output = session.terminated_read(">", Duration::from_secs(5)).await;
    println!("{output}");

    session.write_line("exit").await;
    session.shutdown().await;
    Ok(())
}
