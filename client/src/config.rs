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

//! Client configuration

use std::time::Duration;
use telscript_telnetcodec::TelnetOption;
use telscript_telnetcodec::naws::WindowSize;
use telscript_telnetcodec::negotiation::{NegotiationVerb, TerminalIdentity};

/// How a session reaches the connected state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    /// Wait for the transport while the session is being built
    #[default]
    Eager,
    /// Return immediately and wait on first use
    Lazy,
}

/// Line terminator appended by `write_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFeed {
    /// Bare `"\n"`
    #[default]
    Legacy,
    /// `"\r\n"` as required by RFC 854
    Rfc854,
}

impl LineFeed {
    /// The terminator text.
    pub fn as_str(self) -> &'static str {
        match self {
            LineFeed::Legacy => "\n",
            LineFeed::Rfc854 => "\r\n",
        }
    }
}

/// Terminal-level settings shared by every read on a session
#[derive(Debug, Clone)]
pub struct TerminalSettings {
    /// Terminal type reported for `TERMINAL-TYPE SEND`
    pub terminal_type: String,

    /// Terminal speed reported for `TERMINAL-SPEED SEND`
    pub terminal_speed: String,

    /// Window size pushed after agreeing to NAWS
    pub window_size: WindowSize,

    /// Copy received text to stdout
    pub echo_to_console: bool,

    /// Skip the option negotiation normally sent after connecting
    pub skip_negotiation: bool,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            terminal_type: "vt100".to_string(),
            terminal_speed: "19200,19200".to_string(),
            window_size: WindowSize::default(),
            echo_to_console: false,
            skip_negotiation: false,
        }
    }
}

impl TerminalIdentity for TerminalSettings {
    fn terminal_type(&self) -> &str {
        &self.terminal_type
    }

    fn terminal_speed(&self) -> &str {
        &self.terminal_speed
    }

    fn window_size(&self) -> WindowSize {
        self.window_size
    }
}

/// Telnet session configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Bounded wait for the transport to report a connection
    pub connect_timeout: Duration,

    /// Eager or lazy establishment
    pub connect_mode: ConnectMode,

    /// Terminator used by `write_line`
    pub line_feed: LineFeed,

    /// Read timeout used for each poll of a terminated read
    pub poll_interval: Duration,

    /// Additional negotiations pushed once the session is connected
    pub extra_negotiations: Vec<(NegotiationVerb, TelnetOption)>,

    /// Pause after teardown so background negotiation writes can finish
    pub drain_pause: Duration,

    /// Terminal settings
    pub terminal: TerminalSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            connect_timeout: Duration::from_secs(10),
            connect_mode: ConnectMode::Eager,
            line_feed: LineFeed::Legacy,
            poll_interval: Duration::from_millis(1),
            extra_negotiations: Vec::new(),
            drain_pause: Duration::from_millis(50),
            terminal: TerminalSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration with the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the connection mode
    pub fn with_connect_mode(mut self, mode: ConnectMode) -> Self {
        self.connect_mode = mode;
        self
    }

    /// Set the `write_line` terminator
    pub fn with_line_feed(mut self, line_feed: LineFeed) -> Self {
        self.line_feed = line_feed;
        self
    }

    /// Set the terminated-read poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Queue an extra negotiation to push after connecting
    pub fn with_negotiation(mut self, verb: NegotiationVerb, option: TelnetOption) -> Self {
        self.extra_negotiations.push((verb, option));
        self
    }

    /// Set the post-teardown drain pause
    pub fn with_drain_pause(mut self, pause: Duration) -> Self {
        self.drain_pause = pause;
        self
    }

    /// Set the terminal type
    pub fn with_terminal_type(mut self, terminal_type: impl Into<String>) -> Self {
        self.terminal.terminal_type = terminal_type.into();
        self
    }

    /// Set the terminal speed
    pub fn with_terminal_speed(mut self, terminal_speed: impl Into<String>) -> Self {
        self.terminal.terminal_speed = terminal_speed.into();
        self
    }

    /// Set the terminal size
    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal.window_size = WindowSize::new(width, height);
        self
    }

    /// Enable or disable console echo of received text
    pub fn with_console_echo(mut self, enabled: bool) -> Self {
        self.terminal.echo_to_console = enabled;
        self
    }

    /// Enable or disable the post-connect option negotiation
    pub fn with_skip_negotiation(mut self, skip: bool) -> Self {
        self.terminal.skip_negotiation = skip;
        self
    }

    /// Get the server address as a string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
