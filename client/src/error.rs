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

//! Client error types

use std::io;
use std::time::Duration;

/// Client error type
///
/// Only session establishment surfaces an error from the operation surface;
/// reads, writes and logins degrade to partial results instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The transport never reported a connection within the bounded wait
    #[error("Unable to connect to the host. ({address} did not connect within {timeout:?})")]
    ConnectionTimeout {
        /// Address that was being connected to
        address: String,
        /// How long the session waited
        timeout: Duration,
    },

    /// I/O error from the transport
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A pattern terminator failed to compile
    #[error("Invalid terminator pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl ClientError {
    /// Whether this is the connection-establishment failure.
    pub fn is_connection_timeout(&self) -> bool {
        matches!(self, ClientError::ConnectionTimeout { .. })
    }
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_timeout_message_is_fixed() {
        let err = ClientError::ConnectionTimeout {
            address: "10.0.0.1:23".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert!(err.is_connection_timeout());
        assert_eq!(
            err.to_string(),
            "Unable to connect to the host. (10.0.0.1:23 did not connect within 250ms)"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: ClientError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(!err.is_connection_timeout());
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
