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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while framing or parsing Telnet protocol bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    #[error("I/O error during {operation}: {kind:?}")]
    IOError {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },

    /// A subnegotiation payload was shorter than its option requires.
    #[error("insufficient data for option {option} (required: {required}, available: {available})")]
    InsufficientData {
        /// The option being subnegotiated
        option: u8,
        /// Number of bytes required
        required: usize,
        /// Number of bytes available
        available: usize,
    },

    /// A subnegotiation payload carried a qualifier other than `IS` or `SEND`.
    #[error("invalid subnegotiation qualifier 0x{qualifier:02X} for option {option}")]
    InvalidQualifier {
        /// The option being subnegotiated
        option: u8,
        /// The unexpected qualifier byte
        qualifier: u8,
    },
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IOError {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}
