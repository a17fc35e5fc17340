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

//! Negotiate About Window Size
//!

use crate::{CodecError, CodecResult, consts};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Window dimensions reported through the NAWS option (RFC 1073).
///
/// # Format
/// The window size is encoded as four bytes in big-endian format:
/// - 2 bytes for columns (width)
/// - 2 bytes for rows (height)
///
/// # Example
/// ```
/// use telscript_telnetcodec::naws::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.cols, 80);
/// assert_eq!(size.rows, 24);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// The number of columns (characters) in the terminal window
    pub cols: u16,
    /// The number of rows (lines) in the terminal window
    pub rows: u16,
}

impl WindowSize {
    /// Creates a new `WindowSize` with the specified columns and rows.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Unescaped payload length, always 4.
    pub fn len(&self) -> usize {
        4
    }

    /// Encodes the window size into a byte buffer.
    ///
    /// The bytes are written unescaped; IAC doubling is applied when the
    /// payload is framed by [`crate::TelnetCodec`].
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the columns followed by the rows as big-endian `u16` values.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes a `WindowSize` from an unescaped NAWS payload.
    ///
    /// # Errors
    /// Returns [`CodecError::InsufficientData`] if fewer than 4 bytes are
    /// available in the buffer.
    ///
    /// # Example
    /// ```
    /// use bytes::BytesMut;
    /// use telscript_telnetcodec::naws::WindowSize;
    ///
    /// let mut buf = BytesMut::from(&[0x00, 0x50, 0x00, 0x18][..]);
    /// let size = WindowSize::decode(&mut buf).unwrap();
    /// assert_eq!(size, WindowSize::new(80, 24));
    /// ```
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        // NAWS format: WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW
        if src.remaining() >= 4 {
            Ok(WindowSize {
                cols: src.get_u16(),
                rows: src.get_u16(),
            })
        } else {
            Err(CodecError::InsufficientData {
                option: consts::option::NAWS,
                required: 4,
                available: src.remaining(),
            })
        }
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    /// Formats as `(cols,rows)`, for example `(80,24)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}
