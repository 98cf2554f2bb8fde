// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Length-prefixed strings and byte blocks.

use crate::sequential::decode_lossy;
use crate::{ByteBuf, Error, Result};

/// Width and byte order of the length field that precedes a string or byte block.
///
/// The same prefix must be used to read a value as was used to write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthPrefix {
    /// One byte, lengths up to 255.
    U8,
    /// Two bytes, big-endian, lengths up to 65 535.
    U16Be,
    /// Two bytes, little-endian, lengths up to 65 535.
    U16Le,
    /// Four bytes, big-endian, lengths up to 4 294 967 295.
    U32Be,
    /// Four bytes, little-endian, lengths up to 4 294 967 295.
    U32Le,
}

impl LengthPrefix {
    /// Number of bytes the length field occupies.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16Be | Self::U16Le => 2,
            Self::U32Be | Self::U32Le => 4,
        }
    }

    /// Largest payload length the field can represent.
    #[must_use]
    pub const fn max_len(self) -> u64 {
        match self {
            Self::U8 => u8::MAX as u64,
            Self::U16Be | Self::U16Le => u16::MAX as u64,
            Self::U32Be | Self::U32Le => u32::MAX as u64,
        }
    }

    fn check(self, len: usize) -> Result<()> {
        let max = self.max_len();

        match u64::try_from(len) {
            Ok(len64) if len64 <= max => Ok(()),
            _ => Err(Error::OutOfMaxValue { len, max }),
        }
    }
}

impl ByteBuf {
    /// Writes the length of `payload` as a `prefix` field followed by the payload itself.
    ///
    /// Nothing is written if the length does not fit the prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMaxValue`] if the payload is longer than the prefix can represent,
    /// or [`Error::IllegalReferenceCount`] if the storage has been released.
    #[expect(clippy::cast_possible_truncation, reason = "length validated against the prefix range first")]
    pub fn write_bytes_with(&mut self, prefix: LengthPrefix, payload: &[u8]) -> Result<()> {
        prefix.check(payload.len())?;

        // Grow once up front so that the length and payload land together or not at all.
        self.ensure_capacity(self.writer_index.saturating_add(prefix.width() + payload.len()))?;

        let len = payload.len();
        match prefix {
            LengthPrefix::U8 => self.write_byte(len as u8)?,
            LengthPrefix::U16Be => self.write_num_be(len as u16)?,
            LengthPrefix::U16Le => self.write_num_le(len as u16)?,
            LengthPrefix::U32Be => self.write_num_be(len as u32)?,
            LengthPrefix::U32Le => self.write_num_le(len as u32)?,
        }

        self.write_bytes(payload)
    }

    /// Writes `value` as UTF-8, preceded by its byte length as a `prefix` field.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::{ByteBuf, LengthPrefix};
    ///
    /// let mut buf = ByteBuf::new();
    /// buf.write_string_with(LengthPrefix::U16Be, "héllo")?;
    ///
    /// assert_eq!(buf.available_bytes()?, b"\x00\x06h\xC3\xA9llo");
    /// assert_eq!(buf.read_string_with(LengthPrefix::U16Be)?, "héllo");
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMaxValue`] if the encoded string is longer than the prefix can
    /// represent, or [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn write_string_with(&mut self, prefix: LengthPrefix, value: &str) -> Result<()> {
        self.write_bytes_with(prefix, value.as_bytes())
    }

    /// Reads a `prefix` length field and then that many bytes.
    ///
    /// A zero length yields an empty vector. If the payload is incomplete the reader index is
    /// restored to where it was before the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the length field or the payload runs past the
    /// writer index, or [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_bytes_with(&mut self, prefix: LengthPrefix) -> Result<Vec<u8>> {
        let start = self.reader_index;

        let len = match prefix {
            LengthPrefix::U8 => usize::from(self.read_byte()?),
            LengthPrefix::U16Be => usize::from(self.read_num_be::<u16>()?),
            LengthPrefix::U16Le => usize::from(self.read_num_le::<u16>()?),
            LengthPrefix::U32Be => to_usize(self.read_num_be::<u32>()?),
            LengthPrefix::U32Le => to_usize(self.read_num_le::<u32>()?),
        };

        if len == 0 {
            return Ok(Vec::new());
        }

        self.read_vec(len).inspect_err(|_| self.reader_index = start)
    }

    /// Reads a `prefix` length field and then that many bytes, decoded as UTF-8.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`. A zero length yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the length field or the payload runs past the
    /// writer index, or [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_string_with(&mut self, prefix: LengthPrefix) -> Result<String> {
        self.read_bytes_with(prefix).map(decode_lossy)
    }
}

fn to_usize(len: u32) -> usize {
    // Lengths beyond the address space can never be satisfied by the writer index anyway.
    usize::try_from(len).unwrap_or(usize::MAX)
}
