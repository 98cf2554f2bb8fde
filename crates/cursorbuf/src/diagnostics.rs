// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Human-readable renderings of the available bytes `[0, writer_index)`.
//!
//! These look at everything written so far, including bytes that have already been read.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{ByteBuf, Result};

/// Number of byte values per row in [`ByteBuf::pretty_print()`].
pub const PRETTY_PRINT_ROW_LEN: usize = 14;

impl ByteBuf {
    /// Renders the available bytes as uppercase hexadecimal, two digits per byte.
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let mut buf = ByteBuf::from_slice(&[0x0A, 0xBC, 0xFF]);
    /// buf.skip(3);
    ///
    /// assert_eq!(buf.hex_string()?, "0ABCFF");
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`available_bytes()`][Self::available_bytes].
    pub fn hex_string(&self) -> Result<String> {
        Ok(hex::encode_upper(self.available_bytes()?))
    }

    /// Renders the available bytes as standard padded base64.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`available_bytes()`][Self::available_bytes].
    pub fn base64_string(&self) -> Result<String> {
        Ok(STANDARD.encode(self.available_bytes()?))
    }

    /// Renders the available bytes as decimal values separated by spaces, a fixed number per
    /// row. Every row, including the last, ends with a newline.
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let buf = ByteBuf::from_slice(&[1, 20, 255]);
    ///
    /// assert_eq!(buf.pretty_print()?, "1 20 255 \n");
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`available_bytes()`][Self::available_bytes].
    pub fn pretty_print(&self) -> Result<String> {
        let bytes = self.available_bytes()?;

        let mut out = String::with_capacity(bytes.len() * 4);
        for row in bytes.chunks(PRETTY_PRINT_ROW_LEN) {
            for byte in row {
                out.push_str(&byte.to_string());
                out.push(' ');
            }
            out.push('\n');
        }

        Ok(out)
    }

    /// Renders the available bytes as decimal values with no separator in between.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`available_bytes()`][Self::available_bytes].
    pub fn decimal_string(&self) -> Result<String> {
        Ok(self.available_bytes()?.iter().map(u8::to_string).collect())
    }

    /// Iterates over a snapshot of the available bytes.
    ///
    /// Later changes to the buffer are not reflected in an iterator that already exists.
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let buf = ByteBuf::from_slice(&[1, 2, 3]);
    ///
    /// assert_eq!(buf.available_iter()?.sum::<u8>(), 6);
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`available_bytes()`][Self::available_bytes].
    pub fn available_iter(&self) -> Result<std::vec::IntoIter<u8>> {
        Ok(self.available_bytes()?.into_iter())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn hex_covers_available_not_readable() {
        let mut buf = ByteBuf::from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        buf.skip(2);

        assert_eq!(buf.hex_string().unwrap(), "DEADBEEF");
    }

    #[test]
    fn base64_of_available() {
        let buf = ByteBuf::from_slice(b"hello");
        assert_eq!(buf.base64_string().unwrap(), "aGVsbG8=");

        assert_eq!(ByteBuf::new().base64_string().unwrap(), "");
    }

    #[test]
    fn pretty_print_rows() {
        let buf = ByteBuf::from_slice(&(0..16).collect::<Vec<u8>>());

        assert_eq!(buf.pretty_print().unwrap(), "0 1 2 3 4 5 6 7 8 9 10 11 12 13 \n14 15 \n");
        assert_eq!(ByteBuf::new().pretty_print().unwrap(), "");
    }

    #[test]
    fn decimal_string_concatenates_values() {
        let mut buf = ByteBuf::from_slice(&[1, 23, 255, 0]);
        buf.skip(4);

        assert_eq!(buf.decimal_string().unwrap(), "1232550");
        assert_eq!(ByteBuf::new().decimal_string().unwrap(), "");
    }

    #[test]
    fn available_iter_is_a_snapshot_of_written_bytes() {
        let mut buf = ByteBuf::from_slice(&[4, 5, 6]);
        buf.skip(1);

        let iter = buf.available_iter().unwrap();
        buf.write_byte(7).unwrap();

        assert_eq!(iter.collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!(buf.available_iter().unwrap().len(), 4);
    }

    #[test]
    fn released_buffer_has_no_diagnostics() {
        let mut buf = ByteBuf::from_slice(&[1]);
        buf.dispose();

        assert_eq!(buf.hex_string().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
        assert_eq!(buf.pretty_print().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
        assert_eq!(buf.decimal_string().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
        assert_eq!(buf.available_iter().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
    }
}
