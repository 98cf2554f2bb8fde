// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cursor-addressed access.
//!
//! Reads consume bytes at the reader index and are validated against the writer index.
//! Writes append at the writer index and grow the buffer as needed.

use num_traits::{FromBytes, ToBytes};

use crate::{ByteBuf, Error, Result};

impl ByteBuf {
    /// Validates that `len` unread bytes remain and returns the reader index they start at.
    fn check_readable(&self, len: usize) -> Result<usize> {
        self.storage()?;

        let offset = self.reader_index;
        match offset.checked_add(len) {
            Some(end) if end <= self.writer_index => Ok(offset),
            _ => Err(Error::capacity_exceeded(offset, len, self.writer_index)),
        }
    }

    /// Grows the buffer to fit `len` more bytes and returns the writer index they start at.
    fn reserve_writable(&mut self, len: usize) -> Result<usize> {
        let offset = self.writer_index;
        let end = offset
            .checked_add(len)
            .ok_or_else(|| Error::capacity_exceeded(offset, len, usize::MAX))?;

        self.ensure_capacity(end)?;
        Ok(offset)
    }

    /// Fills `dst` with unread bytes and advances the reader index past them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if fewer than `dst.len()` unread bytes remain, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let offset = self.check_readable(dst.len())?;
        self.get_bytes(offset, dst)?;
        self.reader_index = offset + dst.len();
        Ok(())
    }

    /// Reads `len` unread bytes into a new vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if fewer than `len` unread bytes remain, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check_readable(len)?;

        let mut bytes = vec![0; len];
        self.read_bytes(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads `len` unread bytes and decodes them as UTF-8.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`. A zero length yields an empty string
    /// without touching the buffer.
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let mut buf = ByteBuf::from_slice(b"key=value");
    ///
    /// assert_eq!(buf.read_string(3)?, "key");
    /// buf.skip(1);
    /// assert_eq!(buf.read_string(5)?, "value");
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if fewer than `len` unread bytes remain, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        if len == 0 {
            return Ok(String::new());
        }

        self.read_vec(len).map(decode_lossy)
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if no unread byte remains, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_byte(&mut self) -> Result<u8> {
        let offset = self.check_readable(1)?;
        let value = self.get_byte(offset)?;
        self.reader_index = offset + 1;
        Ok(value)
    }

    /// Reads a one-byte boolean. Any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if no unread byte remains, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_byte()? != 0)
    }

    /// Reads a number of type `T` in big-endian representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if fewer unread bytes remain than `T` needs, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_num_be<T>(&mut self) -> Result<T>
    where
        T: FromBytes,
        T::Bytes: Sized + Default,
    {
        let offset = self.check_readable(size_of::<T>())?;
        let value = self.get_num_be(offset)?;
        self.reader_index = offset + size_of::<T>();
        Ok(value)
    }

    /// Reads a number of type `T` in little-endian representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if fewer unread bytes remain than `T` needs, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn read_num_le<T>(&mut self) -> Result<T>
    where
        T: FromBytes,
        T::Bytes: Sized + Default,
    {
        let offset = self.check_readable(size_of::<T>())?;
        let value = self.get_num_le(offset)?;
        self.reader_index = offset + size_of::<T>();
        Ok(value)
    }

    /// Appends a slice of bytes, growing the buffer if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        let offset = self.reserve_writable(src.len())?;
        self.put_bytes(offset, src)?;
        self.writer_index = offset + src.len();
        Ok(())
    }

    /// Appends one byte, growing the buffer if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Appends a boolean as one byte, `1` for `true` and `0` for `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_byte(u8::from(value))
    }

    /// Appends a number of type `T` in big-endian representation, growing the buffer if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn write_num_be<T: ToBytes>(&mut self, value: T) -> Result<()> {
        self.write_bytes(value.to_be_bytes().as_ref())
    }

    /// Appends a number of type `T` in little-endian representation, growing the buffer if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn write_num_le<T: ToBytes>(&mut self, value: T) -> Result<()> {
        self.write_bytes(value.to_le_bytes().as_ref())
    }
}

pub(crate) fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
