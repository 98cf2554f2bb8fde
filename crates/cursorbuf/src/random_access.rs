// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Offset-addressed access.
//!
//! These methods are validated against the allocated capacity only. They may expose bytes that
//! were never written and they never move a cursor or grow the buffer.

use num_traits::{FromBytes, ToBytes};

use crate::{ByteBuf, Error, Result};

impl ByteBuf {
    /// Validates that `len` bytes starting at `offset` lie within the capacity.
    fn check_capacity(&self, offset: usize, len: usize) -> Result<()> {
        let capacity = self.storage()?.len();

        match offset.checked_add(len) {
            Some(end) if end <= capacity => Ok(()),
            _ => Err(Error::capacity_exceeded(offset, len, capacity)),
        }
    }

    /// Copies `dst.len()` bytes starting at `offset` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the range does not lie within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn get_bytes(&self, offset: usize, dst: &mut [u8]) -> Result<()> {
        self.check_capacity(offset, dst.len())?;
        self.storage()?.copy_out(offset, dst);
        Ok(())
    }

    /// Copies `src` into the buffer starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the range does not lie within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn put_bytes(&mut self, offset: usize, src: &[u8]) -> Result<()> {
        self.check_capacity(offset, src.len())?;
        self.storage()?.copy_in(offset, src);
        Ok(())
    }

    /// Returns the byte at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `offset` is not within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn get_byte(&self, offset: usize) -> Result<u8> {
        let mut byte = [0_u8; 1];
        self.get_bytes(offset, &mut byte)?;
        Ok(byte[0])
    }

    /// Stores a byte at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `offset` is not within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn put_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        self.put_bytes(offset, &[value])
    }

    /// Returns the boolean at `offset`. Any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `offset` is not within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn get_bool(&self, offset: usize) -> Result<bool> {
        Ok(self.get_byte(offset)? != 0)
    }

    /// Stores a boolean at `offset` as a single byte, `1` for `true` and `0` for `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `offset` is not within the capacity, or
    /// [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn put_bool(&mut self, offset: usize, value: bool) -> Result<()> {
        self.put_byte(offset, u8::from(value))
    }

    /// Returns the number of type `T` stored in big-endian representation at `offset`.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let buf = ByteBuf::from_slice(&[0x12, 0x34, 0x56, 0x78]);
    ///
    /// assert_eq!(buf.get_num_be::<u16>(1)?, 0x3456);
    /// assert_eq!(buf.get_num_le::<u16>(1)?, 0x5634);
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the bytes of `T` do not lie within the capacity,
    /// or [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn get_num_be<T>(&self, offset: usize) -> Result<T>
    where
        T: FromBytes,
        T::Bytes: Sized + Default,
    {
        let mut bytes = T::Bytes::default();
        self.get_bytes(offset, bytes.as_mut())?;
        Ok(T::from_be_bytes(&bytes))
    }

    /// Returns the number of type `T` stored in little-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the bytes of `T` do not lie within the capacity,
    /// or [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn get_num_le<T>(&self, offset: usize) -> Result<T>
    where
        T: FromBytes,
        T::Bytes: Sized + Default,
    {
        let mut bytes = T::Bytes::default();
        self.get_bytes(offset, bytes.as_mut())?;
        Ok(T::from_le_bytes(&bytes))
    }

    /// Stores a number of type `T` in big-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the bytes of `T` do not lie within the capacity,
    /// or [`Error::IllegalReferenceCount`] if the storage has been released.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn put_num_be<T: ToBytes>(&mut self, offset: usize, value: T) -> Result<()> {
        self.put_bytes(offset, value.to_be_bytes().as_ref())
    }

    /// Stores a number of type `T` in little-endian representation at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the bytes of `T` do not lie within the capacity,
    /// or [`Error::IllegalReferenceCount`] if the storage has been released.
    #[expect(clippy::needless_pass_by_value, reason = "tiny numeric types, fine to always pass by value")]
    pub fn put_num_le<T: ToBytes>(&mut self, offset: usize, value: T) -> Result<()> {
        self.put_bytes(offset, value.to_le_bytes().as_ref())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::*;
    use crate::ErrorKind;

    fn small() -> ByteBuf {
        ByteBuf::with_growth_unit(NonZero::new(8).unwrap())
    }

    #[test]
    fn put_does_not_move_cursors() {
        let mut buf = small();

        buf.put_num_be(2, 0x0102_0304_u32).unwrap();

        assert_eq!(buf.writer_index(), 0);
        assert_eq!(buf.reader_index(), 0);
        assert_eq!(buf.get_bytes_vec(0, 6), vec![0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn big_endian_layout() {
        let mut buf = small();
        buf.put_num_be(0, 0x1234_u16).unwrap();
        buf.put_num_be(2, -2_i32).unwrap();

        assert_eq!(buf.get_bytes_vec(0, 6), vec![0x12, 0x34, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(buf.get_num_be::<u16>(0).unwrap(), 0x1234);
        assert_eq!(buf.get_num_be::<i32>(2).unwrap(), -2);
    }

    #[test]
    fn little_endian_layout() {
        let mut buf = small();
        buf.put_num_le(0, 0x1234_u16).unwrap();
        buf.put_num_le(2, 0xDEAD_BEEF_u32).unwrap();

        assert_eq!(buf.get_bytes_vec(0, 6), vec![0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(buf.get_num_le::<u32>(2).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn floats_in_both_orders() {
        let mut buf = ByteBuf::new();
        buf.put_num_be(0, 1.5_f32).unwrap();
        buf.put_num_le(4, -2.25_f64).unwrap();

        assert_eq!(buf.get_bytes_vec(0, 4), 1.5_f32.to_be_bytes().to_vec());
        assert_eq!(buf.get_num_be::<f32>(0).unwrap(), 1.5);
        assert_eq!(buf.get_num_le::<f64>(4).unwrap(), -2.25);
    }

    #[test]
    fn bounds_are_capacity_not_writer_index() {
        let mut buf = small();

        // Nothing written, yet the whole capacity is addressable.
        assert_eq!(buf.get_num_be::<u64>(0).unwrap(), 0);
        buf.put_byte(7, 1).unwrap();

        let e = buf.get_num_be::<u16>(7).unwrap_err();
        assert_eq!(e, Error::CapacityExceeded { offset: 7, len: 2, limit: 8 });

        assert_eq!(buf.put_byte(8, 1).unwrap_err().kind(), ErrorKind::CapacityExceeded);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn offset_overflow_is_rejected() {
        let buf = small();
        assert_eq!(buf.get_num_be::<u32>(usize::MAX).unwrap_err().kind(), ErrorKind::CapacityExceeded);
    }

    #[test]
    fn booleans() {
        let mut buf = small();
        buf.put_bool(0, true).unwrap();
        buf.put_bool(1, false).unwrap();
        buf.put_byte(2, 0x80).unwrap();

        assert_eq!(buf.get_byte(0).unwrap(), 1);
        assert!(buf.get_bool(0).unwrap());
        assert!(!buf.get_bool(1).unwrap());
        assert!(buf.get_bool(2).unwrap());
    }

    impl ByteBuf {
        fn get_bytes_vec(&self, offset: usize, len: usize) -> Vec<u8> {
            let mut v = vec![0; len];
            self.get_bytes(offset, &mut v).unwrap();
            v
        }
    }
}
