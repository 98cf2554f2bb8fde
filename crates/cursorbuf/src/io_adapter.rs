// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;

use crate::{ByteBuf, Result};

impl ByteBuf {
    /// Appends all of `src`, growing the buffer as needed, and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`][crate::Error::IllegalReferenceCount] if the storage
    /// has been released.
    pub fn write(&mut self, src: &[u8]) -> Result<usize> {
        self.write_bytes(src)?;
        Ok(src.len())
    }

    /// Moves up to `dst.len()` unread bytes into `dst`.
    ///
    /// Returns the number of bytes moved, or `None` if every written byte has already been read.
    /// An empty `dst` on a buffer with unread bytes returns `Some(0)`.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let mut buf = ByteBuf::from_slice(b"abc");
    /// let mut chunk = [0_u8; 2];
    ///
    /// assert_eq!(buf.read(&mut chunk)?, Some(2));
    /// assert_eq!(buf.read(&mut chunk)?, Some(1));
    /// assert_eq!(buf.read(&mut chunk)?, None);
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`][crate::Error::IllegalReferenceCount] if the storage
    /// has been released, or [`Error::CapacityExceeded`][crate::Error::CapacityExceeded] if the
    /// writer index was moved past the capacity.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<Option<usize>> {
        self.storage()?;

        if !self.readable() {
            return Ok(None);
        }

        let count = dst.len().min(self.readable_bytes());
        self.read_bytes(&mut dst[..count])?;
        Ok(Some(count))
    }

    /// Appends the unread bytes of `src`, consuming them from `src`.
    ///
    /// Returns the number of bytes transferred. `src` may share storage with `self`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`][crate::Error::IllegalReferenceCount] if either
    /// buffer's storage has been released.
    pub fn write_buf(&mut self, src: &mut Self) -> Result<usize> {
        // Staged through a temporary so that aliased storage is never borrowed twice.
        let bytes = src.read_vec(src.readable_bytes())?;
        self.write(&bytes)
    }

    /// Creates a new buffer holding the unread bytes of `first` followed by those of `second`.
    ///
    /// Both inputs are consumed in the process: their reader indexes end up at their writer
    /// indexes. The result uses the growth unit of `first`.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let mut a = ByteBuf::from_slice(&[1, 2, 3]);
    /// let mut b = ByteBuf::from_slice(&[4, 5]);
    ///
    /// let joined = ByteBuf::concat(&mut a, &mut b)?;
    ///
    /// assert_eq!(joined.available_bytes()?, vec![1, 2, 3, 4, 5]);
    /// assert!(!b.readable());
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`][crate::Error::IllegalReferenceCount] if either
    /// buffer's storage has been released.
    pub fn concat(first: &mut Self, second: &mut Self) -> Result<Self> {
        let mut joined = Self::with_options(first.options);
        joined.write_buf(first)?;
        joined.write_buf(second)?;
        Ok(joined)
    }

    /// Returns an adapter that implements [`io::Read`] by consuming unread bytes.
    ///
    /// The adapter reports end of data as `Ok(0)`, as `std::io` expects.
    pub fn as_read(&mut self) -> ByteBufReader<'_> {
        ByteBufReader { inner: self }
    }

    /// Returns an adapter that implements [`io::Write`] by appending at the writer index.
    pub fn as_write(&mut self) -> ByteBufWriter<'_> {
        ByteBufWriter { inner: self }
    }
}

/// Adapter that implements [`io::Read`] for [`ByteBuf`].
///
/// Create an instance via [`ByteBuf::as_read()`].
#[derive(Debug)]
pub struct ByteBufReader<'b> {
    inner: &'b mut ByteBuf,
}

impl io::Read for ByteBufReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.inner.read(buf)?.unwrap_or(0))
    }
}

/// Adapter that implements [`io::Write`] for [`ByteBuf`].
///
/// Create an instance via [`ByteBuf::as_write()`].
#[derive(Debug)]
pub struct ByteBufWriter<'b> {
    inner: &'b mut ByteBuf,
}

impl io::Write for ByteBufWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::num::NonZero;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn write_reports_count() {
        let mut buf = ByteBuf::with_growth_unit(NonZero::new(4).unwrap());

        assert_eq!(buf.write(&[1, 2, 3, 4, 5, 6]).unwrap(), 6);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.writer_index(), 6);
    }

    #[test]
    fn read_distinguishes_exhausted_from_empty_request() {
        let mut buf = ByteBuf::from_slice(&[1]);

        assert_eq!(buf.read(&mut []).unwrap(), Some(0));

        let mut dst = [0_u8; 4];
        assert_eq!(buf.read(&mut dst).unwrap(), Some(1));
        assert_eq!(dst[0], 1);

        assert_eq!(buf.read(&mut dst).unwrap(), None);
        assert_eq!(buf.read(&mut []).unwrap(), None);
    }

    #[test]
    fn read_on_released_buffer_fails() {
        let mut buf = ByteBuf::from_slice(&[1]);
        buf.force_release();

        assert_eq!(buf.read(&mut [0; 1]).unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
    }

    #[test]
    fn concat_reads_both_in_order() {
        let mut a = ByteBuf::from_slice(&[0, 1, 2, 3]);
        a.skip(1);
        let mut b = ByteBuf::from_slice(&[4, 5]);

        let mut joined = ByteBuf::concat(&mut a, &mut b).unwrap();

        assert_eq!(joined.read_vec(5).unwrap(), vec![1, 2, 3, 4, 5]);
        assert!(!joined.readable());

        // Consuming the operands is observable.
        assert_eq!(a.reader_index(), 4);
        assert_eq!(b.reader_index(), 2);
    }

    #[test]
    fn write_buf_between_aliased_buffers() {
        let mut a = ByteBuf::from_slice(&[1, 2]);
        let mut alias = a.shallow_copy().unwrap();

        assert_eq!(a.write_buf(&mut alias).unwrap(), 2);

        assert_eq!(a.available_bytes().unwrap(), vec![1, 2, 1, 2]);
        assert!(!alias.readable());
    }

    #[test]
    fn std_io_adapters() {
        let mut buf = ByteBuf::new();
        write!(buf.as_write(), "{}-{}", 12, 34).unwrap();

        let mut text = String::new();
        buf.as_read().read_to_string(&mut text).unwrap();

        assert_eq!(text, "12-34");
        assert_eq!(buf.as_read().read(&mut [0; 8]).unwrap(), 0);
    }

    #[test]
    fn std_io_adapter_maps_errors() {
        let mut buf = ByteBuf::new();
        buf.dispose();

        let e = buf.as_write().write(&[1]).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
    }
}
