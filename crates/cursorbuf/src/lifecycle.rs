// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cooperative reference counting.

use std::ops::{Deref, DerefMut};

use tracing::{Level, event};

use crate::{ByteBuf, Error, Result};

impl ByteBuf {
    /// Current value of the reference count.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }

    /// Whether the reference count is above zero.
    #[must_use]
    pub fn accessible(&self) -> bool {
        self.ref_count > 0
    }

    /// Increments the reference count.
    pub fn retain(&mut self) {
        self.ref_count = self.ref_count.saturating_add(1);
    }

    /// Decrements the reference count, discarding the storage once it reaches zero.
    ///
    /// Releasing a buffer whose count is already zero also discards the storage.
    pub fn release(&mut self) {
        self.ref_count = self.ref_count.saturating_sub(1);

        if self.ref_count == 0 {
            self.force_release();
        }
    }

    /// Like [`release()`][Self::release] but does nothing if the storage is already gone.
    pub fn release_safe(&mut self) {
        if self.storage.is_none() {
            return;
        }

        self.release();
    }

    /// Discards the storage and pins the reference count at zero, whatever its current value.
    pub fn force_release(&mut self) {
        self.ref_count = 0;

        if let Some(storage) = self.storage.take() {
            event!(Level::TRACE, message = "buffer released", capacity = storage.len());
        }
    }

    /// Terminal cleanup: force-releases the buffer regardless of the reference count.
    ///
    /// Dropping a buffer frees its storage as well; this is for owners that keep the buffer
    /// object around but must guarantee its memory is gone.
    pub fn dispose(&mut self) {
        event!(Level::DEBUG, message = "buffer disposed", ref_count = self.ref_count);
        self.force_release();
    }

    /// Checks that the reference count is above zero.
    ///
    /// Read and write operations do not perform this check on their own; call this before
    /// using a buffer received from a pool or another component that follows the
    /// retain/release protocol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the reference count is zero.
    pub fn ensure_accessible(&self) -> Result<&Self> {
        if self.accessible() {
            Ok(self)
        } else {
            Err(Error::IllegalReferenceCount {
                ref_count: self.ref_count,
            })
        }
    }

    /// Mutable counterpart of [`ensure_accessible()`][Self::ensure_accessible].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the reference count is zero.
    pub fn ensure_accessible_mut(&mut self) -> Result<&mut Self> {
        if self.accessible() {
            Ok(self)
        } else {
            Err(Error::IllegalReferenceCount {
                ref_count: self.ref_count,
            })
        }
    }

    /// Retains the buffer for the lifetime of the returned guard.
    ///
    /// The guard releases the buffer when dropped, on every exit path. If this was the last
    /// reference, the storage is discarded at that point.
    ///
    /// # Example
    ///
    /// ```
    /// use cursorbuf::ByteBuf;
    ///
    /// let mut buf = ByteBuf::new();
    ///
    /// {
    ///     let mut scoped = buf.retain_scoped();
    ///     scoped.ensure_accessible()?;
    ///     scoped.write_byte(1)?;
    /// }
    ///
    /// assert!(!buf.accessible());
    /// assert!(buf.read_byte().is_err());
    /// # Ok::<(), cursorbuf::Error>(())
    /// ```
    pub fn retain_scoped(&mut self) -> Retained<'_> {
        self.retain();
        Retained { buf: self }
    }
}

/// A retained borrow of a [`ByteBuf`] that releases it when dropped.
///
/// Create an instance via [`ByteBuf::retain_scoped()`].
#[derive(Debug)]
#[must_use]
pub struct Retained<'b> {
    buf: &'b mut ByteBuf,
}

impl Deref for Retained<'_> {
    type Target = ByteBuf;

    fn deref(&self) -> &Self::Target {
        self.buf
    }
}

impl DerefMut for Retained<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf
    }
}

impl Drop for Retained<'_> {
    fn drop(&mut self) {
        self.buf.release();
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::testing::LogCapture;

    #[test]
    fn starts_inaccessible() {
        let buf = ByteBuf::new();

        assert!(!buf.accessible());
        assert_eq!(buf.ensure_accessible().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
    }

    #[test]
    fn balanced_retain_release_discards_storage() {
        let mut buf = ByteBuf::from_slice(&[1, 2, 3]);

        for _ in 0..3 {
            buf.retain();
        }
        assert_eq!(buf.ref_count(), 3);
        buf.ensure_accessible().unwrap();

        buf.release();
        buf.release();
        assert!(buf.accessible());
        assert_eq!(buf.read_byte().unwrap(), 1);

        buf.release();
        assert!(!buf.accessible());
        assert_eq!(buf.ref_count(), 0);
        assert_eq!(buf.ensure_accessible().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
        assert_eq!(buf.read_byte().unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
    }

    #[test]
    fn release_at_zero_pins_count() {
        let mut buf = ByteBuf::new();

        buf.release();

        assert_eq!(buf.ref_count(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn release_safe_is_idempotent() {
        let mut buf = ByteBuf::new();
        buf.retain();
        buf.release();

        buf.release_safe();
        buf.release_safe();

        assert_eq!(buf.ref_count(), 0);

        // After a reset, retain again and release once through the safe path.
        buf.flush();
        buf.retain();
        buf.retain();
        buf.release_safe();
        assert_eq!(buf.ref_count(), 1);
        assert!(buf.accessible());
    }

    #[test]
    fn dispose_ignores_count() {
        let mut buf = ByteBuf::new();
        buf.retain();
        buf.retain();

        buf.dispose();

        assert_eq!(buf.ref_count(), 0);
        assert_eq!(buf.write_byte(1).unwrap_err().kind(), ErrorKind::IllegalReferenceCount);
    }

    #[test]
    fn scoped_guard_releases_on_drop() {
        let mut buf = ByteBuf::new();
        buf.retain();

        {
            let mut scoped = buf.retain_scoped();
            assert_eq!(scoped.ref_count(), 2);
            scoped.write_byte(7).unwrap();
        }

        assert_eq!(buf.ref_count(), 1);
        assert_eq!(buf.read_byte().unwrap(), 7);
    }

    #[test]
    fn scoped_guard_releases_on_early_return() {
        fn fails(buf: &mut ByteBuf) -> Result<u32> {
            let mut scoped = buf.retain_scoped();
            scoped.read_num_be::<u32>()
        }

        let mut buf = ByteBuf::new();

        fails(&mut buf).unwrap_err();

        assert_eq!(buf.ref_count(), 0);
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn release_is_logged() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let mut buf = ByteBuf::new();
        buf.retain();
        buf.release();

        capture.assert_contains("buffer released");
        capture.assert_contains("capacity=1024");
    }
}
