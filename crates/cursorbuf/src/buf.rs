// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::num::NonZero;

use tracing::{Level, event};

use crate::storage::Storage;
use crate::{BufOptions, Error, Result};

/// Largest capacity a buffer can grow to, in bytes.
///
/// Allocations in Rust are limited to `isize::MAX` bytes.
pub const MAX_CAPACITY: usize = isize::MAX.unsigned_abs();

/// A growable byte buffer with independent reader and writer cursors.
///
/// The buffer owns one contiguous block of memory (its capacity) and tracks two positions in it:
///
/// * The **writer index** marks the end of the data written so far. The region
///   `[0, writer_index)` holds the *available* bytes.
/// * The **reader index** marks the next unread byte. The region `[reader_index, writer_index)`
///   holds the *readable* bytes.
///
/// Data is produced and consumed through two distinct contracts:
///
/// * **Random access** (`get_*`/`put_*`) takes an explicit offset and is validated only against
///   the allocated capacity. It never moves a cursor and never grows the buffer. Reading
///   capacity that was never written yields whatever bytes are there (zeroes, unless the
///   region was written before and later discarded).
/// * **Sequential access** (`read_*`/`write_*`) works at the cursors and advances them.
///   Writes grow the buffer on demand; reads are validated against the writer index.
///
/// Multi-byte numbers come in big-endian (`_be`) and little-endian (`_le`) forms.
///
/// # Example
///
/// ```
/// use cursorbuf::{ByteBuf, LengthPrefix};
///
/// let mut buf = ByteBuf::new();
///
/// buf.write_num_be(0xCAFE_u16)?;
/// buf.write_num_le(-1_i64)?;
/// buf.write_string_with(LengthPrefix::U8, "hello")?;
///
/// assert_eq!(buf.read_num_be::<u16>()?, 0xCAFE);
/// assert_eq!(buf.read_num_le::<i64>()?, -1);
/// assert_eq!(buf.read_string_with(LengthPrefix::U8)?, "hello");
/// assert!(!buf.readable());
/// # Ok::<(), cursorbuf::Error>(())
/// ```
///
/// # Lifecycle
///
/// A buffer carries a cooperative reference count that starts at zero. [`retain()`] increments
/// it and [`release()`] decrements it; when it falls to zero the storage is discarded, after
/// which every content access fails with [`Error::IllegalReferenceCount`]. The count is not
/// consulted by the read and write paths themselves. Callers who want to reject buffers that
/// were never retained opt in through [`ensure_accessible()`].
///
/// # Thread safety
///
/// A buffer is meant for a single owner on a single thread and is neither `Send` nor `Sync`,
/// because a shallow copy shares its storage with the original.
///
/// [`retain()`]: Self::retain
/// [`release()`]: Self::release
/// [`ensure_accessible()`]: Self::ensure_accessible
pub struct ByteBuf {
    // `None` once the storage has been released.
    pub(crate) storage: Option<Storage>,

    pub(crate) reader_index: usize,
    pub(crate) writer_index: usize,

    // Marks are single-slot and consumed by the matching reset.
    pub(crate) reader_mark: Option<usize>,
    pub(crate) writer_mark: Option<usize>,

    pub(crate) ref_count: usize,

    pub(crate) options: BufOptions,
}

impl ByteBuf {
    /// Creates an empty buffer with the default growth unit.
    ///
    /// The initial capacity is one growth unit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BufOptions::default())
    }

    /// Creates an empty buffer whose capacity grows in steps of `growth_unit` bytes.
    ///
    /// The initial capacity is one growth unit.
    #[must_use]
    pub fn with_growth_unit(growth_unit: NonZero<usize>) -> Self {
        Self::with_options(BufOptions::new().with_growth_unit(growth_unit))
    }

    /// Creates an empty buffer with the provided options.
    #[must_use]
    pub fn with_options(options: BufOptions) -> Self {
        Self::from_slice_with(&[], options)
    }

    /// Creates a buffer with the default growth unit that holds a copy of `content`.
    ///
    /// The reader index is at the start and the writer index is at the end of the content.
    #[must_use]
    pub fn from_slice(content: &[u8]) -> Self {
        Self::from_slice_with(content, BufOptions::default())
    }

    /// Creates a buffer with the provided options that holds a copy of `content`.
    ///
    /// The capacity is the smallest multiple of the growth unit that fits the content. The
    /// reader index is at the start and the writer index is at the end of the content.
    #[must_use]
    pub fn from_slice_with(content: &[u8], options: BufOptions) -> Self {
        let capacity = options.round_up(content.len());

        Self {
            storage: Some(Storage::with_content(capacity, content)),
            reader_index: 0,
            writer_index: content.len(),
            reader_mark: None,
            writer_mark: None,
            ref_count: 0,
            options,
        }
    }

    /// The options this buffer was created with.
    #[must_use]
    pub fn options(&self) -> BufOptions {
        self.options
    }

    /// The granularity in which this buffer allocates capacity.
    #[must_use]
    pub fn growth_unit(&self) -> NonZero<usize> {
        self.options.growth_unit()
    }

    /// Allocated length of the backing storage.
    ///
    /// Zero once the storage has been released.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, Storage::len)
    }

    /// Number of available bytes, i.e. the writer index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.writer_index
    }

    /// Whether nothing has been written, i.e. the writer index is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writer_index == 0
    }

    /// Grows the capacity so that at least `target` bytes fit.
    ///
    /// Does nothing if the buffer is already large enough. Otherwise, allocates new storage of
    /// the smallest multiple of the growth unit that is at least `target`, copies the existing
    /// bytes and switches to the new storage. Capacity never shrinks here.
    ///
    /// A buffer that shares storage with a shallow copy stops sharing once it grows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released, or
    /// [`Error::CapacityExceeded`] if the rounded-up capacity exceeds [`MAX_CAPACITY`] or cannot
    /// be allocated. The buffer is unchanged on failure.
    pub fn ensure_capacity(&mut self, target: usize) -> Result<()> {
        let ref_count = self.ref_count;
        let storage = self.storage.as_mut().ok_or(Error::IllegalReferenceCount { ref_count })?;

        let capacity = storage.len();
        if target <= capacity {
            return Ok(());
        }

        let too_large = || {
            Error::capacity_exceeded(self.writer_index, target.saturating_sub(self.writer_index), capacity)
        };

        // `round_up` saturates, so an overflowing target also lands above the limit.
        let new_capacity = self.options.round_up(target);
        if new_capacity > MAX_CAPACITY {
            return Err(too_large());
        }

        *storage = storage.grown(new_capacity).ok_or_else(too_large)?;

        event!(
            Level::TRACE,
            message = "buffer grown",
            old_capacity = capacity,
            new_capacity,
            target
        );

        Ok(())
    }

    /// Borrows the storage, failing if it has been released.
    pub(crate) fn storage(&self) -> Result<&Storage> {
        self.storage.as_ref().ok_or(Error::IllegalReferenceCount {
            ref_count: self.ref_count,
        })
    }

    /// Returns a copy of the available bytes `[0, writer_index)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released, or
    /// [`Error::CapacityExceeded`] if the writer index was moved past the capacity.
    pub fn available_bytes(&self) -> Result<Vec<u8>> {
        let storage = self.storage()?;

        if self.writer_index > storage.len() {
            return Err(Error::capacity_exceeded(0, self.writer_index, storage.len()));
        }

        Ok(storage.to_vec(self.writer_index))
    }

    /// Discards the contents and returns to the state of a new buffer.
    ///
    /// The storage is replaced with one growth unit of fresh memory and both cursors and both
    /// marks are cleared. The reference count is kept. Unlike [`release()`][Self::release],
    /// the buffer remains usable afterwards, even if its storage had been released before.
    pub fn flush(&mut self) {
        let capacity = self.options.round_up(0);

        self.storage = Some(Storage::zeroed(capacity));
        self.reader_index = 0;
        self.writer_index = 0;
        self.reader_mark = None;
        self.writer_mark = None;

        event!(Level::TRACE, message = "buffer flushed", capacity);
    }

    /// Creates a buffer with its own copy of the storage.
    ///
    /// The copy has the same capacity, growth unit and available bytes. Its reader index is at
    /// the start, it carries no marks and its reference count starts at zero. Nothing done to
    /// one buffer afterwards is visible through the other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn deep_copy(&self) -> Result<Self> {
        let storage = self.storage()?.deep_clone();

        Ok(Self {
            storage: Some(storage),
            reader_index: 0,
            writer_index: self.writer_index,
            reader_mark: None,
            writer_mark: None,
            ref_count: 0,
            options: self.options,
        })
    }

    /// Creates a buffer that shares this buffer's storage.
    ///
    /// The copy starts with the same cursors and the same reference count value, but keeps its
    /// own cursors, marks and count from then on. Writes through either buffer are visible
    /// through the other until one of them replaces its storage, for example by growing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released.
    pub fn shallow_copy(&self) -> Result<Self> {
        let storage = self.storage()?.clone();

        Ok(Self {
            storage: Some(storage),
            reader_index: self.reader_index,
            writer_index: self.writer_index,
            reader_mark: None,
            writer_mark: None,
            ref_count: self.ref_count,
            options: self.options,
        })
    }

    /// Whether this buffer and `other` currently share the same storage.
    #[must_use]
    pub fn aliases(&self, other: &Self) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Default for ByteBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&[u8]> for ByteBuf {
    fn from(value: &[u8]) -> Self {
        Self::from_slice(value)
    }
}

impl From<Vec<u8>> for ByteBuf {
    fn from(value: Vec<u8>) -> Self {
        Self::from_slice(&value)
    }
}

impl fmt::Debug for ByteBuf {
    #[cfg_attr(test, mutants::skip)] // Generates no-op mutations, not useful.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuf")
            .field("reader_index", &self.reader_index)
            .field("writer_index", &self.writer_index)
            .field("capacity", &self.capacity())
            .field("growth_unit", &self.growth_unit())
            .field("ref_count", &self.ref_count)
            .field("released", &self.storage.is_none())
            .finish_non_exhaustive()
    }
}
