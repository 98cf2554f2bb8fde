// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cursor positioning, marks and compaction.
//!
//! Repositioning is unchecked: an out-of-range cursor is only reported by the
//! next operation that reads or writes through it.

use tracing::{Level, event};

use crate::{ByteBuf, Error, Result};

impl ByteBuf {
    /// Position of the next unread byte.
    #[must_use]
    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    /// Position just past the last written byte.
    #[must_use]
    pub fn writer_index(&self) -> usize {
        self.writer_index
    }

    /// Whether any unread bytes remain.
    #[must_use]
    pub fn readable(&self) -> bool {
        self.writer_index > self.reader_index
    }

    /// Number of unread bytes, `writer_index - reader_index`.
    ///
    /// Zero if the reader index has been moved past the writer index.
    #[must_use]
    pub fn readable_bytes(&self) -> usize {
        self.writer_index.saturating_sub(self.reader_index)
    }

    /// Moves the reader index. The new position is not validated.
    pub fn set_reader_index(&mut self, index: usize) {
        self.reader_index = index;
    }

    /// Moves the writer index. The new position is not validated.
    pub fn set_writer_index(&mut self, index: usize) {
        self.writer_index = index;
    }

    /// Advances the reader index by `count` bytes without reading them. The new position is
    /// not validated.
    pub fn skip(&mut self, count: usize) {
        self.reader_index = self.reader_index.saturating_add(count);
    }

    /// Remembers the current reader index for a later [`reset_reader_index()`][Self::reset_reader_index].
    ///
    /// Replaces any earlier reader mark.
    pub fn mark_reader_index(&mut self) {
        self.reader_mark = Some(self.reader_index);
    }

    /// Remembers the current writer index for a later [`reset_writer_index()`][Self::reset_writer_index].
    ///
    /// Replaces any earlier writer mark.
    pub fn mark_writer_index(&mut self) {
        self.writer_mark = Some(self.writer_index);
    }

    /// Returns the reader index to the marked position and clears the mark.
    ///
    /// Does nothing if no mark is set.
    pub fn reset_reader_index(&mut self) {
        if let Some(mark) = self.reader_mark.take() {
            self.reader_index = mark;
        }
    }

    /// Returns the writer index to the marked position and clears the mark.
    ///
    /// Does nothing if no mark is set.
    pub fn reset_writer_index(&mut self) {
        if let Some(mark) = self.writer_mark.take() {
            self.writer_index = mark;
        }
    }

    /// Moves the unread bytes to the start of the storage.
    ///
    /// Afterwards the reader index is zero and the writer index is reduced by the old reader
    /// index. Capacity is unchanged. Marks refer to positions that no longer exist, so both are
    /// cleared. Does nothing if the reader index is already zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalReferenceCount`] if the storage has been released, or
    /// [`Error::CapacityExceeded`] if the writer index was moved past the capacity.
    pub fn discard_read_bytes(&mut self) -> Result<()> {
        let storage = self.storage()?;

        if self.reader_index == 0 {
            return Ok(());
        }

        if self.writer_index > storage.len() {
            return Err(Error::capacity_exceeded(0, self.writer_index, storage.len()));
        }

        let discarded = self.reader_index.min(self.writer_index);
        storage.shift_to_front(discarded..self.writer_index);

        self.writer_index -= discarded;
        self.reader_index = 0;
        self.reader_mark = None;
        self.writer_mark = None;

        event!(
            Level::TRACE,
            message = "read bytes discarded",
            discarded,
            remaining = self.writer_index
        );

        Ok(())
    }
}
