// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// An error signaled by a [`ByteBuf`][crate::ByteBuf] operation.
///
/// Every error is raised at the point of violation and returned to the immediate caller.
/// The buffer performs no retry and no internal recovery, and a failed operation leaves
/// the cursors where they were before the call.
///
/// # Thread safety
///
/// This type is thread-safe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An offset-addressed or cursor-addressed access fell outside the window that is valid
    /// for that operation.
    ///
    /// For random access the window is the allocated capacity; for sequential reads it is the
    /// written region ending at the writer index.
    #[error("access of {len} byte(s) at offset {offset} exceeds the limit of {limit} byte(s)")]
    CapacityExceeded {
        /// Offset of the first byte that was accessed.
        offset: usize,
        /// Number of bytes the operation needed.
        len: usize,
        /// Exclusive upper bound that the access had to stay within.
        limit: usize,
    },

    /// The buffer was accessed after its storage was released, or the liveness guard
    /// found a reference count of zero.
    #[error("illegal reference count: {ref_count}")]
    IllegalReferenceCount {
        /// The reference count observed at the time of access.
        ref_count: usize,
    },

    /// A length-prefixed write was asked to store a payload longer than the prefix can represent.
    #[error("payload of {len} byte(s) exceeds the maximum of {max} representable by the length prefix")]
    OutOfMaxValue {
        /// Length of the rejected payload.
        len: usize,
        /// Largest length the chosen prefix can encode.
        max: u64,
    },
}

impl Error {
    /// Returns the kind of this error, without any of the attached context.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::IllegalReferenceCount { .. } => ErrorKind::IllegalReferenceCount,
            Self::OutOfMaxValue { .. } => ErrorKind::OutOfMaxValue,
        }
    }

    pub(crate) fn capacity_exceeded(offset: usize, len: usize, limit: usize) -> Self {
        Self::CapacityExceeded { offset, len, limit }
    }
}

/// Discriminant of an [`Error`], for callers that only need to branch on the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// See [`Error::CapacityExceeded`].
    CapacityExceeded,
    /// See [`Error::IllegalReferenceCount`].
    IllegalReferenceCount,
    /// See [`Error::OutOfMaxValue`].
    OutOfMaxValue,
}

/// A specialized `Result` for buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a buffer error as a standard I/O error.
///
/// Used by the `std::io` adapters of [`ByteBuf`][crate::ByteBuf].
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::CapacityExceeded { .. } => std::io::ErrorKind::UnexpectedEof,
            Error::IllegalReferenceCount { .. } => std::io::ErrorKind::BrokenPipe,
            Error::OutOfMaxValue { .. } => std::io::ErrorKind::InvalidInput,
        };

        Self::new(kind, value)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, std::error::Error);

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Error::capacity_exceeded(8, 4, 10).kind(), ErrorKind::CapacityExceeded);
        assert_eq!(
            Error::IllegalReferenceCount { ref_count: 0 }.kind(),
            ErrorKind::IllegalReferenceCount
        );
        assert_eq!(Error::OutOfMaxValue { len: 256, max: 255 }.kind(), ErrorKind::OutOfMaxValue);
    }

    #[test]
    fn display_carries_context() {
        let e = Error::capacity_exceeded(8, 4, 10);
        assert_eq!(e.to_string(), "access of 4 byte(s) at offset 8 exceeds the limit of 10 byte(s)");

        let e = Error::OutOfMaxValue { len: 300, max: 255 };
        assert_eq!(
            e.to_string(),
            "payload of 300 byte(s) exceeds the maximum of 255 representable by the length prefix"
        );
    }

    #[test]
    fn converts_to_io_error() {
        let io: std::io::Error = Error::capacity_exceeded(0, 1, 0).into();
        assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);

        let io: std::io::Error = Error::IllegalReferenceCount { ref_count: 0 }.into();
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
