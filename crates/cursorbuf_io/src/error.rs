// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// An error signaled while moving bytes between a buffer and an external sink or source.
///
/// Either the buffer rejected the operation or the sink/source itself failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The buffer rejected the operation, for example because its storage was released.
    #[error(transparent)]
    Buffer(#[from] cursorbuf::Error),

    /// The external sink or source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A `Result` that may contain an [`Error`] from this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Buffer(e) => e.into(),
            Error::Io(e) => e,
        }
    }
}
