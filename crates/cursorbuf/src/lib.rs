// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A growable byte buffer for hand-written binary encoders and decoders.
//!
//! [`ByteBuf`] owns one resizable block of memory and exposes it through independent reader
//! and writer cursors. There is no built-in wire format: a protocol is simply an agreed
//! sequence of writes on the producing side and the same sequence of reads on the consuming side.
//!
//! ```
//! use cursorbuf::{ByteBuf, LengthPrefix};
//!
//! // Producer
//! let mut message = ByteBuf::new();
//! message.write_num_be(7_u32)?; // message id
//! message.write_string_with(LengthPrefix::U16Be, "ping")?;
//! message.write_bool(true)?;
//!
//! // Consumer
//! assert_eq!(message.read_num_be::<u32>()?, 7);
//! assert_eq!(message.read_string_with(LengthPrefix::U16Be)?, "ping");
//! assert!(message.read_bool()?);
//! # Ok::<(), cursorbuf::Error>(())
//! ```
//!
//! # Two ways to address bytes
//!
//! * **Random access** via `get_*` and `put_*` takes an explicit offset. It is validated against
//!   the allocated capacity only, so it can observe bytes that were never written. It neither
//!   moves cursors nor grows the buffer.
//! * **Sequential access** via `read_*` and `write_*` works at the cursors and advances them.
//!   Writes grow the buffer in steps of its growth unit; reads fail with
//!   [`Error::CapacityExceeded`] when fewer unread bytes remain than requested.
//!
//! Numbers of any primitive type are written with [`write_num_be()`] or [`write_num_le()`] and
//! read back with the matching [`read_num_be()`] or [`read_num_le()`].
//!
//! # Growth
//!
//! Capacity is always a multiple of the growth unit configured through [`BufOptions`]. When a
//! write needs more room, the buffer allocates the smallest multiple that fits and copies the
//! existing bytes over. Capacity only shrinks on [`flush()`]; [`discard_read_bytes()`] moves
//! unread bytes to the front to make room without allocating.
//!
//! # Copies
//!
//! [`deep_copy()`] produces a fully independent buffer. [`shallow_copy()`] produces a buffer that
//! shares storage with the original, so writes through one are visible through the other until
//! either of them grows.
//!
//! # Lifecycle
//!
//! Buffers carry a cooperative reference count for pooling scenarios. See [`ByteBuf::retain()`],
//! [`ByteBuf::release()`] and [`ByteBuf::retain_scoped()`]. Once released, any access to the
//! contents fails with [`Error::IllegalReferenceCount`].
//!
//! [`write_num_be()`]: ByteBuf::write_num_be
//! [`write_num_le()`]: ByteBuf::write_num_le
//! [`read_num_be()`]: ByteBuf::read_num_be
//! [`read_num_le()`]: ByteBuf::read_num_le
//! [`flush()`]: ByteBuf::flush
//! [`discard_read_bytes()`]: ByteBuf::discard_read_bytes
//! [`deep_copy()`]: ByteBuf::deep_copy
//! [`shallow_copy()`]: ByteBuf::shallow_copy

mod buf;
mod cursor;
mod diagnostics;
mod error;
mod io_adapter;
mod lifecycle;
mod options;
mod prefixed;
mod random_access;
mod sequential;
mod storage;

#[cfg(test)]
mod testing;

pub use buf::{ByteBuf, MAX_CAPACITY};
pub use diagnostics::PRETTY_PRINT_ROW_LEN;
pub use error::{Error, ErrorKind, Result};
pub use io_adapter::{ByteBufReader, ByteBufWriter};
pub use lifecycle::Retained;
pub use options::{BufOptions, DEFAULT_GROWTH_UNIT};
pub use prefixed::LengthPrefix;
