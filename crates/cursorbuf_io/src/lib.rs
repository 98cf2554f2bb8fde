// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Moves [`ByteBuf`] contents to and from `std::io` sinks and sources.
//!
//! The [`ByteBufIoExt`] extension trait drains the unread bytes of a buffer into any
//! [`std::io::Write`] and appends everything a [`std::io::Read`] produces. Transfers happen in
//! pieces of the buffer's growth unit.
//!
//! Several buffers can be written into one shared sink from different threads through
//! [`ByteBufIoExt::write_to_io()`], which holds the sink's lock for the whole transfer so that
//! the bytes of one buffer are never interleaved with those of another.
//!
//! ```
//! use cursorbuf::ByteBuf;
//! use cursorbuf_io::{ByteBufIoExt, from_reader};
//!
//! let mut outgoing = ByteBuf::new();
//! outgoing.write_num_be(0x0102_0304_u32)?;
//!
//! let mut wire = Vec::new();
//! outgoing.write_to(&mut wire)?;
//!
//! let mut incoming = from_reader(wire.as_slice())?;
//! assert_eq!(incoming.read_num_be::<u32>()?, 0x0102_0304);
//! # Ok::<(), cursorbuf_io::Error>(())
//! ```
//!
//! [`ByteBuf`]: cursorbuf::ByteBuf

mod error;
mod ext;

pub use error::{Error, Result};
pub use ext::{ByteBufIoExt, from_reader, from_reader_with};
