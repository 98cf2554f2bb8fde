// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io::{self, Read, Write};

use cursorbuf::{BufOptions, ByteBuf};
use parking_lot::Mutex;
use tracing::{Level, event};

use crate::Result;

/// Transfers between a [`ByteBuf`] and `std::io` endpoints.
///
/// All transfers move data in pieces of the buffer's growth unit and return the total number of
/// bytes moved.
pub trait ByteBufIoExt {
    /// Writes all unread bytes into a sink shared between threads.
    ///
    /// The sink stays locked for the whole transfer, so concurrent transfers from other buffers
    /// into the same sink are serialized and never interleave. The lock protects the sink only;
    /// the buffer itself is borrowed exclusively for the duration of the call.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::thread;
    ///
    /// use cursorbuf::ByteBuf;
    /// use cursorbuf_io::ByteBufIoExt;
    /// use parking_lot::Mutex;
    ///
    /// let sink = Arc::new(Mutex::new(Vec::new()));
    ///
    /// let worker = thread::spawn({
    ///     let sink = Arc::clone(&sink);
    ///     move || ByteBuf::from_slice(b"abc").write_to_io(&*sink).unwrap()
    /// });
    /// assert_eq!(worker.join().unwrap(), 3);
    ///
    /// assert_eq!(sink.lock().as_slice(), b"abc");
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with a buffer error if the storage has been released, or with an I/O error if the
    /// sink fails. Bytes already written stay consumed; the rest remain unread.
    fn write_to_io<W: Write + ?Sized>(&mut self, sink: &Mutex<W>) -> Result<usize>;

    /// Writes all unread bytes into an exclusively owned sink.
    ///
    /// # Errors
    ///
    /// Fails with a buffer error if the storage has been released, or with an I/O error if the
    /// sink fails. Bytes already written stay consumed; the rest remain unread.
    fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize>;

    /// Appends everything `source` produces until it reports end of data.
    ///
    /// Reads interrupted by a signal are retried.
    ///
    /// # Errors
    ///
    /// Fails with a buffer error if the storage has been released, or with an I/O error if the
    /// source fails. Bytes appended before the failure are kept.
    fn read_from_io<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<usize>;
}

impl ByteBufIoExt for ByteBuf {
    fn write_to_io<W: Write + ?Sized>(&mut self, sink: &Mutex<W>) -> Result<usize> {
        let mut sink = sink.lock();
        self.write_to(&mut *sink)
    }

    #[cfg_attr(test, mutants::skip)] // Mutating this can cause infinite loops.
    fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<usize> {
        let mut chunk = vec![0; self.growth_unit().get()];
        let mut total = 0;

        loop {
            let count = chunk.len().min(self.readable_bytes());
            let piece = &mut chunk[..count];

            // Also rejects released storage when nothing is left to write.
            self.get_bytes(self.reader_index(), piece)?;
            if count == 0 {
                break;
            }

            sink.write_all(piece)?;
            self.skip(count);
            total += count;

            event!(Level::TRACE, message = "chunk written to sink", count);
        }

        sink.flush()?;

        event!(Level::DEBUG, message = "buffer written to sink", total);

        Ok(total)
    }

    #[cfg_attr(test, mutants::skip)] // Mutating this can cause infinite loops.
    fn read_from_io<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<usize> {
        // Rejects released storage even if the source is empty.
        self.ensure_capacity(self.writer_index())?;

        let mut chunk = vec![0; self.growth_unit().get()];
        let mut total = 0;

        loop {
            let count = match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            self.write_bytes(&chunk[..count])?;
            total += count;

            event!(Level::TRACE, message = "chunk read from source", count);
        }

        event!(Level::DEBUG, message = "buffer filled from source", total);

        Ok(total)
    }
}

/// Creates a buffer holding everything `source` produces, using default options.
///
/// # Errors
///
/// Fails with an I/O error if the source fails before reporting end of data.
pub fn from_reader<R: Read>(source: R) -> Result<ByteBuf> {
    from_reader_with(source, BufOptions::default())
}

/// Creates a buffer with the given options holding everything `source` produces.
///
/// # Errors
///
/// Fails with an I/O error if the source fails before reporting end of data.
pub fn from_reader_with<R: Read>(mut source: R, options: BufOptions) -> Result<ByteBuf> {
    let mut buf = ByteBuf::with_options(options);
    buf.read_from_io(&mut source)?;
    Ok(buf)
}
