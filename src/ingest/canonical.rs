use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};

use tracing::debug;

/// In-place rewriter that trails the reader through the same file.
///
/// Output is buffered and written back over bytes the reader has already
/// consumed. A flush only happens once the buffer holds at least the flush
/// threshold, and it never writes past the read cursor, so
/// `write_cursor <= read_cursor` holds for every write.
///
/// When the canonical form is longer than the input, the buffer grows by the
/// difference until the reader reaches the end of the file.
#[derive(Debug)]
pub(crate) struct CanonicalWriter {
    file: File,
    write_cursor: u64,
    buffer: Vec<u8>,
    flush_threshold: usize,
    flushes: usize,
}

impl CanonicalWriter {
    pub(crate) fn new(file: File, flush_threshold: usize) -> Self {
        Self {
            file,
            write_cursor: 0,
            buffer: Vec::with_capacity(flush_threshold),
            flush_threshold,
            flushes: 0,
        }
    }

    /// Output position of the next byte pushed.
    pub(crate) fn position(&self) -> u64 {
        self.write_cursor + self.buffer.len() as u64
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write as much buffered output as the read cursor allows.
    pub(crate) fn flush_behind(&mut self, read_cursor: u64) -> io::Result<()> {
        if self.buffer.len() < self.flush_threshold {
            return Ok(());
        }
        let room = read_cursor.saturating_sub(self.write_cursor);
        let amount = usize::try_from(room)
            .unwrap_or(usize::MAX)
            .min(self.buffer.len());
        if amount == 0 {
            return Ok(());
        }

        self.file.seek(SeekFrom::Start(self.write_cursor))?;
        self.file.write_all(&self.buffer[..amount])?;
        self.buffer.drain(..amount);
        self.write_cursor += amount as u64;
        self.flushes += 1;
        debug!(
            write_cursor = self.write_cursor,
            read_cursor,
            buffered = self.buffer.len(),
            "flushed canonical output"
        );
        Ok(())
    }

    /// Discard output from `position` on.
    ///
    /// Bytes already flushed past `position` stay on disk until they are
    /// overwritten or truncated by [`CanonicalWriter::finish`].
    pub(crate) fn rollback(&mut self, position: u64) {
        if position >= self.write_cursor {
            let keep = (position - self.write_cursor) as usize;
            self.buffer.truncate(keep);
        } else {
            self.buffer.clear();
            self.write_cursor = position;
        }
    }

    /// Write the remaining output and truncate the file to it.
    ///
    /// Returns the final file length.
    pub(crate) fn finish(mut self) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(self.write_cursor))?;
        self.file.write_all(&self.buffer)?;
        self.write_cursor += self.buffer.len() as u64;
        self.file.set_len(self.write_cursor)?;
        self.file.flush()?;
        debug!(
            length = self.write_cursor,
            flushes = self.flushes,
            "canonical rewrite finished"
        );
        Ok(self.write_cursor)
    }
}
