use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::debug;

// Size of the buffer used to move the file tail.
const SHIFT_BUFFER: usize = 64 * 1024;

/// Replace `old_length` bytes at `start` with `replacement`.
///
/// The bytes after the replaced range are moved in bounded chunks: from the
/// end backwards when the file grows, from the front forwards when it
/// shrinks, so no chunk is overwritten before it has been copied.
pub(crate) fn splice(
    file: &mut File,
    start: u64,
    old_length: u64,
    replacement: &[u8],
) -> io::Result<()> {
    splice_with_buffer(file, start, old_length, replacement, SHIFT_BUFFER)
}

fn splice_with_buffer(
    file: &mut File,
    start: u64,
    old_length: u64,
    replacement: &[u8],
    buffer_size: usize,
) -> io::Result<()> {
    let file_length = file.metadata()?.len();
    let tail_start = start + old_length;
    let tail_length = file_length.saturating_sub(tail_start);
    let new_length = replacement.len() as u64;

    if new_length > old_length {
        shift_tail_right(file, tail_start, tail_length, new_length - old_length, buffer_size)?;
    } else if new_length < old_length {
        let distance = old_length - new_length;
        shift_tail_left(file, tail_start, tail_length, distance, buffer_size)?;
        file.set_len(file_length - distance)?;
    }

    file.seek(SeekFrom::Start(start))?;
    file.write_all(replacement)?;
    file.flush()?;
    debug!(start, old_length, new_length, tail_length, "spliced byte range");
    Ok(())
}

fn shift_tail_right(
    file: &mut File,
    from: u64,
    length: u64,
    distance: u64,
    buffer_size: usize,
) -> io::Result<()> {
    let mut buffer = vec![0u8; buffer_size];
    let mut remaining = length;
    while remaining > 0 {
        let chunk = remaining.min(buffer_size as u64);
        let source = from + remaining - chunk;
        let bytes = &mut buffer[..chunk as usize];
        file.seek(SeekFrom::Start(source))?;
        file.read_exact(bytes)?;
        file.seek(SeekFrom::Start(source + distance))?;
        file.write_all(bytes)?;
        remaining -= chunk;
    }
    Ok(())
}

fn shift_tail_left(
    file: &mut File,
    from: u64,
    length: u64,
    distance: u64,
    buffer_size: usize,
) -> io::Result<()> {
    let mut buffer = vec![0u8; buffer_size];
    let mut moved = 0;
    while moved < length {
        let chunk = (length - moved).min(buffer_size as u64);
        let source = from + moved;
        let bytes = &mut buffer[..chunk as usize];
        file.seek(SeekFrom::Start(source))?;
        file.read_exact(bytes)?;
        file.seek(SeekFrom::Start(source - distance))?;
        file.write_all(bytes)?;
        moved += chunk;
    }
    Ok(())
}
