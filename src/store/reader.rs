use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::catalog::SequenceRecord;
use crate::sequence::{is_xn, sequence_part};

/// Read `length` bases of `record` starting at `offset`.
///
/// Seeks to the nearest checkpoint at or before `offset` and scans forward
/// line by line, stopping as soon as the window is complete. The range must
/// already be validated against the record length.
pub(crate) fn read_range(
    path: &Path,
    record: &SequenceRecord,
    offset: u64,
    length: u64,
) -> io::Result<Vec<u8>> {
    let mut bases = Vec::with_capacity(usize::try_from(length).unwrap_or(0));
    if length == 0 {
        return Ok(bases);
    }

    let checkpoint = record.checkpoints.nearest_floor(offset, record.origin());
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(checkpoint.byte_offset))?;
    let mut reader = BufReader::new(file);

    let end = offset + length;
    let mut position = checkpoint.seq_offset;
    let mut line = Vec::new();
    while position < end {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(truncated(record, end));
        }
        for base in sequence_part(&line) {
            if position >= offset {
                bases.push(base);
            }
            position += 1;
            if position == end {
                break;
            }
        }
    }
    Ok(bases)
}

/// Number of consecutive X/N bases ending right before `offset`.
pub(crate) fn xn_run_before(path: &Path, record: &SequenceRecord, offset: u64) -> io::Result<u64> {
    let mut run = 0;
    let mut end = offset;
    let mut chunk = FLANK_CHUNK;
    while end > 0 {
        let start = end.saturating_sub(chunk);
        let bases = read_range(path, record, start, end - start)?;
        let matched = bases.iter().rev().take_while(|&&base| is_xn(base)).count() as u64;
        run += matched;
        if matched < bases.len() as u64 {
            break;
        }
        end = start;
        chunk *= 2;
    }
    Ok(run)
}

/// Number of consecutive X/N bases starting at `offset`.
pub(crate) fn xn_run_after(path: &Path, record: &SequenceRecord, offset: u64) -> io::Result<u64> {
    let mut run = 0;
    let mut start = offset;
    let mut chunk = FLANK_CHUNK;
    while start < record.length {
        let length = chunk.min(record.length - start);
        let bases = read_range(path, record, start, length)?;
        let matched = bases.iter().take_while(|&&base| is_xn(base)).count() as u64;
        run += matched;
        if matched < bases.len() as u64 {
            break;
        }
        start += length;
        chunk *= 2;
    }
    Ok(run)
}

// First read size when measuring X/N runs around an edit.
const FLANK_CHUNK: u64 = 64;

fn truncated(record: &SequenceRecord, end: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("sequence '{}' ends before offset {}", record.id, end),
    )
}
