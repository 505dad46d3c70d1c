use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};

use tracing::debug;

use crate::catalog::{Catalog, SequenceRecord};
use crate::index::Checkpoint;
use crate::sequence::{excluded_xn_with_flanks, wrap_lines, SequenceStats};
use crate::Result;

use super::config::StoreConfig;
use super::reader::{xn_run_after, xn_run_before};
use super::splice::splice;

/// Whole lines of a record touched by an edit.
#[derive(Debug)]
struct Region {
    first_seq: u64,
    first_byte: u64,
    first_line: u64,
    line_count: u64,
    byte_length: u64,
    // Bases of the region lines, terminators stripped.
    text: Vec<u8>,
}

impl Region {
    fn empty_at(record: &SequenceRecord) -> Self {
        Self {
            first_seq: 0,
            first_byte: record.start_byte,
            first_line: record.start_line,
            line_count: 0,
            byte_length: 0,
            text: Vec::new(),
        }
    }
}

/// Replace `length` bases at `offset` of the record at `index` with
/// `replacement`, which must already be validated and upper-cased.
///
/// Only the lines containing the range are rewritten; the rest of the file is
/// moved by [`splice`]. Statistics, checkpoints and the positions of every
/// later record are repaired without rescanning the file. Returns the
/// replaced bases.
pub(crate) fn replace_range(
    config: &StoreConfig,
    catalog: &mut Catalog,
    index: usize,
    offset: u64,
    length: u64,
    replacement: &[u8],
) -> Result<Vec<u8>> {
    let record = &catalog.records()[index];
    let left_flank = xn_run_before(&config.path, record, offset)?;
    let right_flank = xn_run_after(&config.path, record, offset + length)?;

    let mut file = OpenOptions::new().read(true).write(true).open(&config.path)?;
    let region = locate_region(&mut file, record, offset, length)?;

    let column = (offset - region.first_seq) as usize;
    let column_end = column + length as usize;
    let old = region.text[column..column_end].to_vec();
    let mut text = Vec::with_capacity(region.text.len() - old.len() + replacement.len());
    text.extend_from_slice(&region.text[..column]);
    text.extend_from_slice(replacement);
    text.extend_from_slice(&region.text[column_end..]);

    let mut lines = wrap_lines(&text, config.line_width);
    if lines.is_empty() && record.line_count == region.line_count {
        // An emptied record keeps one blank line under its header.
        lines.push(&[]);
    }
    let mut bytes = Vec::with_capacity(text.len() + lines.len());
    let mut candidates = Vec::with_capacity(lines.len());
    let mut seq = region.first_seq;
    for (n, line) in lines.iter().enumerate() {
        candidates.push(Checkpoint::new(
            seq,
            region.first_byte + bytes.len() as u64,
            region.first_line + n as u64,
        ));
        bytes.extend_from_slice(line);
        bytes.push(b'\n');
        seq += line.len() as u64;
    }

    splice(&mut file, region.first_byte, region.byte_length, &bytes)?;
    drop(file);

    let seq_delta = replacement.len() as i64 - length as i64;
    let byte_delta = bytes.len() as i64 - region.byte_length as i64;
    let line_delta = lines.len() as i64 - region.line_count as i64;

    let removed = SequenceStats::of(&old);
    let added = SequenceStats::of(replacement);
    let excluded_before = excluded_xn_with_flanks(left_flank, &old, right_flank);
    let excluded_after = excluded_xn_with_flanks(left_flank, replacement, right_flank);

    let records = catalog.records_mut();
    let record = &mut records[index];
    let new_length = record.length + replacement.len() as u64 - length;
    let ambiguous = record.ambiguous() + added.ambiguous - removed.ambiguous;
    let excluded = record.excluded_xn() + excluded_after - excluded_before;
    record.length = new_length;
    record.gc_length = record.gc_length + added.gc - removed.gc;
    record.subt_length = new_length - ambiguous;
    record.xn_length = new_length - excluded;
    record.line_count = record.line_count.saturating_add_signed(line_delta);
    record.byte_length = record.byte_length.saturating_add_signed(byte_delta);

    let first_line = region.first_line;
    let region_end = region.first_line + region.line_count;
    let keeps_first_line = !lines.is_empty();
    record.checkpoints.retain(|checkpoint| {
        checkpoint.line_number < first_line
            || checkpoint.line_number >= region_end
            || (checkpoint.line_number == first_line && keeps_first_line)
    });
    record
        .checkpoints
        .shift_from_line(region_end, seq_delta, byte_delta, line_delta);
    record
        .checkpoints
        .retain(|checkpoint| checkpoint.seq_offset < new_length || checkpoint.seq_offset == 0);
    record.checkpoints.merge(candidates);
    if record.line_count > 0 {
        let origin = record.origin();
        record.checkpoints.ensure_origin(origin);
    }

    for later in records[index + 1..].iter_mut() {
        later.shift_position(byte_delta, line_delta);
    }

    debug!(
        offset,
        length,
        replacement = replacement.len(),
        first_line,
        lines_before = region.line_count,
        lines_after = lines.len(),
        byte_delta,
        "replaced sequence range"
    );
    Ok(old)
}

/// Find the lines holding `offset..offset + length`.
///
/// An empty range selects the line it would be inserted into; a range at the
/// very end of the record selects the last line.
fn locate_region(
    file: &mut File,
    record: &SequenceRecord,
    offset: u64,
    length: u64,
) -> io::Result<Region> {
    if record.line_count == 0 {
        return Ok(Region::empty_at(record));
    }

    let checkpoint = record.checkpoints.nearest_floor(offset, record.origin());
    file.seek(SeekFrom::Start(checkpoint.byte_offset))?;
    let mut reader = BufReader::new(file);

    let last_line = record.start_line + record.line_count - 1;
    let last_base = offset + length.saturating_sub(1);
    let mut seq = checkpoint.seq_offset;
    let mut byte = checkpoint.byte_offset;
    let mut line_number = checkpoint.line_number;
    let mut region: Option<Region> = None;
    let mut line = Vec::new();

    while line_number <= last_line {
        line.clear();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            break;
        }
        let bases = line.strip_suffix(b"\n").unwrap_or(&line);
        let count = bases.len() as u64;
        let is_last = line_number == last_line;

        if region.is_none() && (offset < seq + count || is_last) {
            region = Some(Region {
                first_seq: seq,
                first_byte: byte,
                first_line: line_number,
                line_count: 0,
                byte_length: 0,
                text: Vec::new(),
            });
        }
        if let Some(mut current) = region.take() {
            current.text.extend_from_slice(bases);
            current.line_count += 1;
            current.byte_length += read as u64;
            if last_base < seq + count || is_last {
                return Ok(current);
            }
            region = Some(current);
        }

        seq += count;
        byte += read as u64;
        line_number += 1;
    }

    Err(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("sequence '{}' is shorter on disk than indexed", record.id),
    ))
}
