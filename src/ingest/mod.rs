//! Streaming ingestion of permissive FASTA input.
//!
//! One pass over the file builds the [`Catalog`] and every record's
//! checkpoints. Format defects are repaired or the offending record is
//! dropped, and each anomaly is reported as a [`Diagnostic`].
//!
//! In read-write mode the same pass rewrites the file in place into
//! canonical form: `>id description` headers, upper-case bases, no stray
//! whitespace, fixed-width sequence lines. Catalog positions then refer to
//! the rewritten file; in read-only mode they refer to the input as is.
//!
//! Input is read one physical line at a time. Besides that line, the pass
//! holds at most one output line of pending bases and the rewrite buffer,
//! so a file with an unwrapped chromosome costs about one copy of it.

mod canonical;
mod diagnostics;
mod line;

pub use diagnostics::{Diagnostic, DiagnosticKind};

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::time::Instant;

use tracing::info;

use crate::catalog::{derive_id, Catalog, SequenceRecord};
use crate::index::{Checkpoint, CheckpointIndex};
use crate::sequence::{is_sequence_char, sequence_part, SequenceStats};
use crate::store::{OpenMode, StoreConfig};
use crate::{Result, StoreError};

use canonical::CanonicalWriter;
use diagnostics::DiagnosticLog;
use line::{classify, has_extra_marker, parse_header, LineClass};

/// Longest prefix of an input line kept for diagnostics.
const EXCERPT_LENGTH: usize = 120;

/// Output of a completed ingestion pass.
#[derive(Debug)]
pub(crate) struct Ingested {
    pub(crate) catalog: Catalog,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

/// Scan the configured file and build its catalog.
pub(crate) fn ingest(config: &StoreConfig) -> Result<Ingested> {
    let started = Instant::now();
    let open_error = |source| StoreError::Open {
        path: config.path.clone(),
        source,
    };

    let input = File::open(&config.path).map_err(open_error)?;
    let writer = match config.mode {
        OpenMode::ReadOnly => None,
        OpenMode::ReadWrite => {
            let output = OpenOptions::new()
                .write(true)
                .open(&config.path)
                .map_err(open_error)?;
            Some(CanonicalWriter::new(output, config.flush_threshold))
        }
    };

    let mut ingestor = Ingestor::new(config, writer);
    let mut reader = BufReader::new(input);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        let read = reader.read_until(b'\n', &mut raw)?;
        if read == 0 {
            break;
        }
        ingestor.consume_line(&raw)?;
    }
    let ingested = ingestor.finish()?;

    info!(
        path = %config.path.display(),
        mode = ?config.mode,
        records = ingested.catalog.len(),
        bases = ingested.catalog.total(|record| record.length),
        diagnostics = ingested.diagnostics.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "ingested sequence file"
    );
    Ok(ingested)
}

/// Record under construction.
#[derive(Debug)]
struct RecordBuilder {
    id: String,
    description: String,
    stats: SequenceStats,
    checkpoints: CheckpointIndex,
    next_mark: u64,
    // (byte, line) of the first sequence line, once seen.
    start: Option<(u64, u64)>,
    // Where the first sequence line would go if none follows the header.
    default_start: (u64, u64),
    line_count: u64,
    byte_length: u64,
    // Read-write only: output position of the header, for rollback.
    output_start: u64,
    output_line_start: u64,
}

impl RecordBuilder {
    fn mark_checkpoint(&mut self, byte: u64, line: u64) {
        let offset = self.stats.length;
        if offset >= self.next_mark {
            self.checkpoints.push(Checkpoint::new(offset, byte, line));
            let stride = self.checkpoints.stride();
            self.next_mark = (offset / stride + 1) * stride;
        }
    }

    fn into_record(self) -> SequenceRecord {
        let (start_byte, start_line) = self.start.unwrap_or(self.default_start);
        let mut record =
            SequenceRecord::new(self.id, self.description, &self.stats, self.checkpoints);
        record.start_byte = start_byte;
        record.start_line = start_line;
        record.line_count = self.line_count;
        record.byte_length = self.byte_length;
        record
    }
}

struct Ingestor<'a> {
    config: &'a StoreConfig,
    writer: Option<CanonicalWriter>,
    catalog: Catalog,
    log: DiagnosticLog,
    current: Option<RecordBuilder>,
    // Set after a record is dropped: ignore sequence lines until a header.
    skipping: bool,
    // Start of the current physical line, for diagnostics.
    excerpt: Vec<u8>,
    line_start: u64,
    read_cursor: u64,
    lines_read: u64,
    // Read-write only.
    output_line: u64,
    pending: Vec<u8>,
}

impl<'a> Ingestor<'a> {
    fn new(config: &'a StoreConfig, writer: Option<CanonicalWriter>) -> Self {
        Self {
            config,
            writer,
            catalog: Catalog::new(),
            log: DiagnosticLog::default(),
            current: None,
            skipping: false,
            excerpt: Vec::with_capacity(EXCERPT_LENGTH),
            line_start: 0,
            read_cursor: 0,
            lines_read: 0,
            output_line: 0,
            pending: Vec::with_capacity(config.line_width),
        }
    }

    /// Process one physical line, terminator included.
    ///
    /// Repairs may split the line; each piece is classified again until
    /// nothing is left to dispatch.
    fn consume_line(&mut self, raw: &[u8]) -> Result<()> {
        self.line_start = self.read_cursor;
        self.read_cursor += raw.len() as u64;
        self.lines_read += 1;

        let content = raw.strip_suffix(b"\n").unwrap_or(raw);
        let content = content.strip_suffix(b"\r").unwrap_or(content);
        self.excerpt.clear();
        self.excerpt
            .extend_from_slice(&content[..content.len().min(EXCERPT_LENGTH)]);

        let mut rest = content;
        loop {
            match classify(rest) {
                LineClass::Blank => break,
                LineClass::Header { text_start } => match self.header(&rest[text_start..])? {
                    Some(inline_sequence) => rest = inline_sequence,
                    None => break,
                },
                LineClass::Sequence => {
                    self.sequence(rest)?;
                    break;
                }
                LineClass::SequenceThenHeader { header_start } => {
                    let (sequence, header) = rest.split_at(header_start);
                    self.sequence(sequence)?;
                    let id = self.current.as_ref().map(|record| record.id.as_str());
                    self.log.record(
                        DiagnosticKind::MissingLineTerminator,
                        self.lines_read,
                        id,
                        &self.excerpt,
                    );
                    rest = header;
                }
            }
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.flush_behind(self.read_cursor)?;
        }
        Ok(())
    }

    /// Start a new record. Returns sequence data split off the header, which
    /// the caller dispatches as a sequence line.
    fn header<'t>(&mut self, text: &'t [u8]) -> Result<Option<&'t [u8]>> {
        self.finish_record()?;
        self.skipping = false;

        let text = text.trim_ascii();
        if has_extra_marker(text) {
            return Err(StoreError::AmbiguousLine {
                line: self.lines_read,
                content: String::from_utf8_lossy(&self.excerpt).into_owned(),
            });
        }

        let header = parse_header(text);
        let id = self.assign_id(&header.token)?;
        if header.inline_sequence.is_some() && self.writer.is_none() {
            self.log.record(
                DiagnosticKind::InlineSequenceDropped,
                self.lines_read,
                Some(id.as_str()),
                &self.excerpt,
            );
            self.skipping = true;
            return Ok(None);
        }

        self.open_record(id, header.description);
        if header.inline_sequence.is_some() {
            let id = self.current.as_ref().map(|record| record.id.as_str());
            self.log.record(
                DiagnosticKind::InlineSequenceSplit,
                self.lines_read,
                id,
                &self.excerpt,
            );
        }
        Ok(header.inline_sequence)
    }

    /// Derive a unique identifier for a header token.
    fn assign_id(&mut self, token: &str) -> Result<String> {
        let (base, rewritten) = derive_id(token);
        let id = self.catalog.unique_id(&base);

        if token.is_empty() {
            self.log
                .record(DiagnosticKind::UnnamedRecord, self.lines_read, Some(id.as_str()), &self.excerpt);
        }
        if rewritten {
            self.log.record(
                DiagnosticKind::SeqSuffixRewritten {
                    original: token.to_string(),
                },
                self.lines_read,
                Some(id.as_str()),
                &self.excerpt,
            );
        }
        if id != base {
            self.log.record(
                DiagnosticKind::DuplicateId { original: base },
                self.lines_read,
                Some(id.as_str()),
                &self.excerpt,
            );
        }

        if let Some(max) = self.config.max_id_length {
            if id.len() > max {
                return Err(StoreError::IdTooLong {
                    length: id.len(),
                    id,
                    max,
                });
            }
        }
        Ok(id)
    }

    fn open_record(&mut self, id: String, description: String) {
        let (output_start, output_line_start, default_start) = match self.writer.as_mut() {
            Some(writer) => {
                let output_start = writer.position();
                let output_line_start = self.output_line;
                writer.push(b">");
                writer.push(id.as_bytes());
                if !description.is_empty() {
                    writer.push(b" ");
                    writer.push(description.as_bytes());
                }
                writer.push(b"\n");
                self.output_line += 1;
                (output_start, output_line_start, (writer.position(), self.output_line))
            }
            None => (0, 0, (self.read_cursor, self.lines_read)),
        };

        self.current = Some(RecordBuilder {
            id,
            description,
            stats: SequenceStats::new(),
            checkpoints: CheckpointIndex::new(self.config.index_distance),
            next_mark: 0,
            start: None,
            default_start,
            line_count: 0,
            byte_length: 0,
            output_start,
            output_line_start,
        });
    }

    fn sequence(&mut self, data: &[u8]) -> Result<()> {
        if self.skipping {
            return Ok(());
        }
        if self.current.is_none() {
            let id = self.assign_id("")?;
            self.open_record(id, String::new());
        }

        let mut has_bases = false;
        for base in sequence_part(data) {
            if !is_sequence_char(base) {
                self.drop_record(DiagnosticKind::InvalidCharacter {
                    character: base as char,
                });
                return Ok(());
            }
            has_bases = true;
        }
        if !has_bases {
            return Ok(());
        }

        if self.writer.is_none() {
            self.index_line(data);
            return Ok(());
        }
        let width = self.config.line_width;
        for base in sequence_part(data) {
            self.pending.push(base.to_ascii_uppercase());
            if self.pending.len() == width {
                self.write_pending()?;
            }
        }
        Ok(())
    }

    /// Read-only: record the physical line in place.
    fn index_line(&mut self, data: &[u8]) {
        let Some(record) = self.current.as_mut() else {
            return;
        };
        let line = self.lines_read - 1;
        let (start_byte, start_line) = *record.start.get_or_insert((self.line_start, line));
        record.mark_checkpoint(self.line_start, line);
        for base in sequence_part(data) {
            record.stats.push(base);
        }
        record.line_count = line - start_line + 1;
        record.byte_length = self.read_cursor - start_byte;
    }

    /// Read-write: write the pending bases as one canonical line.
    ///
    /// The whole input line has been read already, so output can be flushed
    /// here without overtaking the reader.
    fn write_pending(&mut self) -> Result<()> {
        let (Some(writer), Some(record)) = (self.writer.as_mut(), self.current.as_mut()) else {
            self.pending.clear();
            return Ok(());
        };
        let bases = &self.pending;
        let position = writer.position();
        record.start.get_or_insert((position, self.output_line));
        record.mark_checkpoint(position, self.output_line);
        record.stats.extend(bases);
        record.line_count += 1;
        record.byte_length += bases.len() as u64 + 1;

        writer.push(bases);
        writer.push(b"\n");
        writer.flush_behind(self.read_cursor)?;
        self.output_line += 1;
        self.pending.clear();
        Ok(())
    }

    fn drop_record(&mut self, kind: DiagnosticKind) {
        let Some(record) = self.current.take() else {
            return;
        };
        self.log
            .record(kind, self.lines_read, Some(record.id.as_str()), &self.excerpt);
        if let Some(writer) = self.writer.as_mut() {
            writer.rollback(record.output_start);
            self.output_line = record.output_line_start;
        }
        self.pending.clear();
        self.skipping = true;
    }

    fn finish_record(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            self.write_pending()?;
        }
        if let Some(record) = self.current.take() {
            self.catalog.push(record.into_record());
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Ingested> {
        self.finish_record()?;
        if let Some(writer) = self.writer.take() {
            writer.finish()?;
        }
        Ok(Ingested {
            catalog: self.catalog,
            diagnostics: self.log.into_entries(),
        })
    }
}
