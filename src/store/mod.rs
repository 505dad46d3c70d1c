//! The public store: identifier queries, substring reads and in-place edits.

mod config;
mod mutator;
mod reader;
mod splice;

pub use config::{OpenMode, StoreConfig, DEFAULT_FLUSH_THRESHOLD, DEFAULT_LINE_WIDTH};

use std::path::Path;

use tracing::info;

use crate::catalog::{Catalog, SequenceRecord};
use crate::ingest::{self, Diagnostic};
use crate::sequence::is_sequence_char;
use crate::{Result, StoreError};

/// A FASTA file opened as a random-access sequence database.
///
/// All record metadata and checkpoints live in memory; sequence data is read
/// from and written to the file on demand.
#[derive(Debug)]
pub struct FastaStore {
    config: StoreConfig,
    catalog: Catalog,
    diagnostics: Vec<Diagnostic>,
}

impl FastaStore {
    /// Validate `config` and ingest its file.
    ///
    /// In read-write mode the file is rewritten into canonical form before
    /// this returns.
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let ingested = ingest::ingest(&config)?;
        Ok(Self {
            config,
            catalog: ingested.catalog,
            diagnostics: ingested.diagnostics,
        })
    }

    /// Open `path` read-only with default parameters.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(StoreConfig::new(path))
    }

    /// Open `path` read-write with default parameters.
    pub fn open_read_write(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(StoreConfig::new(path).with_mode(OpenMode::ReadWrite))
    }

    /// Parameters the store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Anomalies repaired or dropped during ingestion, in input order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Records in file order.
    pub fn records(&self) -> &[SequenceRecord] {
        self.catalog.records()
    }

    /// Metadata of the record named `id`.
    pub fn record(&self, id: &str) -> Result<&SequenceRecord> {
        self.catalog
            .get(id)
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))
    }

    /// Number of records.
    pub fn get_seq_count(&self) -> u64 {
        self.catalog.len() as u64
    }

    /// Returns `true` if a record is named `id`.
    pub fn exists(&self, id: &str) -> bool {
        self.catalog.contains(id)
    }

    /// Identifiers in file order.
    pub fn get_ids(&self) -> Vec<String> {
        self.records().iter().map(|record| record.id.clone()).collect()
    }

    /// Header texts (`id description`) in file order.
    pub fn get_descriptors(&self) -> Vec<String> {
        self.records().iter().map(SequenceRecord::descriptor).collect()
    }

    /// Header text after the identifier.
    pub fn get_description(&self, id: &str) -> Result<&str> {
        Ok(&self.record(id)?.description)
    }

    /// Length of one record, or of all records when `id` is `None`.
    pub fn get_seq_length(&self, id: Option<&str>) -> Result<u64> {
        self.statistic(id, |record| record.length)
    }

    /// G/C count of one record, or of all records when `id` is `None`.
    pub fn get_gc_length(&self, id: Option<&str>) -> Result<u64> {
        self.statistic(id, |record| record.gc_length)
    }

    /// Length without ambiguity codes, for one record or all of them.
    pub fn get_subt_length(&self, id: Option<&str>) -> Result<u64> {
        self.statistic(id, |record| record.subt_length)
    }

    /// Length without long X/N runs, for one record or all of them.
    pub fn get_xn_length(&self, id: Option<&str>) -> Result<u64> {
        self.statistic(id, |record| record.xn_length)
    }

    /// Whole sequence of a record.
    pub fn get_sequence(&self, id: &str) -> Result<String> {
        self.get_substr(id, 0, None)
    }

    /// `length` bases starting at `offset`; `None` reads to the end.
    pub fn get_substr(&self, id: &str, offset: u64, length: Option<u64>) -> Result<String> {
        let record = self.record(id)?;
        let length = resolve_range(record, offset, length)?;
        let bases = reader::read_range(&self.config.path, record, offset, length)?;
        Ok(String::from_utf8_lossy(&bases).into_owned())
    }

    /// Replace `length` bases at `offset` with `replacement` and return the
    /// bases that were replaced. `None` replaces up to the end of the record.
    ///
    /// The replacement may be shorter, longer or empty; an empty range at
    /// `offset` inserts. Lower-case input is stored upper-case.
    pub fn set_substr(
        &mut self,
        id: &str,
        offset: u64,
        length: Option<u64>,
        replacement: &str,
    ) -> Result<String> {
        if self.config.mode != OpenMode::ReadWrite {
            return Err(StoreError::ReadOnly(self.config.path.clone()));
        }
        let index = self
            .catalog
            .position(id)
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;
        let length = resolve_range(&self.catalog.records()[index], offset, length)?;

        if let Some(invalid) = replacement.chars().find(|&c| !c.is_ascii() || !is_sequence_char(c as u8)) {
            return Err(StoreError::InvalidSequence {
                id: id.to_string(),
                character: invalid,
            });
        }
        let replacement = replacement.to_ascii_uppercase();

        let old = mutator::replace_range(
            &self.config,
            &mut self.catalog,
            index,
            offset,
            length,
            replacement.as_bytes(),
        )?;
        info!(
            id,
            offset,
            length,
            replacement = replacement.len(),
            "edited sequence"
        );
        Ok(String::from_utf8_lossy(&old).into_owned())
    }

    fn statistic(&self, id: Option<&str>, field: fn(&SequenceRecord) -> u64) -> Result<u64> {
        match id {
            Some(id) => Ok(field(self.record(id)?)),
            None => Ok(self.catalog.total(field)),
        }
    }
}

/// Resolve an optional length against the record and check bounds.
fn resolve_range(record: &SequenceRecord, offset: u64, length: Option<u64>) -> Result<u64> {
    let out_of_range = |length| StoreError::OutOfRange {
        id: record.id.clone(),
        offset,
        length,
        record_length: record.length,
    };
    if offset > record.length {
        return Err(out_of_range(length.unwrap_or(0)));
    }
    let length = length.unwrap_or(record.length - offset);
    match offset.checked_add(length) {
        Some(end) if end <= record.length => Ok(length),
        _ => Err(out_of_range(length)),
    }
}
