//! # fastadb: indexed, mutable flat-file FASTA store
//!
//! Treats a FASTA file holding many sequences as a random-access database
//! without loading it into memory and without rewriting the whole file on
//! every edit.
//!
//! ## Components
//!
//! 1. **Ingestion**: one streaming pass that repairs common format defects,
//!    assigns unique identifiers and, in read-write mode, rewrites the file in
//!    place into canonical fixed-width form using a bounded buffer.
//! 2. **Checkpoint index**: sparse `(sequence offset, byte offset, line)`
//!    samples per record for near-O(1) seeking.
//! 3. **Reader**: substring extraction that seeks to the nearest checkpoint
//!    and scans only the residual distance.
//! 4. **Mutator**: replaces a range of one record, splices only the affected
//!    lines and the file tail, and repairs positions and statistics
//!    incrementally.
//!
//! ## Usage Example
//!
//! ```no_run
//! use fastadb::{FastaStore, OpenMode, StoreConfig};
//!
//! # fn main() -> Result<(), fastadb::StoreError> {
//! let config = StoreConfig::new("genome.fa").with_mode(OpenMode::ReadWrite);
//! let mut store = FastaStore::open(config)?;
//! let first = store.get_ids()[0].clone();
//! let old = store.set_substr(&first, 0, Some(4), "NNNN")?;
//! assert_eq!(store.get_substr(&first, 0, Some(4))?, "NNNN");
//! store.set_substr(&first, 0, Some(4), &old)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Interrupted rewrites
//!
//! Read-write ingestion and edits overwrite the file in place. If the process
//! stops halfway (crash, kill, or a fatal parse error during read-write
//! ingestion) the file may be left partially rewritten. Keep a copy of data
//! that cannot be regenerated.
//!
//! ## Memory use
//!
//! Ingestion reads one physical line at a time. Memory is bounded by the
//! longest input line plus the rewrite buffer (the flush threshold, grown by
//! however much longer the canonical form is so far). An unwrapped chromosome
//! on a single line is held in memory once while it is read.

#![warn(missing_docs, missing_debug_implementations)]

pub mod catalog;   // Record metadata and identifiers
pub mod index;     // Per-record checkpoint index
pub mod ingest;    // Streaming parse, repair and canonical rewrite
pub mod sequence;  // Alphabet and statistics
pub mod store;     // Public store API: reads and in-place edits

pub use catalog::{Catalog, SequenceRecord, UNNAMED_ID};
pub use index::{Checkpoint, CheckpointIndex, DEFAULT_INDEX_DISTANCE};
pub use ingest::{Diagnostic, DiagnosticKind};
pub use store::{FastaStore, OpenMode, StoreConfig, DEFAULT_FLUSH_THRESHOLD, DEFAULT_LINE_WIDTH};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a store operation.
///
/// Recoverable anomalies found while ingesting are reported as
/// [`Diagnostic`]s instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O failure while reading or rewriting the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration rejected at open time.
    #[error("invalid store configuration: {0}")]
    InvalidConfiguration(String),

    /// Identifier longer than the configured maximum.
    #[error("identifier '{id}' is {length} characters long (maximum {max})")]
    IdTooLong {
        /// Offending identifier.
        id: String,
        /// Its length.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Header line that holds several records and cannot be split safely.
    #[error("ambiguous multi-record line {line}: {content}")]
    AmbiguousLine {
        /// Input line number (1-based).
        line: u64,
        /// Line content.
        content: String,
    },

    /// No record has the requested identifier.
    #[error("unknown sequence identifier '{0}'")]
    UnknownId(String),

    /// Requested range does not lie within the record.
    #[error("range {offset}+{length} out of bounds for '{id}' (length {record_length})")]
    OutOfRange {
        /// Record identifier.
        id: String,
        /// Requested start offset.
        offset: u64,
        /// Requested length.
        length: u64,
        /// Length of the record.
        record_length: u64,
    },

    /// Replacement text contains a character outside the alphabet.
    #[error("invalid character '{character}' in replacement for '{id}'")]
    InvalidSequence {
        /// Record identifier.
        id: String,
        /// First rejected character.
        character: char,
    },

    /// Edit attempted on a store opened read-only.
    #[error("store {0} is opened read-only")]
    ReadOnly(PathBuf),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
