use std::path::{Path, PathBuf};

use crate::index::DEFAULT_INDEX_DISTANCE;
use crate::StoreError;

/// Default number of bases per line in canonical form.
pub const DEFAULT_LINE_WIDTH: usize = 50;

/// Default minimum amount of buffered output before the canonical rewriter
/// writes to disk.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 1 << 20;

/// How the backing file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// Index only; the file is never modified.
    #[default]
    ReadOnly,
    /// Normalize the file on open and allow in-place edits.
    ReadWrite,
}

impl std::str::FromStr for OpenMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ro" | "read-only" => Ok(OpenMode::ReadOnly),
            "rw" | "read-write" => Ok(OpenMode::ReadWrite),
            _ => Err(format!("'{}' is not a valid open mode", s)),
        }
    }
}

/// Parameters fixed when a store is opened.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// FASTA file backing the store.
    pub path: PathBuf,
    /// Read-only indexing or read-write normalization.
    pub mode: OpenMode,
    /// Bases between checkpoints.
    pub index_distance: u64,
    /// Bases per line in canonical form.
    pub line_width: usize,
    /// Longest accepted identifier, if limited.
    pub max_id_length: Option<usize>,
    /// Minimum buffered output before a rewrite flush.
    pub flush_threshold: usize,
}

impl StoreConfig {
    /// Read-only configuration with default parameters.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode: OpenMode::ReadOnly,
            index_distance: DEFAULT_INDEX_DISTANCE,
            line_width: DEFAULT_LINE_WIDTH,
            max_id_length: None,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }

    /// Set the open mode.
    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the checkpoint stride.
    pub fn with_index_distance(mut self, index_distance: u64) -> Self {
        self.index_distance = index_distance;
        self
    }

    /// Set the canonical line width.
    pub fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }

    /// Limit identifier length.
    pub fn with_max_id_length(mut self, max_id_length: Option<usize>) -> Self {
        self.max_id_length = max_id_length;
        self
    }

    /// Set the rewrite flush threshold.
    pub fn with_flush_threshold(mut self, flush_threshold: usize) -> Self {
        self.flush_threshold = flush_threshold;
        self
    }

    /// Reject parameters the store cannot work with.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.index_distance == 0 {
            return Err(StoreError::InvalidConfiguration(
                "index distance must be > 0".to_string(),
            ));
        }
        if self.line_width == 0 {
            return Err(StoreError::InvalidConfiguration(
                "line width must be > 0".to_string(),
            ));
        }
        if self.flush_threshold == 0 {
            return Err(StoreError::InvalidConfiguration(
                "flush threshold must be > 0".to_string(),
            ));
        }
        if self.max_id_length == Some(0) {
            return Err(StoreError::InvalidConfiguration(
                "maximum identifier length must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
