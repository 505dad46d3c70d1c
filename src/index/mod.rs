//! Sparse per-record seek index.
//!
//! Each record keeps a short list of line-start positions sampled every
//! `index_distance` bases so that reads and edits can seek close to their
//! target instead of scanning the record from its first line.

mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointIndex, DEFAULT_INDEX_DISTANCE};
