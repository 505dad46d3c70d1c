//! Nucleotide alphabet and per-record sequence statistics.
//!
//! Every record in the store carries four derived lengths. They are
//! accumulated while streaming during ingestion and patched incrementally by
//! the mutator, so the counting rules live here in one place.

mod alphabet;
mod stats;

pub use alphabet::{is_ambiguity_code, is_gc, is_sequence_char, is_xn, sequence_part, wrap_lines};
pub use stats::{excluded_xn_with_flanks, SequenceStats, XnRunTracker, XN_RUN_THRESHOLD};
