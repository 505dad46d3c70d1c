use crate::index::{Checkpoint, CheckpointIndex};
use crate::sequence::SequenceStats;

/// Metadata for one sequence in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Unique identifier.
    pub id: String,
    /// Header text after the identifier.
    pub description: String,
    /// Number of bases.
    pub length: u64,
    /// Number of `G`/`C` bases.
    pub gc_length: u64,
    /// `length` minus ambiguity codes `X,N,R,Y,M,K`.
    pub subt_length: u64,
    /// `length` minus X/N runs of 20 or more.
    pub xn_length: u64,
    /// Line number (0-based) of the first sequence line.
    pub start_line: u64,
    /// Byte offset of the first sequence line.
    pub start_byte: u64,
    /// Number of lines holding the sequence.
    pub line_count: u64,
    /// Bytes occupied by the sequence lines, terminators included.
    pub byte_length: u64,
    /// Seek index into the sequence lines.
    pub checkpoints: CheckpointIndex,
}

impl SequenceRecord {
    /// Record with statistics taken from `stats` and no lines yet.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        stats: &SequenceStats,
        checkpoints: CheckpointIndex,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            length: stats.length,
            gc_length: stats.gc,
            subt_length: stats.subt_length(),
            xn_length: stats.xn_length(),
            start_line: 0,
            start_byte: 0,
            line_count: 0,
            byte_length: 0,
            checkpoints,
        }
    }

    /// Position of the first base, used when no checkpoint precedes a target.
    pub fn origin(&self) -> Checkpoint {
        Checkpoint::new(0, self.start_byte, self.start_line)
    }

    /// Header line text without the leading `>`.
    pub fn descriptor(&self) -> String {
        if self.description.is_empty() {
            self.id.clone()
        } else {
            format!("{} {}", self.id, self.description)
        }
    }

    /// Total length of X/N runs excluded from `xn_length`.
    pub(crate) fn excluded_xn(&self) -> u64 {
        self.length - self.xn_length
    }

    /// Count of ambiguity codes.
    pub(crate) fn ambiguous(&self) -> u64 {
        self.length - self.subt_length
    }

    /// Move the record in the file after an edit in an earlier record.
    pub(crate) fn shift_position(&mut self, byte_delta: i64, line_delta: i64) {
        self.start_byte = self.start_byte.saturating_add_signed(byte_delta);
        self.start_line = self.start_line.saturating_add_signed(line_delta);
        self.checkpoints.shift_file_position(byte_delta, line_delta);
    }
}
