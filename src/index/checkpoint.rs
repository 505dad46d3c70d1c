/// Default number of bases between checkpoints.
pub const DEFAULT_INDEX_DISTANCE: u64 = 10_000;

/// Position of a line start inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Offset of the first base on the line, relative to the record start.
    pub seq_offset: u64,
    /// Byte offset of the line start in the file.
    pub byte_offset: u64,
    /// Line number (0-based) in the file.
    pub line_number: u64,
}

impl Checkpoint {
    /// Construct a checkpoint.
    pub fn new(seq_offset: u64, byte_offset: u64, line_number: u64) -> Self {
        Self {
            seq_offset,
            byte_offset,
            line_number,
        }
    }

    /// Checkpoint with all three coordinates moved by signed deltas.
    pub fn shifted(self, seq_delta: i64, byte_delta: i64, line_delta: i64) -> Self {
        Self {
            seq_offset: self.seq_offset.saturating_add_signed(seq_delta),
            byte_offset: self.byte_offset.saturating_add_signed(byte_delta),
            line_number: self.line_number.saturating_add_signed(line_delta),
        }
    }
}

/// Checkpoints of one record, ordered by sequence offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointIndex {
    stride: u64,
    checkpoints: Vec<Checkpoint>,
}

impl CheckpointIndex {
    /// Empty index with the provided stride.
    pub fn new(stride: u64) -> Self {
        assert!(stride > 0, "stride must be greater than zero");
        Self {
            stride,
            checkpoints: Vec::new(),
        }
    }

    /// Number of bases between regularly placed checkpoints.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of stored checkpoints.
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Returns `true` when no checkpoints are stored.
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Stored checkpoints in ascending order.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Append a checkpoint at the end of the record.
    ///
    /// Checkpoints that do not advance all three coordinates are ignored.
    pub fn push(&mut self, checkpoint: Checkpoint) {
        if let Some(last) = self.checkpoints.last() {
            if checkpoint.seq_offset <= last.seq_offset
                || checkpoint.byte_offset <= last.byte_offset
                || checkpoint.line_number <= last.line_number
            {
                return;
            }
        }
        self.checkpoints.push(checkpoint);
    }

    /// Greatest checkpoint with `seq_offset <= target`, or `origin` if there is
    /// none.
    ///
    /// The first guess assumes checkpoints sit exactly on stride multiples;
    /// edits shift them, so the guess is corrected by walking linearly.
    pub fn nearest_floor(&self, target: u64, origin: Checkpoint) -> Checkpoint {
        if self.checkpoints.is_empty() || target < self.checkpoints[0].seq_offset {
            return origin;
        }

        let last = self.checkpoints.len() - 1;
        let mut idx = usize::try_from(target / self.stride)
            .unwrap_or(usize::MAX)
            .min(last);
        while idx > 0 && self.checkpoints[idx].seq_offset > target {
            idx -= 1;
        }
        while idx < last && self.checkpoints[idx + 1].seq_offset <= target {
            idx += 1;
        }
        self.checkpoints[idx]
    }

    /// Drop the checkpoints rejected by `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Checkpoint) -> bool) {
        self.checkpoints.retain(keep);
    }

    /// Shift checkpoints on line `first_line` or later by the given deltas.
    pub fn shift_from_line(
        &mut self,
        first_line: u64,
        seq_delta: i64,
        byte_delta: i64,
        line_delta: i64,
    ) {
        for checkpoint in self.checkpoints.iter_mut() {
            if checkpoint.line_number >= first_line {
                *checkpoint = checkpoint.shifted(seq_delta, byte_delta, line_delta);
            }
        }
    }

    /// Shift the file coordinates of every checkpoint.
    ///
    /// Used when an edit in an earlier record moves this record in the file;
    /// sequence offsets are relative to the record and stay unchanged.
    pub fn shift_file_position(&mut self, byte_delta: i64, line_delta: i64) {
        for checkpoint in self.checkpoints.iter_mut() {
            *checkpoint = checkpoint.shifted(0, byte_delta, line_delta);
        }
    }

    /// Merge checkpoints for freshly written lines.
    ///
    /// A candidate is kept when its line is not already indexed and no kept
    /// checkpoint precedes it within the same stride bucket.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = Checkpoint>) {
        let mut merged: Vec<(Checkpoint, bool)> = self
            .checkpoints
            .drain(..)
            .map(|checkpoint| (checkpoint, false))
            .collect();
        merged.extend(candidates.into_iter().map(|checkpoint| (checkpoint, true)));
        merged.sort_by_key(|(checkpoint, candidate)| (checkpoint.line_number, *candidate));
        merged.dedup_by_key(|(checkpoint, _)| checkpoint.line_number);

        let stride = self.stride;
        let mut kept: Vec<Checkpoint> = Vec::with_capacity(merged.len());
        for (checkpoint, candidate) in merged {
            if candidate {
                if let Some(previous) = kept.last() {
                    if previous.seq_offset / stride >= checkpoint.seq_offset / stride {
                        continue;
                    }
                }
            }
            kept.push(checkpoint);
        }
        self.checkpoints = kept;
    }

    /// Make sure the record origin is the first checkpoint.
    pub fn ensure_origin(&mut self, origin: Checkpoint) {
        match self.checkpoints.first() {
            Some(first) if first.seq_offset == 0 => {}
            _ => self.checkpoints.insert(0, origin),
        }
    }
}
