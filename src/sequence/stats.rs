use super::alphabet::{is_ambiguity_code, is_gc, is_xn};

/// Minimum length of an X/N run that is excluded from `xn_length`.
pub const XN_RUN_THRESHOLD: u64 = 20;

/// Tracks maximal X/N runs and the total length of runs at or above
/// [`XN_RUN_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XnRunTracker {
    run: u64,
    excluded: u64,
}

impl XnRunTracker {
    /// Create a tracker with no open run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one character.
    #[inline]
    pub fn push(&mut self, base: u8) {
        if is_xn(base) {
            self.run += 1;
        } else {
            self.close_run();
        }
    }

    /// Observe `count` consecutive X/N characters.
    pub fn extend_run(&mut self, count: u64) {
        self.run += count;
    }

    /// Close the open run and return the excluded total.
    pub fn finish(mut self) -> u64 {
        self.close_run();
        self.excluded
    }

    fn close_run(&mut self) {
        if self.run >= XN_RUN_THRESHOLD {
            self.excluded += self.run;
        }
        self.run = 0;
    }
}

/// Excluded X/N total of a window made of `left` X/N characters, `body`, and
/// `right` X/N characters.
///
/// When the window is bounded by non-X/N characters (or record ends) on both
/// sides, no run crosses its edges and the value is exact for the window.
pub fn excluded_xn_with_flanks(left: u64, body: &[u8], right: u64) -> u64 {
    let mut tracker = XnRunTracker::new();
    tracker.extend_run(left);
    for &base in body {
        tracker.push(base);
    }
    tracker.extend_run(right);
    tracker.finish()
}

/// Streaming accumulator for the per-record statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// Number of sequence characters.
    pub length: u64,
    /// Number of `G`/`C` characters.
    pub gc: u64,
    /// Number of `X,N,R,Y,M,K` characters.
    pub ambiguous: u64,
    xn: XnRunTracker,
}

impl SequenceStats {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of a complete sequence.
    pub fn of(sequence: &[u8]) -> Self {
        let mut stats = Self::new();
        stats.extend(sequence);
        stats
    }

    /// Observe one character.
    #[inline]
    pub fn push(&mut self, base: u8) {
        self.length += 1;
        if is_gc(base) {
            self.gc += 1;
        }
        if is_ambiguity_code(base) {
            self.ambiguous += 1;
        }
        self.xn.push(base);
    }

    /// Observe a slice of characters.
    pub fn extend(&mut self, sequence: &[u8]) {
        for &base in sequence {
            self.push(base);
        }
    }

    /// `length` minus the ambiguity codes.
    pub fn subt_length(&self) -> u64 {
        self.length - self.ambiguous
    }

    /// `length` minus all X/N runs of at least [`XN_RUN_THRESHOLD`].
    ///
    /// Closes the run currently open at the end of the stream.
    pub fn xn_length(&self) -> u64 {
        self.length - self.xn.finish()
    }
}
