//! Ordered record metadata with unique identifiers.

mod record;

pub use record::SequenceRecord;

use std::collections::HashMap;

/// Identifier given to records whose header has no name.
pub const UNNAMED_ID: &str = "UnnamedSeq";

/// Records in file order plus an identifier lookup table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<SequenceRecord>,
    id_to_index: HashMap<String, usize>,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if a record uses `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// File-order position of the record named `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    /// Record named `id`.
    pub fn get(&self, id: &str) -> Option<&SequenceRecord> {
        self.position(id).map(|idx| &self.records[idx])
    }

    /// Records in file order.
    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [SequenceRecord] {
        &mut self.records
    }

    /// Append a record whose identifier must not be in use yet.
    pub(crate) fn push(&mut self, record: SequenceRecord) {
        debug_assert!(!self.contains(&record.id), "duplicate id {}", record.id);
        self.id_to_index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    /// `base` if it is free, otherwise `base_1`, `base_2`, ... whichever is
    /// free first.
    pub fn unique_id(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1u64..)
            .map(|suffix| format!("{base}_{suffix}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Sum of `field` over all records.
    pub fn total(&self, field: impl Fn(&SequenceRecord) -> u64) -> u64 {
        self.records.iter().map(field).sum()
    }
}

/// Identifier derived from a header token, before uniqueness is enforced.
///
/// Returns the identifier and whether a `.seq` suffix was rewritten.
pub fn derive_id(token: &str) -> (String, bool) {
    if token.is_empty() {
        return (UNNAMED_ID.to_string(), false);
    }
    match token.strip_suffix(".seq") {
        Some(stem) => (format!("{stem}_seq"), true),
        None => (token.to_string(), false),
    }
}
