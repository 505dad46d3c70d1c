use std::fmt;

use tracing::warn;

/// Kinds of anomalies recovered during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Identifier already in use; the record was renamed.
    DuplicateId {
        /// Identifier derived from the header.
        original: String,
    },
    /// Header without a name, or sequence data before the first header.
    UnnamedRecord,
    /// A `.seq` identifier suffix was rewritten.
    SeqSuffixRewritten {
        /// Header token before rewriting.
        original: String,
    },
    /// Sequence data and a header shared one physical line.
    MissingLineTerminator,
    /// Header carried sequence data; it was split off.
    InlineSequenceSplit,
    /// Header carried sequence data; the record was dropped.
    InlineSequenceDropped,
    /// Sequence line with a character outside the alphabet; the record was
    /// dropped.
    InvalidCharacter {
        /// First rejected character.
        character: char,
    },
}

impl DiagnosticKind {
    /// Returns `true` if the anomaly removed the record from the catalog.
    pub fn drops_record(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::InlineSequenceDropped | DiagnosticKind::InvalidCharacter { .. }
        )
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DuplicateId { original } => {
                write!(f, "duplicate identifier '{original}' renamed")
            }
            DiagnosticKind::UnnamedRecord => write!(f, "record without a name"),
            DiagnosticKind::SeqSuffixRewritten { original } => {
                write!(f, "'.seq' suffix of '{original}' rewritten")
            }
            DiagnosticKind::MissingLineTerminator => {
                write!(f, "missing line terminator before header")
            }
            DiagnosticKind::InlineSequenceSplit => {
                write!(f, "sequence data split off the header line")
            }
            DiagnosticKind::InlineSequenceDropped => {
                write!(f, "header line carries sequence data; record dropped")
            }
            DiagnosticKind::InvalidCharacter { character } => {
                write!(f, "invalid sequence character '{character}'; record dropped")
            }
        }
    }
}

/// One recovered anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What happened.
    pub kind: DiagnosticKind,
    /// Input line number (1-based).
    pub line: u64,
    /// Identifier of the affected record, after renaming.
    pub id: Option<String>,
    /// Content of the offending line, cut after its first 120 bytes.
    pub content: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)?;
        if let Some(id) = &self.id {
            write!(f, " [{id}]")?;
        }
        write!(f, ": {}", self.content)
    }
}

/// Running log of diagnostics, mirrored to `tracing`.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub(crate) fn record(
        &mut self,
        kind: DiagnosticKind,
        line: u64,
        id: Option<&str>,
        content: &[u8],
    ) {
        let diagnostic = Diagnostic {
            kind,
            line,
            id: id.map(str::to_string),
            content: String::from_utf8_lossy(content).into_owned(),
        };
        warn!(
            line = diagnostic.line,
            id = diagnostic.id.as_deref().unwrap_or(""),
            "{}",
            diagnostic.kind
        );
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
