use crate::sequence::is_sequence_char;

/// Shortest run of sequence characters at the end of a header that is taken
/// for sequence data missing its own line.
pub(crate) const INLINE_SEQUENCE_MIN_RUN: usize = 30;

/// Classification of one (possibly already split) input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineClass {
    /// Only whitespace.
    Blank,
    /// Starts with `>`; the header text begins at the given index.
    Header { text_start: usize },
    /// Sequence data only.
    Sequence,
    /// Sequence data followed by a header that lost its line break; the
    /// header starts at the given index.
    SequenceThenHeader { header_start: usize },
}

/// Classify a line. Leading whitespace before a `>` is ignored.
pub(crate) fn classify(line: &[u8]) -> LineClass {
    let Some(first) = line.iter().position(|byte| !byte.is_ascii_whitespace()) else {
        return LineClass::Blank;
    };
    if line[first] == b'>' {
        return LineClass::Header {
            text_start: first + 1,
        };
    }
    match line[first..].iter().position(|&byte| byte == b'>') {
        Some(marker) => LineClass::SequenceThenHeader {
            header_start: first + marker,
        },
        None => LineClass::Sequence,
    }
}

/// Parsed header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header<'a> {
    /// First whitespace-delimited word, possibly empty.
    pub token: String,
    /// Remainder, trimmed.
    pub description: String,
    /// Sequence data found at the end of the header text.
    pub inline_sequence: Option<&'a [u8]>,
}

/// Returns `true` if the header text contains another record marker, i.e. a
/// `>` followed by anything other than `%`.
pub(crate) fn has_extra_marker(text: &[u8]) -> bool {
    text.windows(2)
        .any(|pair| pair[0] == b'>' && pair[1] != b'%')
}

/// Split header text into token, description and trailing sequence data.
pub(crate) fn parse_header(text: &[u8]) -> Header<'_> {
    let text = text.trim_ascii();
    let mut inline_sequence = None;
    let run = text
        .iter()
        .rev()
        .take_while(|&&byte| is_sequence_char(byte))
        .count();
    let mut header_text = text;
    if run >= INLINE_SEQUENCE_MIN_RUN && run < text.len() {
        let split = text.len() - run;
        inline_sequence = Some(&text[split..]);
        header_text = text[..split].trim_ascii_end();
    }

    let header_text = String::from_utf8_lossy(header_text);
    let (token, description) = match header_text.split_once(|c: char| c.is_whitespace()) {
        Some((token, rest)) => (token.to_string(), rest.trim().to_string()),
        None => (header_text.to_string(), String::new()),
    };
    Header {
        token,
        description,
        inline_sequence,
    }
}
