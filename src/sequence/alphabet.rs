/// Returns `true` for characters accepted on a sequence line.
///
/// The accepted set is `{A,C,G,T,B,D,H,V,R,Y,K,M,S,W,N,X}` in either case.
#[inline]
pub fn is_sequence_char(base: u8) -> bool {
    matches!(
        base.to_ascii_uppercase(),
        b'A' | b'C'
            | b'G'
            | b'T'
            | b'B'
            | b'D'
            | b'H'
            | b'V'
            | b'R'
            | b'Y'
            | b'K'
            | b'M'
            | b'S'
            | b'W'
            | b'N'
            | b'X'
    )
}

/// Returns `true` for `G`/`C` in either case.
#[inline]
pub fn is_gc(base: u8) -> bool {
    matches!(base, b'G' | b'g' | b'C' | b'c')
}

/// Returns `true` for the ambiguity codes subtracted from `subt_length`.
#[inline]
pub fn is_ambiguity_code(base: u8) -> bool {
    matches!(
        base.to_ascii_uppercase(),
        b'X' | b'N' | b'R' | b'Y' | b'M' | b'K'
    )
}

/// Returns `true` for the masking characters `X`/`N` in either case.
#[inline]
pub fn is_xn(base: u8) -> bool {
    matches!(base, b'X' | b'x' | b'N' | b'n')
}

/// Sequence characters stored on one physical line.
///
/// A `>` ends the sequence part (the rest of the line is a header that lost
/// its line terminator) and whitespace, including `\r`, is skipped.
pub fn sequence_part(line: &[u8]) -> impl Iterator<Item = u8> + '_ {
    line.iter()
        .copied()
        .take_while(|&byte| byte != b'>')
        .filter(|byte| !byte.is_ascii_whitespace())
}

/// Split `text` into lines of exactly `width` characters, the last one short.
///
/// Empty input produces no lines.
pub fn wrap_lines(text: &[u8], width: usize) -> Vec<&[u8]> {
    text.chunks(width.max(1)).collect()
}
