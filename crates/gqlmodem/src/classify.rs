//! Byte-level classifiers for the scanner hot loops.
//!
//! All predicates operate on single bytes of the raw input. GraphQL names and
//! punctuators are ASCII; multi-byte UTF-8 sequences only ever appear inside
//! strings, block strings and comments, where the scanner passes them through
//! without inspection.
#![allow(clippy::inline_always)]

/// Returns `true` for a legal name start byte: `_`, `a-z` or `A-Z`.
#[inline(always)]
pub(crate) fn is_name_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

/// Returns `true` for a legal name body byte: a name start byte or `0-9`.
#[inline(always)]
pub(crate) fn is_name_body(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

/// Returns `true` for insignificant separator bytes: space, horizontal tab,
/// line feed, carriage return and comma. Commas carry no meaning in GraphQL.
#[inline(always)]
pub(crate) fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',')
}

#[inline(always)]
pub(crate) fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Returns `true` for bytes that legally terminate a numeric literal:
/// a separator or one of `)`, `}`, `]`, `#`.
#[inline(always)]
pub(crate) fn is_number_end(b: u8) -> bool {
    is_separator(b) || matches!(b, b')' | b'}' | b']' | b'#')
}

/// Returns `true` for control bytes (`< 0x20`).
#[inline(always)]
pub(crate) fn is_control(b: u8) -> bool {
    b < 0x20
}

/// Bounds-checked comparison of `input[at..at + keyword.len()]` against a
/// fixed keyword. Matching consumes nothing; the driver advances the head by
/// the keyword length on acceptance.
#[inline(always)]
pub(crate) fn keyword_at(input: &[u8], at: usize, keyword: &'static [u8]) -> bool {
    input
        .get(at..at + keyword.len())
        .is_some_and(|bytes| bytes == keyword)
}
