//! Character/byte offset handling for token predictions.
//!
//! Token-classification pipelines report offsets in *characters*
//! (Unicode scalar values), while Rust slices strings by *bytes*:
//!
//! ```text
//! Text:        "Thanks to José Ruiz"
//! char index:   T h a n k s _ t o _ J o s é _ R u i z
//!               0 . . . . . . . . . 10    13  15    18
//! byte index:   "é" takes 2 bytes, so "Ruiz" starts at byte 16, char 15
//! ```
//!
//! Slicing `text[15..19]` with char offsets would cut in the wrong place
//! (or panic on a char boundary), so every span goes through a
//! [`SpanConverter`] first.

use std::ops::Range;

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    if text.is_ascii() {
        text.len()
    } else {
        text.chars().count()
    }
}

/// Build an offset mapping table from char to byte.
///
/// Returns a vec where `mapping[char_idx]` gives the byte index; the final
/// entry maps `char_len(text)` to `text.len()`.
#[must_use]
pub fn build_char_to_byte_map(text: &str) -> Vec<usize> {
    let mut map: Vec<usize> = text.char_indices().map(|(byte_idx, _)| byte_idx).collect();
    map.push(text.len());
    map
}

/// Converter for slicing many character spans out of the same text.
///
/// Pre-computes the mapping table so each conversion is O(1). ASCII text
/// skips the table entirely.
#[derive(Debug, Clone)]
pub struct SpanConverter<'a> {
    text: &'a str,
    char_to_byte: Vec<usize>,
    char_len: usize,
}

impl<'a> SpanConverter<'a> {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        if text.is_ascii() {
            Self {
                text,
                char_to_byte: Vec::new(),
                char_len: text.len(),
            }
        } else {
            let char_to_byte = build_char_to_byte_map(text);
            let char_len = char_to_byte.len() - 1;
            Self {
                text,
                char_to_byte,
                char_len,
            }
        }
    }

    /// Length of the text in characters.
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.char_len
    }

    /// Convert a char offset to a byte offset. `None` past the end.
    #[must_use]
    pub fn char_to_byte(&self, char_idx: usize) -> Option<usize> {
        if char_idx > self.char_len {
            return None;
        }
        if self.char_to_byte.is_empty() {
            Some(char_idx)
        } else {
            self.char_to_byte.get(char_idx).copied()
        }
    }

    /// Convert a char range to the equivalent byte range.
    #[must_use]
    pub fn byte_range(&self, chars: Range<usize>) -> Option<Range<usize>> {
        if chars.start > chars.end {
            return None;
        }
        Some(self.char_to_byte(chars.start)?..self.char_to_byte(chars.end)?)
    }

    /// Slice the text by character offsets. `None` if out of range or reversed.
    #[must_use]
    pub fn slice(&self, char_start: usize, char_end: usize) -> Option<&'a str> {
        let range = self.byte_range(char_start..char_end)?;
        self.text.get(range)
    }

    /// Check if this text is ASCII.
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.char_to_byte.is_empty()
    }
}
