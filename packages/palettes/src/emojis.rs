//! Editing helpers for a palette's emoji string.
//!
//! A palette's emojis are a display-ordered set of extended grapheme
//! clusters: a flag, a skin-toned hand or a ZWJ family is one token, never
//! split into its scalars. The store itself never applies these; they are
//! for the palette editor.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Remove repeated emojis, keeping the first occurrence of each
pub fn uniqued(emojis: &str) -> String {
    let mut seen = HashSet::new();
    emojis
        .graphemes(true)
        .filter(|g| seen.insert(*g))
        .collect()
}

/// The distinct emojis of a palette, one string per token, in display order
pub fn tokens(emojis: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    emojis
        .graphemes(true)
        .filter(|g| seen.insert(*g))
        .map(String::from)
        .collect()
}

/// Whether the grapheme cluster `cluster` is an emoji.
///
/// A cluster qualifies when it starts with a pictographic scalar, or when it
/// is a keycap sequence such as `1️⃣`.
pub fn is_emoji(cluster: &str) -> bool {
    match cluster.chars().next() {
        Some(first) if is_pictographic(first) => true,
        Some('0'..='9' | '#' | '*') => cluster.ends_with('\u{20E3}'),
        _ => false,
    }
}

fn is_pictographic(c: char) -> bool {
    matches!(
        u32::from(c),
        0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x2194..=0x21AA
            | 0x231A..=0x23FF
            | 0x24C2
            | 0x25AA..=0x25FE
            | 0x2600..=0x27BF
            | 0x2934..=0x2935
            | 0x2B05..=0x2B55
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x1F000..=0x1FAFF
    )
}

/// Put newly typed emojis in front of the existing ones, dropping anything
/// that is not an emoji and any repeats
pub fn add_emojis(existing: &str, typed: &str) -> String {
    let mut seen = HashSet::new();
    typed
        .graphemes(true)
        .chain(existing.graphemes(true))
        .filter(|g| is_emoji(g) && seen.insert(*g))
        .collect()
}

/// Remove every occurrence of the emoji `emoji`. Other emojis that merely
/// contain it, like a skin-toned variant, are kept.
pub fn remove_emoji(emojis: &str, emoji: &str) -> String {
    emojis.graphemes(true).filter(|g| *g != emoji).collect()
}
