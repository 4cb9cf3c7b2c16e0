//! Whole-document text collection.

use crate::tree::Document;

/// Concatenated content of every text node in document order, the
/// user-visible text of the page, marker glyphs included.
pub fn visible_text(doc: &Document) -> String {
    match doc.root() {
        Some(root) => doc.text_content(root),
        None => String::new(),
    }
}

/// Sorted multiset of the alphabetic characters in the visible text. Passes
/// over the tree may relocate letters but must never add or drop one.
pub fn letter_multiset(doc: &Document) -> Vec<char> {
    let mut letters: Vec<char> = visible_text(doc)
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect();
    letters.sort_unstable();
    letters
}
