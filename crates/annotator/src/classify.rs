//! Character-class predicates and splits over plain text.
//!
//! `has_letters` is the single source of truth for "meaningful content"
//! throughout the passes: a string with no alphabetic character is
//! semantically blank, whatever punctuation it carries.

/// True iff the string contains at least one Unicode alphabetic character,
/// any script.
pub fn has_letters(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Sentence-terminal punctuation. Deliberately narrow: commas and other
/// clause-level marks belong to the annotation's own content and must stay
/// inside the brackets.
fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// True iff the whole string is whitespace and/or sentence terminators.
pub fn is_blank_or_terminal(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || is_terminal(c))
}

/// Split off the longest trailing run of whitespace and/or sentence
/// terminators, in any order. The second half may be empty.
pub fn split_trailing(text: &str) -> (&str, &str) {
    let cut = text
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace() && !is_terminal(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    text.split_at(cut)
}

/// Split off the longest leading run of whitespace. Leading punctuation is
/// never extracted: only sentence terminators move outward, and only at the
/// end.
pub fn split_leading(text: &str) -> (&str, &str) {
    let cut = text
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(cut)
}
