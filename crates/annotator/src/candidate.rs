//! Which emphasis elements qualify as annotations.

use crate::{EMPHASIS_TAGS, EXCLUDED_CLASS, PROCESSED_ATTR};
use dom::{Document, NodeKey};

pub fn is_emphasis_tag(tag: &str) -> bool {
    EMPHASIS_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

/// True iff `key` is a fresh annotation candidate: an `i`/`em` element with
/// non-empty trimmed text, no processed stamp, and not styled as a title.
/// No side effects; a missing or non-element key is simply not a candidate.
pub fn is_annotation_candidate(doc: &Document, key: NodeKey) -> bool {
    let Some(tag) = doc.tag(key) else {
        return false;
    };
    if !is_emphasis_tag(tag) {
        return false;
    }
    if doc.has_attribute(key, PROCESSED_ATTR) {
        return false;
    }
    if doc.has_class(key, EXCLUDED_CLASS) {
        return false;
    }
    !doc.text_content(key).trim().is_empty()
}
