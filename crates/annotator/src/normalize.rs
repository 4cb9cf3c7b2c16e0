//! Bracket boundary normalization.
//!
//! Trailing whitespace and sentence terminators conventionally sit outside a
//! bracketed aside: `<i>really?</i>` should read `[really]?`, not
//! `[really?]`. This pass re-homes such runs across the markers. It works
//! from the current tree state (every marker in the document, not just ones
//! from the latest pass), so re-running it is always safe: once moved, the
//! source text has nothing left to split off.

use crate::classify::{split_leading, split_trailing};
use crate::{CLOSE_ATTR, OPEN_ATTR};
use dom::{Document, DomError, NodeKey};

/// Run both halves over the whole tree; returns how many text runs moved.
/// The close-marker and open-marker halves touch disjoint nodes and may run
/// in either order.
pub fn normalize_boundaries(doc: &mut Document) -> u32 {
    let mut moved = 0;
    for marker in doc.elements_with_attribute(CLOSE_ATTR) {
        match pull_trailing(doc, marker) {
            Ok(true) => moved += 1,
            Ok(false) => {}
            Err(err) => {
                debug_assert!(false, "close marker out of tree: {err:?}");
                log::warn!(target: "annotate.normalize", "skipped {marker:?}: {err:?}");
            }
        }
    }
    for marker in doc.elements_with_attribute(OPEN_ATTR) {
        match pull_leading(doc, marker) {
            Ok(true) => moved += 1,
            Ok(false) => {}
            Err(err) => {
                debug_assert!(false, "open marker out of tree: {err:?}");
                log::warn!(target: "annotate.normalize", "skipped {marker:?}: {err:?}");
            }
        }
    }
    moved
}

/// Move trailing whitespace/terminators from the text just before `close`
/// to just after it.
fn pull_trailing(doc: &mut Document, close: NodeKey) -> Result<bool, DomError> {
    let Some(prev) = doc.prev_sibling(close) else {
        return Ok(false);
    };
    let source = if doc.is_text(prev) {
        prev
    } else {
        match doc.last_text_descendant(prev) {
            Some(node) => node,
            None => return Ok(false),
        }
    };
    let text = match doc.node_text(source) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Ok(false),
    };
    let (body, trailing) = split_trailing(&text);
    if trailing.is_empty() {
        return Ok(false);
    }
    doc.set_text(source, body)?;
    let relocated = doc.create_text(trailing);
    doc.insert_after(relocated, close)?;
    Ok(true)
}

/// Move leading whitespace from the text just after `open` to just before it.
fn pull_leading(doc: &mut Document, open: NodeKey) -> Result<bool, DomError> {
    let Some(next) = doc.next_sibling(open) else {
        return Ok(false);
    };
    let source = if doc.is_text(next) {
        next
    } else {
        match doc.first_text_descendant(next) {
            Some(node) => node,
            None => return Ok(false),
        }
    };
    let text = match doc.node_text(source) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Ok(false),
    };
    let (leading, body) = split_leading(&text);
    if leading.is_empty() {
        return Ok(false);
    }
    doc.set_text(source, body)?;
    let relocated = doc.create_text(leading);
    doc.insert_before(relocated, open)?;
    Ok(true)
}
