//! Cross-container fusion of adjacent bracket regions.
//!
//! Two groups produced in different parents, such as a verse split across
//! containers, still form one logical annotation when only letter-free
//! text separates them. This pass deletes such close/open marker pairs,
//! fusing the two visual regions. Once fused, no markers remain between the
//! regions, so re-running is a no-op.

use crate::bracket::is_marker;
use crate::classify::has_letters;
use crate::{CLOSE_ATTR, OPEN_ATTR};
use dom::{Document, NodeKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MarkerKind {
    Open,
    Close,
}

/// Scan all markers in document order and fuse qualifying close→open pairs.
/// Returns the number of pairs removed.
pub fn merge_adjacent(doc: &mut Document) -> u32 {
    let markers = markers_in_document_order(doc);
    let mut merged = 0;
    let mut i = 0;
    while i + 1 < markers.len() {
        let (close, close_kind) = markers[i];
        let (open, open_kind) = markers[i + 1];
        if close_kind == MarkerKind::Close
            && open_kind == MarkerKind::Open
            && !has_letters(&text_between(doc, close, open))
        {
            remove_marker(doc, close);
            remove_marker(doc, open);
            merged += 1;
            // the following open marker is consumed; resume after it
            i += 2;
        } else {
            i += 1;
        }
    }
    if merged > 0 {
        log::debug!(target: "annotate.merge", "fused {merged} bracket pair(s)");
    }
    merged
}

fn markers_in_document_order(doc: &Document) -> Vec<(NodeKey, MarkerKind)> {
    doc.pre_order()
        .into_iter()
        .filter_map(|key| {
            if doc.has_attribute(key, OPEN_ATTR) {
                Some((key, MarkerKind::Open))
            } else if doc.has_attribute(key, CLOSE_ATTR) {
                Some((key, MarkerKind::Close))
            } else {
                None
            }
        })
        .collect()
}

/// Concatenated text of every text node strictly between the two markers in
/// document order, excluding text living inside any marker (including the
/// two endpoints' own glyphs).
fn text_between(doc: &Document, close: NodeKey, open: NodeKey) -> String {
    let order = doc.pre_order();
    let Some(start) = order.iter().position(|&k| k == close) else {
        return String::new();
    };
    let Some(end) = order.iter().position(|&k| k == open) else {
        return String::new();
    };
    let mut out = String::new();
    for &key in &order[start + 1..end] {
        if let Some(text) = doc.node_text(key) {
            if !inside_marker(doc, key) {
                out.push_str(text);
            }
        }
    }
    out
}

fn inside_marker(doc: &Document, key: NodeKey) -> bool {
    let mut current = doc.parent(key);
    while let Some(node) = current {
        if is_marker(doc, node) {
            return true;
        }
        current = doc.parent(node);
    }
    false
}

fn remove_marker(doc: &mut Document, marker: NodeKey) {
    if let Err(err) = doc.remove_subtree(marker) {
        debug_assert!(false, "marker vanished mid-pass: {err:?}");
        log::warn!(target: "annotate.merge", "could not remove {marker:?}: {err:?}");
    }
}
