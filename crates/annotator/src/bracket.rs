//! Marker creation and insertion around a group.

use crate::{CLOSE_ATTR, OPEN_ATTR, PROCESSED_ATTR};
use dom::{Document, DomError, NodeKey};

/// Tag of the inserted marker elements; never an annotation candidate.
const MARKER_TAG: &str = "span";

/// Wrap a group with an open/close marker pair and stamp every member
/// processed. No-op on an empty group; the stamp happens first and is never
/// rolled back (it is the idempotence guarantee, not part of the layout).
pub fn insert_brackets(doc: &mut Document, group: &[NodeKey]) {
    let (Some(&first), Some(&last)) = (group.first(), group.last()) else {
        return;
    };
    for &member in group {
        doc.set_attribute(member, PROCESSED_ATTR, Some("true"));
    }
    if let Err(err) = attach_markers(doc, first, last) {
        debug_assert!(false, "bracket insertion on detached group: {err:?}");
        log::warn!(target: "annotate.bracket", "skipped group at {first:?}: {err:?}");
    }
}

fn attach_markers(doc: &mut Document, first: NodeKey, last: NodeKey) -> Result<(), DomError> {
    let open = make_marker(doc, OPEN_ATTR, "[")?;
    doc.insert_before(open, first)?;
    let close = make_marker(doc, CLOSE_ATTR, "]")?;
    doc.insert_after(close, last)?;
    Ok(())
}

fn make_marker(doc: &mut Document, attr: &str, glyph: &str) -> Result<NodeKey, DomError> {
    let marker = doc.create_element(MARKER_TAG, vec![(attr.to_string(), Some("true".to_string()))]);
    let text = doc.create_text(glyph);
    doc.append_child(marker, text)?;
    Ok(marker)
}

/// True iff `key` is an inserted marker element of either kind.
pub fn is_marker(doc: &Document, key: NodeKey) -> bool {
    doc.has_attribute(key, OPEN_ATTR) || doc.has_attribute(key, CLOSE_ATTR)
}
