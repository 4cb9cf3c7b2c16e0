//! Full annotation pass over a document.
//!
//! Pass order is fixed: bracket every fresh group, then normalize all
//! boundaries, then fuse across containers. Stages communicate only through
//! the mutated tree and the marker/processed attributes, and each stage
//! leaves the tree self-consistent
//! (every open marker has a matching close) before the next starts.

use crate::candidate::is_annotation_candidate;
use crate::group::find_group;
use crate::bracket::insert_brackets;
use crate::merge::merge_adjacent;
use crate::normalize::normalize_boundaries;
use crate::{EMPHASIS_TAGS, PROCESSED_ATTR};
use dom::{Document, NodeKey};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Unprocessed emphasis elements visited this pass, skipped ones
    /// included.
    pub emphasis_visited: u32,
    /// Groups that received a marker pair.
    pub groups_bracketed: u32,
    /// Text runs relocated across a marker by normalization.
    pub boundaries_moved: u32,
    /// Close/open marker pairs deleted by cross-container fusion.
    pub markers_merged: u32,
}

/// Run the full pipeline once. Idempotent: every visited element is stamped,
/// so a second run visits nothing and mutates nothing.
pub fn run_pass(doc: &mut Document) -> PassStats {
    let mut stats = PassStats::default();

    for key in unprocessed_emphasis(doc) {
        stats.emphasis_visited += 1;
        if !is_annotation_candidate(doc, key) {
            // Mark skipped elements too, so later runs ignore them.
            doc.set_attribute(key, PROCESSED_ATTR, Some("true"));
            continue;
        }
        let group = find_group(doc, key);
        log::trace!(
            target: "annotate.pipeline",
            "bracketing group of {} starting at {key:?}",
            group.len()
        );
        insert_brackets(doc, &group);
        stats.groups_bracketed += 1;
    }

    stats.boundaries_moved = normalize_boundaries(doc);
    stats.markers_merged = merge_adjacent(doc);

    log::debug!(target: "annotate.pipeline", "pass complete: {stats:?}");
    stats
}

/// Current unprocessed emphasis elements in document order. Queried fresh so
/// that content added since the last pass is seen; elements stamped earlier
/// in this very pass (group members) are filtered out again by the candidate
/// re-check in the loop above.
fn unprocessed_emphasis(doc: &Document) -> Vec<NodeKey> {
    doc.elements_with_tags(&EMPHASIS_TAGS)
        .into_iter()
        .filter(|&key| !doc.has_attribute(key, PROCESSED_ATTR))
        .collect()
}
