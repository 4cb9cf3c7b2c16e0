//! Document patch protocol.
//!
//! The host never touches [`Document`] internals directly; it mutates the
//! tree by sending ordered patch batches, each carrying the version it
//! starts from and the version it produces.
//!
//! Invariants:
//! - Patches are applied in order; a batch is rejected as a whole on the
//!   first violation.
//! - References must point to live keys at the time they are used (except
//!   the `key` in create operations).
//! - `Clear` must be the first patch of its batch; mid-stream `Clear` is a
//!   protocol violation.
//! - Host-assigned keys must be non-zero and stay below the internal
//!   allocation range (see [`crate::tree`]).
//! - Tags and attribute names are expected to be canonical ASCII-lowercase.

use crate::tree::{Document, DomError, NodeKey, NodeKind};

/// Monotone document version; each applied batch advances it by one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocVersion(pub u64);

impl DocVersion {
    pub const INITIAL: DocVersion = DocVersion(0);

    pub fn next(self) -> DocVersion {
        DocVersion(self.0 + 1)
    }
}

/// One host mutation of the tree.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocPatch {
    /// Drop all existing nodes and invalidate all keys handed out so far.
    Clear,
    /// Create the document root node.
    CreateDocument { key: NodeKey },
    /// Create a detached element node with initial attributes.
    CreateElement {
        key: NodeKey,
        tag: String,
        attributes: Vec<(String, Option<String>)>,
    },
    /// Create a detached text node.
    CreateText { key: NodeKey, text: String },
    /// Append a child to the end of a parent's children list.
    AppendChild { parent: NodeKey, child: NodeKey },
    /// Insert a child before an existing sibling.
    InsertBefore { child: NodeKey, before: NodeKey },
    /// Remove a node and its entire subtree.
    RemoveNode { key: NodeKey },
    /// Replace all attributes on an element node.
    SetAttributes {
        key: NodeKey,
        attributes: Vec<(String, Option<String>)>,
    },
    /// Replace the text content of a text node.
    SetText { key: NodeKey, text: String },
}

#[derive(Debug)]
pub enum PatchError {
    VersionMismatch { expected: DocVersion, got: DocVersion },
    NonMonotonicVersion { from: DocVersion, to: DocVersion },
    MidStreamClear,
    Dom(DomError),
}

impl From<DomError> for PatchError {
    fn from(err: DomError) -> Self {
        PatchError::Dom(err)
    }
}

/// What a successfully applied batch did to the tree, as far as the
/// reactivity driver cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// The batch created the document root.
    pub created_document: bool,
    /// Number of element nodes the batch created. Any non-zero count is a
    /// "children were added" signal; the annotator is idempotent, so
    /// over-triggering is safe.
    pub created_elements: u32,
}

/// A [`Document`] plus the version discipline of the patch protocol.
#[derive(Debug, Default)]
pub struct VersionedDocument {
    doc: Document,
    version: DocVersion,
}

impl VersionedDocument {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
            version: DocVersion::INITIAL,
        }
    }

    pub fn version(&self) -> DocVersion {
        self.version
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Apply one batch. On error the version is left unchanged; the tree may
    /// hold a prefix of the batch, which the caller is expected to treat as
    /// a dead document and rebuild from `Clear`.
    pub fn apply(
        &mut self,
        from: DocVersion,
        to: DocVersion,
        patches: &[DocPatch],
    ) -> Result<BatchSummary, PatchError> {
        if self.version != from {
            return Err(PatchError::VersionMismatch {
                expected: self.version,
                got: from,
            });
        }
        if to != from.next() {
            return Err(PatchError::NonMonotonicVersion { from, to });
        }
        let mut summary = BatchSummary::default();
        for (i, patch) in patches.iter().enumerate() {
            self.apply_one(patch, i, &mut summary)?;
        }
        self.version = to;
        log::trace!(
            target: "dom.patch",
            "applied batch to {to:?}: {} patches, {summary:?}",
            patches.len()
        );
        Ok(summary)
    }

    fn apply_one(
        &mut self,
        patch: &DocPatch,
        index: usize,
        summary: &mut BatchSummary,
    ) -> Result<(), PatchError> {
        match patch {
            DocPatch::Clear => {
                if index != 0 {
                    return Err(PatchError::MidStreamClear);
                }
                self.doc.clear();
            }
            DocPatch::CreateDocument { key } => {
                self.doc.init_root(*key)?;
                summary.created_document = true;
            }
            DocPatch::CreateElement {
                key,
                tag,
                attributes,
            } => {
                self.doc.insert_with_key(
                    *key,
                    NodeKind::Element {
                        tag: tag.clone(),
                        attributes: attributes.clone(),
                    },
                )?;
                summary.created_elements += 1;
            }
            DocPatch::CreateText { key, text } => {
                self.doc
                    .insert_with_key(*key, NodeKind::Text { text: text.clone() })?;
            }
            DocPatch::AppendChild { parent, child } => {
                self.doc.append_child(*parent, *child)?;
            }
            DocPatch::InsertBefore { child, before } => {
                self.doc.insert_before(*child, *before)?;
            }
            DocPatch::RemoveNode { key } => {
                self.doc.remove_subtree(*key)?;
            }
            DocPatch::SetAttributes { key, attributes } => {
                self.doc.set_attributes(*key, attributes)?;
            }
            DocPatch::SetText { key, text } => {
                self.doc.set_text(*key, text)?;
            }
        }
        Ok(())
    }
}
