pub mod patch;
pub mod text;
pub mod tree;

#[cfg(any(test, feature = "dom-snapshot"))]
pub mod snapshot;

pub use crate::patch::{BatchSummary, DocPatch, DocVersion, PatchError, VersionedDocument};
pub use crate::tree::{Document, DomError, NodeKey, NodeKind};
