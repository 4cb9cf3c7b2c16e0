//! Bracket annotation of emphasized translator insertions.
//!
//! Scans a document tree for italic/strong emphasis elements that act as
//! editorial annotations inside prose and surrounds each logical annotation
//! with a `[`…`]` marker pair, keeping sentence punctuation and surrounding
//! whitespace outside the brackets and clause punctuation inside. The whole
//! pipeline is idempotent: every visited emphasis element is stamped, and
//! stamped elements are never selected again.

pub mod bracket;
pub mod candidate;
pub mod classify;
pub mod group;
pub mod merge;
pub mod normalize;
pub mod pipeline;

/// Monotone per-node stamp; set on every visited emphasis element (bracketed
/// or skipped) and never cleared.
pub const PROCESSED_ATTR: &str = "data-bracket-processed";

/// Marks the element holding the literal `[`.
pub const OPEN_ATTR: &str = "data-bracket-open";

/// Marks the element holding the literal `]`.
pub const CLOSE_ATTR: &str = "data-bracket-close";

/// Emphasis styled as a title rather than an annotation; never bracketed.
pub const EXCLUDED_CLASS: &str = "MuiTypography-titleArabic";

/// The two conventional inline-emphasis tags.
pub const EMPHASIS_TAGS: [&str; 2] = ["i", "em"];

pub use crate::pipeline::{PassStats, run_pass};
