//! Deterministic tree serialization for test comparisons.
//!
//! Not a public stable format. Keys are deliberately omitted so that two
//! trees built through different key sequences compare equal when their
//! structure and content match. The idempotence tests rely on this.

use crate::tree::{Document, NodeKey};
use std::fmt::Write;

pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(root) = doc.root() {
        walk(doc, root, 0, &mut out);
    }
    out
}

fn walk(doc: &Document, key: NodeKey, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if let Some(text) = doc.node_text(key) {
        let _ = writeln!(out, "{indent}text {text:?}");
        return;
    }
    match doc.tag(key) {
        Some(tag) => {
            let _ = write!(out, "{indent}<{tag}");
            for (name, value) in doc.attributes(key) {
                match value {
                    Some(v) => {
                        let _ = write!(out, " {name}={v:?}");
                    }
                    None => {
                        let _ = write!(out, " {name}");
                    }
                }
            }
            let _ = writeln!(out, ">");
        }
        None => {
            let _ = writeln!(out, "{indent}#document");
        }
    }
    for &child in doc.children(key) {
        walk(doc, child, depth + 1, out);
    }
}
