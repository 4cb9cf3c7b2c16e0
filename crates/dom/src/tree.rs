//! Live document tree.
//!
//! A keyed node arena with parent/child links. The host mutates it through
//! the patch protocol in [`crate::patch`]; in-process consumers (the
//! annotator) mutate it directly through the methods here.
//!
//! Invariants:
//! - Keys are never reused within a document; a removed subtree's keys stay
//!   invalid for the document's lifetime.
//! - A node has at most one parent; attach operations must not create cycles.
//! - Element tags and attribute names are expected to be canonical
//!   ASCII-lowercase.
//! - Attribute order and duplicates are preserved; readers must not dedupe.

use std::collections::{HashMap, HashSet};

/// Stable node identity within a document. Zero is reserved as invalid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Document,
    Element {
        tag: String,
        attributes: Vec<(String, Option<String>)>,
    },
    Text {
        text: String,
    },
}

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element { .. })
    }
}

#[derive(Debug)]
pub enum DomError {
    InvalidKey(NodeKey),
    DuplicateKey(NodeKey),
    MissingKey(NodeKey),
    WrongNodeKind(NodeKey),
    InvalidParent(NodeKey),
    InvalidSibling { parent: NodeKey, reference: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
}

/// Host-assigned keys grow from 1; keys the document allocates for itself
/// (via [`Document::create_element`] / [`Document::create_text`]) descend
/// from `u32::MAX`. The two ranges must not meet in practice.
const INTERNAL_KEY_START: u32 = u32::MAX;

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeKey, usize>,
    allocated: HashSet<NodeKey>,
    root: Option<NodeKey>,
    next_internal: u32,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            allocated: HashSet::new(),
            root: None,
            next_internal: INTERNAL_KEY_START,
        }
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Drop all nodes and invalidate every key handed out so far.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.live.clear();
        self.allocated.clear();
        self.root = None;
        self.next_internal = INTERNAL_KEY_START;
    }

    // ---- creation ----

    pub fn insert_with_key(&mut self, key: NodeKey, kind: NodeKind) -> Result<(), DomError> {
        if key == NodeKey::INVALID {
            return Err(DomError::InvalidKey(key));
        }
        if self.allocated.contains(&key) {
            return Err(DomError::DuplicateKey(key));
        }
        let index = self.nodes.len();
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        self.allocated.insert(key);
        self.live.insert(key, index);
        Ok(())
    }

    pub fn init_root(&mut self, key: NodeKey) -> Result<(), DomError> {
        self.insert_with_key(key, NodeKind::Document)?;
        self.root = Some(key);
        Ok(())
    }

    fn alloc_key(&mut self) -> NodeKey {
        let mut key = NodeKey(self.next_internal);
        while self.allocated.contains(&key) {
            self.next_internal -= 1;
            key = NodeKey(self.next_internal);
        }
        self.next_internal = self.next_internal.wrapping_sub(1);
        key
    }

    /// Create a detached element node, allocating a key from the internal
    /// range. Attach it with [`append_child`](Self::append_child) or the
    /// sibling inserts.
    pub fn create_element(
        &mut self,
        tag: &str,
        attributes: Vec<(String, Option<String>)>,
    ) -> NodeKey {
        let key = self.alloc_key();
        let inserted = self.insert_with_key(
            key,
            NodeKind::Element {
                tag: tag.to_string(),
                attributes,
            },
        );
        debug_assert!(inserted.is_ok(), "internal key collision");
        key
    }

    /// Create a detached text node with an internally allocated key.
    pub fn create_text(&mut self, text: &str) -> NodeKey {
        let key = self.alloc_key();
        let inserted = self.insert_with_key(
            key,
            NodeKind::Text {
                text: text.to_string(),
            },
        );
        debug_assert!(inserted.is_ok(), "internal key collision");
        key
    }

    // ---- structure mutation ----

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.check_attach(parent, child)?;
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;
        self.nodes[parent_index].children.push(child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` as a sibling immediately before `reference`.
    pub fn insert_before(&mut self, child: NodeKey, reference: NodeKey) -> Result<(), DomError> {
        let parent = self
            .parent(reference)
            .ok_or(DomError::MissingKey(reference))?;
        self.check_attach(parent, child)?;
        let pos = self.sibling_position(parent, reference)?;
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;
        self.nodes[parent_index].children.insert(pos, child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` as a sibling immediately after `reference`, appending
    /// when `reference` is its parent's last child.
    pub fn insert_after(&mut self, child: NodeKey, reference: NodeKey) -> Result<(), DomError> {
        let parent = self
            .parent(reference)
            .ok_or(DomError::MissingKey(reference))?;
        self.check_attach(parent, child)?;
        let pos = self.sibling_position(parent, reference)?;
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;
        self.nodes[parent_index].children.insert(pos + 1, child);
        self.nodes[child_index].parent = Some(parent);
        Ok(())
    }

    /// Remove a node and its entire subtree; all keys in the subtree become
    /// invalid for the remainder of the document's lifetime.
    pub fn remove_subtree(&mut self, key: NodeKey) -> Result<(), DomError> {
        let index = self.index_of(key)?;
        if let Some(parent) = self.nodes[index].parent.take() {
            if let Some(parent_index) = self.live.get(&parent).copied() {
                self.nodes[parent_index].children.retain(|k| *k != key);
            }
        }
        if self.root == Some(key) {
            self.root = None;
        }
        let children = std::mem::take(&mut self.nodes[index].children);
        self.live.remove(&key);
        for child in children {
            if self.live.contains_key(&child) {
                self.remove_subtree(child)?;
            }
        }
        Ok(())
    }

    // ---- content mutation ----

    /// Replace the text content of a text node.
    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        let index = self.index_of(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    /// Replace all attributes on an element node.
    pub fn set_attributes(
        &mut self,
        key: NodeKey,
        attributes: &[(String, Option<String>)],
    ) -> Result<(), DomError> {
        let index = self.index_of(key)?;
        match &mut self.nodes[index].kind {
            NodeKind::Element { attributes: attrs, .. } => {
                attrs.clear();
                attrs.extend(attributes.iter().cloned());
                Ok(())
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    /// Set a single attribute, replacing the first existing entry with the
    /// same name. Monotone flag writes (processed/marker stamps) go through
    /// here, so this is total: a missing or non-element key is a no-op.
    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: Option<&str>) {
        let Some(&index) = self.live.get(&key) else {
            debug_assert!(false, "set_attribute on missing key");
            return;
        };
        let NodeKind::Element { attributes, .. } = &mut self.nodes[index].kind else {
            debug_assert!(false, "set_attribute on non-element");
            return;
        };
        let value = value.map(str::to_string);
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => attributes.push((name.to_string(), value)),
        }
    }

    // ---- reads ----

    pub fn is_element(&self, key: NodeKey) -> bool {
        self.record(key)
            .is_some_and(|r| matches!(r.kind, NodeKind::Element { .. }))
    }

    pub fn is_text(&self, key: NodeKey) -> bool {
        self.record(key)
            .is_some_and(|r| matches!(r.kind, NodeKind::Text { .. }))
    }

    pub fn tag(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn node_text(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key)?.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&str> {
        match &self.record(key)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    /// Ordered attribute list of an element; empty for other node kinds.
    pub fn attributes(&self, key: NodeKey) -> &[(String, Option<String>)] {
        match self.record(key).map(|r| &r.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn has_attribute(&self, key: NodeKey, name: &str) -> bool {
        match self.record(key).map(|r| &r.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                attributes.iter().any(|(k, _)| k == name)
            }
            _ => false,
        }
    }

    /// Whitespace-token membership test on the `class` attribute.
    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.attribute(key, "class")
            .is_some_and(|v| v.split_whitespace().any(|t| t == class))
    }

    // ---- navigation ----

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.record(key)?.parent
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.record(key).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, key: NodeKey) -> Option<NodeKey> {
        self.children(key).first().copied()
    }

    pub fn prev_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|k| *k == key)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let parent = self.parent(key)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|k| *k == key)?;
        siblings.get(pos + 1).copied()
    }

    // ---- traversal and queries ----

    /// All live keys reachable from the root, in pre-order.
    pub fn pre_order(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.live.len());
        if let Some(root) = self.root {
            self.walk_pre_order(root, &mut out);
        }
        out
    }

    fn walk_pre_order(&self, key: NodeKey, out: &mut Vec<NodeKey>) {
        out.push(key);
        for &child in self.children(key) {
            self.walk_pre_order(child, out);
        }
    }

    /// Pre-order position of every live node; recomputed per call, so it
    /// reflects the current tree state. Used for document-order comparison.
    pub fn position_map(&self) -> HashMap<NodeKey, u32> {
        self.pre_order()
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, i as u32))
            .collect()
    }

    /// Element nodes whose tag matches any of `tags` (ASCII
    /// case-insensitive), in document order. Reflects current tree state on
    /// every call.
    pub fn elements_with_tags(&self, tags: &[&str]) -> Vec<NodeKey> {
        self.pre_order()
            .into_iter()
            .filter(|&key| {
                self.tag(key)
                    .is_some_and(|t| tags.iter().any(|w| t.eq_ignore_ascii_case(w)))
            })
            .collect()
    }

    /// Element nodes carrying the named attribute, in document order.
    pub fn elements_with_attribute(&self, name: &str) -> Vec<NodeKey> {
        self.pre_order()
            .into_iter()
            .filter(|&key| self.has_attribute(key, name))
            .collect()
    }

    /// Concatenated text of the subtree rooted at `key`, in document order.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.collect_text(key, &mut out);
        out
    }

    fn collect_text(&self, key: NodeKey, out: &mut String) {
        match self.record(key).map(|r| &r.kind) {
            Some(NodeKind::Text { text }) => out.push_str(text.as_str()),
            Some(_) => {
                for &child in self.children(key) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// First text node inside the subtree rooted at `key`, depth-first.
    pub fn first_text_descendant(&self, key: NodeKey) -> Option<NodeKey> {
        if self.is_text(key) {
            return Some(key);
        }
        self.children(key)
            .iter()
            .find_map(|&child| self.first_text_descendant(child))
    }

    /// Last text node inside the subtree rooted at `key`, depth-first.
    pub fn last_text_descendant(&self, key: NodeKey) -> Option<NodeKey> {
        if self.is_text(key) {
            return Some(key);
        }
        self.children(key)
            .iter()
            .rev()
            .find_map(|&child| self.last_text_descendant(child))
    }

    pub fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let mut stack: Vec<NodeKey> = self.children(ancestor).to_vec();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            stack.extend_from_slice(self.children(current));
        }
        false
    }

    // ---- internals ----

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        let index = *self.live.get(&key)?;
        Some(&self.nodes[index])
    }

    fn index_of(&self, key: NodeKey) -> Result<usize, DomError> {
        match self.live.get(&key) {
            Some(&index) => Ok(index),
            None => Err(DomError::MissingKey(key)),
        }
    }

    fn sibling_position(&self, parent: NodeKey, reference: NodeKey) -> Result<usize, DomError> {
        self.children(parent)
            .iter()
            .position(|k| *k == reference)
            .ok_or(DomError::InvalidSibling { parent, reference })
    }

    fn check_attach(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;
        if !self.nodes[parent_index].allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if self.nodes[child_index].parent.is_some() {
            return Err(DomError::InvalidParent(child));
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
