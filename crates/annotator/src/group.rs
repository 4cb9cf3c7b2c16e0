//! Grouping of adjacent annotation candidates.

use crate::candidate::{is_annotation_candidate, is_emphasis_tag};
use crate::classify::has_letters;
use dom::{Document, NodeKey};

/// Greedy forward walk from `start` over its next siblings, collecting the
/// maximal run of further candidates reachable through mergeable spans.
/// Always returns at least `start`; members share `start`'s parent.
pub fn find_group(doc: &Document, start: NodeKey) -> Vec<NodeKey> {
    let mut group = vec![start];
    let mut current = start;

    loop {
        let mut next_candidate = None;
        let mut span = Vec::new();
        let mut sibling = doc.next_sibling(current);

        while let Some(node) = sibling {
            if doc.tag(node).is_some_and(is_emphasis_tag) {
                // A fresh candidate extends the chain; a processed emphasis
                // element ends it either way.
                if is_annotation_candidate(doc, node) {
                    next_candidate = Some(node);
                }
                break;
            }
            span.push(node);
            sibling = doc.next_sibling(node);
        }

        match next_candidate {
            Some(next) if span_is_mergeable(doc, &span) => {
                group.push(next);
                current = next;
            }
            _ => break,
        }
    }

    group
}

/// A span is mergeable iff nothing in it carries a letter: blank text nodes
/// and elements whose whole text content is letter-free are transparent.
fn span_is_mergeable(doc: &Document, span: &[NodeKey]) -> bool {
    span.iter()
        .all(|&node| !has_letters(&doc.text_content(node)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROCESSED_ATTR;

    struct Fixture {
        doc: Document,
        parent: NodeKey,
    }

    impl Fixture {
        fn new() -> Self {
            let mut doc = Document::new();
            doc.init_root(NodeKey(1)).unwrap();
            let parent = doc.create_element("div", Vec::new());
            doc.append_child(NodeKey(1), parent).unwrap();
            Self { doc, parent }
        }

        fn italic(&mut self, text: &str) -> NodeKey {
            let el = self.doc.create_element("i", Vec::new());
            let t = self.doc.create_text(text);
            self.doc.append_child(self.parent, el).unwrap();
            self.doc.append_child(el, t).unwrap();
            el
        }

        fn text(&mut self, text: &str) -> NodeKey {
            let t = self.doc.create_text(text);
            self.doc.append_child(self.parent, t).unwrap();
            t
        }
    }

    #[test]
    fn space_between_candidates_merges() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        f.text(" ");
        let b = f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a, b]);
    }

    #[test]
    fn comma_between_candidates_merges() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        f.text(", ");
        let b = f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a, b]);
    }

    #[test]
    fn word_between_candidates_splits() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        f.text(" word ");
        f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a]);
    }

    #[test]
    fn adjacent_candidates_with_nothing_between_merge() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        let b = f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a, b]);
    }

    #[test]
    fn three_candidates_chain_into_one_group() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        f.text(" ");
        let b = f.italic("two");
        f.text(" ");
        let c = f.italic("three");
        assert_eq!(find_group(&f.doc, a), vec![a, b, c]);
    }

    #[test]
    fn processed_emphasis_breaks_the_chain() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        f.text(" ");
        let b = f.italic("two");
        f.doc.set_attribute(b, PROCESSED_ATTR, Some("true"));
        f.text(" ");
        f.italic("three");
        assert_eq!(find_group(&f.doc, a), vec![a]);
    }

    #[test]
    fn letter_free_element_in_span_is_transparent() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        let sep = f.doc.create_element("span", Vec::new());
        let sep_text = f.doc.create_text(" … ");
        f.doc.append_child(f.parent, sep).unwrap();
        f.doc.append_child(sep, sep_text).unwrap();
        let b = f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a, b]);
    }

    #[test]
    fn letter_bearing_element_in_span_splits() {
        let mut f = Fixture::new();
        let a = f.italic("one");
        let sep = f.doc.create_element("span", Vec::new());
        let sep_text = f.doc.create_text("and");
        f.doc.append_child(f.parent, sep).unwrap();
        f.doc.append_child(sep, sep_text).unwrap();
        f.italic("two");
        assert_eq!(find_group(&f.doc, a), vec![a]);
    }
}
