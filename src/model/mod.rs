//! # The document model
//!
//! A schema-generic tree of nodes and marks, patterned on the ProseMirror model and its JSON
//! serialization of nodes. The concrete node and mark types live in [`crate::markdown`].
mod content;
mod fragment;
mod marks;
mod node;
mod resolved_pos;
mod schema;
pub(crate) mod util;

pub use content::ContentMatch;
pub use fragment::{Fragment, IndexError};
pub use marks::{Mark, MarkSet, MarkType};
pub use node::{Node, NodeType, Text};
pub use resolved_pos::{ResolveErr, ResolvedNode, ResolvedPos};
pub use schema::{AttrNode, Block, Leaf, NodeImpl, Schema, TextNode};

#[cfg(test)]
mod tests {
    use super::{Node, ResolvedPos};
    use crate::markdown::{helper::*, XmdNode, XmdNodeType, XMD};

    #[test]
    fn test_deserialize_text() {
        assert_eq!(
            serde_json::from_str::<XmdNode>(r#"{"type": "text", "text": "Foo"}"#).unwrap(),
            XmdNode::text("Foo"),
        );
    }

    #[test]
    fn test_size() {
        assert_eq!(node("Hello").node_size(), 5);
        assert_eq!(node("\u{1F60A}").node_size(), 2);

        let test_3 = p(vec![node("Hallo"), spoiler("Foo")]);
        assert_eq!(test_3.node_size(), 10);
        assert_eq!(test_3.child_count(), 2);
    }

    #[test]
    fn adjacent_runs_merge() {
        let para = p(vec![node("ab"), node("cd"), spoiler("e"), spoiler("f"), node("")]);
        assert_eq!(para, p(vec![node("abcd"), spoiler("ef")]));
    }

    #[test]
    fn test_text_content() {
        let d = doc(vec![
            h1("Title"),
            callout("tip", vec![p(vec![node("a"), hard_break(), spoiler("b")])]),
        ]);
        assert_eq!(d.text_content(), "Titleab");
    }

    #[test]
    fn test_resolve() {
        let test_doc = doc(vec![p("ab"), callout("info", vec![p("cd")])]);
        // <doc> <p> a b </p> <callout> <p> c d </p> </callout> </doc>
        //      0   1 2 3    4         5   6 7 8    9          10

        let pos = ResolvedPos::<XMD>::resolve(&test_doc, 7).unwrap();
        assert_eq!(pos.depth(), 2);
        assert_eq!(pos.parent().r#type(), XmdNodeType::Paragraph);
        assert_eq!(pos.start(2), 6);
        assert_eq!(pos.end(2), 8);
        assert_eq!(pos.before(1), Some(4));
        assert_eq!(pos.after(1), Some(10));
        assert_eq!(pos.text_offset(), 1);

        let (depth, node) = pos
            .ancestor(|n| n.r#type() == XmdNodeType::Callout)
            .unwrap();
        assert_eq!(depth, 1);
        assert_eq!(node, test_doc.child(1).unwrap());

        let top = test_doc.resolve(4).unwrap();
        assert_eq!(top.depth(), 0);
        assert_eq!(top.node_after(), test_doc.child(1));
        assert!(top.ancestor(|n| n.r#type() == XmdNodeType::Callout).is_none());

        assert!(test_doc.resolve(11).is_err());
    }

    #[test]
    fn test_descendants() {
        let test_doc = doc(vec![p("ab"), callout("info", vec![p(image("x.png"))])]);
        let mut seen = vec![];
        test_doc.descendants(&mut |n, pos| {
            seen.push((n.r#type(), pos));
            true
        });
        assert_eq!(
            seen,
            vec![
                (XmdNodeType::Paragraph, 0),
                (XmdNodeType::Text, 1),
                (XmdNodeType::Callout, 4),
                (XmdNodeType::Paragraph, 5),
                (XmdNodeType::Image, 6),
            ]
        );
    }
}
