//! # Helpers
//!
//! This module contains some functions to create nodes programmatically.
//!
//! See also: <https://github.com/prosemirror/prosemirror-test-builder>
use super::{
    CalloutAttrs, CalloutCategory, CodeBlockAttrs, DetailsAttrs, HeadingAttrs, ImageAttrs,
    MindMapAttrs, QuizAttrs, XmdMark, XmdNode, XMD,
};
use crate::model::{self, AttrNode, Block, Leaf, MarkSet, Text, TextNode};

type Fragment = model::Fragment<XMD>;

impl From<&str> for Fragment {
    fn from(s: &str) -> Fragment {
        Fragment::from(vec![XmdNode::from(s)])
    }
}

impl From<XmdNode> for Fragment {
    fn from(node: XmdNode) -> Fragment {
        Fragment::from(vec![node])
    }
}

/// Create a document node.
pub fn doc<A: Into<Fragment>>(content: A) -> XmdNode {
    XmdNode::Doc(Block {
        content: content.into(),
    })
}

/// Create a paragraph node.
pub fn p<A: Into<Fragment>>(content: A) -> XmdNode {
    XmdNode::Paragraph(Block {
        content: content.into(),
    })
}

/// Create a heading node.
pub fn h<A: Into<Fragment>>(level: u8, content: A) -> XmdNode {
    XmdNode::Heading(AttrNode {
        attrs: HeadingAttrs { level },
        content: content.into(),
    })
}

/// Create a heading (level 1) node.
pub fn h1<A: Into<Fragment>>(content: A) -> XmdNode {
    h(1, content)
}

/// Create a heading (level 2) node.
pub fn h2<A: Into<Fragment>>(content: A) -> XmdNode {
    h(2, content)
}

/// Create a code block node.
pub fn code_block<A: Into<Fragment>>(params: &str, content: A) -> XmdNode {
    XmdNode::CodeBlock(AttrNode {
        attrs: CodeBlockAttrs {
            params: params.to_owned(),
        },
        content: content.into(),
    })
}

/// Create a horizontal rule.
pub fn hr() -> XmdNode {
    XmdNode::HorizontalRule
}

/// Create a collapsible section.
pub fn details<A: Into<Fragment>>(title: &str, open: bool, content: A) -> XmdNode {
    XmdNode::Details(AttrNode {
        attrs: DetailsAttrs {
            title: title.to_owned(),
            open,
        },
        content: content.into(),
    })
}

/// Create a callout; an unknown category keyword falls back to `info`.
pub fn callout<A: Into<Fragment>>(category: &str, content: A) -> XmdNode {
    XmdNode::Callout(AttrNode {
        attrs: CalloutAttrs {
            category: CalloutCategory::from_keyword(category).unwrap_or_default(),
        },
        content: content.into(),
    })
}

/// Create a mind-map block.
pub fn mind_map(data: &str) -> XmdNode {
    XmdNode::MindMap(Leaf {
        attrs: MindMapAttrs {
            data: data.to_owned(),
        },
    })
}

/// Create a quiz block.
pub fn quiz(data: &str) -> XmdNode {
    XmdNode::Quiz(Leaf {
        attrs: QuizAttrs {
            data: data.to_owned(),
        },
    })
}

/// Create an image with default layout.
pub fn image(src: &str) -> XmdNode {
    image_with(ImageAttrs {
        src: src.to_owned(),
        ..ImageAttrs::default()
    })
}

/// Create an image with the given attributes.
pub fn image_with(attrs: ImageAttrs) -> XmdNode {
    XmdNode::Image(Leaf { attrs })
}

/// Create a hard break.
pub fn hard_break() -> XmdNode {
    XmdNode::HardBreak
}

/// Create a text node with the given marks.
pub fn marked(content: &str, marks: Vec<XmdMark>) -> XmdNode {
    XmdNode::Text(TextNode {
        text: Text::from(content),
        marks: MarkSet::from(marks),
    })
}

/// Create a text node hidden behind a spoiler.
pub fn spoiler(content: &str) -> XmdNode {
    marked(content, vec![XmdMark::Spoiler])
}

/// Create an annotated text node.
pub fn annotated(content: &str, explanation: &str) -> XmdNode {
    marked(content, vec![XmdMark::annotation(explanation)])
}

/// Create a node.
pub fn node<A: Into<XmdNode>>(src: A) -> XmdNode {
    src.into()
}
