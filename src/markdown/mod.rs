//! # The extended markdown schema
//!
//! This module is derived from the `prosemirror-markdown` schema and the
//! the general JSON serialization of nodes, extended with collapsible sections,
//! callouts, payload blocks, spoilers and annotations.
pub mod anchors;
mod attrs;
mod content;
pub mod from_markdown;
pub mod helper;
pub mod registry;
mod schema;
pub mod to_markdown;

use crate::model::{AttrNode, Block, Fragment, Leaf, Mark, MarkType, Node, NodeImpl, TextNode};
pub use attrs::{
    AnnotationAttrs, CalloutAttrs, CalloutCategory, CodeBlockAttrs, DetailsAttrs, HeadingAttrs,
    ImageAlign, ImageAttrs, MindMapAttrs, QuizAttrs, DEFAULT_DETAILS_TITLE,
};
pub use content::XmdContentMatch;
pub use from_markdown::{from_markdown, from_markdown_with};
pub use schema::{SchemaError, XmdNodeType, XMD};
pub use to_markdown::{to_markdown, to_markdown_with};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The node type for the extended markdown schema
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum XmdNode {
    /// The document root
    Doc(Block<XMD>),
    /// A paragraph
    Paragraph(Block<XMD>),
    /// A heading, e.g. `<h1>`
    Heading(AttrNode<XMD, HeadingAttrs>),
    /// A code block
    CodeBlock(AttrNode<XMD, CodeBlockAttrs>),
    /// A horizontal line `<hr>`
    HorizontalRule,
    /// A collapsible section `<details>`
    Details(AttrNode<XMD, DetailsAttrs>),
    /// A categorized callout box
    Callout(AttrNode<XMD, CalloutAttrs>),
    /// A mind-map, stored as raw JSON
    MindMap(Leaf<MindMapAttrs>),
    /// A quiz, stored as raw JSON
    Quiz(Leaf<QuizAttrs>),
    /// A text node
    Text(TextNode<XMD>),
    /// An image `<img>`
    Image(Leaf<ImageAttrs>),
    /// A hard break `<br>`
    HardBreak,
}

impl From<TextNode<XMD>> for XmdNode {
    fn from(text_node: TextNode<XMD>) -> Self {
        Self::Text(text_node)
    }
}

impl From<&str> for XmdNode {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl Node<XMD> for XmdNode {
    fn r#type(&self) -> XmdNodeType {
        match self {
            Self::Doc { .. } => XmdNodeType::Doc,
            Self::Paragraph { .. } => XmdNodeType::Paragraph,
            Self::Heading { .. } => XmdNodeType::Heading,
            Self::CodeBlock { .. } => XmdNodeType::CodeBlock,
            Self::HorizontalRule => XmdNodeType::HorizontalRule,
            Self::Details { .. } => XmdNodeType::Details,
            Self::Callout { .. } => XmdNodeType::Callout,
            Self::MindMap { .. } => XmdNodeType::MindMap,
            Self::Quiz { .. } => XmdNodeType::Quiz,
            Self::Text { .. } => XmdNodeType::Text,
            Self::Image { .. } => XmdNodeType::Image,
            Self::HardBreak => XmdNodeType::HardBreak,
        }
    }

    fn text_node(&self) -> Option<&TextNode<XMD>> {
        if let Self::Text(node) = self {
            Some(node)
        } else {
            None
        }
    }

    fn new_text_node(node: TextNode<XMD>) -> Self {
        Self::Text(node)
    }

    fn content(&self) -> Option<&Fragment<XMD>> {
        match self {
            Self::Doc(block) | Self::Paragraph(block) => Some(&block.content),
            Self::Heading(AttrNode { content, .. }) => Some(content),
            Self::CodeBlock(AttrNode { content, .. }) => Some(content),
            Self::Details(AttrNode { content, .. }) => Some(content),
            Self::Callout(AttrNode { content, .. }) => Some(content),
            Self::HorizontalRule
            | Self::MindMap { .. }
            | Self::Quiz { .. }
            | Self::Text { .. }
            | Self::Image { .. }
            | Self::HardBreak => None,
        }
    }

    fn copy<F>(&self, map: F) -> Self
    where
        F: FnOnce(&Fragment<XMD>) -> Fragment<XMD>,
    {
        match self {
            Self::Doc(block) => Self::Doc(block.copy(map)),
            Self::Paragraph(block) => Self::Paragraph(block.copy(map)),
            Self::Heading(node) => Self::Heading(node.copy(map)),
            Self::CodeBlock(node) => Self::CodeBlock(node.copy(map)),
            Self::Details(node) => Self::Details(node.copy(map)),
            Self::Callout(node) => Self::Callout(node.copy(map)),
            _ => self.clone(),
        }
    }
}

impl XmdNode {
    /// A snapshot of the node's attributes as a JSON object. Types without attributes yield an
    /// empty object.
    pub fn attrs_json(&self) -> Value {
        let attrs = match self {
            Self::Heading(node) => serde_json::to_value(&node.attrs),
            Self::CodeBlock(node) => serde_json::to_value(&node.attrs),
            Self::Details(node) => serde_json::to_value(&node.attrs),
            Self::Callout(node) => serde_json::to_value(&node.attrs),
            Self::MindMap(leaf) => serde_json::to_value(&leaf.attrs),
            Self::Quiz(leaf) => serde_json::to_value(&leaf.attrs),
            Self::Image(leaf) => serde_json::to_value(&leaf.attrs),
            _ => Ok(Value::Object(Map::new())),
        };
        attrs.unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Rebuild this node with one attribute replaced, going through the same defaulting and
    /// clamping as [`XmdNodeType::create`].
    pub fn with_attr(&self, name: &str, value: Value) -> Result<XmdNode, SchemaError> {
        let mut attrs = match self.attrs_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        attrs.insert(name.to_owned(), value);
        let content = self.content().cloned().unwrap_or_default();
        self.r#type().create(Value::Object(attrs), content)
    }
}

/// The marks that can be on some span
#[derive(Debug, Hash, Eq, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum XmdMark {
    /// hidden until revealed
    Spoiler,
    /// carries an explanation
    Annotation {
        /// The attributes
        #[serde(default)]
        attrs: AnnotationAttrs,
    },
}

impl XmdMark {
    /// Create an annotation mark.
    pub fn annotation<A: Into<String>>(explanation: A) -> Self {
        Self::Annotation {
            attrs: AnnotationAttrs {
                explanation: explanation.into(),
            },
        }
    }
}

impl Mark<XMD> for XmdMark {
    fn r#type(&self) -> XmdMarkType {
        match self {
            Self::Spoiler => XmdMarkType::Spoiler,
            Self::Annotation { .. } => XmdMarkType::Annotation,
        }
    }
}

/// The type of an extended markdown mark. The declaration order is the rank.
#[derive(Debug, Hash, Eq, Copy, Clone, PartialEq, PartialOrd, Ord)]
pub enum XmdMarkType {
    /// hidden until revealed
    Spoiler,
    /// carries an explanation
    Annotation,
}

impl XmdMarkType {
    /// The unique name of the mark type.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// The registry entry of this mark type.
    pub fn spec(self) -> &'static registry::MarkSpec {
        match self {
            Self::Spoiler => &registry::SPOILER,
            Self::Annotation => &registry::ANNOTATION,
        }
    }
}

impl MarkType for XmdMarkType {}

#[cfg(test)]
mod tests {
    use super::helper::{annotated, doc, h1, hard_break, image_with, node, p, quiz};
    use super::{ImageAlign, ImageAttrs, XmdMark, XmdNode, XmdNodeType, XMD};
    use crate::model::{MarkSet, Node};
    use serde_json::json;

    #[test]
    fn json_form() {
        let d = doc(vec![
            h1("Title"),
            p(vec![node("a"), hard_break(), annotated("b", "why")]),
            quiz("{}"),
        ]);
        let value = serde_json::to_value(&d).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "doc",
                "content": [
                    {"type": "heading", "attrs": {"level": 1}, "content": [
                        {"type": "text", "text": "Title"}
                    ]},
                    {"type": "paragraph", "content": [
                        {"type": "text", "text": "a"},
                        {"type": "hard_break"},
                        {"type": "text", "text": "b", "marks": [
                            {"type": "annotation", "attrs": {"explanation": "why"}}
                        ]}
                    ]},
                    {"type": "quiz", "attrs": {"data": "{}"}}
                ]
            })
        );
        let back: XmdNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn loose_attrs() {
        let img: XmdNode = serde_json::from_value(json!({
            "type": "image",
            "attrs": {"src": "a.png", "width": "250%", "align": "sideways", "extra": 1}
        }))
        .unwrap();
        assert_eq!(
            img,
            image_with(ImageAttrs {
                src: "a.png".into(),
                ..ImageAttrs::default()
            })
        );

        let h: XmdNode =
            serde_json::from_value(json!({"type": "heading", "attrs": {"level": null}})).unwrap();
        assert_eq!(h.attrs_json(), json!({"level": 1}));
    }

    #[test]
    fn with_attr() {
        let img = image_with(ImageAttrs::default());
        let moved = img.with_attr("align", json!("left")).unwrap();
        let resized = moved.with_attr("width", json!(5)).unwrap();
        assert_eq!(resized.r#type(), XmdNodeType::Image);
        if let XmdNode::Image(leaf) = resized {
            assert_eq!(leaf.attrs.align, ImageAlign::Left);
            assert_eq!(leaf.attrs.width, 10);
        } else {
            panic!("not an image");
        }
    }

    #[test]
    fn mark_rank() {
        let set: MarkSet<XMD> = MarkSet::from(vec![XmdMark::annotation("x"), XmdMark::Spoiler]);
        let order: Vec<_> = set.iter().cloned().collect();
        assert_eq!(order, vec![XmdMark::Spoiler, XmdMark::annotation("x")]);

        let replaced = set.with(XmdMark::annotation("y"));
        assert_eq!(replaced.len(), 2);
        assert!(replaced.contains(&XmdMark::annotation("y")));
    }
}
