use super::registry::{self, NodeSpec};
use super::{XmdContentMatch, XmdMark, XmdMarkType, XmdNode};
use crate::model::{AttrNode, Block, Fragment, Leaf, NodeType, Schema};
use displaydoc::Display;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

/// The extended markdown schema type
pub struct XMD;

impl Schema for XMD {
    type Node = XmdNode;
    type Mark = XmdMark;
    type MarkType = XmdMarkType;
    type NodeType = XmdNodeType;
    type ContentMatch = XmdContentMatch;
}

/// Errors when building a node from loose input
#[derive(Debug, Display, Error)]
pub enum SchemaError {
    /// Unknown node type `{0}`
    UnknownNodeType(String),
    /// Invalid attributes: {0}
    InvalidAttrs(#[source] serde_json::Error),
    /// Invalid content for node type {0:?}
    InvalidContent(XmdNodeType),
}

/// The node-spec type for the extended markdown schema
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum XmdNodeType {
    /// The document root
    Doc,
    /// A paragraph
    Paragraph,
    /// A heading, e.g. `<h1>`
    Heading,
    /// A code block
    CodeBlock,
    /// A horizontal line `<hr>`
    HorizontalRule,
    /// A collapsible section
    Details,
    /// A callout box
    Callout,
    /// A mind-map
    MindMap,
    /// A quiz
    Quiz,
    /// A text node
    Text,
    /// An image `<img>`
    Image,
    /// A hard break `<br>`
    HardBreak,
}

impl XmdNodeType {
    /// Every node type, in registry order.
    pub const ALL: [XmdNodeType; 12] = [
        Self::Doc,
        Self::Paragraph,
        Self::Heading,
        Self::CodeBlock,
        Self::HorizontalRule,
        Self::Details,
        Self::Callout,
        Self::MindMap,
        Self::Quiz,
        Self::Text,
        Self::Image,
        Self::HardBreak,
    ];

    /// The registry entry of this type.
    pub fn spec(self) -> &'static NodeSpec {
        match self {
            Self::Doc => &registry::DOC,
            Self::Paragraph => &registry::PARAGRAPH,
            Self::Heading => &registry::HEADING,
            Self::CodeBlock => &registry::CODE_BLOCK,
            Self::HorizontalRule => &registry::HORIZONTAL_RULE,
            Self::Details => &registry::DETAILS,
            Self::Callout => &registry::CALLOUT,
            Self::MindMap => &registry::MIND_MAP,
            Self::Quiz => &registry::QUIZ,
            Self::Text => &registry::TEXT,
            Self::Image => &registry::IMAGE,
            Self::HardBreak => &registry::HARD_BREAK,
        }
    }

    /// Look up a node type by its unique name.
    pub fn from_name(name: &str) -> Result<Self, SchemaError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| SchemaError::UnknownNodeType(name.to_owned()))
    }

    /// Whether this is a leaf that is edited as a unit.
    pub fn is_atom(self) -> bool {
        self.spec().atom
    }

    /// The attributes of a node of this type when none are given.
    pub fn default_attrs(self) -> Value {
        let attrs: Map<String, Value> = self
            .spec()
            .attrs
            .iter()
            .map(|attr| (attr.name.to_owned(), attr.default.to_value()))
            .collect();
        Value::Object(attrs)
    }

    /// Create a node of this type from loose attributes and validate its content.
    ///
    /// Unknown attributes are dropped, missing or `null` ones are defaulted. Text nodes carry no
    /// content and are built with [`crate::model::Node::text`] instead.
    pub fn create(self, attrs: Value, content: Fragment<XMD>) -> Result<XmdNode, SchemaError> {
        if !self.valid_content(&content) {
            return Err(SchemaError::InvalidContent(self));
        }
        let node = match self {
            Self::Doc => XmdNode::Doc(Block { content }),
            Self::Paragraph => XmdNode::Paragraph(Block { content }),
            Self::Heading => XmdNode::Heading(attr_node(attrs, content)?),
            Self::CodeBlock => XmdNode::CodeBlock(attr_node(attrs, content)?),
            Self::HorizontalRule => XmdNode::HorizontalRule,
            Self::Details => XmdNode::Details(attr_node(attrs, content)?),
            Self::Callout => XmdNode::Callout(attr_node(attrs, content)?),
            Self::MindMap => XmdNode::MindMap(leaf(attrs)?),
            Self::Quiz => XmdNode::Quiz(leaf(attrs)?),
            Self::Text => return Err(SchemaError::InvalidContent(self)),
            Self::Image => XmdNode::Image(leaf(attrs)?),
            Self::HardBreak => XmdNode::HardBreak,
        };
        Ok(node)
    }
}

fn parse_attrs<A: DeserializeOwned + Default>(attrs: Value) -> Result<A, SchemaError> {
    match attrs {
        Value::Null => Ok(A::default()),
        attrs @ Value::Object(_) => serde_json::from_value(attrs).map_err(SchemaError::InvalidAttrs),
        other => Err(SchemaError::InvalidAttrs(serde::de::Error::custom(format!(
            "expected an object, found {}",
            other
        )))),
    }
}

fn attr_node<A>(attrs: Value, content: Fragment<XMD>) -> Result<AttrNode<XMD, A>, SchemaError>
where
    A: DeserializeOwned + Default,
{
    Ok(AttrNode {
        attrs: parse_attrs(attrs)?,
        content,
    })
}

fn leaf<A: DeserializeOwned + Default>(attrs: Value) -> Result<Leaf<A>, SchemaError> {
    Ok(Leaf {
        attrs: parse_attrs(attrs)?,
    })
}

impl NodeType<XMD> for XmdNodeType {
    fn name(self) -> &'static str {
        self.spec().name
    }

    fn content_match(self) -> XmdContentMatch {
        match self {
            Self::Doc => XmdContentMatch::BlockPlus,
            Self::Paragraph => XmdContentMatch::InlineStar,
            Self::Heading => XmdContentMatch::OrTextImageStar,
            Self::CodeBlock => XmdContentMatch::TextStar,
            Self::Details | Self::Callout => XmdContentMatch::BlockPlus,
            Self::HorizontalRule
            | Self::MindMap
            | Self::Quiz
            | Self::Text
            | Self::Image
            | Self::HardBreak => XmdContentMatch::Empty,
        }
    }

    fn is_block(self) -> bool {
        self.spec().group == Some("block")
    }

    fn is_inline(self) -> bool {
        self.spec().group == Some("inline")
    }

    fn allows_mark_type(self, _mark_type: XmdMarkType) -> bool {
        matches!(self, Self::Paragraph | Self::Heading)
    }
}

#[cfg(test)]
mod tests {
    use super::{SchemaError, XmdNodeType};
    use crate::markdown::helper::{code_block, node, p, spoiler};
    use crate::markdown::XmdNode;
    use crate::model::{Fragment, NodeType};
    use serde_json::json;

    #[test]
    fn names() {
        for t in XmdNodeType::ALL.iter().copied() {
            assert_eq!(XmdNodeType::from_name(t.name()).unwrap(), t);
        }
        assert_eq!(XmdNodeType::MindMap.name(), "mind_map");
        assert!(matches!(
            XmdNodeType::from_name("blockquote"),
            Err(SchemaError::UnknownNodeType(name)) if name == "blockquote"
        ));
    }

    #[test]
    fn create_defaults() {
        let details = XmdNodeType::Details
            .create(json!({"bogus": true}), Fragment::from(vec![p("x")]))
            .unwrap();
        assert_eq!(details.attrs_json(), json!({"title": "Details", "open": false}));
        assert_eq!(
            XmdNodeType::Details.default_attrs(),
            json!({"title": "Details", "open": false})
        );

        let img = XmdNodeType::Image
            .create(json!({"width": 3, "align": null}), Fragment::new())
            .unwrap();
        assert_eq!(
            img.attrs_json(),
            json!({"src": "", "alt": "", "title": "", "width": 10, "align": "center"})
        );
        assert_eq!(
            XmdNodeType::Callout.create(json!(null), Fragment::from(vec![p("")])).unwrap().attrs_json(),
            json!({"category": "info"})
        );
    }

    #[test]
    fn create_rejects() {
        let nested = XmdNodeType::Paragraph.create(json!(null), Fragment::from(vec![p("x")]));
        assert!(matches!(
            nested,
            Err(SchemaError::InvalidContent(XmdNodeType::Paragraph))
        ));

        let empty_callout = XmdNodeType::Callout.create(json!({}), Fragment::new());
        assert!(matches!(empty_callout, Err(SchemaError::InvalidContent(_))));

        let marked_code = XmdNodeType::CodeBlock.create(json!({}), Fragment::from(spoiler("x")));
        assert!(matches!(marked_code, Err(SchemaError::InvalidContent(_))));

        let not_object = XmdNodeType::Heading.create(json!([1]), Fragment::from(node("x")));
        assert!(matches!(not_object, Err(SchemaError::InvalidAttrs(_))));
    }

    #[test]
    fn validity() {
        assert!(XmdNodeType::CodeBlock.valid_content(&Fragment::from(node("fn main() {}"))));
        let code = code_block("rust", "fn main() {}");
        assert!(matches!(code, XmdNode::CodeBlock(_)));
        assert!(!XmdNodeType::Heading.valid_content(&Fragment::from(p("x"))));
    }
}
