//! # Type registry
//!
//! Static descriptors for every node and mark type: names, content expressions, attribute
//! defaults, the names attributes carry on the wire, and the parse rule each type contributes.
use super::attrs::DEFAULT_DETAILS_TITLE;
use super::from_markdown::{BlockRule, InlineRule};
use super::XmdNodeType;
use serde_json::Value;

/// Legacy spelling of the image alignment attribute, accepted when parsing.
pub const ALIGN: &str = "align";

/// The default value of an attribute
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttrDefault {
    /// A string
    Str(&'static str),
    /// A non-negative integer
    Int(u64),
    /// A boolean
    Bool(bool),
}

impl AttrDefault {
    /// The default as JSON
    pub fn to_value(self) -> Value {
        match self {
            Self::Str(s) => Value::from(s),
            Self::Int(n) => Value::from(n),
            Self::Bool(b) => Value::from(b),
        }
    }
}

/// Descriptor of one attribute
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    /// Name in the JSON form
    pub name: &'static str,
    /// Value used when the attribute is missing
    pub default: AttrDefault,
    /// Where the attribute lives in the markdown form: the HTML attribute of an element form,
    /// or the fence tag of a payload body
    pub wire: &'static str,
}

/// The rule of the markdown parser that produces a type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseRule {
    /// A block-level rule
    Block(BlockRule),
    /// An inline rule
    Inline(InlineRule),
}

/// Descriptor of a node type
#[derive(Debug)]
pub struct NodeSpec {
    /// Unique name
    pub name: &'static str,
    /// Content expression
    pub content: &'static str,
    /// `"block"`, `"inline"` or none for the root
    pub group: Option<&'static str>,
    /// Leaf that is edited as a unit
    pub atom: bool,
    /// Attributes with defaults
    pub attrs: &'static [AttrSpec],
    /// The rule that parses this type, if any
    pub rule: Option<ParseRule>,
}

impl NodeSpec {
    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&'static AttrSpec> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// The markdown name of an attribute, or `name` itself if the type has no such attribute.
    pub fn wire(&self, name: &'static str) -> &'static str {
        self.attr(name).map_or(name, |a| a.wire)
    }
}

/// Descriptor of a mark type
#[derive(Debug)]
pub struct MarkSpec {
    /// Unique name
    pub name: &'static str,
    /// Attributes with defaults
    pub attrs: &'static [AttrSpec],
}

impl MarkSpec {
    /// The markdown name of an attribute, or `name` itself if the mark has no such attribute.
    pub fn wire(&self, name: &'static str) -> &'static str {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map_or(name, |a| a.wire)
    }
}

/// The payload type whose fenced body is tagged `info`, e.g. ```` ```quiz ````.
pub fn payload_type(info: &str) -> Option<XmdNodeType> {
    XmdNodeType::ALL.iter().copied().find(|t| {
        let spec = t.spec();
        spec.rule == Some(ParseRule::Block(BlockRule::Payload))
            && spec.attr("data").map(|a| a.wire) == Some(info)
    })
}

pub(crate) static DOC: NodeSpec = NodeSpec {
    name: "doc",
    content: "block+",
    group: None,
    atom: false,
    attrs: &[],
    rule: None,
};

pub(crate) static PARAGRAPH: NodeSpec = NodeSpec {
    name: "paragraph",
    content: "inline*",
    group: Some("block"),
    atom: false,
    attrs: &[],
    rule: Some(ParseRule::Block(BlockRule::Paragraph)),
};

pub(crate) static HEADING: NodeSpec = NodeSpec {
    name: "heading",
    content: "(text | image)*",
    group: Some("block"),
    atom: false,
    attrs: &[AttrSpec {
        name: "level",
        default: AttrDefault::Int(1),
        wire: "#",
    }],
    rule: Some(ParseRule::Block(BlockRule::Heading)),
};

pub(crate) static CODE_BLOCK: NodeSpec = NodeSpec {
    name: "code_block",
    content: "text*",
    group: Some("block"),
    atom: false,
    attrs: &[AttrSpec {
        name: "params",
        default: AttrDefault::Str(""),
        wire: "info",
    }],
    rule: Some(ParseRule::Block(BlockRule::CodeFence)),
};

pub(crate) static HORIZONTAL_RULE: NodeSpec = NodeSpec {
    name: "horizontal_rule",
    content: "",
    group: Some("block"),
    atom: false,
    attrs: &[],
    rule: Some(ParseRule::Block(BlockRule::Rule)),
};

pub(crate) static DETAILS: NodeSpec = NodeSpec {
    name: "details",
    content: "block+",
    group: Some("block"),
    atom: false,
    attrs: &[
        AttrSpec {
            name: "title",
            default: AttrDefault::Str(DEFAULT_DETAILS_TITLE),
            wire: "summary",
        },
        AttrSpec {
            name: "open",
            default: AttrDefault::Bool(false),
            wire: "open",
        },
    ],
    rule: Some(ParseRule::Block(BlockRule::Collapsible)),
};

pub(crate) static CALLOUT: NodeSpec = NodeSpec {
    name: "callout",
    content: "block+",
    group: Some("block"),
    atom: false,
    attrs: &[AttrSpec {
        name: "category",
        default: AttrDefault::Str("info"),
        wire: "info",
    }],
    rule: Some(ParseRule::Block(BlockRule::Callout)),
};

pub(crate) static MIND_MAP: NodeSpec = NodeSpec {
    name: "mind_map",
    content: "",
    group: Some("block"),
    atom: true,
    attrs: &[AttrSpec {
        name: "data",
        default: AttrDefault::Str(""),
        wire: "mindmap",
    }],
    rule: Some(ParseRule::Block(BlockRule::Payload)),
};

pub(crate) static QUIZ: NodeSpec = NodeSpec {
    name: "quiz",
    content: "",
    group: Some("block"),
    atom: true,
    attrs: &[AttrSpec {
        name: "data",
        default: AttrDefault::Str(""),
        wire: "quiz",
    }],
    rule: Some(ParseRule::Block(BlockRule::Payload)),
};

pub(crate) static TEXT: NodeSpec = NodeSpec {
    name: "text",
    content: "",
    group: Some("inline"),
    atom: false,
    attrs: &[],
    rule: None,
};

pub(crate) static IMAGE: NodeSpec = NodeSpec {
    name: "image",
    content: "",
    group: Some("inline"),
    atom: true,
    attrs: &[
        AttrSpec {
            name: "src",
            default: AttrDefault::Str(""),
            wire: "src",
        },
        AttrSpec {
            name: "alt",
            default: AttrDefault::Str(""),
            wire: "alt",
        },
        AttrSpec {
            name: "title",
            default: AttrDefault::Str(""),
            wire: "title",
        },
        AttrSpec {
            name: "width",
            default: AttrDefault::Int(100),
            wire: "width",
        },
        AttrSpec {
            name: "align",
            default: AttrDefault::Str("center"),
            wire: "data-align",
        },
    ],
    rule: Some(ParseRule::Inline(InlineRule::Image)),
};

pub(crate) static HARD_BREAK: NodeSpec = NodeSpec {
    name: "hard_break",
    content: "",
    group: Some("inline"),
    atom: false,
    attrs: &[],
    rule: Some(ParseRule::Inline(InlineRule::HardBreak)),
};

pub(crate) static SPOILER: MarkSpec = MarkSpec {
    name: "spoiler",
    attrs: &[],
};

pub(crate) static ANNOTATION: MarkSpec = MarkSpec {
    name: "annotation",
    attrs: &[AttrSpec {
        name: "explanation",
        default: AttrDefault::Str(""),
        wire: "data-explanation",
    }],
};
