use super::{Fragment, MarkSet, ResolveErr, ResolvedPos, Schema, TextNode};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{self, Debug};

/// This trait represents a node in the tree that makes up a document. So a document is an
/// instance of Node, with children that are also instances of Node.
pub trait Node<S: Schema<Node = Self> + 'static>:
    Serialize + for<'de> Deserialize<'de> + Clone + Debug + PartialEq + Eq
{
    /// The type of this node.
    fn r#type(&self) -> S::NodeType;

    /// Get the text and marks if this is a text node
    fn text_node(&self) -> Option<&TextNode<S>>;

    /// Create a new text node
    fn new_text_node(node: TextNode<S>) -> Self;

    /// A container holding the node's children.
    fn content(&self) -> Option<&Fragment<S>>;

    /// Create a new node with the same markup as this node, containing the mapped content.
    fn copy<F>(&self, map: F) -> Self
    where
        F: FnOnce(&Fragment<S>) -> Fragment<S>;

    /// Creates a new text node without marks
    fn text<A: Into<String>>(text: A) -> Self {
        Self::new_text_node(TextNode {
            text: Text::from(text.into()),
            marks: MarkSet::default(),
        })
    }

    /// The marks on this node, if it is a text node.
    fn marks(&self) -> Option<&MarkSet<S>> {
        self.text_node().map(|t| &t.marks)
    }

    /// Resolve the given position in the document, returning a struct with information about its
    /// context.
    fn resolve(&self, pos: usize) -> Result<ResolvedPos<'_, S>, ResolveErr> {
        ResolvedPos::resolve(self, pos)
    }

    /// Concatenates all the text nodes found in this node and its children.
    fn text_content(&self) -> String {
        if let Some(text_node) = self.text_node() {
            text_node.text.as_str().to_owned()
        } else {
            let mut buf = String::new();
            if let Some(c) = self.content() {
                c.text_between(&mut buf, 0, c.size(), None, None);
            }
            buf
        }
    }

    /// Represents `.content.size` in JS
    fn content_size(&self) -> usize {
        self.content().map(Fragment::size).unwrap_or(0)
    }

    /// Get the child node at the given index, if it exists.
    fn child(&self, index: usize) -> Option<&Self> {
        self.content().and_then(|c| c.maybe_child(index))
    }

    /// The number of children that the node has.
    fn child_count(&self) -> usize {
        self.content().map_or(0, Fragment::child_count)
    }

    /// Call `f` for every descendant node, in document order, with its absolute position. Doesn't
    /// descend into a node when the callback returns `false`.
    fn descendants<F: FnMut(&Self, usize) -> bool>(&self, f: &mut F) {
        if let Some(c) = self.content() {
            c.nodes_between(0, c.size(), f, 0);
        }
    }

    /// True when this is a leaf node.
    fn is_leaf(&self) -> bool {
        self.content().is_none()
    }

    /// True when this is a block (non-inline node)
    fn is_block(&self) -> bool {
        self.r#type().is_block()
    }

    /// True when this is an inline node
    fn is_inline(&self) -> bool {
        self.r#type().is_inline()
    }

    /// True when this is a text node.
    fn is_text(&self) -> bool {
        self.text_node().is_some()
    }

    /// The size of this node, as defined by the integer-based indexing scheme. For text nodes,
    /// this is the amount of UTF-16 code units. For other leaf nodes, it is one. For non-leaf
    /// nodes, it is the size of the content plus two (the start and end token).
    fn node_size(&self) -> usize {
        match self.content() {
            Some(c) => c.size() + 2,
            None => match self.text_node() {
                Some(node) => node.text.len_utf16(),
                None => 1,
            },
        }
    }
}

/// The descriptor of a kind of node in a schema.
pub trait NodeType<S: Schema<NodeType = Self>>: Copy + Clone + Debug + PartialEq + Eq {
    /// The unique name of the type.
    fn name(self) -> &'static str;

    /// The starting match of the type's content expression.
    fn content_match(self) -> S::ContentMatch;

    /// True if this is a block type.
    fn is_block(self) -> bool;

    /// True if this is an inline type.
    fn is_inline(self) -> bool;

    /// Check whether the given mark type is allowed in this node.
    fn allows_mark_type(self, mark_type: S::MarkType) -> bool;

    /// Returns true if the given fragment is valid content for this node type.
    fn valid_content(self, fragment: &Fragment<S>) -> bool {
        use super::{ContentMatch, Mark};

        let matched = self
            .content_match()
            .match_fragment(fragment)
            .map_or(false, |m| m.valid_end());

        matched
            && fragment.children().iter().all(|child| {
                child
                    .marks()
                    .map_or(true, |set| set.iter().all(|m| self.allows_mark_type(m.r#type())))
            })
    }
}

/// A string that stores its length in utf-16
#[derive(Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct Text {
    len_utf16: usize,
    content: String,
}

impl Text {
    /// Return the contained string
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// The length of this string if it were encoded in utf-16
    pub fn len_utf16(&self) -> usize {
        self.len_utf16
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.content, f)
    }
}

impl From<String> for Text {
    fn from(src: String) -> Text {
        Text {
            len_utf16: src.encode_utf16().count(),
            content: src,
        }
    }
}

impl From<&str> for Text {
    fn from(src: &str) -> Text {
        Text::from(src.to_owned())
    }
}

impl Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.content.serialize(serializer)
    }
}
