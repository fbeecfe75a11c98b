use super::{util, Node, Schema, Text};
use derivative::Derivative;
use displaydoc::Display;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use thiserror::Error;

/// A fragment represents a node's collection of child nodes.
///
/// Like nodes, fragments are persistent data structures, and you should not mutate them or their
/// content. Rather, you create new instances whenever needed.
///
/// Fragments are always in canonical form: adjacent text nodes with the same marks are merged
/// and empty text nodes are dropped when the fragment is created.
#[derive(Derivative, Deserialize)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
#[serde(bound(deserialize = ""), from = "Vec<S::Node>")]
pub struct Fragment<S: Schema> {
    inner: Vec<S::Node>,
    #[derivative(PartialEq = "ignore", Debug = "ignore")]
    size: usize,
}

/// Error when looking up a position in a fragment
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Error)]
pub enum IndexError {
    /// Position {0} outside of fragment
    OutOfRange(usize),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Index {
    pub index: usize,
    pub offset: usize,
}

impl<S: Schema> Fragment<S> {
    /// Create a new empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// The size of the fragment, which is the total of the size of its content nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get a slice to all child nodes
    pub fn children(&self) -> &[S::Node] {
        &self.inner[..]
    }

    /// The number of child nodes in this fragment.
    pub fn child_count(&self) -> usize {
        self.inner.len()
    }

    /// Whether the fragment has no children.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the child node at the given index. Panics when the index is out of range.
    pub fn child(&self, index: usize) -> &S::Node {
        &self.inner[index]
    }

    /// Get the child node at the given index, if it exists.
    pub fn maybe_child(&self, index: usize) -> Option<&S::Node> {
        self.inner.get(index)
    }

    /// Invoke a callback for all descendant nodes between the given two positions (relative to
    /// start of this fragment). Doesn't descend into a node when the callback returns `false`.
    pub fn nodes_between<F: FnMut(&S::Node, usize) -> bool>(
        &self,
        from: usize,
        to: usize,
        f: &mut F,
        node_start: usize,
    ) {
        let mut pos = 0;
        for child in &self.inner {
            if pos >= to {
                break;
            }
            let end = pos + child.node_size();
            if end > from && f(child, node_start + pos) {
                if let Some(content) = child.content() {
                    let start = pos + 1;
                    content.nodes_between(
                        from.saturating_sub(start),
                        usize::min(content.size(), to.saturating_sub(start)),
                        f,
                        node_start + start,
                    )
                }
            }
            pos = end;
        }
    }

    /// Get all text between positions from and to. When `block_separator` is given, it will be
    /// inserted whenever a new block node is started. When `leaf_text` is given, it'll be inserted
    /// for every non-text leaf node encountered.
    pub fn text_between(
        &self,
        text: &mut String,
        from: usize,
        to: usize,
        block_separator: Option<&str>,
        leaf_text: Option<&str>,
    ) {
        let mut separated = true;
        self.nodes_between(
            from,
            to,
            &mut |node, pos| {
                if let Some(txt_node) = node.text_node() {
                    let txt = txt_node.text.as_str();
                    let skip = from.saturating_sub(pos);
                    let rest = util::split_at_utf16(txt, skip).1;
                    let slice = util::split_at_utf16(rest, to - pos.max(from)).0;
                    text.push_str(slice);
                    separated = block_separator.is_none();
                } else if node.is_leaf() {
                    if let Some(leaf_text) = leaf_text {
                        text.push_str(leaf_text);
                    }
                    separated = block_separator.is_none();
                } else if !separated && node.is_block() {
                    text.push_str(block_separator.unwrap_or(""));
                    separated = true;
                }
                true
            },
            0,
        )
    }

    /// Create a new fragment in which the node at the given index is replaced by the given node.
    pub fn replace_child(&self, index: usize, node: S::Node) -> Cow<'_, Self> {
        let current = &self.inner[index];
        if *current == node {
            Cow::Borrowed(self)
        } else {
            let size = self.size + node.node_size() - current.node_size();
            let mut copy = self.inner.clone();
            copy[index] = node;
            Cow::Owned(Fragment { inner: copy, size })
        }
    }

    pub(crate) fn find_index(&self, pos: usize, round: bool) -> Result<Index, IndexError> {
        let len = self.inner.len();
        match pos {
            0 => Ok(Index {
                index: 0,
                offset: pos,
            }),
            p if p == self.size => Ok(Index {
                index: len,
                offset: pos,
            }),
            p if p > self.size => Err(IndexError::OutOfRange(p)),
            p => {
                let mut cur_pos = 0;
                for (i, cur) in self.inner.iter().enumerate() {
                    let end = cur_pos + cur.node_size();
                    if end >= p {
                        if (end == p) || round {
                            return Ok(Index {
                                index: i + 1,
                                offset: end,
                            });
                        } else {
                            return Ok(Index {
                                index: i,
                                offset: cur_pos,
                            });
                        }
                    }
                    cur_pos = end;
                }
                Err(IndexError::OutOfRange(p))
            }
        }
    }
}

impl<S: Schema> Default for Fragment<S> {
    fn default() -> Self {
        Self {
            inner: Vec::new(),
            size: 0,
        }
    }
}

impl<S: Schema> Serialize for Fragment<S> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<S: Schema> From<Vec<S::Node>> for Fragment<S> {
    fn from(src: Vec<S::Node>) -> Fragment<S> {
        let mut inner: Vec<S::Node> = Vec::with_capacity(src.len());
        for node in src {
            if let Some(text_node) = node.text_node() {
                if text_node.text.is_empty() {
                    continue;
                }
                if let Some(last) = inner.last_mut() {
                    if let Some(prev) = text_node.same_markup(last) {
                        let joined = format!("{}{}", prev.text.as_str(), text_node.text.as_str());
                        let merged = text_node.with_text(Text::from(joined));
                        *last = S::Node::new_text_node(merged);
                        continue;
                    }
                }
            }
            inner.push(node);
        }
        let size = inner.iter().map(|n| n.node_size()).sum::<usize>();
        Fragment { inner, size }
    }
}

impl<S: Schema> From<Fragment<S>> for Vec<S::Node> {
    fn from(src: Fragment<S>) -> Vec<S::Node> {
        src.inner
    }
}

impl<S: Schema> FromIterator<S::Node> for Fragment<S> {
    fn from_iter<I: IntoIterator<Item = S::Node>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
