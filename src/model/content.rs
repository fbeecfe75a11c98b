use super::{Fragment, Node, Schema};

/// Instances of this trait represent a match state of a node type's content expression, and can
/// be used to find out whether further content matches here, and whether a given position is a
/// valid end of the node.
pub trait ContentMatch<S: Schema<ContentMatch = Self>>: Copy {
    /// Match a node type, returning a match after that node if successful.
    fn match_type(self, r#type: S::NodeType) -> Option<Self>;

    /// True when this match state represents a valid end of the node.
    fn valid_end(self) -> bool;

    /// Try to match a fragment. Returns the resulting match when successful.
    fn match_fragment(self, fragment: &Fragment<S>) -> Option<Self> {
        let mut test = self;
        for child in fragment.children() {
            test = test.match_type(child.r#type())?;
        }
        Some(test)
    }
}
