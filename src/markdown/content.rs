use crate::markdown::{XmdNodeType, XMD};
use crate::model::{ContentMatch, NodeType};

/// The content match type for extended markdown
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum XmdContentMatch {
    /// `inline*`
    InlineStar,
    /// `block+`
    BlockPlus,
    /// `block*`
    BlockStar,
    /// `(text | image)*`
    OrTextImageStar,
    /// `text*`
    TextStar,
    /// empty
    Empty,
}

impl XmdContentMatch {
    /// The content expression as written in the registry.
    pub fn expr(self) -> &'static str {
        match self {
            Self::InlineStar => "inline*",
            Self::BlockPlus => "block+",
            Self::BlockStar => "block*",
            Self::OrTextImageStar => "(text | image)*",
            Self::TextStar => "text*",
            Self::Empty => "",
        }
    }
}

impl ContentMatch<XMD> for XmdContentMatch {
    fn match_type(self, r#type: XmdNodeType) -> Option<Self> {
        match self {
            Self::InlineStar => r#type.is_inline().then_some(Self::InlineStar),
            Self::BlockPlus | Self::BlockStar => r#type.is_block().then_some(Self::BlockStar),
            Self::OrTextImageStar => matches!(r#type, XmdNodeType::Text | XmdNodeType::Image)
                .then_some(Self::OrTextImageStar),
            Self::TextStar => (r#type == XmdNodeType::Text).then_some(Self::TextStar),
            Self::Empty => None,
        }
    }

    fn valid_end(self) -> bool {
        !matches!(self, Self::BlockPlus)
    }
}
