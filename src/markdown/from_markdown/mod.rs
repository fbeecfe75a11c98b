//! # Markdown parser
//!
//! A line-oriented block scanner with an ordered list of block rules, and an inline scanner for
//! the text of paragraphs and headings. Parsing never fails: constructs that are not closed or
//! nested too deeply stay in the text as they were written.
mod block;
pub(crate) mod html;
mod inline;

pub use block::BlockRule;
pub(crate) use block::{is_blank, marker_indent, HEADING_RE, RULE_RE};
pub use inline::InlineRule;
pub(crate) use inline::ENTITIES;

use crate::config::Options;
use crate::markdown::XmdNode;
use crate::model::{Block, Node, NodeType};
use block::BlockScanner;

/// Creates an `XmdNode::Doc` from a text, with default options.
pub fn from_markdown(text: &str) -> XmdNode {
    from_markdown_with(text, &Options::default())
}

/// Creates an `XmdNode::Doc` from a text.
pub fn from_markdown_with(text: &str, options: &Options) -> XmdNode {
    let scanner = BlockScanner::new(text, options);
    let content = scanner.container(0..scanner.line_count(), 0);
    let doc = XmdNode::Doc(Block { content });
    debug_assert!(conforms(&doc), "parser built an invalid tree");
    doc
}

fn conforms(node: &XmdNode) -> bool {
    node.content().map_or(true, |content| {
        node.r#type().valid_content(content) && content.children().iter().all(conforms)
    })
}
