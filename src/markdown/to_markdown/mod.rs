//! # Markdown serializer
//!
//! Writes the extended markdown that [`from_markdown`](super::from_markdown) reads back into an
//! equivalent tree.
mod escape;
mod math;

use self::escape::{
    escape_alt, escape_attr, escape_line_starts, escape_text, protect_blank_lines,
};
use self::math::normalize_math;
use crate::config::Options;
use crate::markdown::registry::{self, NodeSpec};
use crate::markdown::{ImageAttrs, XmdMark, XmdMarkType, XmdNode, XmdNodeType, XMD};
use crate::model::{AttrNode, Block, Fragment, Leaf, Node};
use std::borrow::Cow;
use std::iter;

/// Turn a document into extended markdown, with default options
pub fn to_markdown(doc: &XmdNode) -> String {
    to_markdown_with(doc, &Options::default())
}

/// Turn a document into extended markdown
///
/// Blocks are separated by a blank line and the output ends with a newline, unless the document
/// is a single empty paragraph, which yields the empty string.
///
/// Whitespace that the parser would take for structure is written as a character reference:
/// `&#32;` or `&#9;` opens a line of blanks, `&#10;` stands for a newline that would leave an
/// empty line or that sits in a heading, and a space before a newline after another space is
/// `&#32;` so it does not read as a hard break.
///
/// With [`Options::normalize_math`], `\\cmd` inside `$...$` and `$$...$$` is written as
/// `\cmd`. Tags are left alone, so attribute values such as explanations keep their backslashes.
/// The rewrite has no effect on the text read back.
pub fn to_markdown_with(doc: &XmdNode, options: &Options) -> String {
    let serializer = MarkdownSerializer { options };
    let mut out = match doc {
        XmdNode::Doc(Block { content }) if is_blank(content) => return String::new(),
        XmdNode::Doc(Block { content }) => serializer.blocks(content),
        node => serializer.block(node),
    };
    out.push('\n');
    out
}

fn is_blank(content: &Fragment<XMD>) -> bool {
    match content.children() {
        [] => true,
        [XmdNode::Paragraph(Block { content })] => content.is_empty(),
        _ => false,
    }
}

struct MarkdownSerializer<'o> {
    options: &'o Options,
}

impl<'o> MarkdownSerializer<'o> {
    fn blocks(&self, content: &Fragment<XMD>) -> String {
        content
            .children()
            .iter()
            .map(|child| self.block(child))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn block(&self, node: &XmdNode) -> String {
        match node {
            XmdNode::Doc(Block { content }) => self.blocks(content),
            XmdNode::Paragraph(Block { content }) => {
                let inline = self.inline(content.children());
                if inline.is_empty() {
                    return String::from("\u{a0}");
                }
                let inline = self.math(&inline);
                let inline = protect_blank_lines(&inline);
                escape_line_starts(&inline).into_owned()
            }
            XmdNode::Heading(AttrNode { attrs, content }) => {
                let hashes = "#".repeat(usize::from(attrs.level.clamp(1, 6)));
                let inline = self.inline(content.children());
                if inline.is_empty() {
                    hashes
                } else {
                    format!("{} {}", hashes, self.math(&inline).replace('\n', "&#10;"))
                }
            }
            XmdNode::CodeBlock(AttrNode { attrs, .. }) => {
                // a backtick fence tagged `quiz` or `mindmap` would read back as a payload
                let fence = if attrs.params.contains('`') {
                    '~'
                } else if registry::payload_type(&attrs.params).is_some() {
                    ':'
                } else {
                    '`'
                };
                fenced(fence, &attrs.params, &node.text_content())
            }
            XmdNode::HorizontalRule => String::from("---"),
            XmdNode::Details(AttrNode { attrs, content }) => {
                let spec = XmdNodeType::Details.spec();
                let open = if attrs.open { spec.wire("open") } else { "" };
                format!(
                    "<details{}{}>\n<{summary}>{}</{summary}>\n\n{}\n\n</details>",
                    if open.is_empty() { "" } else { " " },
                    open,
                    escape_attr(&attrs.title),
                    self.blocks(content),
                    summary = spec.wire("title"),
                )
            }
            XmdNode::Callout(AttrNode { attrs, content }) => {
                format!("::: {}\n{}\n:::", attrs.category, self.blocks(content))
            }
            XmdNode::MindMap(Leaf { attrs }) => {
                fenced('`', XmdNodeType::MindMap.spec().wire("data"), &attrs.data)
            }
            XmdNode::Quiz(Leaf { attrs }) => {
                fenced('`', XmdNodeType::Quiz.spec().wire("data"), &attrs.data)
            }
            XmdNode::Text(_) | XmdNode::Image(_) | XmdNode::HardBreak => {
                self.inline(std::slice::from_ref(node))
            }
        }
    }

    fn math<'s>(&self, inline: &'s str) -> Cow<'s, str> {
        if self.options.normalize_math {
            normalize_math(inline)
        } else {
            Cow::Borrowed(inline)
        }
    }

    fn inline(&self, nodes: &[XmdNode]) -> String {
        let mut out = String::new();
        let mut open: Vec<&XmdMark> = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            match node {
                XmdNode::Text(text_node) => {
                    let marks = &text_node.marks;
                    if let Some(first) = open.iter().position(|mark| !marks.contains(mark)) {
                        close_marks(&mut out, &mut open, first);
                    }
                    for mark in marks.iter() {
                        if !open.contains(&mark) {
                            open_mark(&mut out, mark);
                            open.push(mark);
                        }
                    }
                    escape_text(text_node.text.as_str(), &mut out);
                }
                XmdNode::HardBreak => {
                    close_marks(&mut out, &mut open, 0);
                    let alone = index == 0
                        || index + 1 == nodes.len()
                        || matches!(nodes[index - 1], XmdNode::HardBreak)
                        || out.ends_with(|c: char| c == ' ' || c == '\t' || c == '\n');
                    out.push_str(if alone { "<br>" } else { "  \n" });
                }
                XmdNode::Image(Leaf { attrs }) => {
                    close_marks(&mut out, &mut open, 0);
                    image(attrs, &mut out);
                }
                other => {
                    tracing::debug!(node = ?other.r#type(), "block node in inline content skipped");
                }
            }
        }
        close_marks(&mut out, &mut open, 0);
        out
    }
}

fn open_mark(out: &mut String, mark: &XmdMark) {
    match mark {
        XmdMark::Spoiler => out.push_str("::spoiler["),
        XmdMark::Annotation { attrs } => {
            let name = XmdMarkType::Annotation.spec().wire("explanation");
            out.push_str(&format!("<span {}=\"", name));
            out.push_str(&escape_attr(&attrs.explanation));
            out.push_str("\">");
        }
    }
}

/// Close the marks from the top of the stack down to `from`.
fn close_marks(out: &mut String, open: &mut Vec<&XmdMark>, from: usize) {
    while open.len() > from {
        match open.pop() {
            Some(XmdMark::Spoiler) => out.push(']'),
            Some(XmdMark::Annotation { .. }) => out.push_str("</span>"),
            None => break,
        }
    }
}

fn image(attrs: &ImageAttrs, out: &mut String) {
    let plain = attrs.has_default_layout()
        && !attrs.alt.contains('\n')
        && !attrs.src.contains(|c: char| matches!(c, '<' | '>' | '[' | ']' | '"' | '\\' | '\n'))
        && !attrs.title.contains(|c: char| matches!(c, '<' | '[' | ']' | '"' | '\\' | '\n'));
    if plain {
        out.push_str("![");
        escape_alt(&attrs.alt, out);
        out.push_str("](");
        if attrs.src.contains(|c: char| matches!(c, ' ' | '\t' | '(' | ')')) {
            out.push('<');
            out.push_str(&attrs.src);
            out.push('>');
        } else {
            out.push_str(&attrs.src);
        }
        if !attrs.title.is_empty() {
            out.push_str(" \"");
            out.push_str(&attrs.title);
            out.push('"');
        }
        out.push(')');
    } else {
        let spec = XmdNodeType::Image.spec();
        out.push_str("<img");
        element_attr(out, spec, "src", &attrs.src);
        element_attr(out, spec, "alt", &attrs.alt);
        if !attrs.title.is_empty() {
            element_attr(out, spec, "title", &attrs.title);
        }
        element_attr(out, spec, "width", &attrs.width.to_string());
        element_attr(out, spec, "align", attrs.align.as_str());
        out.push('>');
    }
}

fn element_attr(out: &mut String, spec: &NodeSpec, name: &'static str, value: &str) {
    out.push(' ');
    out.push_str(spec.wire(name));
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

/// A fence that no line of the body can close.
fn fenced(ch: char, info: &str, body: &str) -> String {
    let longest = body
        .split(|c: char| c != ch)
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence: String = iter::repeat(ch).take(longest.max(2) + 1).collect();
    format!("{}{}\n{}\n{}", fence, info, body, fence)
}
