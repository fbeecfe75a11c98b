use super::html;
use super::inline::InlineScanner;
use crate::config::Options;
use crate::markdown::registry;
use crate::markdown::{
    CalloutAttrs, CalloutCategory, CodeBlockAttrs, DetailsAttrs, HeadingAttrs, MindMapAttrs,
    QuizAttrs, XmdNode, XmdNodeType, XMD,
};
use crate::model::{AttrNode, Block, Fragment, Leaf, Node};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;

pub(crate) static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t](.*))?$").expect("valid heading regex"));
pub(crate) static RULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("valid rule regex")
});

/// The block-level rules, one per construct
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlockRule {
    /// `<details>` or `:::details`
    Collapsible,
    /// `::: info` and the other callout keywords
    Callout,
    /// ```` ```quiz ```` and ```` ```mindmap ````
    Payload,
    /// Fenced code, including colon fences with an unknown keyword
    CodeFence,
    /// `#` to `######`
    Heading,
    /// `---`, `***` or `___`
    Rule,
    /// Everything else
    Paragraph,
}

impl BlockRule {
    /// The order in which rules are tried at a line.
    pub const ORDER: [BlockRule; 7] = [
        Self::Collapsible,
        Self::Callout,
        Self::Payload,
        Self::CodeFence,
        Self::Heading,
        Self::Rule,
        Self::Paragraph,
    ];

    /// Rules that claim several lines up to a closing marker.
    const NESTED: [BlockRule; 4] = [
        Self::Collapsible,
        Self::Callout,
        Self::Payload,
        Self::CodeFence,
    ];
}

/// A line is blank when it only has spaces and tabs.
pub(crate) fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

pub(crate) fn trim_ws(s: &str) -> &str {
    s.trim_matches(|c: char| c == ' ' || c == '\t')
}

/// Strip at most three spaces of indentation.
pub(crate) fn marker_indent(line: &str) -> Option<(usize, &str)> {
    let n = line.bytes().take_while(|b| *b == b' ').count();
    (n <= 3).then(|| (n, &line[n..]))
}

/// Split a fence info string into its keyword and the rest.
fn keyword(info: &str) -> (&str, &str) {
    match info.find(|c: char| c == ' ' || c == '\t') {
        Some(i) => (&info[..i], trim_ws(&info[i..])),
        None => (info, ""),
    }
}

/// An opening or closing fence line
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Fence<'a> {
    pub indent: usize,
    pub ch: u8,
    pub len: usize,
    pub info: &'a str,
}

impl<'a> Fence<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let (indent, rest) = marker_indent(line)?;
        let ch = *rest.as_bytes().first()?;
        if !matches!(ch, b'`' | b'~' | b':') {
            return None;
        }
        let len = rest.bytes().take_while(|b| *b == ch).count();
        if len < 3 {
            return None;
        }
        let info = trim_ws(&rest[len..]);
        if ch == b'`' && info.contains('`') {
            return None;
        }
        Some(Fence {
            indent,
            ch,
            len,
            info,
        })
    }

    /// Colon fences close on the same fence at the same indentation, code fences on a fence
    /// of the same character that is at least as long.
    pub fn closed_by(&self, line: &str) -> bool {
        match Fence::parse(line) {
            Some(close) if close.info.is_empty() && close.ch == self.ch => {
                if self.ch == b':' {
                    close.len == self.len && close.indent == self.indent
                } else {
                    close.len >= self.len
                }
            }
            _ => false,
        }
    }

    fn keyword(&self) -> (&'a str, &'a str) {
        keyword(self.info)
    }
}

/// What a rule would build from a range of lines
#[derive(Debug, Clone)]
enum Claim<'a> {
    Collapsible {
        attrs: DetailsAttrs,
        inner: Range<usize>,
    },
    Callout {
        category: CalloutCategory,
        inner: Range<usize>,
    },
    Payload {
        r#type: XmdNodeType,
        body: Range<usize>,
    },
    CodeFence {
        params: &'a str,
        indent: usize,
        body: Range<usize>,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Rule,
    Paragraph {
        lines: Range<usize>,
    },
}

/// The result of running a rule in silent mode: the claim and the first line after it.
#[derive(Debug, Clone)]
struct Span<'a> {
    claim: Claim<'a>,
    next: usize,
}

/// A silent-mode query: rule, first line, line limit and depth
type ScanKey = (BlockRule, usize, usize, usize);

pub(crate) struct BlockScanner<'a> {
    lines: Vec<&'a str>,
    options: &'a Options,
    inline: InlineScanner<'a>,
    /// Answers of the multi-line rules. Closing-marker searches ask the same questions again for
    /// every enclosing opener and every paragraph line, so each is computed once.
    scans: RefCell<HashMap<ScanKey, Option<Span<'a>>>>,
}

impl<'a> BlockScanner<'a> {
    pub fn new(text: &'a str, options: &'a Options) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self {
            lines,
            options,
            inline: InlineScanner::new(options),
            scans: RefCell::new(HashMap::new()),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Scan the lines of a container body. An empty body yields one empty paragraph.
    pub fn container(&self, range: Range<usize>, depth: usize) -> Fragment<XMD> {
        let mut nodes = self.blocks(range, depth);
        if nodes.is_empty() {
            nodes.push(XmdNode::Paragraph(Block::default()));
        }
        Fragment::from(nodes)
    }

    fn blocks(&self, range: Range<usize>, depth: usize) -> Vec<XmdNode> {
        let mut nodes = Vec::new();
        let mut line = range.start;
        while line < range.end {
            if is_blank(self.lines[line]) {
                line += 1;
                continue;
            }
            let span = BlockRule::ORDER.iter().find_map(|rule| {
                let span = self.scan(*rule, line, range.end, depth)?;
                tracing::trace!(?rule, line, next = span.next, "block rule matched");
                Some(span)
            });
            match span {
                Some(span) => {
                    line = span.next;
                    nodes.push(self.build(span.claim, depth));
                }
                None => line += 1,
            }
        }
        nodes
    }

    /// Run a rule in silent mode.
    fn scan(&self, rule: BlockRule, start: usize, limit: usize, depth: usize) -> Option<Span<'a>> {
        if !BlockRule::NESTED.contains(&rule) {
            return self.scan_once(rule, start, limit, depth);
        }
        let key = (rule, start, limit, depth);
        if let Some(span) = self.scans.borrow().get(&key) {
            return span.clone();
        }
        let span = self.scan_once(rule, start, limit, depth);
        self.scans.borrow_mut().insert(key, span.clone());
        span
    }

    fn scan_once(
        &self,
        rule: BlockRule,
        start: usize,
        limit: usize,
        depth: usize,
    ) -> Option<Span<'a>> {
        match rule {
            BlockRule::Collapsible => self.collapsible(start, limit, depth),
            BlockRule::Callout => self.callout(start, limit, depth),
            BlockRule::Payload => self.payload(start, limit),
            BlockRule::CodeFence => self.code_fence(start, limit),
            BlockRule::Heading => self.heading(start),
            BlockRule::Rule => RULE_RE.is_match(self.lines[start]).then(|| Span {
                claim: Claim::Rule,
                next: start + 1,
            }),
            BlockRule::Paragraph => Some(self.paragraph(start, limit, depth)),
        }
    }

    /// The line that satisfies `is_close`, skipping nested constructs as a whole so their
    /// closing lines are never taken for ours.
    fn find_close<F>(&self, from: usize, limit: usize, depth: usize, is_close: F) -> Option<usize>
    where
        F: Fn(&str) -> bool,
    {
        let mut line = from;
        while line < limit {
            if is_close(self.lines[line]) {
                return Some(line);
            }
            let nested = BlockRule::NESTED
                .iter()
                .find_map(|rule| self.scan(*rule, line, limit, depth));
            line = match nested {
                Some(span) => span.next,
                None => line + 1,
            };
        }
        None
    }

    fn collapsible(&self, start: usize, limit: usize, depth: usize) -> Option<Span<'a>> {
        if depth >= self.options.max_depth {
            return None;
        }
        let line = self.lines[start];
        if let Some(fence) = Fence::parse(line).filter(|f| f.ch == b':') {
            let (kw, title) = fence.keyword();
            if kw != "details" {
                return None;
            }
            let close = self.find_close(start + 1, limit, depth + 1, |l| fence.closed_by(l))?;
            let title = if title.is_empty() {
                self.options.details_title.clone()
            } else {
                title.to_owned()
            };
            return Some(Span {
                claim: Claim::Collapsible {
                    attrs: DetailsAttrs { title, open: false },
                    inner: start + 1..close,
                },
                next: close + 1,
            });
        }

        let (_, rest) = marker_indent(line)?;
        let tag = html::open_tag(rest, "details")?;
        let after = trim_ws(&rest[tag.len..]);
        let (title, inner_start) = if after.is_empty() {
            let next = (start + 1..limit).find(|&l| !is_blank(self.lines[l]));
            match next.and_then(|l| summary(self.lines[l]).map(|title| (title, l))) {
                Some((title, l)) => (Some(title), l + 1),
                None => (None, start + 1),
            }
        } else {
            (Some(summary(after)?), start + 1)
        };
        let close = self.find_close(inner_start, limit, depth + 1, is_details_close)?;
        Some(Span {
            claim: Claim::Collapsible {
                attrs: DetailsAttrs {
                    title: title.unwrap_or_else(|| self.options.details_title.clone()),
                    open: tag.has(XmdNodeType::Details.spec().wire("open")),
                },
                inner: inner_start..close,
            },
            next: close + 1,
        })
    }

    fn callout(&self, start: usize, limit: usize, depth: usize) -> Option<Span<'a>> {
        if depth >= self.options.max_depth {
            return None;
        }
        let fence = Fence::parse(self.lines[start]).filter(|f| f.ch == b':')?;
        let category = CalloutCategory::from_keyword(fence.keyword().0)?;
        let close = self.find_close(start + 1, limit, depth + 1, |l| fence.closed_by(l))?;
        Some(Span {
            claim: Claim::Callout {
                category,
                inner: start + 1..close,
            },
            next: close + 1,
        })
    }

    fn payload(&self, start: usize, limit: usize) -> Option<Span<'a>> {
        let fence = Fence::parse(self.lines[start]).filter(|f| f.ch != b':')?;
        let r#type = registry::payload_type(fence.info)?;
        let close = (start + 1..limit).find(|&l| fence.closed_by(self.lines[l]))?;
        Some(Span {
            claim: Claim::Payload {
                r#type,
                body: start + 1..close,
            },
            next: close + 1,
        })
    }

    fn code_fence(&self, start: usize, limit: usize) -> Option<Span<'a>> {
        let fence = Fence::parse(self.lines[start])?;
        if fence.ch == b':' {
            // bare colon fences only close, known keywords belong to the container rules
            let kw = fence.keyword().0;
            if kw.is_empty() || kw == "details" || CalloutCategory::from_keyword(kw).is_some() {
                return None;
            }
        }
        let close = (start + 1..limit).find(|&l| fence.closed_by(self.lines[l]))?;
        Some(Span {
            claim: Claim::CodeFence {
                params: fence.info,
                indent: fence.indent,
                body: start + 1..close,
            },
            next: close + 1,
        })
    }

    fn heading(&self, start: usize) -> Option<Span<'a>> {
        let line = self.lines[start];
        let caps = HEADING_RE.captures(line)?;
        let level = caps.get(1).map_or(1, |m| m.len()) as u8;
        let text = caps.get(2).map_or("", |m| &line[m.range()]);
        Some(Span {
            claim: Claim::Heading { level, text },
            next: start + 1,
        })
    }

    fn paragraph(&self, start: usize, limit: usize, depth: usize) -> Span<'a> {
        let mut end = start + 1;
        while end < limit && !is_blank(self.lines[end]) && !self.interrupts(end, limit, depth) {
            end += 1;
        }
        Span {
            claim: Claim::Paragraph { lines: start..end },
            next: end,
        }
    }

    fn interrupts(&self, line: usize, limit: usize, depth: usize) -> bool {
        BlockRule::ORDER
            .iter()
            .filter(|rule| **rule != BlockRule::Paragraph)
            .any(|rule| self.scan(*rule, line, limit, depth).is_some())
    }

    fn build(&self, claim: Claim<'a>, depth: usize) -> XmdNode {
        match claim {
            Claim::Collapsible { attrs, inner } => XmdNode::Details(AttrNode {
                attrs,
                content: self.container(inner, depth + 1),
            }),
            Claim::Callout { category, inner } => XmdNode::Callout(AttrNode {
                attrs: CalloutAttrs { category },
                content: self.container(inner, depth + 1),
            }),
            Claim::Payload { r#type, body } => {
                let data = self.lines[body].join("\n");
                if r#type == XmdNodeType::MindMap {
                    XmdNode::MindMap(Leaf {
                        attrs: MindMapAttrs { data },
                    })
                } else {
                    XmdNode::Quiz(Leaf {
                        attrs: QuizAttrs { data },
                    })
                }
            }
            Claim::CodeFence {
                params,
                indent,
                body,
            } => {
                let text = self.lines[body]
                    .iter()
                    .map(|line| {
                        let strip = line.bytes().take(indent).take_while(|b| *b == b' ').count();
                        &line[strip..]
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                XmdNode::CodeBlock(AttrNode {
                    attrs: CodeBlockAttrs {
                        params: params.to_owned(),
                    },
                    content: Fragment::from(vec![XmdNode::text(text)]),
                })
            }
            Claim::Heading { level, text } => XmdNode::Heading(AttrNode {
                attrs: HeadingAttrs { level },
                content: self.inline.parse(text, false),
            }),
            Claim::Rule => XmdNode::HorizontalRule,
            Claim::Paragraph { lines } => {
                let lines = &self.lines[lines];
                for line in lines.iter().filter(|l| opens_construct(l)) {
                    tracing::debug!(line = %line, depth, "unterminated construct kept as text");
                }
                let raw = lines.join("\n");
                if raw == "\u{a0}" {
                    XmdNode::Paragraph(Block::default())
                } else {
                    XmdNode::Paragraph(Block {
                        content: self.inline.parse(&raw, true),
                    })
                }
            }
        }
    }
}

/// Parse `<summary>title</summary>` filling a whole line.
fn summary(line: &str) -> Option<String> {
    let line = trim_ws(line);
    let name = XmdNodeType::Details.spec().wire("title");
    let tag = html::open_tag(line, name)?;
    let rest = &line[tag.len..];
    let close = format!("</{}>", name);
    let end = rest.find(&close)?;
    if !trim_ws(&rest[end + close.len()..]).is_empty() {
        return None;
    }
    Some(html::decode_entities(&rest[..end]).into_owned())
}

fn is_details_close(line: &str) -> bool {
    marker_indent(line).map_or(false, |(_, rest)| {
        trim_ws(rest).eq_ignore_ascii_case("</details>")
    })
}

/// Whether a line syntactically opens a fenced or collapsible construct.
fn opens_construct(line: &str) -> bool {
    Fence::parse(line).map_or(false, |f| !f.info.is_empty())
        || marker_indent(line).map_or(false, |(_, rest)| html::starts_tag(rest, "details"))
}
