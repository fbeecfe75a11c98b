use super::html;
use crate::config::Options;
use crate::de::{clamp_width, parse_width, WIDTH_RANGE};
use crate::markdown::registry::ALIGN;
use crate::markdown::{ImageAlign, ImageAttrs, XmdMark, XmdMarkType, XmdNode, XmdNodeType, XMD};
use crate::model::{Fragment, Leaf, MarkSet, Text, TextNode};
use std::mem;

const SPOILER_OPEN: &str = "::spoiler[";
const SPAN_CLOSE: &str = "</span>";

/// The character references decoded in text
pub(crate) const ENTITIES: [(&str, char); 5] = [
    ("&nbsp;", '\u{a0}'),
    ("&#32;", ' '),
    ("&#9;", '\t'),
    ("&#10;", '\n'),
    ("&#13;", '\r'),
];

/// The inline rules, tried in order at every position
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InlineRule {
    /// `\` before ASCII punctuation or a line end
    Escape,
    /// `&nbsp;` and the whitespace references `&#32;`, `&#9;`, `&#10;` and `&#13;`
    Entity,
    /// Two trailing spaces or `<br>`
    HardBreak,
    /// `::spoiler[...]`
    Spoiler,
    /// `<span data-explanation="...">...</span>`
    Annotation,
    /// `![alt](src "title")` or `<img ...>`
    Image,
}

impl InlineRule {
    /// The order in which rules are tried.
    pub const ORDER: [InlineRule; 6] = [
        Self::Escape,
        Self::Entity,
        Self::HardBreak,
        Self::Spoiler,
        Self::Annotation,
        Self::Image,
    ];
}

enum Token {
    Char(char),
    Break,
    Nodes(Vec<XmdNode>),
    Image(ImageAttrs),
}

/// Accumulates text runs under one mark set
struct Runs<'m> {
    marks: &'m MarkSet<XMD>,
    text: String,
    out: Vec<XmdNode>,
}

impl<'m> Runs<'m> {
    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.out.push(XmdNode::Text(TextNode {
                marks: self.marks.clone(),
                text: Text::from(mem::take(&mut self.text)),
            }));
        }
    }

    fn push(&mut self, node: XmdNode) {
        self.flush();
        self.out.push(node);
    }
}

pub(crate) struct InlineScanner<'o> {
    options: &'o Options,
}

impl<'o> InlineScanner<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Parse the raw inline text of a paragraph (`breaks`) or heading.
    pub fn parse(&self, src: &str, breaks: bool) -> Fragment<XMD> {
        Fragment::from(self.scan(src, &MarkSet::new(), breaks, 0))
    }

    fn scan(&self, src: &str, marks: &MarkSet<XMD>, breaks: bool, depth: usize) -> Vec<XmdNode> {
        let mut runs = Runs {
            marks,
            text: String::new(),
            out: Vec::new(),
        };
        let mut pos = 0;
        while let Some(c) = src[pos..].chars().next() {
            let rest = &src[pos..];
            let matched = InlineRule::ORDER
                .iter()
                .find_map(|rule| self.apply(*rule, rest, marks, breaks, depth));
            match matched {
                Some((len, token)) => {
                    pos += len;
                    match token {
                        Token::Char(c) => runs.text.push(c),
                        Token::Break => runs.push(XmdNode::HardBreak),
                        Token::Nodes(nodes) => {
                            runs.flush();
                            runs.out.extend(nodes);
                        }
                        Token::Image(attrs) => runs.push(XmdNode::Image(Leaf { attrs })),
                    }
                }
                None => {
                    runs.text.push(c);
                    pos += c.len_utf8();
                }
            }
        }
        runs.flush();
        runs.out
    }

    fn apply(
        &self,
        rule: InlineRule,
        rest: &str,
        marks: &MarkSet<XMD>,
        breaks: bool,
        depth: usize,
    ) -> Option<(usize, Token)> {
        match rule {
            InlineRule::Escape => {
                let mut chars = rest.strip_prefix('\\')?.chars();
                match chars.next()? {
                    c if c.is_ascii_punctuation() => Some((2, Token::Char(c))),
                    '\n' if breaks => Some((2, Token::Break)),
                    _ => None,
                }
            }
            InlineRule::Entity => ENTITIES
                .iter()
                .find(|(name, _)| rest.starts_with(name))
                .map(|(name, c)| (name.len(), Token::Char(*c))),
            InlineRule::HardBreak if breaks => hard_break(rest).map(|len| (len, Token::Break)),
            InlineRule::HardBreak => None,
            InlineRule::Spoiler => {
                let body = rest.strip_prefix(SPOILER_OPEN)?;
                let end = balanced_close(body)?;
                if depth >= self.options.max_depth {
                    tracing::debug!(depth, "spoiler nested too deep, kept as text");
                    return None;
                }
                let marks = marks.with(XmdMark::Spoiler);
                let nodes = self.scan(&body[..end], &marks, breaks, depth + 1);
                Some((SPOILER_OPEN.len() + end + 1, Token::Nodes(nodes)))
            }
            InlineRule::Annotation => {
                let tag = html::open_tag(rest, "span")?;
                let explanation = tag.get(XmdMarkType::Annotation.spec().wire("explanation"))?;
                let body = &rest[tag.len..];
                let end = span_close(body)?;
                if depth >= self.options.max_depth {
                    tracing::debug!(depth, "annotation nested too deep, kept as text");
                    return None;
                }
                let marks = marks.with(XmdMark::annotation(explanation));
                let nodes = self.scan(&body[..end], &marks, breaks, depth + 1);
                Some((tag.len + end + SPAN_CLOSE.len(), Token::Nodes(nodes)))
            }
            InlineRule::Image => plain_image(rest)
                .or_else(|| image_element(rest))
                .map(|(len, attrs)| (len, Token::Image(attrs))),
        }
    }
}

/// Two or more spaces before a line end, or a `<br>` tag.
fn hard_break(rest: &str) -> Option<usize> {
    let spaces = rest.bytes().take_while(|b| *b == b' ').count();
    if spaces >= 2 && rest[spaces..].starts_with('\n') {
        return Some(spaces + 1);
    }
    html::open_tag(rest, "br").map(|tag| tag.len)
}

/// The index of the `]` that balances an already consumed `[`. Escaped brackets don't count.
fn balanced_close(src: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut escaped = false;
    for (i, c) in src.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The index of the `</span>` that closes an already consumed `<span>`.
fn span_close(src: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = 0;
    while let Some(c) = src[i..].chars().next() {
        let rest = &src[i..];
        if c == '\\' {
            i += 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
        } else if rest.starts_with(SPAN_CLOSE) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += SPAN_CLOSE.len();
        } else if let Some(tag) = html::open_tag(rest, "span") {
            depth += 1;
            i += tag.len;
        } else {
            i += c.len_utf8();
        }
    }
    None
}

/// Remove backslash escapes in front of ASCII punctuation.
fn unescape(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '\\' && next.is_ascii_punctuation() => {
                out.push(*next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// `![alt](src)`, `![alt](<src>)` or `![alt](src "title")`
fn plain_image(rest: &str) -> Option<(usize, ImageAttrs)> {
    let after = rest.strip_prefix("![")?;
    let alt_end = balanced_close(after)?;
    let tail = after[alt_end + 1..].strip_prefix('(')?;

    let (src, mut i) = if let Some(bracketed) = tail.strip_prefix('<') {
        let end = bracketed.find(|c: char| c == '>' || c == '\n')?;
        if !bracketed[end..].starts_with('>') {
            return None;
        }
        (&bracketed[..end], end + 2)
    } else {
        let end = tail.find(|c: char| c == ' ' || c == '\t' || c == '\n' || c == ')')?;
        (&tail[..end], end)
    };
    i += tail[i..].bytes().take_while(|b| *b == b' ').count();

    let mut title = "";
    if let Some(quoted) = tail[i..].strip_prefix('"') {
        let end = quoted.find('"')?;
        title = &quoted[..end];
        i += end + 2;
        i += tail[i..].bytes().take_while(|b| *b == b' ').count();
    }
    if !tail[i..].starts_with(')') {
        return None;
    }

    let attrs = ImageAttrs {
        src: src.to_owned(),
        alt: unescape(&after[..alt_end]),
        title: title.to_owned(),
        ..ImageAttrs::default()
    };
    Some((2 + alt_end + 2 + i + 1, attrs))
}

/// `<img src=".." alt=".." title=".." width="60" data-align="left">`
fn image_element(rest: &str) -> Option<(usize, ImageAttrs)> {
    let tag = html::open_tag(rest, "img")?;
    let spec = XmdNodeType::Image.spec();
    let attr = |name| tag.get(spec.wire(name)).unwrap_or("").to_owned();
    let width = tag
        .get(spec.wire("width"))
        .and_then(parse_width)
        .map_or(WIDTH_RANGE.1, clamp_width);
    let align = tag
        .get(spec.wire("align"))
        .or_else(|| tag.get(ALIGN))
        .map_or(ImageAlign::Center, ImageAlign::parse);
    let attrs = ImageAttrs {
        src: attr("src"),
        alt: attr("alt"),
        title: attr("title"),
        width,
        align,
    };
    Some((tag.len, attrs))
}

#[cfg(test)]
mod tests {
    use super::{balanced_close, image_element, plain_image, span_close, InlineScanner};
    use crate::config::Options;
    use crate::markdown::helper::{annotated, hard_break, image_with, marked, node, spoiler};
    use crate::markdown::{ImageAlign, ImageAttrs, XmdMark};
    use crate::model::Fragment;

    fn parse(src: &str) -> Fragment<crate::markdown::XMD> {
        InlineScanner::new(&Options::default()).parse(src, true)
    }

    #[test]
    fn brackets() {
        assert_eq!(balanced_close("a]"), Some(1));
        assert_eq!(balanced_close("[a]]"), Some(3));
        assert_eq!(balanced_close(r"a\]b]"), Some(4));
        assert_eq!(balanced_close("[a]"), None);
        assert_eq!(span_close("a</span>"), Some(1));
        assert_eq!(span_close("<span>a</span></span>"), Some(14));
        assert_eq!(span_close(r"\</span></span>"), Some(8));
    }

    #[test]
    fn escapes_and_breaks() {
        assert_eq!(parse(r"\[x\] \a &nbsp;"), Fragment::from(vec![node("[x] \\a \u{a0}")]));
        assert_eq!(
            parse("&#32; a&#10;&#10;b&#9;&#13; &amp; &#33;"),
            Fragment::from(node("  a\n\nb\t\r &amp; &#33;"))
        );
        assert_eq!(
            parse("a  \nb<br/>c\\\nd\ne"),
            Fragment::from(vec![
                node("a"),
                hard_break(),
                node("b"),
                hard_break(),
                node("c"),
                hard_break(),
                node("d\ne"),
            ])
        );
        let heading = InlineScanner::new(&Options::default()).parse("a<br>", false);
        assert_eq!(heading, Fragment::from(node("a<br>")));
    }

    #[test]
    fn marks() {
        assert_eq!(
            parse("a ::spoiler[b [c] \\] d] e"),
            Fragment::from(vec![node("a "), spoiler("b [c] ] d"), node(" e")])
        );
        assert_eq!(
            parse(r#"<span data-explanation="&quot;x&quot; &#91;1&#93;">y ::spoiler[z]</span>"#),
            Fragment::from(vec![
                annotated("y ", "\"x\" [1]"),
                marked("z", vec![XmdMark::Spoiler, XmdMark::annotation("\"x\" [1]")]),
            ])
        );
        assert_eq!(parse("::spoiler[open"), Fragment::from(node("::spoiler[open")));
        assert_eq!(parse("<span>plain</span>"), Fragment::from(node("<span>plain</span>")));
    }

    #[test]
    fn images() {
        let (len, attrs) = plain_image(r#"![a \[b\]](<x y.png> "T") tail"#).unwrap();
        assert_eq!(len, 25);
        assert_eq!(attrs.alt, "a [b]");
        assert_eq!(attrs.src, "x y.png");
        assert_eq!(attrs.title, "T");
        assert!(plain_image("![a](b.png").is_none());

        let (_, attrs) = image_element(r#"<img src="p.png" width="60%" align="right">"#).unwrap();
        assert_eq!((attrs.width, attrs.align), (60, ImageAlign::Right));
        let (_, attrs) = image_element(r#"<img src="p.png" width="huge" data-align="left">"#).unwrap();
        assert_eq!((attrs.width, attrs.align), (100, ImageAlign::Left));
        let (_, attrs) = image_element(r#"<img src="p.png" width="2">"#).unwrap();
        assert_eq!(attrs.width, 10);

        assert_eq!(
            parse("x ![](a.png)"),
            Fragment::from(vec![
                node("x "),
                image_with(ImageAttrs {
                    src: "a.png".into(),
                    ..ImageAttrs::default()
                })
            ])
        );
    }

    #[test]
    fn depth_limit() {
        let options = Options {
            max_depth: 1,
            ..Options::default()
        };
        let parsed = InlineScanner::new(&options).parse("::spoiler[a ::spoiler[b]]", true);
        assert_eq!(parsed, Fragment::from(spoiler("a ::spoiler[b]")));
    }
}
