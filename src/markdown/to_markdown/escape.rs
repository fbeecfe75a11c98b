use crate::markdown::from_markdown::html::starts_tag;
use crate::markdown::from_markdown::{is_blank, marker_indent, ENTITIES, HEADING_RE, RULE_RE};
use std::borrow::Cow;

/// Write a text run so that the inline scanner reads it back as plain text.
pub(crate) fn escape_text(text: &str, out: &mut String) {
    for (i, c) in text.char_indices() {
        let rest = &text[i + c.len_utf8()..];
        match c {
            '\\' | '[' | ']' => {
                out.push('\\');
                out.push(c);
            }
            '<' if rest.is_empty()
                || rest.starts_with(|n: char| n.is_ascii_alphabetic() || n == '/') =>
            {
                out.push_str("\\<")
            }
            '&' if ENTITIES.iter().any(|(name, _)| text[i..].starts_with(name)) => {
                out.push_str("\\&")
            }
            '\u{a0}' => out.push_str("&nbsp;"),
            '\r' => out.push_str("&#13;"),
            // two spaces before a line end read as a hard break
            '\n' if out.ends_with("  ") => {
                out.pop();
                out.push_str("&#32;\n");
            }
            _ => out.push(c),
        }
    }
}

/// Escape a value for a double-quoted HTML attribute or a `<summary>`.
pub(crate) fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(|c: char| matches!(c, '&' | '"' | '<' | '>' | '[' | ']' | '\n')) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 16);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '[' => out.push_str("&#91;"),
            ']' => out.push_str("&#93;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape the brackets and backslashes of an image alt text.
pub(crate) fn escape_alt(alt: &str, out: &mut String) {
    for c in alt.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Keep every line of inline content from being blank, so the block scanner neither ends the
/// paragraph there nor drops it. A line of blanks starts with `&#32;` or `&#9;`, and a line end
/// that would leave an empty line behind is written as `&#10;`.
pub(crate) fn protect_blank_lines(src: &str) -> Cow<'_, str> {
    if !src.split('\n').any(is_blank) {
        return Cow::Borrowed(src);
    }
    let mut out = String::with_capacity(src.len() + 8);
    // whether the line being written has a non-blank character yet
    let mut filled = false;
    for (i, line) in src.split('\n').enumerate() {
        if i > 0 {
            if filled {
                out.push('\n');
            } else {
                out.push_str("&#10;");
            }
            filled = !filled;
        }
        match line.chars().next() {
            None => {}
            Some(c) if is_blank(line) => {
                out.push_str(if c == '\t' { "&#9;" } else { "&#32;" });
                out.push_str(&line[1..]);
                filled = true;
            }
            Some(_) => {
                out.push_str(line);
                filled = true;
            }
        }
    }
    if !filled && out.ends_with('\n') {
        out.pop();
        out.push_str("&#10;");
    }
    Cow::Owned(out)
}

/// Whether a line of inline content would be read as the start of a block.
fn is_block_start(line: &str) -> bool {
    match marker_indent(line) {
        Some((_, rest)) => {
            ["```", "~~~", ":::"].iter().any(|fence| rest.starts_with(fence))
                || starts_tag(rest, "details")
                || rest.starts_with("</details")
                || HEADING_RE.is_match(line)
                || RULE_RE.is_match(line)
        }
        None => false,
    }
}

/// Put a backslash in front of every line that would otherwise open a block.
pub(crate) fn escape_line_starts(src: &str) -> Cow<'_, str> {
    if !src.split('\n').any(is_block_start) {
        return Cow::Borrowed(src);
    }
    let mut out = String::with_capacity(src.len() + 8);
    for (i, line) in src.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if is_block_start(line) {
            let indent = line.len() - line.trim_start_matches(' ').len();
            out.push_str(&line[..indent]);
            out.push('\\');
            out.push_str(&line[indent..]);
        } else {
            out.push_str(line);
        }
    }
    Cow::Owned(out)
}
