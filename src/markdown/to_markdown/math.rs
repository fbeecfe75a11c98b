use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::ops::Range;

static MATH_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$[\s\S]+?\$\$|\$[^$\n]+\$").expect("valid math span regex"));
static ESCAPED_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\\([A-Za-z])").expect("valid math command regex"));

/// Inside `$...$` and `$$...$$`, turn `\\cmd` back into `\cmd`. Tags are left as written.
pub(crate) fn normalize_math(src: &str) -> Cow<'_, str> {
    if !src.contains('$') {
        return Cow::Borrowed(src);
    }
    let tags = tag_ranges(src);
    MATH_SPAN.replace_all(src, |caps: &Captures<'_>| {
        let span = caps.get(0).map_or(0..0, |m| m.range());
        let text = &src[span.clone()];
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in ESCAPED_COMMAND.find_iter(text) {
            let at = span.start + m.start();
            if tags.iter().any(|tag| tag.contains(&at)) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            // drop the first of the two backslashes
            out.push_str(&text[m.start() + 1..m.end()]);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    })
}

/// Byte ranges of the HTML tags in serialized inline content. `\<` is literal text.
fn tag_ranges(src: &str) -> Vec<Range<usize>> {
    let bytes = src.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'<' if bytes
                .get(i + 1)
                .map_or(false, |b| b.is_ascii_alphabetic() || *b == b'/') =>
            {
                match src[i..].find('>') {
                    Some(end) => {
                        ranges.push(i..i + end + 1);
                        i += end + 1;
                    }
                    None => break,
                }
            }
            _ => i += 1,
        }
    }
    ranges
}
