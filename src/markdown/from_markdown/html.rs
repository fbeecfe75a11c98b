//! HTML interop: opening tags with attributes, and character references.
use std::borrow::Cow;

/// An opening tag such as `<img src="a.png" width="60">`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    attrs: Vec<(String, Option<String>)>,
    /// Bytes consumed, including the angle brackets
    pub len: usize,
}

impl Tag {
    /// The decoded value of an attribute. Attributes without a value yield `""`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    /// Whether the attribute is present at all.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Whether `src` starts with `<name` followed by the end of the tag name.
pub(crate) fn starts_tag(src: &str, name: &str) -> bool {
    let bytes = src.as_bytes();
    bytes.first() == Some(&b'<')
        && src
            .get(1..1 + name.len())
            .map_or(false, |n| n.eq_ignore_ascii_case(name))
        && matches!(
            bytes.get(1 + name.len()),
            Some(b'>' | b'/' | b' ' | b'\t' | b'\n')
        )
}

/// Parse an opening tag with the given name at the start of `src`.
pub(crate) fn open_tag(src: &str, name: &str) -> Option<Tag> {
    if !starts_tag(src, name) {
        return None;
    }
    let bytes = src.as_bytes();
    let mut i = 1 + name.len();
    let mut attrs = Vec::new();
    loop {
        while bytes.get(i).map_or(false, u8::is_ascii_whitespace) {
            i += 1;
        }
        match *bytes.get(i)? {
            b'>' => return Some(Tag { attrs, len: i + 1 }),
            b'/' if bytes.get(i + 1) == Some(&b'>') => return Some(Tag { attrs, len: i + 2 }),
            _ => {}
        }

        let start = i;
        while bytes.get(i).map_or(false, |b| is_name_byte(*b)) {
            i += 1;
        }
        if i == start {
            return None;
        }
        let attr = src[start..i].to_ascii_lowercase();

        while bytes.get(i).map_or(false, u8::is_ascii_whitespace) {
            i += 1;
        }
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while bytes.get(i).map_or(false, u8::is_ascii_whitespace) {
                i += 1;
            }
            match *bytes.get(i)? {
                quote @ (b'"' | b'\'') => {
                    let from = i + 1;
                    let to = from + src[from..].find(char::from(quote))?;
                    i = to + 1;
                    Some(decode_entities(&src[from..to]).into_owned())
                }
                _ => {
                    let from = i;
                    while bytes
                        .get(i)
                        .map_or(false, |b| !b.is_ascii_whitespace() && *b != b'>')
                    {
                        i += 1;
                    }
                    Some(decode_entities(&src[from..i]).into_owned())
                }
            }
        } else {
            None
        };
        attrs.push((attr, value));
    }
}

fn named_entity(name: &str) -> Option<char> {
    match name {
        "quot" => Some('"'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Decode `&quot;`, `&amp;`, `&lt;`, `&gt;`, `&apos;`, `&nbsp;` and numeric references.
/// Anything else is kept as written.
pub(crate) fn decode_entities(src: &str) -> Cow<'_, str> {
    if !src.contains('&') {
        return Cow::Borrowed(src);
    }
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| named_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::{decode_entities, open_tag, starts_tag};

    #[test]
    fn entities() {
        assert_eq!(decode_entities("plain"), "plain");
        assert_eq!(
            decode_entities("&quot;a&quot; &amp; &lt;b&gt; &#39;c&#39; &#x41;&#91;&#93;&#10;"),
            "\"a\" & <b> 'c' A[]\n"
        );
        assert_eq!(decode_entities("&unknown; & &;"), "&unknown; & &;");
    }

    #[test]
    fn tags() {
        let tag = open_tag(
            r#"<img src="a b.png" alt='x' width=60% data-align="left" hidden>rest"#,
            "img",
        )
        .unwrap();
        assert_eq!(tag.get("src"), Some("a b.png"));
        assert_eq!(tag.get("alt"), Some("x"));
        assert_eq!(tag.get("width"), Some("60%"));
        assert_eq!(tag.get("DATA-ALIGN"), Some("left"));
        assert_eq!(tag.get("hidden"), Some(""));
        assert!(tag.get("title").is_none());
        assert_eq!(tag.len, 62);

        let tag = open_tag("<details open>", "details").unwrap();
        assert!(tag.has("open"));
        assert_eq!(open_tag("<br/>", "br").unwrap().len, 5);

        assert!(open_tag("<imgx>", "img").is_none());
        assert!(open_tag("<img src=\"a", "img").is_none());
        assert!(!starts_tag("<spa", "span"));
        assert!(starts_tag("<SPAN>", "span"));
    }
}
