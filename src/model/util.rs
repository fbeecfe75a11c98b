/// Split a string at the given offset, counted in UTF-16 code units.
///
/// Offsets in the middle of a surrogate pair round up to the end of the character.
pub fn split_at_utf16(text: &str, mut index: usize) -> (&str, &str) {
    let mut iter = text.chars();
    while index > 0 {
        if let Some(c) = iter.next() {
            index = index.saturating_sub(c.len_utf16());
        } else {
            return (text, "");
        }
    }
    let mid = text.len() - iter.as_str().len();
    text.split_at(mid)
}
