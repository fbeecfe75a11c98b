//! # SerDe Utilities

use serde::de::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize any JSON scalar into a string, `null` becoming empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Deserialize a boolean, treating anything that is not `true` as `false`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Lower and upper bound of an image width, in percent.
pub const WIDTH_RANGE: (u8, u8) = (10, 100);

/// Clamp a width into [`WIDTH_RANGE`].
pub fn clamp_width(width: i64) -> u8 {
    let (lo, hi) = WIDTH_RANGE;
    width.clamp(i64::from(lo), i64::from(hi)) as u8
}

/// Deserialize an image width from a number or a numeric string (an optional `%` suffix is
/// ignored) and clamp it. Anything unparseable becomes the full width.
pub fn width<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(|f| f.round() as i64),
        Value::String(s) => parse_width(&s),
        _ => None,
    };
    Ok(parsed.map(clamp_width).unwrap_or(WIDTH_RANGE.1))
}

/// Parse the leading integer of a width such as `60`, `60%` or ` 60 `.
pub fn parse_width(src: &str) -> Option<i64> {
    let digits: String = src
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Deserialize a heading level, clamped to `1..=6`.
pub fn heading_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let level = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or(1),
        Value::String(s) => s.trim().parse().unwrap_or(1),
        _ => 1,
    };
    Ok(level.clamp(1, 6) as u8)
}

#[cfg(test)]
mod tests {
    use super::{clamp_width, parse_width};

    #[test]
    fn widths() {
        assert_eq!(clamp_width(5), 10);
        assert_eq!(clamp_width(60), 60);
        assert_eq!(clamp_width(250), 100);
        assert_eq!(parse_width("60%"), Some(60));
        assert_eq!(parse_width(" 42 "), Some(42));
        assert_eq!(parse_width("wide"), None);
    }
}
