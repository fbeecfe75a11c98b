use crate::de;
use crate::payload::{MindMapPayload, PayloadState, QuizPayload};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The title a collapsible section gets when none is given.
pub const DEFAULT_DETAILS_TITLE: &str = "Details";

/// Attributes for a heading (i.e. `<h1>`, `<h2>`, ...)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadingAttrs {
    /// The level of the heading (i.e. `1` for `<h1>`)
    #[serde(deserialize_with = "de::heading_level")]
    pub level: u8,
}

impl Default for HeadingAttrs {
    fn default() -> Self {
        Self { level: 1 }
    }
}

/// Attributes for a code block
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeBlockAttrs {
    /// The info string after the opening fence
    #[serde(deserialize_with = "de::lenient_string")]
    pub params: String,
}

/// Attributes for a collapsible section
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DetailsAttrs {
    /// The text of the always-visible summary line
    #[serde(deserialize_with = "de::lenient_string")]
    pub title: String,
    /// Whether the section is expanded
    #[serde(deserialize_with = "de::lenient_bool")]
    pub open: bool,
}

impl Default for DetailsAttrs {
    fn default() -> Self {
        Self {
            title: DEFAULT_DETAILS_TITLE.to_owned(),
            open: false,
        }
    }
}

/// The recognized callout categories, in keyword order
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutCategory {
    /// `info`
    #[default]
    Info,
    /// `warning`
    Warning,
    /// `error`
    Error,
    /// `success`
    Success,
    /// `tip`
    Tip,
}

impl CalloutCategory {
    /// All categories; the first one is the default.
    pub const ALL: [CalloutCategory; 5] = [
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Success,
        Self::Tip,
    ];

    /// The keyword used after the callout fence.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Success => "success",
            Self::Tip => "tip",
        }
    }

    /// Look up a category by its exact keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.keyword() == keyword)
    }
}

impl fmt::Display for CalloutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl<'de> Deserialize<'de> for CalloutCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keyword = de::lenient_string(deserializer)?;
        Ok(Self::from_keyword(&keyword).unwrap_or_default())
    }
}

/// Attributes for a callout
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalloutAttrs {
    /// The category keyword
    pub category: CalloutCategory,
}

/// Horizontal placement of an image
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlign {
    /// Flush left
    Left,
    /// Centered
    #[default]
    Center,
    /// Flush right
    Right,
}

impl ImageAlign {
    /// The attribute value on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Parse an attribute value; anything unrecognized is centered.
    pub fn parse(src: &str) -> Self {
        match src.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

impl<'de> Deserialize<'de> for ImageAlign {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::parse(&de::lenient_string(deserializer)?))
    }
}

/// Attributes for an image
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageAttrs {
    /// Source URL
    #[serde(deserialize_with = "de::lenient_string")]
    pub src: String,
    /// Alternative Text (Accessibility)
    #[serde(deserialize_with = "de::lenient_string")]
    pub alt: String,
    /// Title (Tooltip)
    #[serde(deserialize_with = "de::lenient_string")]
    pub title: String,
    /// Width in percent of the available space, within `10..=100`
    #[serde(deserialize_with = "de::width")]
    pub width: u8,
    /// Horizontal placement
    pub align: ImageAlign,
}

impl ImageAttrs {
    /// Whether the image can use the plain `![alt](src)` form.
    pub fn has_default_layout(&self) -> bool {
        self.width == de::WIDTH_RANGE.1 && self.align == ImageAlign::Center
    }
}

impl Default for ImageAttrs {
    fn default() -> Self {
        Self {
            src: String::new(),
            alt: String::new(),
            title: String::new(),
            width: de::WIDTH_RANGE.1,
            align: ImageAlign::Center,
        }
    }
}

/// Attributes for a mind-map block
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MindMapAttrs {
    /// The JSON payload, verbatim
    #[serde(deserialize_with = "de::lenient_string")]
    pub data: String,
}

impl MindMapAttrs {
    /// Decode the payload for presentation.
    pub fn state(&self) -> PayloadState<MindMapPayload> {
        PayloadState::from(MindMapPayload::from_json(&self.data))
    }
}

/// Attributes for a quiz block
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuizAttrs {
    /// The JSON payload, verbatim
    #[serde(deserialize_with = "de::lenient_string")]
    pub data: String,
}

impl QuizAttrs {
    /// Decode and normalize the payload for presentation.
    pub fn state(&self) -> PayloadState<QuizPayload> {
        let state = PayloadState::from(QuizPayload::from_json(&self.data));
        if let PayloadState::Ready(quiz) = &state {
            for warning in quiz.warnings() {
                tracing::warn!(%warning, "quiz payload");
            }
        }
        state
    }
}

/// The attributes of an annotation mark
#[derive(Debug, Hash, Eq, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotationAttrs {
    /// The explanation shown for the annotated text
    #[serde(deserialize_with = "de::lenient_string")]
    pub explanation: String,
}
