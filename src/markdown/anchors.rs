//! # Heading anchors
//!
//! Stable, unique link targets derived from heading text.
use super::XmdNode;
use crate::model::Node;
use derive_new::new;
use std::collections::HashMap;

/// A heading together with its anchor
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Anchor {
    /// Position directly before the heading
    pub pos: usize,
    /// Heading level
    pub level: u8,
    /// The extracted heading text
    pub text: String,
    /// The unique slug
    pub slug: String,
}

/// Derive the base slug of a heading text: lowercase, alphanumerics kept, runs of whitespace and
/// `-` collapsed into one `-`, everything else dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if dash && !slug.is_empty() {
                slug.push('-');
            }
            dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' {
            dash = true;
        }
    }
    slug
}

/// Hands out unique slugs, appending `-1`, `-2`, ... to repeats.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Create a slugger that has seen nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The unique slug for the next heading with this text
    pub fn slug(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base.push_str("section");
        }
        let mut candidate = base.clone();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Collect the anchors of all headings in the document, in document order.
pub fn heading_anchors(doc: &XmdNode) -> Vec<Anchor> {
    let mut slugger = Slugger::new();
    let mut anchors = Vec::new();
    doc.descendants(&mut |node: &XmdNode, pos| {
        if let XmdNode::Heading(heading) = node {
            let text = node.text_content();
            let slug = slugger.slug(&text);
            anchors.push(Anchor::new(pos, heading.attrs.level, text, slug));
            return false;
        }
        true
    });
    anchors
}
