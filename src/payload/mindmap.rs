//! # Mind-map payloads
use super::PayloadError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of a mind-map and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MindMapPayload {
    /// The node id, generated from the path when missing
    pub id: String,
    /// The label
    pub text: String,
    /// The child nodes
    pub children: Vec<MindMapPayload>,
}

impl MindMapPayload {
    /// Parse and normalize the JSON text of a mind-map node.
    pub fn from_json(src: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(src)?;
        Self::normalize(&value)
    }

    /// Normalize a loosely shaped tree. Missing ids are derived from the path: `root`,
    /// `root-0`, `root-0-1`, ...
    pub fn normalize(value: &Value) -> Result<Self, PayloadError> {
        Self::normalize_at(value, String::from("root"))
    }

    fn normalize_at(value: &Value, path: String) -> Result<Self, PayloadError> {
        let node = value
            .as_object()
            .ok_or(PayloadError::Malformed("mind-map node is not an object"))?;
        let text = match node.get("text") {
            Some(Value::String(text)) => text.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        let children = match node.get("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(children)) => children
                .iter()
                .enumerate()
                .map(|(index, child)| Self::normalize_at(child, format!("{}-{}", path, index)))
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(PayloadError::Malformed(
                    "mind-map children are not an array",
                ))
            }
        };
        let id = match node.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(id @ Value::Number(_)) => id.to_string(),
            _ => path,
        };
        Ok(Self { id, text, children })
    }

    /// The number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// The number of levels in this tree, a lone root has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Find a node by id, in pre-order.
    pub fn find(&self, id: &str) -> Option<&MindMapPayload> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::MindMapPayload;
    use crate::payload::PayloadError;

    #[test]
    fn generated_ids() {
        let map = MindMapPayload::from_json(
            r#"{"text": "Topic", "children": [{"text": "a"}, {"id": 5, "children": [{"text": "b"}]}]}"#,
        )
        .unwrap();
        assert_eq!(map.id, "root");
        assert_eq!(map.children[0].id, "root-0");
        assert_eq!(map.children[1].id, "5");
        assert_eq!(map.children[1].text, "");
        assert_eq!(map.children[1].children[0].id, "root-1-0");
        assert_eq!(map.node_count(), 4);
        assert_eq!(map.depth(), 3);
        assert_eq!(map.find("root-1-0").map(|n| n.text.as_str()), Some("b"));
        assert!(map.find("nope").is_none());
    }

    #[test]
    fn malformed() {
        assert!(matches!(
            MindMapPayload::from_json("[]"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            MindMapPayload::from_json(r#"{"children": {}}"#),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            MindMapPayload::from_json(r#"{"children": [1]}"#),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            MindMapPayload::from_json(""),
            Err(PayloadError::InvalidJson(_))
        ));
    }
}
