use super::StepError;
use crate::markdown::{XmdNode, XMD};
use crate::model::{Node, ResolvedPos};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Setting one attribute of the node directly after a position
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttrStep {
    /// The position directly before the node
    pub pos: usize,
    /// The attribute name
    pub attr: String,
    /// The new value, defaulted and clamped like any other attribute
    pub value: Value,
}

impl AttrStep {
    /// Create a new step
    pub fn new<A: Into<String>>(pos: usize, attr: A, value: Value) -> Self {
        Self {
            pos,
            attr: attr.into(),
            value,
        }
    }

    /// Applies this step to the given document, returning the updated document.
    pub fn apply(&self, doc: &XmdNode) -> Result<XmdNode, StepError> {
        let rp: ResolvedPos<XMD> = doc.resolve(self.pos)?;
        let target = rp
            .node_after()
            .ok_or(StepError::NoNode { pos: self.pos })?;
        if target.is_text() {
            return Err(StepError::NoNode { pos: self.pos });
        }
        let mut node = target.with_attr(&self.attr, self.value.clone())?;
        tracing::trace!(pos = self.pos, attr = %self.attr, "attribute updated");

        for depth in (0..=rp.depth()).rev() {
            let index = rp.index(depth);
            node = rp
                .node(depth)
                .copy(|content| content.replace_child(index, node).into_owned());
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::AttrStep;
    use crate::markdown::helper::*;
    use crate::markdown::{ImageAlign, ImageAttrs, XmdNode};
    use crate::model::Node;
    use crate::transform::StepError;
    use serde_json::json;

    fn image_doc() -> XmdNode {
        // <doc> <p> a b <img> </p> <h1> T </h1>
        //      0   1 2 3     4    5    6 7
        doc(vec![p(vec![node("ab"), image("x.png")]), h1("T")])
    }

    #[test]
    fn update_image() {
        let updated = AttrStep::new(3, "width", json!(5)).apply(&image_doc()).unwrap();
        let updated = AttrStep::new(3, "align", json!("left")).apply(&updated).unwrap();
        assert_eq!(
            updated,
            doc(vec![
                p(vec![
                    node("ab"),
                    image_with(ImageAttrs {
                        src: "x.png".into(),
                        width: 10,
                        align: ImageAlign::Left,
                        ..ImageAttrs::default()
                    })
                ]),
                h1("T")
            ])
        );
        let snapshot = updated.resolve(3).unwrap().node_after().unwrap().attrs_json();
        assert_eq!(snapshot["width"], json!(10));
        assert_eq!(snapshot["align"], json!("left"));
    }

    #[test]
    fn update_block() {
        let updated = AttrStep::new(5, "level", json!(9)).apply(&image_doc()).unwrap();
        assert_eq!(updated.child(1), Some(&h(6, "T")));

        let nested = doc(callout("info", vec![quiz("{}")]));
        let updated = AttrStep::new(1, "data", json!("{\"question\": \"?\"}"))
            .apply(&nested)
            .unwrap();
        assert_eq!(updated, doc(callout("info", vec![quiz("{\"question\": \"?\"}")])));

        let unchanged = AttrStep::new(0, "unknown", json!(1)).apply(&nested).unwrap();
        assert_eq!(unchanged, nested);
    }

    #[test]
    fn failures() {
        let d = image_doc();
        assert!(matches!(
            AttrStep::new(99, "width", json!(1)).apply(&d),
            Err(StepError::Resolve(_))
        ));
        assert!(matches!(
            AttrStep::new(4, "width", json!(1)).apply(&d),
            Err(StepError::NoNode { pos: 4 })
        ));
        assert!(matches!(
            AttrStep::new(1, "width", json!(1)).apply(&d),
            Err(StepError::NoNode { pos: 1 })
        ));
    }

    #[test]
    fn json_form() {
        let step: AttrStep =
            serde_json::from_str(r#"{"pos": 3, "attr": "width", "value": 60}"#).unwrap();
        assert_eq!(step, AttrStep::new(3, "width", json!(60)));
    }
}
