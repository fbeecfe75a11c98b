//! # Document transformations
//!
//! Node views never touch the tree directly. They hand back steps, which are applied to the
//! document to produce the next version of it.
mod attr_step;

pub use attr_step::AttrStep;

use crate::markdown::{SchemaError, XmdNode};
use crate::model::ResolveErr;
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Different ways a step application can fail
#[derive(Debug, Display, Error)]
pub enum StepError {
    /// Invalid position: {0}
    Resolve(#[from] ResolveErr),
    /// No node with attributes at position {pos}
    NoNode {
        /// The position that was given
        pos: usize,
    },
    /// Invalid attribute update: {0}
    Schema(#[from] SchemaError),
}

/// A list of steps
pub type Steps = Vec<Step>;

/// Steps that can be applied on a document
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "stepType", rename_all = "camelCase")]
pub enum Step {
    /// Set an attribute of a node
    Attr(AttrStep),
}

impl Step {
    /// Apply the step to the given document
    pub fn apply(&self, doc: &XmdNode) -> Result<XmdNode, StepError> {
        match self {
            Self::Attr(attr_step) => attr_step.apply(doc),
        }
    }
}

/// Apply steps in order, stopping at the first one that fails.
pub fn apply_steps(doc: &XmdNode, steps: &[Step]) -> Result<XmdNode, StepError> {
    let mut doc = doc.clone();
    for step in steps {
        doc = step.apply(&doc)?;
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::{apply_steps, AttrStep, Step, Steps};
    use crate::markdown::helper::*;
    use serde_json::json;

    #[test]
    fn step_json() {
        let steps: Steps = serde_json::from_str(
            r#"[
                {"stepType": "attr", "pos": 0, "attr": "open", "value": true},
                {"stepType": "attr", "pos": 0, "attr": "title", "value": "More"}
            ]"#,
        )
        .unwrap();
        assert_eq!(steps[0], Step::Attr(AttrStep::new(0, "open", json!(true))));

        let d = doc(details("Details", false, vec![p("x")]));
        let updated = apply_steps(&d, &steps).unwrap();
        assert_eq!(updated, doc(details("More", true, vec![p("x")])));
        assert_eq!(
            serde_json::to_value(&steps[1]).unwrap(),
            json!({"stepType": "attr", "pos": 0, "attr": "title", "value": "More"})
        );
    }
}
