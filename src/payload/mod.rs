//! # Structured payloads
//!
//! Mind-map and quiz nodes carry their content as a JSON string attribute. The string is kept
//! verbatim in the tree; this module decodes it when a consumer asks for it.
use displaydoc::Display;
use thiserror::Error;

pub mod mindmap;
pub mod quiz;

pub use mindmap::MindMapPayload;
pub use quiz::{QuizOption, QuizPayload, QuizWarning};

/// Errors when decoding a payload
#[derive(Debug, Display, Error)]
pub enum PayloadError {
    /// Malformed payload: {0}
    Malformed(&'static str),
    /// Invalid JSON: {0}
    InvalidJson(#[from] serde_json::Error),
}

/// What a node view shows for a payload
#[derive(Debug)]
pub enum PayloadState<T> {
    /// The payload decoded fine
    Ready(T),
    /// The payload is broken, the node shows an error instead
    Invalid(PayloadError),
}

impl<T> PayloadState<T> {
    /// The payload, if it decoded.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(payload) => Some(payload),
            Self::Invalid(_) => None,
        }
    }

    /// Whether the payload is broken.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl<T> From<Result<T, PayloadError>> for PayloadState<T> {
    fn from(result: Result<T, PayloadError>) -> Self {
        match result {
            Ok(payload) => Self::Ready(payload),
            Err(error) => {
                tracing::debug!(%error, "payload shown as invalid");
                Self::Invalid(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PayloadError, PayloadState};

    #[test]
    fn state() {
        let ready: PayloadState<u8> = PayloadState::from(Ok(1));
        assert_eq!(ready.ready(), Some(&1));
        let invalid: PayloadState<u8> = PayloadState::from(Err(PayloadError::Malformed("x")));
        assert!(invalid.is_invalid());
        if let PayloadState::Invalid(error) = invalid {
            assert_eq!(error.to_string(), "Malformed payload: x");
        }
    }
}
