//! # Quiz payloads
//!
//! Stored quizzes come in several loose shapes: options as bare strings or as objects, the
//! answer as a `correctAnswers` list or as a single `correctAnswer` that names an option by text,
//! by id, or by position. [`normalize`] brings all of them into one [`QuizPayload`].
use super::PayloadError;
use derive_new::new;
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One answer option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct QuizOption {
    /// Unique within the quiz
    pub id: String,
    /// Markdown text
    pub text: String,
}

/// A normalized quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    /// Markdown text
    pub question: String,
    /// The options, in display order
    pub options: Vec<QuizOption>,
    /// Ids of the correct options
    pub correct_answers: Vec<String>,
    /// Markdown text shown after answering
    pub explanation: String,
    /// Whether more than one option may be selected
    pub is_multiple: bool,
}

/// Something that is probably wrong with a quiz, but does not stop it from being shown
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QuizWarning {
    /// correct answer `{0}` matches no option
    UnknownAnswer(String),
    /// option id `{0}` is used more than once
    DuplicateOption(String),
    /// quiz has no correct answer
    NoCorrectAnswer,
}

fn malformed(reason: &'static str) -> PayloadError {
    PayloadError::Malformed(reason)
}

/// Strings as they are, any other value in its JSON form.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn option(index: usize, value: &Value) -> QuizOption {
    match value {
        Value::String(text) => QuizOption::new(index.to_string(), text.clone()),
        Value::Object(obj) => {
            let id = match obj.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(id @ Value::Number(_)) => id.to_string(),
                _ => index.to_string(),
            };
            let text = match obj.get("text") {
                None | Some(Value::Null) => String::new(),
                Some(text) => scalar(text),
            };
            QuizOption::new(id, text)
        }
        other => QuizOption::new(index.to_string(), other.to_string()),
    }
}

fn correct_answers(quiz: &Map<String, Value>, options: &[QuizOption]) -> Vec<String> {
    if let Some(Value::Array(ids)) = quiz.get("correctAnswers") {
        return ids.iter().map(scalar).collect();
    }
    match quiz.get("correctAnswer") {
        None | Some(Value::Null) => Vec::new(),
        Some(answer) => {
            let key = scalar(answer);
            // unmatched numbers are positions, anything else a literal id; both keep `key`
            let id = options
                .iter()
                .find(|option| option.text == key || option.id == key)
                .map_or(key, |option| option.id.clone());
            vec![id]
        }
    }
}

/// Normalize a loosely shaped quiz.
pub fn normalize(value: &Value) -> Result<QuizPayload, PayloadError> {
    let quiz = value
        .as_object()
        .ok_or_else(|| malformed("quiz is not an object"))?;
    let question = quiz
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("quiz has no question"))?;
    let options: Vec<QuizOption> = quiz
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("quiz has no options"))?
        .iter()
        .enumerate()
        .map(|(index, value)| option(index, value))
        .collect();
    let correct_answers = correct_answers(quiz, &options);
    let explanation = quiz
        .get("explanation")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_owned();
    let is_multiple = quiz
        .get("isMultiple")
        .and_then(Value::as_bool)
        .unwrap_or(correct_answers.len() > 1);
    Ok(QuizPayload {
        question: question.to_owned(),
        options,
        correct_answers,
        explanation,
        is_multiple,
    })
}

impl QuizPayload {
    /// Parse and normalize the JSON text of a quiz node.
    pub fn from_json(src: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(src)?;
        normalize(&value)
    }

    /// The normalized JSON text, suitable for writing back into the node.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// The option with this id.
    pub fn option(&self, id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Whether exactly the correct options are selected.
    pub fn grade<I, A>(&self, selected: I) -> bool
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let selected: BTreeSet<String> = selected
            .into_iter()
            .map(|id| id.as_ref().to_owned())
            .collect();
        let correct: BTreeSet<&str> = self.correct_answers.iter().map(String::as_str).collect();
        correct.iter().all(|id| selected.contains(*id))
            && selected.iter().all(|id| correct.contains(id.as_str()))
            && selected.len() == correct.len()
    }

    /// Problems a quiz author should know about.
    pub fn warnings(&self) -> Vec<QuizWarning> {
        let mut warnings = Vec::new();
        let mut seen = BTreeSet::new();
        for option in &self.options {
            if !seen.insert(option.id.as_str()) {
                warnings.push(QuizWarning::DuplicateOption(option.id.clone()));
            }
        }
        if self.correct_answers.is_empty() {
            warnings.push(QuizWarning::NoCorrectAnswer);
        }
        for id in &self.correct_answers {
            if self.option(id).is_none() {
                warnings.push(QuizWarning::UnknownAnswer(id.clone()));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, QuizOption, QuizPayload, QuizWarning};
    use crate::payload::PayloadError;
    use serde_json::json;

    #[test]
    fn bare_string_options() {
        let quiz = normalize(&json!({
            "question": "Pick",
            "options": ["A", "B", "C"],
            "correctAnswers": ["0", "1"],
        }))
        .unwrap();
        let ids: Vec<_> = quiz.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
        assert!(quiz.is_multiple);
        assert_eq!(quiz.explanation, "");
    }

    #[test]
    fn single_answer() {
        let options = json!([{"id": "a", "text": "Paris"}, {"id": "b", "text": "Rome"}]);
        let by_text = normalize(&json!({"question": "?", "options": options, "correctAnswer": "Rome"}))
            .unwrap();
        assert_eq!(by_text.correct_answers, vec!["b"]);
        assert!(!by_text.is_multiple);

        let by_id = normalize(&json!({"question": "?", "options": options, "correctAnswer": "a"}))
            .unwrap();
        assert_eq!(by_id.correct_answers, vec!["a"]);

        let by_index = normalize(&json!({"question": "?", "options": options, "correctAnswer": 1}))
            .unwrap();
        assert_eq!(by_index.correct_answers, vec!["1"]);
        assert_eq!(
            by_index.warnings(),
            vec![QuizWarning::UnknownAnswer("1".into())]
        );

        let literal = normalize(&json!({"question": "?", "options": options, "correctAnswer": "z"}))
            .unwrap();
        assert_eq!(literal.correct_answers, vec!["z"]);
        assert!(!literal.grade(["a"]));
    }

    #[test]
    fn numeric_answer_on_bare_options() {
        let quiz = normalize(&json!({"question": "?", "options": ["x", "y"], "correctAnswer": 1}))
            .unwrap();
        assert_eq!(quiz.correct_answers, vec!["1"]);
        assert!(quiz.warnings().is_empty());
    }

    #[test]
    fn loose_options() {
        let quiz = normalize(&json!({
            "question": "?",
            "options": [{"id": 7, "text": 3}, {"text": "t"}, {}, 42],
            "isMultiple": true,
        }))
        .unwrap();
        assert_eq!(
            quiz.options,
            vec![
                QuizOption::new("7".into(), "3".into()),
                QuizOption::new("1".into(), "t".into()),
                QuizOption::new("2".into(), "".into()),
                QuizOption::new("3".into(), "42".into()),
            ]
        );
        assert!(quiz.is_multiple);
        assert_eq!(quiz.warnings(), vec![QuizWarning::NoCorrectAnswer]);
    }

    #[test]
    fn multiple_flag() {
        let two = normalize(&json!({"question": "?", "options": ["a", "b"], "correctAnswers": ["0", "1"]}))
            .unwrap();
        assert!(two.is_multiple);
        let one = normalize(&json!({"question": "?", "options": ["a", "b"], "correctAnswers": ["0"]}))
            .unwrap();
        assert!(!one.is_multiple);
    }

    #[test]
    fn malformed() {
        for value in [
            json!([]),
            json!({"options": []}),
            json!({"question": 1, "options": []}),
            json!({"question": "?", "options": {}}),
        ] {
            assert!(matches!(
                normalize(&value),
                Err(PayloadError::Malformed(_))
            ));
        }
        assert!(matches!(
            QuizPayload::from_json("{not json"),
            Err(PayloadError::InvalidJson(_))
        ));
    }

    #[test]
    fn grading() {
        let quiz = normalize(&json!({
            "question": "?",
            "options": [{"id": "A", "text": "a"}, {"id": "B", "text": "b"}, {"id": "C", "text": "c"}],
            "correctAnswers": ["A", "B"],
        }))
        .unwrap();
        assert!(quiz.grade(["A", "B"]));
        assert!(quiz.grade(["B", "A"]));
        assert!(!quiz.grade(["A"]));
        assert!(!quiz.grade(["A", "B", "C"]));
        assert!(!quiz.grade(["A", "C"]));
        assert!(!quiz.grade(Vec::<String>::new()));
    }

    #[test]
    fn write_back() {
        let quiz = QuizPayload::from_json(
            r#"{"question": "?", "options": ["a", "b"], "correctAnswer": "b", "explanation": "e"}"#,
        )
        .unwrap();
        let json = quiz.to_json().unwrap();
        assert!(json.contains("\"correctAnswers\":[\"1\"]"));
        assert!(json.contains("\"isMultiple\":false"));
        assert_eq!(QuizPayload::from_json(&json).unwrap(), quiz);
    }

    #[test]
    fn duplicate_ids() {
        let quiz = normalize(&json!({
            "question": "?",
            "options": [{"id": "x", "text": "1"}, {"id": "x", "text": "2"}],
            "correctAnswers": ["x"],
        }))
        .unwrap();
        assert_eq!(
            quiz.warnings(),
            vec![QuizWarning::DuplicateOption("x".into())]
        );
        assert_eq!(QuizWarning::NoCorrectAnswer.to_string(), "quiz has no correct answer");
    }
}
