//! Field extraction for inbound survey documents.
//!
//! Definitions are walked as `serde_json::Value` rather than derived, so each
//! question decoder decides which absences are fatal and which fall back.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use survey_router_types::QuestionDecodeError;
use tracing::warn;

/// The fields of one question object, with its id already extracted.
pub(crate) struct Fields<'a> {
    id: String,
    obj: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Start decoding a question object. `question_id` is always required.
    pub(crate) fn of(value: &'a Value) -> Result<Self, QuestionDecodeError> {
        let obj = value.as_object().ok_or(QuestionDecodeError::NotAnObject)?;
        let id = match obj.get("question_id") {
            Some(Value::String(id)) => id.clone(),
            Some(_) => {
                return Err(QuestionDecodeError::WrongType {
                    question_id: String::new(),
                    field: "question_id",
                    expected: "a string",
                });
            }
            None => {
                return Err(QuestionDecodeError::MissingField {
                    question_id: String::new(),
                    field: "question_id",
                });
            }
        };
        Ok(Self { id, obj })
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn get(&self, field: &str) -> Option<&'a Value> {
        self.obj.get(field)
    }

    fn missing(&self, field: &'static str) -> QuestionDecodeError {
        QuestionDecodeError::MissingField {
            question_id: self.id.clone(),
            field,
        }
    }

    fn wrong(&self, field: &'static str, expected: &'static str) -> QuestionDecodeError {
        QuestionDecodeError::WrongType {
            question_id: self.id.clone(),
            field,
            expected,
        }
    }

    pub(crate) fn required_str(&self, field: &'static str) -> Result<String, QuestionDecodeError> {
        match self.obj.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.wrong(field, "a string")),
            None => Err(self.missing(field)),
        }
    }

    /// Optional fields of the wrong type are treated as absent.
    fn ignore_wrong(&self, field: &'static str, expected: &'static str) {
        warn!(
            question_id = %self.id,
            field,
            expected,
            "ignoring optional field of the wrong type"
        );
    }

    pub(crate) fn optional_str(&self, field: &'static str) -> Option<String> {
        match self.obj.get(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.ignore_wrong(field, "a string");
                None
            }
        }
    }

    pub(crate) fn required_int(&self, field: &'static str) -> Result<i64, QuestionDecodeError> {
        match self.obj.get(field) {
            Some(value) => value.as_i64().ok_or_else(|| self.wrong(field, "an integer")),
            None => Err(self.missing(field)),
        }
    }

    pub(crate) fn optional_bool(&self, field: &'static str) -> Option<bool> {
        match self.obj.get(field) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.ignore_wrong(field, "a boolean");
                None
            }
        }
    }

    pub(crate) fn required_array(
        &self,
        field: &'static str,
    ) -> Result<&'a [Value], QuestionDecodeError> {
        match self.obj.get(field) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.wrong(field, "an array")),
            None => Err(self.missing(field)),
        }
    }

    pub(crate) fn required_str_array(
        &self,
        field: &'static str,
    ) -> Result<Vec<String>, QuestionDecodeError> {
        self.required_array(field)?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.wrong(field, "an array of strings"))
            })
            .collect()
    }

    pub(crate) fn optional_int_array(&self, field: &'static str) -> Option<Vec<i64>> {
        let items = match self.obj.get(field) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return None,
            Some(_) => {
                self.ignore_wrong(field, "an array of integers");
                return None;
            }
        };
        let ints = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>();
        if ints.is_none() {
            self.ignore_wrong(field, "an array of integers");
        }
        ints
    }
}

/// Read a string or an array of strings as a list of labels.
pub(crate) fn labels(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

/// Timestamps go over the wire as whole seconds since the Unix epoch.
pub(crate) fn epoch_seconds(at: DateTime<Utc>) -> Value {
    Value::from(at.timestamp())
}

pub(crate) fn from_epoch_seconds(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.as_i64()?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_id_is_required() {
        let value = json!({ "question_type": "text_single_line" });
        assert!(matches!(
            Fields::of(&value),
            Err(QuestionDecodeError::MissingField {
                field: "question_id",
                ..
            })
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            Fields::of(&json!(["q1"])),
            Err(QuestionDecodeError::NotAnObject)
        ));
    }

    #[test]
    fn string_arrays_must_hold_strings() {
        let value = json!({ "question_id": "q1", "choices": ["A", 2] });
        let fields = Fields::of(&value).unwrap();
        assert!(matches!(
            fields.required_str_array("choices"),
            Err(QuestionDecodeError::WrongType { field: "choices", .. })
        ));
    }

    #[test]
    fn optional_fields_tolerate_null() {
        let value = json!({ "question_id": "q1", "question_text": null });
        let fields = Fields::of(&value).unwrap();
        assert_eq!(fields.optional_str("question_text"), None);
        assert_eq!(fields.optional_bool("display_stacked"), None);
    }

    #[test]
    fn wrong_typed_optional_fields_are_absent() {
        let value = json!({
            "question_id": "q1",
            "question_text": 42,
            "display_stacked": "yes",
            "feedback_scores": ["x"],
            "store_result": 7
        });
        let fields = Fields::of(&value).unwrap();
        assert_eq!(fields.optional_str("question_text"), None);
        assert_eq!(fields.optional_bool("display_stacked"), None);
        assert_eq!(fields.optional_int_array("feedback_scores"), None);
        assert_eq!(fields.optional_str("store_result"), None);
    }

    #[test]
    fn labels_accept_string_or_array() {
        assert_eq!(labels(&json!("A")), Some(vec!["A".to_string()]));
        assert_eq!(
            labels(&json!(["A", "B"])),
            Some(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(labels(&json!(["A", 1])), None);
        assert_eq!(labels(&json!(3)), None);
    }

    #[test]
    fn epoch_seconds_round_trip() {
        let at = DateTime::from_timestamp(1_400_000_000, 0).unwrap();
        assert_eq!(from_epoch_seconds(&epoch_seconds(at)), Some(at));
    }
}
