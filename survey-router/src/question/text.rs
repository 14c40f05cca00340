use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::{AnswerState, QuestionDecodeError, QuestionKind};

use super::Question;
use crate::fields::Fields;

/// Free-form text entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextQuestion {
    pub style: TextStyle,

    /// Variable that the answer is stored under for later substitutions.
    pub store_result: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextStyle {
    SingleLine,
    MultiLine,
    Username,
}

impl TextQuestion {
    pub fn new(style: TextStyle) -> Self {
        Self {
            style,
            store_result: None,
        }
    }

    pub fn storing_as(mut self, variable: impl Into<String>) -> Self {
        self.store_result = Some(variable.into());
        self
    }

    pub(super) fn decode(
        fields: &Fields<'_>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionDecodeError> {
        let style = match kind {
            QuestionKind::TextMulti => TextStyle::MultiLine,
            QuestionKind::TextUsername => TextStyle::Username,
            _ => TextStyle::SingleLine,
        };
        Ok(Self {
            style,
            store_result: fields.optional_str("store_result"),
        })
    }

    pub fn kind(&self) -> QuestionKind {
        match self.style {
            TextStyle::SingleLine => QuestionKind::TextSingle,
            TextStyle::MultiLine => QuestionKind::TextMulti,
            TextStyle::Username => QuestionKind::TextUsername,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.style == TextStyle::MultiLine
    }

    pub(super) fn encode_answer(&self, question: &Question, fragment: &mut Map<String, Value>) {
        if let AnswerState::Text(text) = question.state() {
            fragment.insert("answer".into(), Value::from(text.as_str()));
        }
    }
}
