use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::{AnswerState, ContractViolation, QuestionDecodeError, QuestionKind};

use super::Question;
use crate::fields::Fields;

/// Pick one or several labels from a fixed list of choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalQuestion {
    /// Whether more than one choice may be selected.
    pub multiple: bool,

    /// The choice labels, in display order.
    pub choices: Vec<String>,

    /// Optional feedback score per choice, parallel to `choices`.
    pub scores: Option<Vec<i64>>,
}

impl CategoricalQuestion {
    pub fn single(choices: Vec<String>) -> Self {
        Self {
            multiple: false,
            choices,
            scores: None,
        }
    }

    pub fn multi(choices: Vec<String>) -> Self {
        Self {
            multiple: true,
            choices,
            scores: None,
        }
    }

    pub fn with_scores(mut self, scores: Vec<i64>) -> Self {
        self.scores = Some(scores);
        self
    }

    pub(super) fn decode(
        fields: &Fields<'_>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionDecodeError> {
        Ok(Self {
            multiple: kind == QuestionKind::CategoricalMulti,
            choices: fields.required_str_array("choices")?,
            scores: fields.optional_int_array("feedback_scores"),
        })
    }

    pub fn kind(&self) -> QuestionKind {
        if self.multiple {
            QuestionKind::CategoricalMulti
        } else {
            QuestionKind::CategoricalSingle
        }
    }

    /// Sum of the feedback scores of the selected choices.
    ///
    /// `None` when the question carries no scores. Selected labels that are
    /// not among the choices, or have no paired score, count as zero.
    pub fn score(&self, selected: &BTreeSet<String>) -> Option<i64> {
        let scores = self.scores.as_ref()?;
        Some(
            self.choices
                .iter()
                .zip(scores)
                .filter(|(choice, _)| selected.contains(*choice))
                .map(|(_, score)| score)
                .sum(),
        )
    }

    pub(super) fn encode_answer(
        &self,
        question: &Question,
        fragment: &mut Map<String, Value>,
    ) -> Result<(), ContractViolation> {
        let AnswerState::Categorical(selected) = question.state() else {
            return Err(question.mismatch(question.state()));
        };
        fragment.insert(
            "answer".into(),
            Value::Array(selected.iter().map(|s| Value::from(s.as_str())).collect()),
        );
        Ok(())
    }
}
