use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::{
    AnswerState, ContractViolation, LikertRating, QuestionDecodeError, QuestionKind,
};

use super::{Question, QuestionBody};
use crate::fields::{Fields, epoch_seconds};

/// A discrete rating slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertScale {
    pub min: i64,
    pub max: i64,

    /// Where the slider starts.
    pub initial: i64,

    /// One label per point of the scale, starting at `min`.
    pub descriptions: Vec<String>,
}

impl LikertScale {
    /// The label shown at `rating`, if the scale has one.
    pub fn description(&self, rating: i64) -> Option<&str> {
        let index = usize::try_from(rating.checked_sub(self.min)?).ok()?;
        self.descriptions.get(index).map(String::as_str)
    }

    pub fn contains(&self, rating: i64) -> bool {
        (self.min..=self.max).contains(&rating)
    }
}

/// One rating scale, standalone or inside a [`LikertListQuestion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertEntryQuestion {
    pub title: String,
    pub scale: LikertScale,

    /// Layout hint: show the descriptions stacked above the slider.
    pub stacked: bool,
}

impl LikertEntryQuestion {
    pub(super) fn decode(fields: &Fields<'_>) -> Result<Self, QuestionDecodeError> {
        let scale = LikertScale {
            min: fields.required_int("scale_min_value")?,
            max: fields.required_int("scale_max_value")?,
            initial: fields.required_int("scale_init_value")?,
            descriptions: fields.required_str_array("scale_descriptions")?,
        };
        Ok(Self {
            title: fields.required_str("title")?,
            scale,
            stacked: fields.optional_bool("display_stacked").unwrap_or(false),
        })
    }

    /// Build the answer for `rating`, labelled with the scale's description.
    pub fn rating(&self, rating: i64, touched: bool) -> LikertRating {
        let answer = self.scale.description(rating).unwrap_or_default();
        LikertRating::new(answer, rating, touched)
    }

    pub(super) fn encode_answer(&self, question: &Question, fragment: &mut Map<String, Value>) {
        if let AnswerState::LikertEntry(rating) = question.state() {
            insert_rating(fragment, rating);
        }
    }
}

/// Several rating scales answered on one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertListQuestion {
    /// The entries, each a `LikertEntry` question.
    entries: Vec<Question>,
}

impl LikertListQuestion {
    pub(super) fn decode(fields: &Fields<'_>) -> Result<Self, QuestionDecodeError> {
        let entries = fields
            .required_array("rating_questions")?
            .iter()
            .map(|item| {
                let entry_fields = Fields::of(item)?;
                let body = QuestionBody::LikertEntry(LikertEntryQuestion::decode(&entry_fields)?);
                Question::decode_common(&entry_fields, body)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Question] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&Question> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn entry_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }

    /// The ratings of all answered entries, keyed by entry id.
    ///
    /// This is the shape the list's own answer state takes for routing.
    pub fn ratings(&self) -> AnswerState {
        AnswerState::LikertList(
            self.entries
                .iter()
                .filter_map(|entry| match entry.state() {
                    AnswerState::LikertEntry(rating) => {
                        Some((entry.id().to_string(), rating.rating))
                    }
                    _ => None,
                })
                .collect(),
        )
    }

    pub(super) fn encode_answer(
        &self,
        question: &Question,
        fragment: &mut Map<String, Value>,
    ) -> Result<(), ContractViolation> {
        let answers = self
            .entries
            .iter()
            .map(|entry| {
                let AnswerState::LikertEntry(rating) = entry.state() else {
                    return Err(ContractViolation::EntryStateMismatch {
                        list_id: question.id().to_string(),
                        entry_id: entry.id().to_string(),
                        state: entry.state().type_name(),
                    });
                };

                let mut item = Map::new();
                item.insert("question_id".into(), Value::from(entry.id()));
                item.insert(
                    "question_type".into(),
                    Value::from(QuestionKind::LikertEntry.as_tag()),
                );
                // Entries answered on the list's screen share its timestamps.
                let (created, completed) = match (entry.created_at(), entry.completed_at()) {
                    (Some(created), Some(completed)) => (Some(created), Some(completed)),
                    _ => (question.created_at(), question.completed_at()),
                };
                if let (Some(created), Some(completed)) = (created, completed) {
                    item.insert("create_time".into(), epoch_seconds(created));
                    item.insert("finish_time".into(), epoch_seconds(completed));
                }
                insert_rating(&mut item, rating);
                Ok(Value::Object(item))
            })
            .collect::<Result<Vec<_>, _>>()?;

        fragment.insert("answer".into(), Value::Array(answers));
        Ok(())
    }
}

fn insert_rating(fragment: &mut Map<String, Value>, rating: &LikertRating) {
    fragment.insert("answer".into(), Value::from(rating.answer.as_str()));
    fragment.insert("rating".into(), Value::from(rating.rating));
    fragment.insert("touched".into(), Value::from(rating.touched));
}
