//! The closed set of question variants.
//!
//! A [`Question`] holds what every kind shares (id, prompt, navigator,
//! lifecycle markers and the recorded answer) and a [`QuestionBody`] with the
//! kind-specific fields. Decoding and response encoding dispatch once on the
//! body, so adding a kind is checked for exhaustiveness by the compiler.

mod affect_grid;
mod categorical;
mod instruction;
mod likert;
mod text;

pub use affect_grid::{AffectGridLabels, AffectGridQuestion};
pub use categorical::CategoricalQuestion;
pub use instruction::{InstructionQuestion, InstructionStyle};
pub use likert::{LikertEntryQuestion, LikertListQuestion, LikertScale};
pub use text::{TextQuestion, TextStyle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::{AnswerState, ContractViolation, QuestionDecodeError, QuestionKind};

use crate::Navigator;
use crate::fields::{Fields, epoch_seconds};

/// A single navigable unit of a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within a survey.
    id: String,

    /// The prompt shown to the user; may contain substitution variables.
    prompt: Option<String>,

    /// Routing away from this question. `None` means the survey ends here.
    navigator: Option<Navigator>,

    /// When the question was first shown.
    created_at: Option<DateTime<Utc>>,

    /// When the question was submitted.
    completed_at: Option<DateTime<Utc>>,

    /// The recorded answer.
    state: AnswerState,

    body: QuestionBody,
}

/// The kind-specific part of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestionBody {
    Categorical(CategoricalQuestion),
    Text(TextQuestion),
    Instruction(InstructionQuestion),
    AffectGrid(AffectGridQuestion),
    LikertEntry(LikertEntryQuestion),
    LikertList(LikertListQuestion),
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Categorical(q) => q.kind(),
            Self::Text(q) => q.kind(),
            Self::Instruction(q) => q.kind(),
            Self::AffectGrid(_) => QuestionKind::AffectGrid,
            Self::LikertEntry(_) => QuestionKind::LikertEntry,
            Self::LikertList(_) => QuestionKind::LikertList,
        }
    }
}

impl Question {
    /// Create a question with no prompt, navigator or answer.
    pub fn new(id: impl Into<String>, body: QuestionBody) -> Self {
        Self {
            id: id.into(),
            prompt: None,
            navigator: None,
            created_at: None,
            completed_at: None,
            state: AnswerState::None,
            body,
        }
    }

    /// Set the prompt text.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Attach a navigator.
    pub fn with_navigator(mut self, navigator: Navigator) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Decode a question object, dispatching on its `question_type`.
    pub fn decode(value: &Value) -> Result<Self, QuestionDecodeError> {
        let fields = Fields::of(value)?;
        let tag = fields.required_str("question_type")?;
        let kind =
            QuestionKind::from_tag(&tag).ok_or(QuestionDecodeError::UnknownKind(tag.clone()))?;

        let body = match kind {
            QuestionKind::CategoricalSingle | QuestionKind::CategoricalMulti => {
                QuestionBody::Categorical(CategoricalQuestion::decode(&fields, kind)?)
            }
            QuestionKind::TextSingle | QuestionKind::TextMulti | QuestionKind::TextUsername => {
                QuestionBody::Text(TextQuestion::decode(&fields, kind)?)
            }
            QuestionKind::InstructionSingle
            | QuestionKind::InstructionMulti
            | QuestionKind::InstructionAffect => {
                QuestionBody::Instruction(InstructionQuestion::decode(&fields, kind)?)
            }
            QuestionKind::AffectGrid => {
                QuestionBody::AffectGrid(AffectGridQuestion::decode(&fields)?)
            }
            QuestionKind::LikertEntry => {
                QuestionBody::LikertEntry(LikertEntryQuestion::decode(&fields)?)
            }
            QuestionKind::LikertList => {
                QuestionBody::LikertList(LikertListQuestion::decode(&fields)?)
            }
        };

        Self::decode_common(&fields, body)
    }

    /// Extract the fields every kind shares around an already decoded body.
    pub(crate) fn decode_common(
        fields: &Fields<'_>,
        body: QuestionBody,
    ) -> Result<Self, QuestionDecodeError> {
        let prompt = fields.optional_str("question_text");
        let navigator = match fields.get("next_question") {
            Some(Value::Null) | None => None,
            Some(next) => Some(Navigator::decode(next, body.kind(), fields.id())?),
        };

        Ok(Self {
            id: fields.id().to_string(),
            prompt,
            navigator,
            created_at: None,
            completed_at: None,
            state: AnswerState::None,
            body,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }

    /// The raw prompt text, before substitutions.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }

    pub fn body(&self) -> &QuestionBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut QuestionBody {
        &mut self.body
    }

    pub fn state(&self) -> &AnswerState {
        &self.state
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Record when the question was shown.
    pub fn mark_created(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }

    /// Record when the question was submitted.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }

    /// Record the answer to this question.
    ///
    /// The state must fit the question's kind.
    pub fn record_answer(&mut self, state: AnswerState) -> Result<(), ContractViolation> {
        self.check_state(&state)?;
        self.state = state;
        Ok(())
    }

    /// Next question id according to this question's navigator.
    ///
    /// Returns `Ok(None)` if the question has no navigator; what that means
    /// is up to the caller.
    pub fn next_question_id(&self) -> Result<Option<&str>, ContractViolation> {
        self.navigator
            .as_ref()
            .map(|navigator| navigator.next_question(&self.state))
            .transpose()
    }

    /// Encode the answer fragment of a completed question.
    ///
    /// Returns `Ok(None)` for instructions and for questions whose creation
    /// or completion time has not been recorded.
    pub fn encode_answer(&self) -> Result<Option<Value>, ContractViolation> {
        if let QuestionBody::Instruction(_) = self.body {
            return Ok(None);
        }
        let Some(mut fragment) = self.common_fragment() else {
            return Ok(None);
        };
        self.check_state(&self.state)?;

        match &self.body {
            QuestionBody::Categorical(q) => q.encode_answer(self, &mut fragment)?,
            QuestionBody::Text(q) => q.encode_answer(self, &mut fragment),
            QuestionBody::AffectGrid(q) => q.encode_answer(self, &mut fragment)?,
            QuestionBody::LikertEntry(q) => q.encode_answer(self, &mut fragment),
            QuestionBody::LikertList(q) => q.encode_answer(self, &mut fragment)?,
            QuestionBody::Instruction(_) => return Ok(None),
        }

        Ok(Some(Value::Object(fragment)))
    }

    /// `question_id`, `question_type`, `create_time` and `finish_time`, or
    /// `None` unless both timestamps are set.
    fn common_fragment(&self) -> Option<Map<String, Value>> {
        let (created, completed) = (self.created_at?, self.completed_at?);
        let mut fragment = Map::new();
        fragment.insert("question_id".into(), Value::from(self.id.as_str()));
        fragment.insert("question_type".into(), Value::from(self.kind().as_tag()));
        fragment.insert("create_time".into(), epoch_seconds(created));
        fragment.insert("finish_time".into(), epoch_seconds(completed));
        Some(fragment)
    }

    fn check_state(&self, state: &AnswerState) -> Result<(), ContractViolation> {
        if state.fits(self.kind()) {
            Ok(())
        } else {
            Err(self.mismatch(state))
        }
    }

    pub(crate) fn mismatch(&self, state: &AnswerState) -> ContractViolation {
        ContractViolation::StateMismatch {
            question_id: self.id.clone(),
            kind: self.kind(),
            state: state.type_name(),
        }
    }
}
