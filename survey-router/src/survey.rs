use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_router_types::{AnswerState, LikertRating, NavigationError, SurveyError};
use tracing::{debug, warn};

use crate::Variables;
use crate::fields::from_epoch_seconds;
use crate::question::{Question, QuestionBody};

/// A complete questionnaire plus the answers recorded so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurveyParts")]
pub struct Survey {
    id: String,

    /// Index of the entry question in `questions`.
    entry: usize,

    /// In declaration order; ids are unique.
    questions: Vec<Question>,

    variables: Variables,

    /// Deadline by which a quick response should be finished.
    end_by: Option<DateTime<Utc>>,

    /// When the survey was finished.
    end_time: Option<DateTime<Utc>>,
}

/// The serialized fields of a [`Survey`], checked before they become one.
#[derive(Deserialize)]
struct SurveyParts {
    id: String,
    entry: usize,
    questions: Vec<Question>,
    variables: Variables,
    end_by: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl TryFrom<SurveyParts> for Survey {
    type Error = SurveyError;

    fn try_from(parts: SurveyParts) -> Result<Self, Self::Error> {
        if parts.id.is_empty() {
            return Err(SurveyError::MissingSurveyId);
        }
        if parts.entry >= parts.questions.len() {
            return Err(SurveyError::UnresolvedFirstQuestion(format!(
                "#{}",
                parts.entry
            )));
        }
        Ok(Self {
            id: parts.id,
            entry: parts.entry,
            questions: parts.questions,
            variables: parts.variables,
            end_by: parts.end_by,
            end_time: parts.end_time,
        })
    }
}

/// Where to go after a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Show the question with this id next.
    Next(String),

    /// The question has no navigator; the survey ends here.
    Finished,
}

impl Survey {
    /// Build a survey from already decoded questions.
    ///
    /// Fails if `id` is empty or `entry_id` is not among `questions`.
    pub fn new(
        id: impl Into<String>,
        entry_id: &str,
        questions: Vec<Question>,
    ) -> Result<Self, SurveyError> {
        let id = id.into();
        if id.is_empty() {
            return Err(SurveyError::MissingSurveyId);
        }
        let entry = questions
            .iter()
            .position(|q| q.id() == entry_id)
            .ok_or_else(|| SurveyError::UnresolvedFirstQuestion(entry_id.to_string()))?;
        Ok(Self {
            id,
            entry,
            questions,
            variables: Variables::new(),
            end_by: None,
            end_time: None,
        })
    }

    /// Decode a survey definition.
    ///
    /// Questions with an unknown `question_type`, a missing required field or
    /// an id already taken are skipped. The survey is rejected if it has no
    /// `survey_id`, or if `first_question_id` is absent or names no decoded
    /// question.
    pub fn decode(document: &Value) -> Result<Self, SurveyError> {
        let obj = document.as_object().ok_or(SurveyError::NotAnObject)?;

        let id = obj
            .get("survey_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or(SurveyError::MissingSurveyId)?;

        let mut questions: Vec<Question> = Vec::new();
        for item in obj
            .get("questions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            match Question::decode(item) {
                Ok(question) if questions.iter().any(|q| q.id() == question.id()) => {
                    warn!(
                        survey_id = id,
                        question_id = question.id(),
                        "skipping question with duplicate id"
                    );
                }
                Ok(question) => questions.push(question),
                Err(err) => {
                    warn!(
                        survey_id = id,
                        question_id = item.get("question_id").and_then(serde_json::Value::as_str),
                        question_type = item.get("question_type").and_then(serde_json::Value::as_str),
                        error = %err,
                        "skipping question"
                    );
                }
            }
        }

        let entry_id = obj
            .get("first_question_id")
            .and_then(Value::as_str)
            .ok_or(SurveyError::MissingFirstQuestion)?;

        let mut survey = Self::new(id, entry_id, questions)?;
        survey.end_by = obj.get("end_by").and_then(from_epoch_seconds);

        debug!(
            survey_id = %survey.id,
            questions = survey.questions.len(),
            entry = entry_id,
            "decoded survey"
        );
        Ok(survey)
    }

    /// Parse and decode a survey definition from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, SurveyError> {
        let document: Value = serde_json::from_str(json)?;
        Self::decode(&document)
    }

    /// Serialize the whole in-progress state (answers, timestamps, variables).
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a survey saved with [`Survey::to_snapshot`].
    ///
    /// A snapshot without an id, or whose entry question is out of range, is
    /// rejected as invalid JSON.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SurveyError> {
        Ok(serde_json::from_str(snapshot)?)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The question every run starts with.
    pub fn entry_question(&self) -> &Question {
        &self.questions[self.entry]
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id() == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    /// Record the answer to a question.
    ///
    /// Text answers to questions with a `store_result` name are also stored
    /// as a substitution variable.
    pub fn record_answer(&mut self, id: &str, state: AnswerState) -> Result<(), NavigationError> {
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id() == id)
            .ok_or_else(|| NavigationError::UnknownQuestion(id.to_string()))?;

        let store = match (question.body(), &state) {
            (QuestionBody::Text(text), AnswerState::Text(value)) => text
                .store_result
                .as_ref()
                .map(|name| (name.clone(), value.clone())),
            _ => None,
        };

        question.record_answer(state)?;
        if let Some((name, value)) = store {
            self.variables.insert(name, value);
        }
        Ok(())
    }

    /// Record the rating of one entry of a Likert list, and refresh the
    /// list's own answer from its entries.
    pub fn record_entry_answer(
        &mut self,
        list_id: &str,
        entry_id: &str,
        rating: LikertRating,
    ) -> Result<(), NavigationError> {
        let question = self
            .question_mut(list_id)
            .ok_or_else(|| NavigationError::UnknownQuestion(list_id.to_string()))?;
        let QuestionBody::LikertList(list) = question.body_mut() else {
            return Err(NavigationError::UnknownQuestion(format!(
                "{list_id}/{entry_id}"
            )));
        };
        list.entry_mut(entry_id)
            .ok_or_else(|| NavigationError::UnknownQuestion(format!("{list_id}/{entry_id}")))?
            .record_answer(AnswerState::LikertEntry(rating))?;
        let ratings = list.ratings();
        question.record_answer(ratings)?;
        Ok(())
    }

    /// Decide where to go after the question `current`.
    pub fn next_question_id(&self, current: &str) -> Result<Step, NavigationError> {
        let question = self
            .question(current)
            .ok_or_else(|| NavigationError::UnknownQuestion(current.to_string()))?;
        Ok(match question.next_question_id()? {
            Some(next) => Step::Next(next.to_string()),
            None => Step::Finished,
        })
    }

    /// The prompt of a question with all variables substituted.
    pub fn prompt(&self, id: &str) -> Option<String> {
        let prompt = self.question(id)?.prompt()?;
        Some(self.variables.apply(prompt))
    }

    pub fn end_by(&self) -> Option<DateTime<Utc>> {
        self.end_by
    }

    pub fn set_end_by(&mut self, at: Option<DateTime<Utc>>) {
        self.end_by = at;
    }

    /// Whether the quick-response deadline has passed at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.end_by.is_some_and(|end_by| now > end_by)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Record when the survey was finished.
    pub fn mark_finished(&mut self, at: DateTime<Utc>) {
        self.end_time = Some(at);
    }
}
