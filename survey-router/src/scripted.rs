//! Scripted runs for driving surveys without user interaction.
//!
//! `ScriptedAnswers` walks a survey from its entry question, recording
//! pre-defined answers and following navigation until a question without a
//! navigator is reached. This is useful for testing survey definitions.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_router::{ScriptedAnswers, Survey};
//!
//! let mut survey = Survey::from_json_str(DOCUMENT)?;
//! let path = ScriptedAnswers::new()
//!     .with_text("name", "Alice")
//!     .with_choice("mood", ["Bad"])
//!     .run(&mut survey)?;
//!
//! assert_eq!(path, ["name", "mood", "why", "end"]);
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use survey_router_types::{AffectAnswer, AnswerState, LikertRating, NavigationError};

use crate::question::QuestionBody;
use crate::{Step, Survey};

/// Pre-configured answers, keyed by question id.
#[derive(Debug, Clone)]
pub struct ScriptedAnswers {
    answers: HashMap<String, AnswerState>,
    entries: HashMap<String, Vec<(String, LikertRating)>>,
    start: DateTime<Utc>,
    step: Duration,
}

/// Error type for scripted runs.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Missing scripted answer for question: {0}")]
    MissingAnswer(String),

    #[error("Question '{from}' routes to unknown question '{to}'")]
    UnknownTarget { from: String, to: String },

    #[error("Question '{0}' was reached twice")]
    Cycle(String),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

impl Default for ScriptedAnswers {
    fn default() -> Self {
        Self {
            answers: HashMap::new(),
            entries: HashMap::new(),
            start: DateTime::<Utc>::default(),
            step: Duration::seconds(1),
        }
    }
}

impl ScriptedAnswers {
    /// Create an empty script starting at the Unix epoch, one second per step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the first question shown.
    pub fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Time that passes between showing and submitting each question.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Add an answer for a question.
    pub fn with_answer(mut self, id: impl Into<String>, state: AnswerState) -> Self {
        self.answers.insert(id.into(), state);
        self
    }

    /// Add a categorical answer.
    pub fn with_choice<I, S>(self, id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_answer(id, AnswerState::categorical(labels))
    }

    /// Add a text answer.
    pub fn with_text(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_answer(id, AnswerState::text(text))
    }

    /// Add an affect grid answer.
    pub fn with_affect(self, id: impl Into<String>, answer: AffectAnswer) -> Self {
        self.with_answer(id, AnswerState::Affect(answer))
    }

    /// Add the rating of one entry of a Likert list.
    ///
    /// The list's own answer is derived from its entries.
    pub fn with_entry(
        mut self,
        list_id: impl Into<String>,
        entry_id: impl Into<String>,
        rating: LikertRating,
    ) -> Self {
        self.entries
            .entry(list_id.into())
            .or_default()
            .push((entry_id.into(), rating));
        self
    }

    /// Walk `survey` from its entry question.
    ///
    /// Returns the ids of the questions visited, in order. Instructions need
    /// no scripted answer.
    pub fn run(&self, survey: &mut Survey) -> Result<Vec<String>, WalkError> {
        let mut now = self.start;
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = survey.entry_question().id().to_string();

        loop {
            if !seen.insert(current.clone()) {
                return Err(WalkError::Cycle(current));
            }
            path.push(current.clone());

            let question = survey
                .question_mut(&current)
                .ok_or_else(|| NavigationError::UnknownQuestion(current.clone()))?;
            question.mark_created(now);
            now += self.step;
            let is_instruction = matches!(question.body(), QuestionBody::Instruction(_));
            let is_list = matches!(question.body(), QuestionBody::LikertList(_));

            if let Some(entries) = self.entries.get(&current) {
                for (entry_id, rating) in entries {
                    survey.record_entry_answer(&current, entry_id, rating.clone())?;
                }
            }
            match self.answers.get(&current) {
                Some(state) => survey.record_answer(&current, state.clone())?,
                None if is_instruction => {}
                None if is_list && self.entries.contains_key(&current) => {}
                None => return Err(WalkError::MissingAnswer(current)),
            }

            if let Some(question) = survey.question_mut(&current) {
                question.mark_completed(now);
            }

            match survey.next_question_id(&current)? {
                Step::Finished => {
                    survey.mark_finished(now);
                    return Ok(path);
                }
                Step::Next(next) => {
                    if survey.question(&next).is_none() {
                        return Err(WalkError::UnknownTarget {
                            from: current,
                            to: next,
                        });
                    }
                    current = next;
                }
            }
        }
    }
}
