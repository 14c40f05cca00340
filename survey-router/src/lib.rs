//! # survey-router
//!
//! Questionnaires whose question sequence is decided by the answers given.
//!
//! A survey definition arrives as JSON. Decoding it yields a [`Survey`]: an
//! ordered list of [`Question`]s, each with the kind-specific fields of its
//! `question_type` and, optionally, a [`Navigator`] that picks the next
//! question from the recorded answer. Once questions are answered, the
//! survey is encoded into a response document.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use survey_router::{AnswerState, ResponseOptions, Step, Survey, encode_response};
//!
//! let mut survey = Survey::from_json_str(&document)?;
//! let first = survey.entry_question().id().to_string();
//!
//! survey.record_answer(&first, AnswerState::categorical(["A"]))?;
//! match survey.next_question_id(&first)? {
//!     Step::Next(id) => show(&survey, &id),
//!     Step::Finished => {}
//! }
//!
//! let response = encode_response(&survey, &ResponseOptions::new().with_account(email))?;
//! ```
//!
//! ## Routing
//!
//! Rules are scanned in declared order and the first match wins:
//! - categorical questions match when the selection equals the rule's labels
//! - affect grids match on the label of the answered quadrant
//! - Likert lists match when every listed entry has exactly the listed rating
//!
//! Text questions always go to the default target.

// Re-export all types from survey-router-types
pub use survey_router_types::*;

mod fields;

mod navigator;
pub use navigator::{AffectRule, CategoricalRule, LikertRule, Navigator, Rules};

pub mod question;
pub use question::{Question, QuestionBody};

mod substitution;
pub use substitution::Variables;

mod survey;
pub use survey::{Step, Survey};

mod response;
pub use response::{
    DEFAULT_OPERATING_SYSTEM, ResponseOptions, encode_response, encode_response_for,
};

mod source;
pub use source::{DirectorySource, LoadError, StaticSource, load_survey};

// Scripted runs for driving surveys without user interaction
mod scripted;
pub use scripted::{ScriptedAnswers, WalkError};
