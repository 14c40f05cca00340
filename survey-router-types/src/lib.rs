//! Core types for the survey-router crate.
//!
//! This crate provides the foundational value types for routed surveys:
//! - `QuestionKind` - The closed set of question kinds and their wire tags
//! - `AnswerState` - The answer recorded for a question, one shape per kind
//! - Error types for decoding, navigation and contract violations
//! - `DocumentSource` trait - For collaborators that supply survey documents

mod question_kind;
pub use question_kind::QuestionKind;

mod answer_state;
pub use answer_state::{AffectAnswer, AnswerState, GridPoint, GridSize, LikertRating, Quadrant};

mod error;
pub use error::{
    ContractViolation, NavigationError, QuestionDecodeError, SourceError, SurveyError,
};

mod traits;
pub use traits::DocumentSource;
