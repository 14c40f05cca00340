use crate::QuestionKind;

/// Why a single question could not be decoded.
///
/// These are local: the survey decoder skips the question and carries on.
#[derive(Debug, thiserror::Error)]
pub enum QuestionDecodeError {
    #[error("question is not a JSON object")]
    NotAnObject,

    #[error("question '{question_id}' is missing required field '{field}'")]
    MissingField {
        question_id: String,
        field: &'static str,
    },

    #[error("question '{question_id}': field '{field}' should be {expected}")]
    WrongType {
        question_id: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown question type '{0}'")]
    UnknownKind(String),
}

/// Why a survey document was rejected as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("survey document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("survey document is not a JSON object")]
    NotAnObject,

    #[error("survey has no 'survey_id'")]
    MissingSurveyId,

    #[error("survey has no 'first_question_id'")]
    MissingFirstQuestion,

    #[error("first question '{0}' is not among the survey's questions")]
    UnresolvedFirstQuestion(String),
}

/// A caller recorded an answer that does not fit the question.
///
/// This is a bug in the caller (the wrong input wired to the wrong question),
/// never a condition to recover from with a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("question '{question_id}' of kind {kind} cannot hold a {state} answer")]
    StateMismatch {
        question_id: String,
        kind: QuestionKind,
        state: &'static str,
    },

    #[error("entry '{entry_id}' of Likert list '{list_id}' holds a {state} answer")]
    EntryStateMismatch {
        list_id: String,
        entry_id: String,
        state: &'static str,
    },
}

/// Error type for survey-level navigation.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no question with id '{0}'")]
    UnknownQuestion(String),

    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// Error type for document sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source has no document under that name.
    #[error("no survey document named '{0}'")]
    NotFound(String),

    /// Source-specific failure (I/O, transport, etc.)
    #[error("Source error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl SourceError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
