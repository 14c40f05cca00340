use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a question, as tagged by `question_type` in survey documents.
///
/// Used both for tagging answers in responses and for checking that a
/// recorded answer state fits the question it was recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick exactly one of a list of choices.
    CategoricalSingle,

    /// Pick any number of a list of choices.
    CategoricalMulti,

    /// Single-line instruction screen.
    InstructionSingle,

    /// Multi-line instruction screen.
    InstructionMulti,

    /// Instruction screen explaining the affect grid.
    InstructionAffect,

    /// Single-line free text.
    TextSingle,

    /// Multi-line free text.
    TextMulti,

    /// Free text asking for the user's name.
    TextUsername,

    /// Two-dimensional affect grid.
    AffectGrid,

    /// A list of rating scales answered together.
    LikertList,

    /// One rating scale.
    LikertEntry,
}

impl QuestionKind {
    /// Every kind, in declaration order.
    pub const ALL: [QuestionKind; 11] = [
        Self::CategoricalSingle,
        Self::CategoricalMulti,
        Self::InstructionSingle,
        Self::InstructionMulti,
        Self::InstructionAffect,
        Self::TextSingle,
        Self::TextMulti,
        Self::TextUsername,
        Self::AffectGrid,
        Self::LikertList,
        Self::LikertEntry,
    ];

    /// Parse a `question_type` tag.
    ///
    /// `random_sample` is an alias for `likert_list`. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "categorical_single_choice" => Self::CategoricalSingle,
            "categorical_multi_choice" => Self::CategoricalMulti,
            "instruction_single_line" => Self::InstructionSingle,
            "instruction_multi_line" => Self::InstructionMulti,
            "instruction_affect_grid" => Self::InstructionAffect,
            "text_single_line" => Self::TextSingle,
            "text_multi_line" => Self::TextMulti,
            "text_user_name" => Self::TextUsername,
            "affect_grid" => Self::AffectGrid,
            "likert_list" | "random_sample" => Self::LikertList,
            "likert_entry" => Self::LikertEntry,
            _ => return None,
        };
        Some(kind)
    }

    /// The `question_type` tag written into responses.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::CategoricalSingle => "categorical_single_choice",
            Self::CategoricalMulti => "categorical_multi_choice",
            Self::InstructionSingle => "instruction_single_line",
            Self::InstructionMulti => "instruction_multi_line",
            Self::InstructionAffect => "instruction_affect_grid",
            Self::TextSingle => "text_single_line",
            Self::TextMulti => "text_multi_line",
            Self::TextUsername => "text_user_name",
            Self::AffectGrid => "affect_grid",
            Self::LikertList => "likert_list",
            Self::LikertEntry => "likert_entry",
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::CategoricalSingle | Self::CategoricalMulti)
    }

    pub fn is_instruction(&self) -> bool {
        matches!(
            self,
            Self::InstructionSingle | Self::InstructionMulti | Self::InstructionAffect
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::TextSingle | Self::TextMulti | Self::TextUsername)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
