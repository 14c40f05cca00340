use serde::{Deserialize, Serialize};
use survey_router_types::{QuestionDecodeError, QuestionKind};

use crate::fields::Fields;

/// A screen of instructions with a single button. Carries no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionQuestion {
    pub style: InstructionStyle,

    /// Label of the button that moves on.
    pub button_text: String,

    pub instruction: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionStyle {
    SingleLine,
    MultiLine,

    /// Explains how to use an affect grid.
    AffectGrid,
}

impl InstructionQuestion {
    pub(super) fn decode(
        fields: &Fields<'_>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionDecodeError> {
        let style = match kind {
            QuestionKind::InstructionSingle => InstructionStyle::SingleLine,
            QuestionKind::InstructionAffect => InstructionStyle::AffectGrid,
            _ => InstructionStyle::MultiLine,
        };
        Ok(Self {
            style,
            button_text: fields.required_str("button_text")?,
            instruction: fields.required_str("instruction")?,
        })
    }

    pub fn kind(&self) -> QuestionKind {
        match self.style {
            InstructionStyle::SingleLine => QuestionKind::InstructionSingle,
            InstructionStyle::MultiLine => QuestionKind::InstructionMulti,
            InstructionStyle::AffectGrid => QuestionKind::InstructionAffect,
        }
    }
}
