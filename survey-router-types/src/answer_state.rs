use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::QuestionKind;

/// The answer recorded for a question.
///
/// The producer of a state guarantees that its shape matches the kind of the
/// question it is recorded against. `Categorical` always carries the full
/// selection, never a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum AnswerState {
    /// Nothing recorded yet.
    #[default]
    None,

    /// The selected choice labels of a categorical question.
    Categorical(BTreeSet<String>),

    /// Free text.
    Text(String),

    /// Where the slider of an affect grid was left.
    Affect(AffectAnswer),

    /// Rating per entry id of a Likert list.
    LikertList(BTreeMap<String, i64>),

    /// The rating given on a single Likert scale.
    LikertEntry(LikertRating),
}

impl AnswerState {
    /// Build a categorical answer from any collection of labels.
    pub fn categorical<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categorical(labels.into_iter().map(Into::into).collect())
    }

    /// Build a text answer.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a Likert list answer from `(entry id, rating)` pairs.
    pub fn likert_list<I, S>(ratings: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self::LikertList(
            ratings
                .into_iter()
                .map(|(entry, rating)| (entry.into(), rating))
                .collect(),
        )
    }

    /// Check if nothing has been recorded.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check if this state may be recorded against a question of `kind`.
    ///
    /// `None` fits every kind.
    pub fn fits(&self, kind: QuestionKind) -> bool {
        match self {
            Self::None => true,
            Self::Categorical(_) => kind.is_categorical(),
            Self::Text(_) => kind.is_text(),
            Self::Affect(_) => kind == QuestionKind::AffectGrid,
            Self::LikertList(_) => kind == QuestionKind::LikertList,
            Self::LikertEntry(_) => kind == QuestionKind::LikertEntry,
        }
    }

    /// Get the variant name of this state for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Categorical(_) => "Categorical",
            Self::Text(_) => "Text",
            Self::Affect(_) => "Affect",
            Self::LikertList(_) => "LikertList",
            Self::LikertEntry(_) => "LikertEntry",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<AffectAnswer> for AnswerState {
    fn from(answer: AffectAnswer) -> Self {
        Self::Affect(answer)
    }
}

impl From<LikertRating> for AnswerState {
    fn from(rating: LikertRating) -> Self {
        Self::LikertEntry(rating)
    }
}

/// One of the four zones of an affect grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// The fixed label used for this quadrant in routing rules and responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TopLeft => "negative_aroused",
            Self::TopRight => "positive_aroused",
            Self::BottomLeft => "negative_unaroused",
            Self::BottomRight => "positive_unaroused",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "negative_aroused" => Some(Self::TopLeft),
            "positive_aroused" => Some(Self::TopRight),
            "negative_unaroused" => Some(Self::BottomLeft),
            "positive_unaroused" => Some(Self::BottomRight),
            _ => None,
        }
    }

    /// Classify a slider position on a grid whose origin is the top-left corner.
    ///
    /// Points on the centre lines belong to the right and bottom halves.
    pub fn from_position(position: GridPoint, size: GridSize) -> Self {
        let right = position.x >= size.width / 2.0;
        let bottom = position.y >= size.height / 2.0;
        match (right, bottom) {
            (false, false) => Self::TopLeft,
            (true, false) => Self::TopRight,
            (false, true) => Self::BottomLeft,
            (true, true) => Self::BottomRight,
        }
    }
}

/// A slider position on an affect grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The on-screen extent of an affect grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: f64,
    pub height: f64,
}

impl GridSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The answer to an affect grid question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectAnswer {
    pub quadrant: Quadrant,
    pub position: GridPoint,
    pub size: GridSize,
}

impl AffectAnswer {
    pub fn new(quadrant: Quadrant, position: GridPoint, size: GridSize) -> Self {
        Self {
            quadrant,
            position,
            size,
        }
    }

    /// Build an answer whose quadrant is derived from the slider position.
    pub fn at(position: GridPoint, size: GridSize) -> Self {
        Self::new(Quadrant::from_position(position, size), position, size)
    }
}

/// The answer to a single Likert scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertRating {
    /// The description shown at the chosen point of the scale.
    pub answer: String,

    /// The chosen point of the scale.
    pub rating: i64,

    /// Whether the user moved the slider at all.
    pub touched: bool,
}

impl LikertRating {
    pub fn new(answer: impl Into<String>, rating: i64, touched: bool) -> Self {
        Self {
            answer: answer.into(),
            rating,
            touched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_fits_every_kind() {
        for kind in QuestionKind::ALL {
            assert!(AnswerState::None.fits(kind));
        }
    }

    #[test]
    fn categorical_fits_only_categorical_kinds() {
        let state = AnswerState::categorical(["A"]);
        assert!(state.fits(QuestionKind::CategoricalSingle));
        assert!(state.fits(QuestionKind::CategoricalMulti));
        assert!(!state.fits(QuestionKind::TextSingle));
        assert!(!state.fits(QuestionKind::AffectGrid));
    }

    #[test]
    fn text_fits_all_text_kinds() {
        let state = AnswerState::text("Alice");
        assert!(state.fits(QuestionKind::TextSingle));
        assert!(state.fits(QuestionKind::TextMulti));
        assert!(state.fits(QuestionKind::TextUsername));
        assert!(!state.fits(QuestionKind::InstructionSingle));
    }

    #[test]
    fn categorical_collapses_duplicates() {
        let state = AnswerState::categorical(["B", "A", "B"]);
        assert_eq!(state, AnswerState::categorical(["A", "B"]));
    }

    #[test]
    fn quadrant_labels_round_trip() {
        for quadrant in [
            Quadrant::TopLeft,
            Quadrant::TopRight,
            Quadrant::BottomLeft,
            Quadrant::BottomRight,
        ] {
            assert_eq!(Quadrant::from_label(quadrant.label()), Some(quadrant));
        }
        assert_eq!(Quadrant::from_label("neutral"), None);
    }

    #[test]
    fn quadrant_from_position() {
        let size = GridSize::new(200.0, 100.0);
        assert_eq!(
            Quadrant::from_position(GridPoint::new(10.0, 10.0), size),
            Quadrant::TopLeft
        );
        assert_eq!(
            Quadrant::from_position(GridPoint::new(150.0, 10.0), size),
            Quadrant::TopRight
        );
        assert_eq!(
            Quadrant::from_position(GridPoint::new(10.0, 90.0), size),
            Quadrant::BottomLeft
        );
        assert_eq!(
            Quadrant::from_position(GridPoint::new(100.0, 50.0), size),
            Quadrant::BottomRight
        );
    }
}
