use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use survey_router_types::{AnswerState, ContractViolation, QuestionDecodeError};

use super::Question;
use crate::fields::Fields;

/// A two-dimensional grid the user drags a slider across.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectGridQuestion {
    pub labels: AffectGridLabels,
}

/// The eight labels around the edge of an affect grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectGridLabels {
    pub top_left: String,
    pub top: String,
    pub top_right: String,
    pub left: String,
    pub right: String,
    pub bottom_left: String,
    pub bottom: String,
    pub bottom_right: String,
}

impl AffectGridQuestion {
    pub(super) fn decode(fields: &Fields<'_>) -> Result<Self, QuestionDecodeError> {
        Ok(Self {
            labels: AffectGridLabels {
                top_left: fields.required_str("top_left_label")?,
                top: fields.required_str("top_label")?,
                top_right: fields.required_str("top_right_label")?,
                left: fields.required_str("left_label")?,
                right: fields.required_str("right_label")?,
                bottom_left: fields.required_str("bottom_left_label")?,
                bottom: fields.required_str("bottom_label")?,
                bottom_right: fields.required_str("bottom_right_label")?,
            },
        })
    }

    pub(super) fn encode_answer(
        &self,
        question: &Question,
        fragment: &mut Map<String, Value>,
    ) -> Result<(), ContractViolation> {
        let AnswerState::Affect(answer) = question.state() else {
            return Err(question.mismatch(question.state()));
        };
        fragment.insert("answer".into(), Value::from(answer.quadrant.label()));
        fragment.insert("x_lim".into(), Value::from(answer.size.width));
        fragment.insert("y_lim".into(), Value::from(answer.size.height));
        fragment.insert("x_value".into(), Value::from(answer.position.x));
        fragment.insert("y_value".into(), Value::from(answer.position.y));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;
    use survey_router_types::{AffectAnswer, GridPoint, GridSize, Quadrant, QuestionKind};

    use super::*;
    use crate::question::QuestionBody;

    fn grid() -> Value {
        json!({
            "question_id": "grid",
            "question_type": "affect_grid",
            "top_left_label": "Stressed",
            "top_label": "High energy",
            "top_right_label": "Excited",
            "left_label": "Unpleasant",
            "right_label": "Pleasant",
            "bottom_left_label": "Depressed",
            "bottom_label": "Sleepy",
            "bottom_right_label": "Relaxed"
        })
    }

    #[test]
    fn decode_labels() {
        let question = Question::decode(&grid()).unwrap();
        let QuestionBody::AffectGrid(affect) = question.body() else {
            panic!("Expected affect grid body");
        };
        assert_eq!(affect.labels.top_left, "Stressed");
        assert_eq!(affect.labels.bottom_right, "Relaxed");
        assert_eq!(question.kind(), QuestionKind::AffectGrid);
    }

    #[test]
    fn every_label_is_required() {
        let mut value = grid();
        value.as_object_mut().unwrap().remove("bottom_label");
        assert!(matches!(
            Question::decode(&value),
            Err(QuestionDecodeError::MissingField {
                field: "bottom_label",
                ..
            })
        ));
    }

    #[test]
    fn encode_answer_reports_quadrant_and_position() {
        let mut question = Question::decode(&grid()).unwrap();
        question
            .record_answer(AnswerState::Affect(AffectAnswer::new(
                Quadrant::BottomRight,
                GridPoint::new(240.5, 300.0),
                GridSize::new(320.0, 320.0),
            )))
            .unwrap();
        question.mark_created(DateTime::from_timestamp(10, 0).unwrap());
        question.mark_completed(DateTime::from_timestamp(12, 0).unwrap());

        assert_eq!(
            question.encode_answer().unwrap(),
            Some(json!({
                "question_id": "grid",
                "question_type": "affect_grid",
                "create_time": 10,
                "finish_time": 12,
                "answer": "positive_unaroused",
                "x_lim": 320.0,
                "y_lim": 320.0,
                "x_value": 240.5,
                "y_value": 300.0
            }))
        );
    }
}
