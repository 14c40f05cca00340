//! Conditional routing away from a question.
//!
//! Each question may own a [`Navigator`]: a default target plus an ordered
//! table of rules. Rules are scanned in declared order and the first match
//! wins; when nothing matches the default target is used.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_router_types::{AnswerState, ContractViolation, QuestionDecodeError, QuestionKind};
use tracing::{trace, warn};

use crate::fields::labels;

/// The routing table of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigator {
    /// Id of the owning question, for error reports.
    question_id: String,

    /// Kind of the owning question; answers are checked against it.
    kind: QuestionKind,

    /// Where to go when no rule matches.
    default_target: String,

    rules: Rules,
}

/// The rule table, shaped by the kind of the owning question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rules {
    /// Always go to the default target.
    Unconditional,

    Categorical(Vec<CategoricalRule>),

    Affect(Vec<AffectRule>),

    LikertList(Vec<LikertRule>),
}

impl Rules {
    pub fn len(&self) -> usize {
        match self {
            Self::Unconditional => 0,
            Self::Categorical(rules) => rules.len(),
            Self::Affect(rules) => rules.len(),
            Self::LikertList(rules) => rules.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Matches when the selection is exactly the required set of labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalRule {
    pub required: BTreeSet<String>,
    pub target: String,
}

impl CategoricalRule {
    pub fn new<I, S>(required: I, target: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            target: target.into(),
        }
    }

    pub fn matches(&self, selected: &BTreeSet<String>) -> bool {
        self.required == *selected
    }
}

/// Matches when the answer lies in the quadrant carrying `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectRule {
    pub label: String,
    pub target: String,
}

impl AffectRule {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

/// Matches when every listed entry carries exactly the paired rating.
///
/// `entries` and `ratings` are parallel. A rule whose lists differ in length
/// never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertRule {
    pub entries: Vec<String>,
    pub ratings: Vec<i64>,
    pub target: String,
}

impl LikertRule {
    pub fn new<I, S>(pairs: I, target: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let (entries, ratings) = pairs
            .into_iter()
            .map(|(entry, rating)| (entry.into(), rating))
            .unzip();
        Self {
            entries,
            ratings,
            target: target.into(),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.entries.len() == self.ratings.len()
    }

    pub fn matches(&self, ratings: &BTreeMap<String, i64>) -> bool {
        self.is_well_formed()
            && self
                .entries
                .iter()
                .zip(&self.ratings)
                .all(|(entry, rating)| ratings.get(entry) == Some(rating))
    }
}

impl Navigator {
    /// Create a navigator without rules.
    pub fn new(
        question_id: impl Into<String>,
        kind: QuestionKind,
        default_target: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            kind,
            default_target: default_target.into(),
            rules: Rules::Unconditional,
        }
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Decode a `next_question` object for a question of `kind`.
    ///
    /// `default` is required. Rules that are missing `go_to` or carry an
    /// unusable `if_answer` are dropped with a warning. Conditions on kinds
    /// that cannot branch (text, instruction, single Likert entries) are ignored.
    pub fn decode(
        value: &Value,
        kind: QuestionKind,
        question_id: &str,
    ) -> Result<Self, QuestionDecodeError> {
        let obj = value
            .as_object()
            .ok_or_else(|| QuestionDecodeError::WrongType {
                question_id: question_id.to_string(),
                field: "next_question",
                expected: "an object",
            })?;

        let default_target = obj
            .get("default")
            .and_then(Value::as_str)
            .ok_or_else(|| QuestionDecodeError::MissingField {
                question_id: question_id.to_string(),
                field: "next_question.default",
            })?;

        let navigator = Self::new(question_id, kind, default_target);

        let conditions = match obj.get("conditions") {
            Some(Value::Array(conditions)) => conditions.as_slice(),
            Some(Value::Null) | None => return Ok(navigator),
            Some(_) => {
                warn!(question_id, "ignoring conditions that are not an array");
                return Ok(navigator);
            }
        };

        let rules = if kind.is_categorical() {
            Rules::Categorical(decode_rules(conditions, question_id, categorical_rule))
        } else if kind == QuestionKind::AffectGrid {
            Rules::Affect(decode_rules(conditions, question_id, affect_rule))
        } else if kind == QuestionKind::LikertList {
            Rules::LikertList(decode_rules(conditions, question_id, likert_rule))
        } else {
            if !conditions.is_empty() {
                warn!(
                    question_id,
                    %kind,
                    "ignoring conditions on a question kind that cannot branch"
                );
            }
            Rules::Unconditional
        };

        Ok(navigator.with_rules(rules))
    }

    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Pick the next question id for the recorded `state`.
    ///
    /// Fails only if `state` cannot belong to this navigator's question kind,
    /// which means the caller wired an answer to the wrong question.
    pub fn next_question(&self, state: &AnswerState) -> Result<&str, ContractViolation> {
        if !state.fits(self.kind) {
            return Err(ContractViolation::StateMismatch {
                question_id: self.question_id.clone(),
                kind: self.kind,
                state: state.type_name(),
            });
        }

        let matched = match (state, &self.rules) {
            (AnswerState::Categorical(selected), Rules::Categorical(rules)) => rules
                .iter()
                .position(|rule| rule.matches(selected))
                .map(|index| (index, rules[index].target.as_str())),
            (AnswerState::Affect(answer), Rules::Affect(rules)) => {
                let label = answer.quadrant.label();
                rules
                    .iter()
                    .position(|rule| rule.label == label)
                    .map(|index| (index, rules[index].target.as_str()))
            }
            (AnswerState::LikertList(ratings), Rules::LikertList(rules)) => rules
                .iter()
                .position(|rule| rule.matches(ratings))
                .map(|index| (index, rules[index].target.as_str())),
            // Text never branches, and nothing recorded means default.
            _ => None,
        };

        match matched {
            Some((rule, target)) => {
                trace!(question_id = %self.question_id, rule, target, "rule matched");
                Ok(target)
            }
            None => {
                trace!(
                    question_id = %self.question_id,
                    target = %self.default_target,
                    "no rule matched"
                );
                Ok(&self.default_target)
            }
        }
    }
}

fn decode_rules<R>(
    conditions: &[Value],
    question_id: &str,
    decode: fn(&Value) -> Option<R>,
) -> Vec<R> {
    conditions
        .iter()
        .enumerate()
        .filter_map(|(index, condition)| {
            let rule = decode(condition);
            if rule.is_none() {
                warn!(question_id, index, "dropping malformed routing rule");
            }
            rule
        })
        .collect()
}

fn go_to(condition: &Value) -> Option<String> {
    condition.get("go_to")?.as_str().map(str::to_string)
}

fn categorical_rule(condition: &Value) -> Option<CategoricalRule> {
    let required = labels(condition.get("if_answer")?)?;
    Some(CategoricalRule::new(required, go_to(condition)?))
}

fn affect_rule(condition: &Value) -> Option<AffectRule> {
    let mut label = labels(condition.get("if_answer")?)?;
    if label.len() != 1 {
        return None;
    }
    Some(AffectRule::new(label.remove(0), go_to(condition)?))
}

fn likert_rule(condition: &Value) -> Option<LikertRule> {
    let entries = labels(condition.get("likert_entries")?)?;
    let ratings = condition
        .get("if_answer")?
        .as_array()?
        .iter()
        .map(Value::as_i64)
        .collect::<Option<Vec<_>>>()?;
    let rule = LikertRule {
        entries,
        ratings,
        target: go_to(condition)?,
    };
    if !rule.is_well_formed() {
        warn!(
            entries = rule.entries.len(),
            ratings = rule.ratings.len(),
            target = %rule.target,
            "Likert rule has unequal entry and rating lists; it will never match"
        );
    }
    Some(rule)
}
