//! Integration tests for survey-router

use chrono::DateTime;
use serde_json::json;
use survey_router::{
    AffectAnswer, AffectRule, AnswerState, ContractViolation, GridPoint, GridSize, LikertRating,
    NavigationError, Navigator, Quadrant, QuestionKind, Rules, ScriptedAnswers, Step, StaticSource,
    Survey, SurveyError, WalkError, encode_response_for, load_survey,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bundled(name: &str) -> Survey {
    init_tracing();
    let source = example_surveys::ALL
        .iter()
        .fold(StaticSource::new(), |source, (name, text)| {
            source.with_document(*name, *text)
        });
    load_survey(&source, name).unwrap()
}

#[test]
fn categorical_answer_picks_matching_rule() {
    let document = r#"{"survey_id":"s1","first_question_id":"q1","questions":[{"question_id":"q1","question_type":"categorical_single_choice","choices":["A","B"],"next_question":{"default":"q2","conditions":[{"if_answer":["A"],"go_to":"q3"}]}}]}"#;
    let mut survey = Survey::from_json_str(document).unwrap();
    assert_eq!(survey.id(), "s1");
    assert_eq!(survey.entry_question().id(), "q1");

    survey
        .record_answer("q1", AnswerState::categorical(["A"]))
        .unwrap();
    assert_eq!(
        survey.next_question_id("q1").unwrap(),
        Step::Next("q3".into())
    );

    survey
        .record_answer("q1", AnswerState::categorical(["B"]))
        .unwrap();
    assert_eq!(
        survey.next_question_id("q1").unwrap(),
        Step::Next("q2".into())
    );
}

#[test]
fn missing_first_question_rejects_document() {
    let document = json!({
        "survey_id": "s1",
        "questions": [{ "question_id": "q1", "question_type": "text_single_line" }]
    });
    assert!(matches!(
        Survey::decode(&document),
        Err(SurveyError::MissingFirstQuestion)
    ));
}

#[test]
fn unknown_kind_is_skipped() {
    let document = json!({
        "survey_id": "s1",
        "first_question_id": "q1",
        "questions": [
            { "question_id": "q1", "question_type": "text_single_line" },
            { "question_id": "q2", "question_type": "unknown_kind" },
            { "question_id": "q3", "question_type": "text_multi_line" }
        ]
    });
    let survey = Survey::decode(&document).unwrap();
    let ids: Vec<_> = survey.questions().iter().map(|q| q.id()).collect();
    assert_eq!(ids, ["q1", "q3"]);
}

#[test]
fn affect_rule_matches_quadrant_label() {
    let answer = AnswerState::Affect(AffectAnswer::new(
        Quadrant::BottomRight,
        GridPoint::new(80.0, 80.0),
        GridSize::new(100.0, 100.0),
    ));

    let calm = Navigator::new("grid", QuestionKind::AffectGrid, "fallback").with_rules(
        Rules::Affect(vec![AffectRule::new("positive_unaroused", "calm")]),
    );
    assert_eq!(calm.next_question(&answer).unwrap(), "calm");

    let excited = Navigator::new("grid", QuestionKind::AffectGrid, "fallback").with_rules(
        Rules::Affect(vec![AffectRule::new("positive_aroused", "excited")]),
    );
    assert_eq!(excited.next_question(&answer).unwrap(), "fallback");
}

#[test]
fn likert_rule_needs_every_rating() {
    let navigator = Navigator::decode(
        &json!({
            "default": "qd",
            "conditions": [
                { "likert_entries": ["e1", "e2"], "if_answer": [3, 5], "go_to": "qx" }
            ]
        }),
        QuestionKind::LikertList,
        "list",
    )
    .unwrap();

    let matching = AnswerState::likert_list([("e1", 3), ("e2", 5)]);
    let off_by_one = AnswerState::likert_list([("e1", 3), ("e2", 4)]);
    assert_eq!(navigator.next_question(&matching).unwrap(), "qx");
    assert_eq!(navigator.next_question(&off_by_one).unwrap(), "qd");
}

#[test]
fn bundled_surveys_decode() {
    let mood = bundled("mood_check");
    assert_eq!(mood.len(), 8);
    assert_eq!(mood.entry_question().id(), "welcome");
    assert_eq!(
        mood.end_by(),
        Some(DateTime::from_timestamp(1_767_225_600, 0).unwrap())
    );

    // `work_hours` has an unknown kind and `broken_choice` has no choices.
    let activities = bundled("activities");
    let ids: Vec<_> = activities.questions().iter().map(|q| q.id()).collect();
    assert_eq!(ids, ["today", "sample", "energy", "note"]);
    assert_eq!(
        activities.question("sample").unwrap().kind(),
        QuestionKind::LikertList
    );
}

#[test]
fn happy_mood_ends_early() {
    let mut survey = bundled("mood_check");
    let path = ScriptedAnswers::new()
        .with_text("name", "Alice")
        .with_choice("mood", ["Good"])
        .run(&mut survey)
        .unwrap();

    assert_eq!(path, ["welcome", "name", "mood", "goodbye"]);
    assert_eq!(survey.prompt("goodbye").as_deref(), Some("Thanks, Alice!"));
}

#[test]
fn stressed_mood_walks_every_kind() {
    let mut survey = bundled("mood_check");
    let path = ScriptedAnswers::new()
        .with_text("name", "Alice")
        .with_choice("mood", ["Bad"])
        .with_affect(
            "grid",
            AffectAnswer::at(GridPoint::new(10.0, 20.0), GridSize::new(100.0, 100.0)),
        )
        .with_entry("stress", "sleep", LikertRating::new("Very badly", 1, true))
        .with_entry("stress", "worry", LikertRating::new("Constantly", 5, true))
        .with_text("support", "Work has been a lot.")
        .run(&mut survey)
        .unwrap();

    assert_eq!(
        path,
        [
            "welcome",
            "name",
            "mood",
            "grid_intro",
            "grid",
            "stress",
            "support",
            "goodbye"
        ]
    );
    assert_eq!(survey.variables().get("$name"), Some("Alice"));
    assert_eq!(
        survey.prompt("mood").as_deref(),
        Some("How are you today, Alice?")
    );
    assert_eq!(
        survey.end_time(),
        Some(DateTime::from_timestamp(8, 0).unwrap())
    );

    let response = encode_response_for(&survey, Some("alice@example.com"), None).unwrap();
    assert_eq!(
        response,
        json!({
            "operating_system": "ios",
            "survey_id": "mood_check",
            "account_name": "alice@example.com",
            "finish_time": 8,
            "answers": [
                {
                    "question_id": "name",
                    "question_type": "text_user_name",
                    "create_time": 1,
                    "finish_time": 2,
                    "answer": "Alice"
                },
                {
                    "question_id": "mood",
                    "question_type": "categorical_single_choice",
                    "create_time": 2,
                    "finish_time": 3,
                    "answer": ["Bad"]
                },
                {
                    "question_id": "grid",
                    "question_type": "affect_grid",
                    "create_time": 4,
                    "finish_time": 5,
                    "answer": "negative_aroused",
                    "x_lim": 100.0,
                    "y_lim": 100.0,
                    "x_value": 10.0,
                    "y_value": 20.0
                },
                {
                    "question_id": "stress",
                    "question_type": "likert_list",
                    "create_time": 5,
                    "finish_time": 6,
                    "answer": [
                        {
                            "question_id": "sleep",
                            "question_type": "likert_entry",
                            "create_time": 5,
                            "finish_time": 6,
                            "answer": "Very badly",
                            "rating": 1,
                            "touched": true
                        },
                        {
                            "question_id": "worry",
                            "question_type": "likert_entry",
                            "create_time": 5,
                            "finish_time": 6,
                            "answer": "Constantly",
                            "rating": 5,
                            "touched": true
                        }
                    ]
                },
                {
                    "question_id": "support",
                    "question_type": "text_multi_line",
                    "create_time": 6,
                    "finish_time": 7,
                    "answer": "Work has been a lot."
                }
            ]
        })
    );
}

#[test]
fn multi_choice_walk_through_random_sample() {
    let mut survey = bundled("activities");
    let path = ScriptedAnswers::new()
        .with_choice("today", ["Friends", "Exercise"])
        .with_entry("sample", "enjoyment", LikertRating::new("Very", 3, true))
        .with_answer("energy", LikertRating::new("Some", 2, false).into())
        .with_text("note", "")
        .run(&mut survey)
        .unwrap();
    assert_eq!(path, ["today", "sample", "energy", "note"]);

    let response = encode_response_for(&survey, None, Some("device-7")).unwrap();
    assert_eq!(response["uuid"], json!("device-7"));
    assert_eq!(
        response["answers"][2],
        json!({
            "question_id": "energy",
            "question_type": "likert_entry",
            "create_time": 2,
            "finish_time": 3,
            "answer": "Some",
            "rating": 2,
            "touched": false
        })
    );
}

#[test]
fn route_to_skipped_question_fails_walk() {
    let mut survey = bundled("activities");
    let err = ScriptedAnswers::new()
        .with_choice("today", ["Work"])
        .run(&mut survey)
        .unwrap_err();
    assert!(matches!(
        err,
        WalkError::UnknownTarget { ref from, ref to } if from == "today" && to == "work_hours"
    ));
}

#[test]
fn walk_without_answer_fails() {
    let mut survey = bundled("mood_check");
    let err = ScriptedAnswers::new().run(&mut survey).unwrap_err();
    assert!(matches!(err, WalkError::MissingAnswer(ref id) if id == "name"));
}

#[test]
fn walk_detects_cycles() {
    let mut survey = Survey::decode(&json!({
        "survey_id": "loop",
        "first_question_id": "a",
        "questions": [
            {
                "question_id": "a",
                "question_type": "text_single_line",
                "next_question": { "default": "b" }
            },
            {
                "question_id": "b",
                "question_type": "text_single_line",
                "next_question": { "default": "a" }
            }
        ]
    }))
    .unwrap();

    let err = ScriptedAnswers::new()
        .with_text("a", "1")
        .with_text("b", "2")
        .run(&mut survey)
        .unwrap_err();
    assert!(matches!(err, WalkError::Cycle(ref id) if id == "a"));
}

#[test]
fn wrong_answer_shape_is_a_contract_violation() {
    let mut survey = bundled("mood_check");
    let err = survey
        .record_answer("mood", AnswerState::text("Bad"))
        .unwrap_err();
    assert!(matches!(
        err,
        NavigationError::Contract(ContractViolation::StateMismatch { ref question_id, .. })
            if question_id == "mood"
    ));
    assert!(survey.question("mood").unwrap().state().is_none());
}

#[test]
fn snapshot_resumes_in_progress_survey() {
    let mut survey = bundled("mood_check");
    survey
        .record_answer("name", AnswerState::text("Bo"))
        .unwrap();
    survey
        .record_answer("mood", AnswerState::categorical(["Okay"]))
        .unwrap();

    let snapshot = survey.to_snapshot().unwrap();
    let restored = Survey::from_snapshot(&snapshot).unwrap();

    assert_eq!(restored, survey);
    assert_eq!(
        restored.prompt("support").as_deref(),
        Some("Bo, is there anything you would like to talk about?")
    );
    assert_eq!(
        restored.next_question_id("mood").unwrap(),
        Step::Next("grid_intro".into())
    );
}

#[test]
fn overdue_after_end_by() {
    let survey = bundled("mood_check");
    assert!(!survey.is_overdue(DateTime::from_timestamp(1_767_225_600, 0).unwrap()));
    assert!(survey.is_overdue(DateTime::from_timestamp(1_767_225_601, 0).unwrap()));
}
