//! Bundled survey definitions.
//!
//! - `mood_check` uses every question kind: an affect grid sends unpleasant
//!   feelings to a Likert list, which can in turn ask for more.
//! - `activities` has questions that do not decode (an unknown kind, and a
//!   categorical question without choices) next to ones that do.

/// A daily check-in routed on mood, affect and ratings.
pub const MOOD_CHECK: &str = include_str!("../surveys/mood_check.json");

/// An activity log with a multi-choice branch and two broken questions.
pub const ACTIVITIES: &str = include_str!("../surveys/activities.json");

/// Every bundled document, by name.
pub const ALL: [(&str, &str); 2] = [("mood_check", MOOD_CHECK), ("activities", ACTIVITIES)];

/// Look up a bundled document by name.
pub fn document(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, text)| *text)
}
