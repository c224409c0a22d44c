// src/models.rs
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// Joins the body parts of a combined (split) workout into one label.
pub const BODY_PART_SEPARATOR: &str = " & ";

/// Sessions keyed by calendar date. At most one session per date.
pub type Sessions = BTreeMap<NaiveDate, WorkoutSession>;
/// Plans keyed by plan id. Ids sort by creation time.
pub type Plans = BTreeMap<String, WorkoutPlan>;
/// Body parts trained on each weekday.
pub type WorkoutSplit = BTreeMap<Day, Vec<String>>;

/// User-correctable failures. None of them change any state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please select at least one exercise.")]
    EmptySelection,
    #[error("Please add at least one exercise.")]
    EmptyWorkout,
    #[error("Please fill in the exercise name.")]
    MissingExerciseName,
    #[error("Please select a body part.")]
    MissingBodyPart,
    #[error("Cannot save the combined workout '{0}' as a single plan.")]
    CombinedPlan(String),
    #[error("Please enter a name for the plan.")]
    MissingPlanName,
    #[error("Plan not found: {0}")]
    UnknownPlan(String),
    #[error("No exercise at position {0}.")]
    NoSuchExercise(usize),
    #[error("Exercise {exercise} has no set {set}.")]
    NoSuchSet { exercise: usize, set: usize },
    #[error("Weight must be a finite, non-negative number, got {0}.")]
    InvalidWeight(f64),
    #[error("Cannot {action} while {step}.")]
    NotAllowed { action: &'static str, step: String },
    #[error("Please select an exercise with at least {needed} data points to get feedback (found {found}).")]
    NotEnoughData { needed: usize, found: usize },
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Labels like "Chest & Back" come from split auto-load or session reconstruction.
#[must_use]
pub fn is_combined_label(label: &str) -> bool {
    label.contains(BODY_PART_SEPARATOR)
}

/// Joins body parts, keeping first-seen order and dropping repeats.
pub fn join_body_parts<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for part in parts {
        if !part.is_empty() && !seen.contains(&part) {
            seen.push(part);
        }
    }
    seen.join(BODY_PART_SEPARATOR)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub id: String,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
}

impl SetEntry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: new_id("set"),
            reps: 0,
            weight: 0.0,
        }
    }

    /// reps × weight
    #[must_use]
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }
}

/// An exercise as logged in a session or staged in the flow.
///
/// `name` is the join key for history, records and de-duplication;
/// `id` is regenerated for every occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub body_part: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
}

impl Exercise {
    /// Fresh occurrence of a template with a single empty set.
    #[must_use]
    pub fn from_template(template: &ExerciseTemplate) -> Self {
        Self {
            id: new_id(&template.name.replace(char::is_whitespace, "-")),
            name: template.name.clone(),
            body_part: template.body_part.clone(),
            image_url: template.image_url.clone(),
            is_custom: template.is_custom,
            sets: vec![SetEntry::empty()],
        }
    }

    #[must_use]
    pub fn to_template(&self) -> ExerciseTemplate {
        ExerciseTemplate {
            name: self.name.clone(),
            body_part: self.body_part.clone(),
            image_url: self.image_url.clone(),
            is_custom: self.is_custom,
        }
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(SetEntry::volume).sum()
    }
}

/// An exercise without identity or sets, as stored in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub name: String,
    #[serde(default)]
    pub body_part: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub date: NaiveDate,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl WorkoutSession {
    /// Distinct body parts of the session in first-seen order, joined.
    #[must_use]
    pub fn body_part_label(&self) -> String {
        join_body_parts(self.exercises.iter().map(|ex| ex.body_part.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: String,
    pub name: String,
    pub body_part: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseTemplate>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for Day {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }
}
