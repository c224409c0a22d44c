// src/registry.rs
use crate::models::{
    is_combined_label, Day, Exercise, ExerciseTemplate, Plans, ValidationError, WorkoutPlan,
    WorkoutSplit,
};

/// Plans for a body part, in creation order.
#[must_use]
pub fn plans_for_body_part<'a>(plans: &'a Plans, body_part: &str) -> Vec<&'a WorkoutPlan> {
    plans.values().filter(|p| p.body_part == body_part).collect()
}

#[must_use]
pub fn body_parts_for_day(split: &WorkoutSplit, day: Day) -> &[String] {
    split.get(&day).map(Vec::as_slice).unwrap_or_default()
}

/// Every plan whose body part is trained on `day`.
#[must_use]
pub fn plans_for_day<'a>(plans: &'a Plans, split: &WorkoutSplit, day: Day) -> Vec<&'a WorkoutPlan> {
    let parts = body_parts_for_day(split, day);
    plans
        .values()
        .filter(|p| parts.iter().any(|bp| *bp == p.body_part))
        .collect()
}

/// Concatenates the plans' templates, keeping the first template per name.
#[must_use]
pub fn merge_templates(plans: &[&WorkoutPlan]) -> Vec<ExerciseTemplate> {
    let mut merged: Vec<ExerciseTemplate> = Vec::new();
    for template in plans.iter().flat_map(|p| p.exercises.iter()) {
        if !merged.iter().any(|t| t.name == template.name) {
            merged.push(template.clone());
        }
    }
    merged
}

/// Id for a plan created at `now_ms`. Ids are zero-padded so that the
/// lexical order of the plan map is creation order.
#[must_use]
pub fn next_plan_id(existing: &Plans, now_ms: i64) -> String {
    let mut stamp = now_ms.max(0);
    loop {
        let id = format!("plan-{stamp:013}");
        if !existing.contains_key(&id) {
            return id;
        }
        stamp += 1;
    }
}

/// Builds a plan from staged exercises, dropping their ids and sets.
pub fn new_plan(
    name: &str,
    body_part: Option<&str>,
    staged: &[Exercise],
    existing: &Plans,
    now_ms: i64,
) -> Result<WorkoutPlan, ValidationError> {
    let body_part = body_part
        .map(str::trim)
        .filter(|bp| !bp.is_empty())
        .ok_or(ValidationError::MissingBodyPart)?;
    if is_combined_label(body_part) {
        return Err(ValidationError::CombinedPlan(body_part.to_string()));
    }
    if staged.is_empty() {
        return Err(ValidationError::EmptyWorkout);
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingPlanName);
    }

    Ok(WorkoutPlan {
        id: next_plan_id(existing, now_ms),
        name: name.to_string(),
        body_part: body_part.to_string(),
        exercises: staged.iter().map(Exercise::to_template).collect(),
    })
}

/// Split edits staged before a single save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitDraft {
    split: WorkoutSplit,
}

impl SplitDraft {
    #[must_use]
    pub fn new(current: &WorkoutSplit) -> Self {
        Self {
            split: current.clone(),
        }
    }

    /// Blank or already present body parts are ignored.
    pub fn add(&mut self, day: Day, body_part: &str) {
        let body_part = body_part.trim();
        if body_part.is_empty() {
            return;
        }
        let parts = self.split.entry(day).or_default();
        if !parts.iter().any(|bp| bp == body_part) {
            parts.push(body_part.to_string());
        }
    }

    pub fn remove(&mut self, day: Day, body_part: &str) {
        if let Some(parts) = self.split.get_mut(&day) {
            parts.retain(|bp| bp != body_part);
        }
    }

    pub fn clear(&mut self, day: Day) {
        self.split.insert(day, Vec::new());
    }

    #[must_use]
    pub fn parts(&self, day: Day) -> &[String] {
        body_parts_for_day(&self.split, day)
    }

    #[must_use]
    pub fn into_split(self) -> WorkoutSplit {
        self.split
    }
}
