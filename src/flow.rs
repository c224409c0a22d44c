// src/flow.rs
//! The workout flow: which step the logger is in and which exercises are
//! staged. Every user action and every upstream change (selected date,
//! session collection, plans, split) is an event folded into the current
//! state by [`dispatch`]. After each event the split auto-load rule is
//! evaluated against the same snapshot.
use crate::catalog::CatalogEntry;
use crate::models::{
    join_body_parts, Day, Exercise, Plans, SetEntry, Sessions, ValidationError, WorkoutPlan,
    WorkoutSession, WorkoutSplit,
};
use crate::registry;
use chrono::NaiveDate;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Step {
    #[default]
    #[strum(serialize = "picking a body part")]
    PickingBodyPart,
    #[strum(serialize = "confirming a plan")]
    ConfirmingPlan,
    #[strum(serialize = "selecting exercises")]
    SelectingExercises,
    #[strum(serialize = "logging sets")]
    Logging,
}

/// Top-level screens. Only the logger drives the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum View {
    #[default]
    Logger,
    Calendar,
    Progress,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowState {
    pub step: Step,
    pub selected_body_part: Option<String>,
    pub staged: Vec<Exercise>,
    /// Set once the split has populated the logger; cleared only by a reset.
    pub auto_loaded: bool,
}

/// Read-only snapshot of everything the flow depends on besides its own state.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext<'a> {
    pub view: View,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub sessions: &'a Sessions,
    pub plans: &'a Plans,
    pub split: &'a WorkoutSplit,
}

impl FlowContext<'_> {
    fn saved_session(&self) -> Option<&WorkoutSession> {
        self.sessions
            .get(&self.selected_date)
            .filter(|s| !s.exercises.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// The selected date now differs from the one the state was built for.
    DateChanged,
    /// The session collection was replaced.
    SessionsChanged,
    /// Plans or split changed; only re-evaluates auto-load.
    Refresh,
    PickBodyPart(String),
    UsePlan(String),
    StartFresh,
    BackToBodyPart,
    AddExercise(CatalogEntry),
    RemoveExercise(String),
    ConfirmSelection,
    BackToSelection,
    AddSet {
        exercise: usize,
    },
    UpdateSet {
        exercise: usize,
        set: usize,
        reps: u32,
        weight: f64,
    },
    RemoveSet {
        exercise: usize,
        set: usize,
    },
    Reset,
}

/// Applies `event` and then the auto-load rule.
///
/// # Errors
/// Returns a `ValidationError` when the event is not permitted in the
/// current step or its payload is invalid; the caller keeps its old state.
pub fn dispatch(
    state: &FlowState,
    ctx: &FlowContext,
    event: FlowEvent,
) -> Result<FlowState, ValidationError> {
    let next = reduce(state, ctx, event)?;
    Ok(settle(next, ctx))
}

/// Runs the auto-load rule. A no-op when its guards do not hold, so
/// calling it repeatedly is safe.
#[must_use]
pub fn settle(state: FlowState, ctx: &FlowContext) -> FlowState {
    match auto_load(&state, ctx) {
        Some(loaded) => loaded,
        None => state,
    }
}

fn require(state: &FlowState, allowed: &[Step], action: &'static str) -> Result<(), ValidationError> {
    if allowed.contains(&state.step) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            action,
            step: state.step.to_string(),
        })
    }
}

#[allow(clippy::too_many_lines)]
fn reduce(
    state: &FlowState,
    ctx: &FlowContext,
    event: FlowEvent,
) -> Result<FlowState, ValidationError> {
    let mut next = state.clone();
    match event {
        FlowEvent::DateChanged => return Ok(reconcile_date(next, ctx, true)),
        FlowEvent::SessionsChanged => return Ok(reconcile_date(next, ctx, false)),
        FlowEvent::Refresh => {}
        FlowEvent::PickBodyPart(body_part) => {
            require(state, &[Step::PickingBodyPart], "pick a body part")?;
            let body_part = body_part.trim();
            if body_part.is_empty() {
                return Err(ValidationError::MissingBodyPart);
            }
            if registry::plans_for_body_part(ctx.plans, body_part).is_empty() {
                next.staged.clear();
                next.step = Step::SelectingExercises;
            } else {
                next.step = Step::ConfirmingPlan;
            }
            next.selected_body_part = Some(body_part.to_string());
        }
        FlowEvent::UsePlan(plan_id) => {
            require(state, &[Step::ConfirmingPlan], "use a plan")?;
            let plan = ctx
                .plans
                .get(&plan_id)
                .filter(|p| state.selected_body_part.as_deref() == Some(p.body_part.as_str()))
                .ok_or(ValidationError::UnknownPlan(plan_id))?;
            next.staged = plan.exercises.iter().map(Exercise::from_template).collect();
            next.step = Step::Logging;
        }
        FlowEvent::StartFresh => {
            require(state, &[Step::ConfirmingPlan], "start fresh")?;
            next.staged.clear();
            next.step = Step::SelectingExercises;
        }
        FlowEvent::BackToBodyPart => {
            require(
                state,
                &[Step::ConfirmingPlan, Step::SelectingExercises],
                "go back to the body parts",
            )?;
            next.step = Step::PickingBodyPart;
        }
        FlowEvent::AddExercise(entry) => {
            require(state, &[Step::SelectingExercises], "add an exercise")?;
            if !next.staged.iter().any(|ex| ex.name == entry.name) {
                next.staged.push(Exercise::from_template(&entry.to_template()));
            }
        }
        FlowEvent::RemoveExercise(id) => {
            require(state, &[Step::SelectingExercises], "remove an exercise")?;
            next.staged.retain(|ex| ex.id != id);
        }
        FlowEvent::ConfirmSelection => {
            require(state, &[Step::SelectingExercises], "confirm the selection")?;
            if next.staged.is_empty() {
                return Err(ValidationError::EmptySelection);
            }
            next.step = Step::Logging;
        }
        FlowEvent::BackToSelection => {
            require(state, &[Step::Logging], "edit the exercise list")?;
            next.step = Step::SelectingExercises;
        }
        FlowEvent::AddSet { exercise } => {
            require(state, &[Step::Logging], "add a set")?;
            next.staged
                .get_mut(exercise)
                .ok_or(ValidationError::NoSuchExercise(exercise))?
                .sets
                .push(SetEntry::empty());
        }
        FlowEvent::UpdateSet {
            exercise,
            set,
            reps,
            weight,
        } => {
            require(state, &[Step::Logging], "change a set")?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(ValidationError::InvalidWeight(weight));
            }
            let entry = next
                .staged
                .get_mut(exercise)
                .ok_or(ValidationError::NoSuchExercise(exercise))?
                .sets
                .get_mut(set)
                .ok_or(ValidationError::NoSuchSet { exercise, set })?;
            entry.reps = reps;
            entry.weight = weight;
        }
        FlowEvent::RemoveSet { exercise, set } => {
            require(state, &[Step::Logging], "remove a set")?;
            let sets = &mut next
                .staged
                .get_mut(exercise)
                .ok_or(ValidationError::NoSuchExercise(exercise))?
                .sets;
            if set >= sets.len() {
                return Err(ValidationError::NoSuchSet { exercise, set });
            }
            sets.remove(set);
        }
        FlowEvent::Reset => next = FlowState::default(),
    }
    debug!(from = %state.step, to = %next.step, "flow transition");
    Ok(next)
}

/// A saved session for the selected date is staged verbatim; without one
/// the flow starts over.
fn reconcile_date(state: FlowState, ctx: &FlowContext, relabel: bool) -> FlowState {
    match ctx.saved_session() {
        Some(session) => {
            let mut next = state;
            next.staged = session.exercises.clone();
            if relabel || next.selected_body_part.is_none() {
                next.selected_body_part = Some(session.body_part_label());
            }
            next.step = Step::Logging;
            debug!(date = %ctx.selected_date, "staged saved session");
            next
        }
        None => FlowState::default(),
    }
}

fn auto_load(state: &FlowState, ctx: &FlowContext) -> Option<FlowState> {
    if ctx.view != View::Logger
        || ctx.selected_date != ctx.today
        || ctx.sessions.contains_key(&ctx.today)
        || state.step != Step::PickingBodyPart
        || state.auto_loaded
    {
        return None;
    }

    let day = Day::of(ctx.today);
    let parts = registry::body_parts_for_day(ctx.split, day);
    if parts.is_empty() {
        return None;
    }
    let plans = registry::plans_for_day(ctx.plans, ctx.split, day);
    if plans.is_empty() {
        return None;
    }

    let staged: Vec<Exercise> = registry::merge_templates(&plans)
        .iter()
        .map(Exercise::from_template)
        .collect();
    debug!(%day, plans = plans.len(), exercises = staged.len(), "auto-loaded from split");

    Some(FlowState {
        step: Step::Logging,
        selected_body_part: Some(join_body_parts(parts.iter().map(String::as_str))),
        staged,
        auto_loaded: true,
    })
}

/// What opening the logger from another view does to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerEntry {
    Keep,
    /// Select today; date reconciliation follows.
    JumpToToday,
    Reset,
}

#[must_use]
pub fn logger_entry(
    previous_view: View,
    selected_date: NaiveDate,
    today: NaiveDate,
    sessions: &Sessions,
) -> LoggerEntry {
    if previous_view == View::Logger {
        LoggerEntry::Keep
    } else if selected_date != today {
        LoggerEntry::JumpToToday
    } else if sessions.contains_key(&today) {
        // keep in-progress edits of today's saved workout
        LoggerEntry::Keep
    } else {
        LoggerEntry::Reset
    }
}

/// The session a save would write for the selected date.
///
/// # Errors
/// `ValidationError::EmptyWorkout` when nothing is staged.
pub fn session_to_save(
    state: &FlowState,
    ctx: &FlowContext,
) -> Result<WorkoutSession, ValidationError> {
    require(state, &[Step::Logging], "save the workout")?;
    if state.staged.is_empty() {
        return Err(ValidationError::EmptyWorkout);
    }
    Ok(WorkoutSession {
        date: ctx.selected_date,
        exercises: state.staged.clone(),
    })
}

/// The plan a save-as-plan would create from the staged exercises.
///
/// # Errors
/// Rejects combined body-part labels, an empty staged list and blank names.
pub fn plan_to_save(
    state: &FlowState,
    name: &str,
    plans: &Plans,
    now_ms: i64,
) -> Result<WorkoutPlan, ValidationError> {
    require(state, &[Step::Logging], "save a plan")?;
    registry::new_plan(
        name,
        state.selected_body_part.as_deref(),
        &state.staged,
        plans,
        now_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseTemplate;

    struct Fixture {
        sessions: Sessions,
        plans: Plans,
        split: WorkoutSplit,
        today: NaiveDate,
    }

    impl Fixture {
        fn new() -> Self {
            let mut split = WorkoutSplit::new();
            split.insert(Day::Monday, vec!["Chest".into(), "Arms".into()]);
            Self {
                sessions: Sessions::new(),
                plans: Plans::new(),
                split,
                today: date(2026, 10, 19), // a Monday
            }
        }

        fn with_plan(mut self, id: &str, body_part: &str, names: &[&str]) -> Self {
            let plan = WorkoutPlan {
                id: id.into(),
                name: format!("{body_part} Routine"),
                body_part: body_part.into(),
                exercises: names
                    .iter()
                    .map(|n| ExerciseTemplate {
                        name: (*n).into(),
                        body_part: body_part.into(),
                        image_url: None,
                        is_custom: false,
                    })
                    .collect(),
            };
            self.plans.insert(id.into(), plan);
            self
        }

        fn ctx(&self, selected_date: NaiveDate) -> FlowContext<'_> {
            FlowContext {
                view: View::Logger,
                selected_date,
                today: self.today,
                sessions: &self.sessions,
                plans: &self.plans,
                split: &self.split,
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(name: &str, body_part: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.into(),
            body_part: body_part.into(),
            image_url: None,
            is_custom: false,
        }
    }

    fn names(state: &FlowState) -> Vec<&str> {
        state.staged.iter().map(|ex| ex.name.as_str()).collect()
    }

    fn logged(name: &str, body_part: &str, sets: &[(u32, f64)]) -> Exercise {
        Exercise {
            id: format!("{name}-1"),
            name: name.into(),
            body_part: body_part.into(),
            image_url: None,
            is_custom: false,
            sets: sets
                .iter()
                .enumerate()
                .map(|(i, (reps, weight))| SetEntry {
                    id: format!("set-{i}"),
                    reps: *reps,
                    weight: *weight,
                })
                .collect(),
        }
    }

    #[test]
    fn test_date_change_stages_saved_session_verbatim() {
        let mut fx = Fixture::new();
        let past = date(2026, 10, 14);
        let exercises = vec![
            logged("Squat", "Legs", &[(5, 100.0)]),
            logged("Bench Press", "Chest", &[(8, 60.0)]),
            logged("Lunge", "Legs", &[(10, 20.0)]),
        ];
        fx.sessions.insert(
            past,
            WorkoutSession {
                date: past,
                exercises: exercises.clone(),
            },
        );

        let state = dispatch(&FlowState::default(), &fx.ctx(past), FlowEvent::DateChanged).unwrap();
        assert_eq!(state.step, Step::Logging);
        assert_eq!(state.staged, exercises);
        assert_eq!(state.selected_body_part.as_deref(), Some("Legs & Chest"));
    }

    #[test]
    fn test_date_change_without_session_resets() {
        let fx = Fixture::new();
        let state = FlowState {
            step: Step::Logging,
            selected_body_part: Some("Back".into()),
            staged: vec![logged("Deadlift", "Back", &[])],
            auto_loaded: true,
        };
        let next = dispatch(&state, &fx.ctx(date(2026, 10, 1)), FlowEvent::DateChanged).unwrap();
        assert_eq!(next, FlowState::default());
    }

    #[test]
    fn test_auto_load_merges_plans_and_fires_once() {
        let fx = Fixture::new()
            .with_plan("plan-1", "Chest", &["Push-up", "Bench Press"])
            .with_plan("plan-2", "Arms", &["Push-up", "Bicep Curl"])
            .with_plan("plan-3", "Legs", &["Squat"]);
        let ctx = fx.ctx(fx.today);

        let loaded = dispatch(&FlowState::default(), &ctx, FlowEvent::DateChanged).unwrap();
        assert_eq!(loaded.step, Step::Logging);
        assert!(loaded.auto_loaded);
        assert_eq!(loaded.selected_body_part.as_deref(), Some("Chest & Arms"));
        assert_eq!(names(&loaded), ["Push-up", "Bench Press", "Bicep Curl"]);
        assert_eq!(loaded.staged[0].body_part, "Chest");
        assert!(loaded
            .staged
            .iter()
            .all(|ex| ex.sets.len() == 1 && ex.sets[0].reps == 0 && ex.sets[0].weight == 0.0));

        let again = dispatch(&loaded, &ctx, FlowEvent::Refresh).unwrap();
        assert_eq!(again, loaded);
        assert_eq!(settle(again.clone(), &ctx), loaded);
    }

    #[test]
    fn test_auto_load_guards() {
        let mut fx = Fixture::new().with_plan("plan-1", "Chest", &["Bench Press"]);

        let past = fx.ctx(date(2026, 10, 12));
        assert_eq!(settle(FlowState::default(), &past), FlowState::default());

        let mut other_view = fx.ctx(fx.today);
        other_view.view = View::Progress;
        assert_eq!(settle(FlowState::default(), &other_view), FlowState::default());

        let already = FlowState {
            auto_loaded: true,
            ..FlowState::default()
        };
        assert_eq!(settle(already.clone(), &fx.ctx(fx.today)), already);

        fx.split.insert(Day::Monday, vec!["Legs".into()]);
        assert_eq!(settle(FlowState::default(), &fx.ctx(fx.today)), FlowState::default());

        fx.split.insert(Day::Monday, vec!["Chest".into()]);
        let today = fx.today;
        fx.sessions.insert(
            today,
            WorkoutSession {
                date: today,
                exercises: Vec::new(),
            },
        );
        assert_eq!(settle(FlowState::default(), &fx.ctx(today)), FlowState::default());
    }

    #[test]
    fn test_reset_allows_auto_load_again_but_back_does_not() {
        let fx = Fixture::new().with_plan("plan-1", "Chest", &["Bench Press"]);
        let ctx = fx.ctx(fx.today);
        let loaded = dispatch(&FlowState::default(), &ctx, FlowEvent::Refresh).unwrap();
        assert!(loaded.auto_loaded);

        let reset = dispatch(&loaded, &ctx, FlowEvent::Reset).unwrap();
        assert_eq!(reset.step, Step::Logging);
        assert_eq!(names(&reset), ["Bench Press"]);

        let edited = dispatch(&loaded, &ctx, FlowEvent::BackToSelection).unwrap();
        let picker = dispatch(&edited, &ctx, FlowEvent::BackToBodyPart).unwrap();
        assert_eq!(picker.step, Step::PickingBodyPart);
        assert!(picker.auto_loaded);
    }

    #[test]
    fn test_pick_body_part_branches_on_matching_plans() {
        let fx = Fixture::new().with_plan("plan-1", "Back", &["Deadlift", "Pull-up"]);
        let ctx = fx.ctx(date(2026, 10, 10));

        let confirming =
            dispatch(&FlowState::default(), &ctx, FlowEvent::PickBodyPart("Back".into())).unwrap();
        assert_eq!(confirming.step, Step::ConfirmingPlan);
        assert_eq!(confirming.selected_body_part.as_deref(), Some("Back"));

        let selecting =
            dispatch(&FlowState::default(), &ctx, FlowEvent::PickBodyPart("Core".into())).unwrap();
        assert_eq!(selecting.step, Step::SelectingExercises);
        assert!(selecting.staged.is_empty());

        let planned = dispatch(&confirming, &ctx, FlowEvent::UsePlan("plan-1".into())).unwrap();
        assert_eq!(planned.step, Step::Logging);
        assert_eq!(names(&planned), ["Deadlift", "Pull-up"]);
        assert!(planned.staged.iter().all(|ex| ex.sets.len() == 1));

        let fresh = dispatch(&confirming, &ctx, FlowEvent::StartFresh).unwrap();
        assert_eq!(fresh.step, Step::SelectingExercises);
        assert!(fresh.staged.is_empty());
    }

    #[test]
    fn test_use_plan_rejects_plan_for_other_body_part() {
        let fx = Fixture::new()
            .with_plan("plan-1", "Back", &["Deadlift"])
            .with_plan("plan-2", "Legs", &["Squat"]);
        let ctx = fx.ctx(date(2026, 10, 10));
        let confirming =
            dispatch(&FlowState::default(), &ctx, FlowEvent::PickBodyPart("Back".into())).unwrap();
        assert_eq!(
            dispatch(&confirming, &ctx, FlowEvent::UsePlan("plan-2".into())),
            Err(ValidationError::UnknownPlan("plan-2".into()))
        );
    }

    #[test]
    fn test_selection_requires_an_exercise() {
        let fx = Fixture::new();
        let ctx = fx.ctx(date(2026, 10, 10));
        let selecting =
            dispatch(&FlowState::default(), &ctx, FlowEvent::PickBodyPart("Core".into())).unwrap();

        assert_eq!(
            dispatch(&selecting, &ctx, FlowEvent::ConfirmSelection),
            Err(ValidationError::EmptySelection)
        );

        let one = dispatch(&selecting, &ctx, FlowEvent::AddExercise(entry("Plank", "Core"))).unwrap();
        let still_one = dispatch(&one, &ctx, FlowEvent::AddExercise(entry("Plank", "Core"))).unwrap();
        assert_eq!(names(&still_one), ["Plank"]);

        let logging = dispatch(&still_one, &ctx, FlowEvent::ConfirmSelection).unwrap();
        assert_eq!(logging.step, Step::Logging);

        let id = one.staged[0].id.clone();
        let none = dispatch(&one, &ctx, FlowEvent::RemoveExercise(id)).unwrap();
        assert!(none.staged.is_empty());
    }

    #[test]
    fn test_events_outside_their_step_are_rejected() {
        let fx = Fixture::new();
        let ctx = fx.ctx(date(2026, 10, 10));
        let err = dispatch(&FlowState::default(), &ctx, FlowEvent::ConfirmSelection).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot confirm the selection while picking a body part."
        );
        assert!(dispatch(&FlowState::default(), &ctx, FlowEvent::AddSet { exercise: 0 }).is_err());
        assert!(dispatch(&FlowState::default(), &ctx, FlowEvent::StartFresh).is_err());
    }

    #[test]
    fn test_set_editing() {
        let fx = Fixture::new();
        let ctx = fx.ctx(date(2026, 10, 10));
        let state = FlowState {
            step: Step::Logging,
            selected_body_part: Some("Legs".into()),
            staged: vec![logged("Squat", "Legs", &[(0, 0.0)])],
            auto_loaded: false,
        };

        let two = dispatch(&state, &ctx, FlowEvent::AddSet { exercise: 0 }).unwrap();
        assert_eq!(two.staged[0].sets.len(), 2);

        let updated = dispatch(
            &two,
            &ctx,
            FlowEvent::UpdateSet {
                exercise: 0,
                set: 1,
                reps: 5,
                weight: 120.0,
            },
        )
        .unwrap();
        assert_eq!(updated.staged[0].sets[1].reps, 5);
        assert_eq!(updated.staged[0].sets[1].weight, 120.0);

        let removed = dispatch(&updated, &ctx, FlowEvent::RemoveSet { exercise: 0, set: 0 }).unwrap();
        assert_eq!(removed.staged[0].sets.len(), 1);
        assert_eq!(removed.staged[0].sets[0].weight, 120.0);

        assert_eq!(
            dispatch(&removed, &ctx, FlowEvent::RemoveSet { exercise: 0, set: 3 }),
            Err(ValidationError::NoSuchSet { exercise: 0, set: 3 })
        );
        assert_eq!(
            dispatch(&removed, &ctx, FlowEvent::AddSet { exercise: 2 }),
            Err(ValidationError::NoSuchExercise(2))
        );
        assert_eq!(
            dispatch(
                &removed,
                &ctx,
                FlowEvent::UpdateSet {
                    exercise: 0,
                    set: 0,
                    reps: 1,
                    weight: -5.0
                }
            ),
            Err(ValidationError::InvalidWeight(-5.0))
        );
    }

    #[test]
    fn test_non_finite_weights_are_rejected() {
        let fx = Fixture::new();
        let ctx = fx.ctx(date(2026, 10, 10));
        let state = FlowState {
            step: Step::Logging,
            selected_body_part: Some("Legs".into()),
            staged: vec![logged("Squat", "Legs", &[(5, 100.0)])],
            auto_loaded: false,
        };
        for weight in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, "1e309".parse().unwrap()] {
            let result = dispatch(
                &state,
                &ctx,
                FlowEvent::UpdateSet {
                    exercise: 0,
                    set: 0,
                    reps: 5,
                    weight,
                },
            );
            assert!(matches!(result, Err(ValidationError::InvalidWeight(_))));
        }
    }

    #[test]
    fn test_reconciliation_is_deterministic() {
        let fx = Fixture::new()
            .with_plan("plan-1", "Chest", &["Bench Press", "Push-up"])
            .with_plan("plan-2", "Arms", &["Hammer Curl"]);
        let ctx = fx.ctx(fx.today);
        let a = dispatch(&FlowState::default(), &ctx, FlowEvent::DateChanged).unwrap();
        let b = dispatch(&FlowState::default(), &ctx, FlowEvent::DateChanged).unwrap();
        assert_eq!(a.step, b.step);
        assert_eq!(a.selected_body_part, b.selected_body_part);
        let content = |s: &FlowState| {
            s.staged
                .iter()
                .map(|ex| (ex.name.clone(), ex.body_part.clone(), ex.sets.len()))
                .collect::<Vec<_>>()
        };
        assert_eq!(content(&a), content(&b));
    }

    #[test]
    fn test_logger_entry() {
        let today = date(2026, 10, 19);
        let mut sessions = Sessions::new();
        assert_eq!(
            logger_entry(View::Logger, date(2026, 1, 1), today, &sessions),
            LoggerEntry::Keep
        );
        assert_eq!(
            logger_entry(View::Calendar, date(2026, 1, 1), today, &sessions),
            LoggerEntry::JumpToToday
        );
        assert_eq!(
            logger_entry(View::Progress, today, today, &sessions),
            LoggerEntry::Reset
        );
        sessions.insert(
            today,
            WorkoutSession {
                date: today,
                exercises: vec![logged("Squat", "Legs", &[(5, 100.0)])],
            },
        );
        assert_eq!(
            logger_entry(View::Progress, today, today, &sessions),
            LoggerEntry::Keep
        );
    }

    #[test]
    fn test_save_as_plan_rejects_combined_label() {
        let state = FlowState {
            step: Step::Logging,
            selected_body_part: Some("Chest & Back".into()),
            staged: vec![logged("Bench Press", "Chest", &[(8, 60.0)])],
            auto_loaded: true,
        };
        assert_eq!(
            plan_to_save(&state, "Combo", &Plans::new(), 0),
            Err(ValidationError::CombinedPlan("Chest & Back".into()))
        );
    }

    #[test]
    fn test_save_requires_staged_exercises() {
        let fx = Fixture::new();
        let ctx = fx.ctx(date(2026, 10, 10));
        let empty = FlowState {
            step: Step::Logging,
            ..FlowState::default()
        };
        assert_eq!(session_to_save(&empty, &ctx), Err(ValidationError::EmptyWorkout));

        let state = FlowState {
            step: Step::Logging,
            selected_body_part: Some("Legs".into()),
            staged: vec![logged("Squat", "Legs", &[(5, 100.0)])],
            auto_loaded: false,
        };
        let session = session_to_save(&state, &ctx).unwrap();
        assert_eq!(session.date, date(2026, 10, 10));
        assert_eq!(session.exercises, state.staged);
    }
}
