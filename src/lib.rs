use anyhow::{bail, Context, Result};
// Use anyhow::Result as standard Result for service layer
use chrono::{Local, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{error, info};

// --- Declare modules ---
pub mod analytics;
pub mod catalog;
mod config;
pub mod db;
pub mod feedback;
pub mod flow;
pub mod models;
pub mod registry;

// --- Expose public types ---
pub use analytics::{
    BodyPartShare, OverallStats, PersonalRecord, ProgressReport, SeriesPoint,
};
pub use catalog::{CatalogEntry, BODY_PARTS};
pub use config::{
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    Config,
    ConfigError,
    FeedbackConfig,
    StandardColor,
    Theme,
    Units,
};
pub use db::{
    get_db_path as get_db_path_util, Collections, DbError, DocumentKey, MemoryStore, SqliteStore,
    Store,
};
pub use feedback::{FeedbackProvider, GeminiClient, ServiceError, FALLBACK_MESSAGE};
pub use flow::{FlowEvent, FlowState, LoggerEntry, Step, View};
pub use models::{
    Day, Exercise, ExerciseTemplate, Plans, SetEntry, Sessions, ValidationError, WorkoutPlan,
    WorkoutSession, WorkoutSplit,
};
pub use registry::SplitDraft;

/// Application façade: owns the persisted collections, the navigation
/// state (view and selected date) and the workout flow.
pub struct AppService<S: Store = SqliteStore> {
    pub config: Config,
    pub store: S,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    data: Collections,
    flow: FlowState,
    view: View,
    selected_date: NaiveDate,
    today: NaiveDate,
}

impl AppService<SqliteStore> {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = db::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        let mut service = Self::with_store(config, store, Local::now().date_naive());
        service.db_path = db_path;
        service.config_path = config_path;
        Ok(service)
    }
}

impl<S: Store> AppService<S> {
    /// Builds the service over an already opened store, with `today`
    /// selected in the logger.
    pub fn with_store(config: Config, store: S, today: NaiveDate) -> Self {
        let data = Collections::load_all(&store);
        info!(
            "Loaded {} sessions, {} plans, {} custom exercises",
            data.sessions.len(),
            data.plans.len(),
            data.custom_exercises.len()
        );
        let mut service = Self {
            config,
            store,
            db_path: ":memory:".into(),
            config_path: PathBuf::new(),
            data,
            flow: FlowState::default(),
            view: View::Logger,
            selected_date: today,
            today,
        };
        service.react(FlowEvent::DateChanged);
        service
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    // --- Read access ---

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn sessions(&self) -> &Sessions {
        &self.data.sessions
    }

    pub fn session(&self, date: NaiveDate) -> Option<&WorkoutSession> {
        self.data.sessions.get(&date)
    }

    pub fn plans(&self) -> &Plans {
        &self.data.plans
    }

    pub fn split(&self) -> &WorkoutSplit {
        &self.data.split
    }

    pub fn custom_exercises(&self) -> &[Exercise] {
        &self.data.custom_exercises
    }

    fn context(&self) -> flow::FlowContext<'_> {
        flow::FlowContext {
            view: self.view,
            selected_date: self.selected_date,
            today: self.today,
            sessions: &self.data.sessions,
            plans: &self.data.plans,
            split: &self.data.split,
        }
    }

    /// Folds a user action into the flow. On error nothing changes.
    fn apply(&mut self, event: FlowEvent) -> Result<(), ValidationError> {
        self.flow = flow::dispatch(&self.flow, &self.context(), event)?;
        Ok(())
    }

    /// Folds an upstream change into the flow. These events are never rejected.
    fn react(&mut self, event: FlowEvent) {
        if let Err(e) = self.apply(event) {
            error!("Flow rejected an upstream change: {}", e);
        }
    }

    fn persist(&mut self, key: DocumentKey) {
        let result = match key {
            DocumentKey::Sessions => db::save_document(&mut self.store, key, &self.data.sessions),
            DocumentKey::CustomExercises => {
                db::save_document(&mut self.store, key, &self.data.custom_exercises)
            }
            DocumentKey::Plans => db::save_document(&mut self.store, key, &self.data.plans),
            DocumentKey::Split => db::save_document(&mut self.store, key, &self.data.split),
        };
        // The in-memory change stands even when the write fails.
        if let Err(e) = result {
            error!("Failed to persist '{}': {}", key.storage_name(), e);
        }
    }

    // --- Navigation ---

    pub fn select_date(&mut self, date: NaiveDate) {
        if date != self.selected_date {
            self.selected_date = date;
            self.react(FlowEvent::DateChanged);
        }
    }

    /// Picking a day on the calendar opens it in the logger.
    pub fn open_date_in_logger(&mut self, date: NaiveDate) {
        self.view = View::Logger;
        self.select_date(date);
        self.react(FlowEvent::Refresh);
    }

    /// Moves "today" forward, e.g. when the app stays open past midnight.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            self.today = today;
            self.react(FlowEvent::Refresh);
        }
    }

    pub fn switch_view(&mut self, view: View) {
        let entry = match view {
            View::Logger => flow::logger_entry(
                self.view,
                self.selected_date,
                self.today,
                &self.data.sessions,
            ),
            View::Calendar | View::Progress => LoggerEntry::Keep,
        };
        self.view = view;
        match entry {
            LoggerEntry::Keep => self.react(FlowEvent::Refresh),
            LoggerEntry::JumpToToday => self.select_date(self.today),
            LoggerEntry::Reset => self.react(FlowEvent::Reset),
        }
    }

    // --- Workout flow ---

    pub fn pick_body_part(&mut self, body_part: &str) -> Result<(), ValidationError> {
        self.apply(FlowEvent::PickBodyPart(body_part.to_string()))
    }

    pub fn use_plan(&mut self, plan_id: &str) -> Result<(), ValidationError> {
        self.apply(FlowEvent::UsePlan(plan_id.to_string()))
    }

    pub fn start_fresh(&mut self) -> Result<(), ValidationError> {
        self.apply(FlowEvent::StartFresh)
    }

    pub fn back_to_body_part(&mut self) -> Result<(), ValidationError> {
        self.apply(FlowEvent::BackToBodyPart)
    }

    pub fn add_exercise(&mut self, entry: CatalogEntry) -> Result<(), ValidationError> {
        self.apply(FlowEvent::AddExercise(entry))
    }

    pub fn remove_exercise(&mut self, exercise_id: &str) -> Result<(), ValidationError> {
        self.apply(FlowEvent::RemoveExercise(exercise_id.to_string()))
    }

    pub fn confirm_selection(&mut self) -> Result<(), ValidationError> {
        self.apply(FlowEvent::ConfirmSelection)
    }

    pub fn back_to_selection(&mut self) -> Result<(), ValidationError> {
        self.apply(FlowEvent::BackToSelection)
    }

    pub fn add_set(&mut self, exercise: usize) -> Result<(), ValidationError> {
        self.apply(FlowEvent::AddSet { exercise })
    }

    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        reps: u32,
        weight: f64,
    ) -> Result<(), ValidationError> {
        self.apply(FlowEvent::UpdateSet {
            exercise,
            set,
            reps,
            weight,
        })
    }

    pub fn remove_set(&mut self, exercise: usize, set: usize) -> Result<(), ValidationError> {
        self.apply(FlowEvent::RemoveSet { exercise, set })
    }

    /// Abandons the current workout. On today this lets the split populate
    /// the logger again.
    pub fn reset_workout(&mut self) {
        self.react(FlowEvent::Reset);
    }

    /// Saves the staged exercises as the selected date's session, replacing
    /// any session already saved for that date.
    /// # Errors
    /// `ValidationError` if not logging or nothing is staged.
    pub fn save_workout(&mut self) -> Result<WorkoutSession, ValidationError> {
        let session = flow::session_to_save(&self.flow, &self.context())?;
        info!(
            "Saving workout for {} with {} exercises",
            session.date,
            session.exercises.len()
        );
        self.data.sessions.insert(session.date, session.clone());
        self.persist(DocumentKey::Sessions);
        self.react(FlowEvent::SessionsChanged);
        Ok(session)
    }

    /// Saves the staged exercises as a reusable plan and returns its id.
    /// # Errors
    /// `ValidationError` for a combined body-part label, an empty workout or a blank name.
    pub fn save_as_plan(&mut self, name: &str) -> Result<String, ValidationError> {
        let plan = flow::plan_to_save(
            &self.flow,
            name,
            &self.data.plans,
            Utc::now().timestamp_millis(),
        )?;
        let id = plan.id.clone();
        info!("Saving plan '{}' ({}) for {}", plan.name, id, plan.body_part);
        self.data.plans.insert(id.clone(), plan);
        self.persist(DocumentKey::Plans);
        self.react(FlowEvent::Refresh);
        Ok(id)
    }

    // --- Catalog and registry ---

    /// Exercises offered for the selected body part.
    pub fn available_exercises(&self, search: &str) -> Vec<CatalogEntry> {
        let label = self.flow.selected_body_part.as_deref().unwrap_or_default();
        catalog::available_exercises(label, &self.data.custom_exercises, search)
    }

    pub fn plans_for_selected_body_part(&self) -> Vec<&WorkoutPlan> {
        match self.flow.selected_body_part.as_deref() {
            Some(body_part) => registry::plans_for_body_part(&self.data.plans, body_part),
            None => Vec::new(),
        }
    }

    /// # Errors
    /// `ValidationError` if the name or body part is blank.
    pub fn add_custom_exercise(
        &mut self,
        name: &str,
        body_part: &str,
        image_url: Option<String>,
    ) -> Result<Exercise, ValidationError> {
        let exercise = catalog::new_custom_exercise(name, body_part, image_url)?;
        info!("Adding custom exercise '{}' ({})", exercise.name, exercise.body_part);
        self.data.custom_exercises.push(exercise.clone());
        self.persist(DocumentKey::CustomExercises);
        if self.flow.step == Step::SelectingExercises {
            self.apply(FlowEvent::AddExercise(CatalogEntry {
                name: exercise.name.clone(),
                body_part: exercise.body_part.clone(),
                image_url: exercise.image_url.clone(),
                is_custom: true,
            }))?;
        }
        Ok(exercise)
    }

    /// A copy of the split for editing; nothing changes until [`Self::save_split`].
    pub fn split_draft(&self) -> SplitDraft {
        SplitDraft::new(&self.data.split)
    }

    pub fn save_split(&mut self, draft: SplitDraft) {
        self.data.split = draft.into_split();
        info!("Saving weekly split");
        self.persist(DocumentKey::Split);
        self.react(FlowEvent::Refresh);
    }

    // --- Analytics ---

    /// Last earlier session in which `exercise_name` was actually performed,
    /// relative to the selected date.
    pub fn last_performance(&self, exercise_name: &str) -> Option<&WorkoutSession> {
        analytics::last_performance(&self.data.sessions, exercise_name, self.selected_date)
    }

    pub fn progress(&self) -> ProgressReport {
        analytics::progress_report(&self.data.sessions)
    }

    pub fn exercise_series(&self, exercise_name: &str) -> Vec<SeriesPoint> {
        analytics::exercise_series(&self.data.sessions, exercise_name)
    }

    /// # Errors
    /// Returns `anyhow::Error` if the month is invalid.
    pub fn month_overview(&self, year: i32, month: u32) -> Result<Vec<(NaiveDate, bool)>> {
        if !(1..=12).contains(&month) {
            bail!("Invalid month: {}. Month must be between 1 and 12.", month);
        }
        Ok(analytics::month_overview(&self.data.sessions, year, month))
    }

    /// Coaching feedback on an exercise's progress series.
    /// # Errors
    /// `ValidationError::NotEnoughData` with fewer than two data points.
    pub async fn request_feedback<P: FeedbackProvider>(
        &self,
        provider: &P,
        exercise_name: &str,
    ) -> Result<String, ValidationError> {
        let series = self.exercise_series(exercise_name);
        feedback::request_feedback(provider, exercise_name, &series).await
    }
}
