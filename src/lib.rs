// src/lib.rs
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Declare modules ---
pub mod calendar;
mod config;
pub mod models;
pub mod parse;
pub mod sets;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    Config,
    Error as ConfigError,
    StandardColor,
    Theme,
    Units,
};
pub use models::{
    duration_display, Exercise, ExerciseSets, ExerciseType, RunningSet, SprintTime, StrengthSet,
    TrainingSession,
};
pub use parse::ParseError;
pub use sets::{SequenceError, SetId, SetRecord, SetSequence};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Training session ID {0} not found.")]
    SessionNotFound(i64),
    #[error("Exercise ID {0} not found in session {1}.")]
    ExerciseNotFound(i64, i64),
}

/// Parameters for creating a training session.
#[derive(Debug, Clone, Default)]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub duration_min: u32,
    pub kind: String,
    pub intensity: u8,
}

/// Parameters for saving a new exercise into a session.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub description: String,
    pub exercise_type: ExerciseType,
    pub reps: u32,
    pub weight: f64,
    pub duration_secs: u32,
    pub distance: f64,
    pub sprint: SprintTime,
    /// Working sets to pre-fill; `None` uses the type's default count.
    pub set_count: Option<u32>,
}

impl NewExercise {
    #[must_use]
    pub fn new(name: impl Into<String>, exercise_type: ExerciseType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            exercise_type,
            reps: 1,
            weight: 0.0,
            duration_secs: 0,
            distance: 0.0,
            sprint: SprintTime::default(),
            set_count: None,
        }
    }
}

/// A catalog entry offered by the exercise picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonExercise {
    pub name: String,
    pub exercise_type: ExerciseType,
    pub description: String,
}

impl CommonExercise {
    fn new(name: &str, exercise_type: ExerciseType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            exercise_type,
            description: description.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    session: String,
    kind: &'a str,
    exercise: &'a str,
    exercise_type: String,
    set: String,
    warmup: bool,
    metrics: String,
}

/// In-memory training log. Sessions live for the process lifetime only;
/// there is deliberately no persistent storage behind this.
pub struct TrainingService {
    pub config: Config,
    pub config_path: PathBuf,
    sessions: Vec<TrainingSession>,
    common_exercises: Vec<CommonExercise>,
    training_types: Vec<String>,
    id_counter: i64,
}

impl TrainingService {
    /// Initializes the service, loading (or creating) the config file.
    /// # Errors
    /// Returns `anyhow::Error` if config path determination or loading fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        Ok(Self::with_config_at(config, config_path))
    }

    /// Builds a service around an explicit config, without touching disk.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self::with_config_at(config, PathBuf::from("test_config.toml"))
    }

    fn with_config_at(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            sessions: Vec::new(),
            common_exercises: default_common_exercises(),
            training_types: default_training_types(),
            id_counter: 0,
        }
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

    /// Sets the measurement units.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// Sets the +/- weight step.
    /// # Errors
    /// - `ConfigError::InvalidWeightIncrement` if `step` is not positive.
    /// - `ConfigError` variants if saving fails.
    pub fn set_weight_increment(&mut self, step: f64) -> Result<(), ConfigError> {
        if step <= 0.0 {
            return Err(ConfigError::InvalidWeightIncrement(step));
        }
        self.config.weight_increment = step;
        self.save_config()
    }

    fn next_id(&mut self) -> i64 {
        self.id_counter += 1;
        self.id_counter
    }

    // --- Sessions ---

    pub fn sessions(&self) -> &[TrainingSession] {
        &self.sessions
    }

    pub fn session(&self, id: i64) -> Option<&TrainingSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn session_mut(&mut self, id: i64) -> Option<&mut TrainingSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Adds a session and returns its id. Title and type may be blank; the
    /// display name falls back accordingly.
    pub fn add_session(&mut self, new: NewSession) -> i64 {
        let id = self.next_id();
        self.sessions.push(TrainingSession::new(
            id,
            new.title,
            new.description,
            new.date,
            new.duration_min,
            new.kind,
            new.intensity,
        ));
        id
    }

    /// Removes a session.
    /// # Errors
    /// `StoreError::SessionNotFound` if no session has this id.
    pub fn remove_session(&mut self, id: i64) -> Result<()> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::SessionNotFound(id))?;
        self.sessions.remove(index);
        Ok(())
    }

    /// Replaces the stored session carrying the same id.
    /// # Errors
    /// `StoreError::SessionNotFound` if no session has this id.
    pub fn update_session(&mut self, session: TrainingSession) -> Result<()> {
        let slot = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or(StoreError::SessionNotFound(session.id))?;
        *slot = session;
        Ok(())
    }

    /// Sessions matching the search text, newest first. Blank text returns
    /// everything, still newest first.
    #[must_use]
    pub fn search_sessions(&self, text: &str) -> Vec<&TrainingSession> {
        let needle = text.trim();
        let mut hits: Vec<&TrainingSession> = self
            .sessions
            .iter()
            .filter(|s| needle.is_empty() || s.matches_search(needle))
            .collect();
        hits.sort_by(|a, b| b.date.cmp(&a.date));
        hits
    }

    /// Sessions scheduled on a given day.
    #[must_use]
    pub fn sessions_on(&self, date: NaiveDate) -> Vec<&TrainingSession> {
        self.sessions.iter().filter(|s| s.date == date).collect()
    }

    /// Month grid for the calendar view.
    #[must_use]
    pub fn calendar_month(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
        selected: Option<NaiveDate>,
    ) -> Vec<calendar::CalendarDay> {
        calendar::month_grid(year, month, &self.sessions, today, selected)
    }

    // --- Exercises ---

    /// Resolves an exercise inside a session for mutation.
    /// # Errors
    /// `StoreError` variants when either id does not resolve.
    pub fn exercise_mut(&mut self, session_id: i64, exercise_id: i64) -> Result<&mut Exercise> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;
        session
            .exercise_mut(exercise_id)
            .ok_or_else(|| StoreError::ExerciseNotFound(exercise_id, session_id).into())
    }

    /// Saves a new exercise into a session, pre-filling its set list.
    /// # Errors
    /// Returns `anyhow::Error` if the name is blank or the session is gone.
    pub fn save_exercise(&mut self, session_id: i64, new: NewExercise) -> Result<i64> {
        if new.name.trim().is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let id = self.next_id();
        let unit = self.config.units.weight_unit().to_string();
        let session = self
            .session_mut(session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;

        let sets = if new.exercise_type.uses_running_sets() {
            ExerciseSets::Running(SetSequence::new())
        } else {
            ExerciseSets::Strength(SetSequence::new())
        };
        let mut exercise = Exercise {
            id,
            name: new.name.trim().to_string(),
            description: new.description,
            exercise_type: new.exercise_type,
            reps: new.reps.max(1),
            weight: new.weight.max(0.0),
            duration_secs: new.duration_secs,
            distance: new.distance.max(0.0),
            unit,
            sprint: new.sprint,
            sets,
        };
        let set_count = new
            .set_count
            .unwrap_or_else(|| new.exercise_type.default_set_count());
        for _ in 0..set_count {
            exercise.add_set();
        }
        session.exercises.push(exercise);
        Ok(id)
    }

    /// Removes an exercise (and with it the whole set list it owns).
    /// # Errors
    /// `StoreError` variants when either id does not resolve.
    pub fn delete_exercise(&mut self, session_id: i64, exercise_id: i64) -> Result<()> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(StoreError::SessionNotFound(session_id))?;
        let index = session
            .exercises
            .iter()
            .position(|e| e.id == exercise_id)
            .ok_or(StoreError::ExerciseNotFound(exercise_id, session_id))?;
        session.exercises.remove(index);
        Ok(())
    }

    /// Picker template with the usual starting values for an exercise type.
    #[must_use]
    pub fn exercise_template(&self, name: &str, exercise_type: ExerciseType) -> NewExercise {
        let mut new = NewExercise::new(name, exercise_type);
        match exercise_type {
            ExerciseType::Strength => {
                new.reps = self.config.default_reps;
                new.set_count = Some(self.config.default_strength_sets);
            }
            ExerciseType::Cardio | ExerciseType::Running => {
                new.duration_secs = 30 * 60;
                new.distance = 5.0;
            }
            ExerciseType::Time => {
                new.duration_secs = 15 * 60;
            }
            ExerciseType::Sprinting => {
                new.distance = 100.0;
                new.sprint = SprintTime::new(12, 50);
            }
            ExerciseType::SledSprint => {
                new.distance = 20.0;
                new.weight = 20.0;
                new.sprint = SprintTime::new(8, 0);
            }
        }
        new
    }

    // --- Catalogs ---

    /// Catalog entries whose name or description contains the filter text
    /// (case-insensitive). Blank text returns the whole catalog.
    #[must_use]
    pub fn common_exercises(&self, filter: &str) -> Vec<&CommonExercise> {
        let needle = filter.trim().to_lowercase();
        self.common_exercises
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.name.to_lowercase().contains(&needle)
                    || e.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// True when the text names no existing catalog entry and could be added
    /// as a custom exercise.
    #[must_use]
    pub fn can_add_custom_exercise(&self, text: &str) -> bool {
        !text.trim().is_empty()
            && !self
                .common_exercises
                .iter()
                .any(|e| e.name.eq_ignore_ascii_case(text.trim()))
    }

    /// Training-type labels containing the filter text (case-insensitive).
    #[must_use]
    pub fn training_types(&self, filter: &str) -> Vec<&str> {
        let needle = filter.trim().to_lowercase();
        self.training_types
            .iter()
            .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Inserts a custom training type just before the trailing "Other"
    /// entry. Returns false (and changes nothing) for blank or duplicate
    /// names.
    pub fn add_custom_training_type(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || self
                .training_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(trimmed))
        {
            return false;
        }
        let index = self.training_types.len().saturating_sub(1);
        self.training_types.insert(index, trimmed.to_string());
        true
    }

    // --- Export ---

    /// Writes every session as CSV: one row per set, one row per set-less
    /// exercise, one row per empty session.
    /// # Errors
    /// Returns `anyhow::Error` wrapping CSV/IO failures.
    pub fn export_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for session in &self.sessions {
            let date = session.date.format("%Y-%m-%d").to_string();
            if session.exercises.is_empty() {
                csv_writer.serialize(CsvRow {
                    date: date.clone(),
                    session: session.display_name(),
                    kind: &session.kind,
                    exercise: "",
                    exercise_type: String::new(),
                    set: String::new(),
                    warmup: false,
                    metrics: String::new(),
                })?;
            }
            for exercise in &session.exercises {
                let rows = exercise.sets.rows();
                if rows.is_empty() {
                    csv_writer.serialize(CsvRow {
                        date: date.clone(),
                        session: session.display_name(),
                        kind: &session.kind,
                        exercise: &exercise.name,
                        exercise_type: exercise.exercise_type.to_string(),
                        set: String::new(),
                        warmup: false,
                        metrics: exercise.display_text(),
                    })?;
                }
                for (label, warmup, metrics) in rows {
                    csv_writer.serialize(CsvRow {
                        date: date.clone(),
                        session: session.display_name(),
                        kind: &session.kind,
                        exercise: &exercise.name,
                        exercise_type: exercise.exercise_type.to_string(),
                        set: label,
                        warmup,
                        metrics,
                    })?;
                }
            }
        }
        csv_writer.flush().context("Failed to flush CSV output")?;
        Ok(())
    }

    // --- Sample data ---

    /// Seeds the store with the demo sessions, dated relative to `today`.
    pub fn seed_sample_data(&mut self, today: NaiveDate) {
        let morning_run = self.add_session(NewSession {
            title: "Morning Run".to_string(),
            description: "Easy pace morning jog in the park".to_string(),
            date: today - chrono::Duration::days(2),
            duration_min: 30,
            kind: "Running".to_string(),
            intensity: 6,
        });
        let mut run = self.exercise_template("5K Run", ExerciseType::Running);
        run.description = "Steady pace run through the neighborhood".to_string();
        run.duration_secs = 25 * 60;
        run.set_count = Some(1);
        self.save_exercise(morning_run, run)
            .expect("seed session exists");

        let strength = self.add_session(NewSession {
            title: "Strength Training".to_string(),
            description: "Upper body workout focusing on chest and arms".to_string(),
            date: today - chrono::Duration::days(1),
            duration_min: 45,
            kind: "Strength Training".to_string(),
            intensity: 8,
        });
        let bench = NewExercise {
            description: "Chest exercise with barbell".to_string(),
            reps: 10,
            weight: 80.0,
            set_count: Some(0),
            ..NewExercise::new("Bench Press", ExerciseType::Strength)
        };
        let bench_id = self.save_exercise(strength, bench).expect("seed session");
        self.seed_strength_sets(strength, bench_id, &[(10, 70.0), (10, 80.0), (8, 85.0)]);
        let squat = NewExercise {
            description: "Leg exercise with barbell".to_string(),
            reps: 12,
            weight: 100.0,
            set_count: Some(0),
            ..NewExercise::new("Squat", ExerciseType::Strength)
        };
        let squat_id = self.save_exercise(strength, squat).expect("seed session");
        self.seed_strength_sets(strength, squat_id, &[(12, 90.0), (12, 100.0), (10, 105.0)]);

        self.add_session(NewSession {
            title: "Yoga Session".to_string(),
            description: "Relaxing evening yoga flow".to_string(),
            date: today,
            duration_min: 60,
            kind: "Yoga".to_string(),
            intensity: 4,
        });

        let sprints = self.add_session(NewSession {
            title: "Sprint Training".to_string(),
            description: "High intensity sprint workout".to_string(),
            date: today - chrono::Duration::days(3),
            duration_min: 45,
            kind: "Sprint Training".to_string(),
            intensity: 9,
        });
        let sprint_100m = NewExercise {
            description: "Maximum effort 100m sprints".to_string(),
            distance: 100.0,
            sprint: SprintTime::new(12, 50),
            set_count: Some(0),
            ..NewExercise::new("100m Sprint", ExerciseType::Sprinting)
        };
        let sprint_id = self.save_exercise(sprints, sprint_100m).expect("seed session");
        self.seed_sprint_sets(
            sprints,
            sprint_id,
            100.0,
            0.0,
            &[(13, 20), (12, 80), (12, 50)],
        );
        let sled = NewExercise {
            description: "Weighted sled sprints".to_string(),
            distance: 20.0,
            weight: 40.0,
            sprint: SprintTime::new(8, 0),
            set_count: Some(0),
            ..NewExercise::new("Sled Sprint", ExerciseType::SledSprint)
        };
        let sled_id = self.save_exercise(sprints, sled).expect("seed session");
        self.seed_sprint_sets(sprints, sled_id, 20.0, 40.0, &[(8, 50), (8, 20), (7, 90)]);
    }

    fn seed_strength_sets(&mut self, session_id: i64, exercise_id: i64, sets: &[(u32, f64)]) {
        let exercise = self
            .exercise_mut(session_id, exercise_id)
            .expect("seeded exercise exists");
        for &(reps, weight) in sets {
            let id = exercise.add_set();
            if let Some(record) = exercise.strength_set_mut(id) {
                record.payload.reps = reps;
                record.payload.weight = weight;
            }
        }
    }

    fn seed_sprint_sets(
        &mut self,
        session_id: i64,
        exercise_id: i64,
        distance: f64,
        weight: f64,
        times: &[(u8, u8)],
    ) {
        let exercise = self
            .exercise_mut(session_id, exercise_id)
            .expect("seeded exercise exists");
        for &(secs, hundredths) in times {
            let id = exercise.add_set();
            if let Some(record) = exercise.running_set_mut(id) {
                record.payload.distance = distance;
                record.payload.weight = weight;
                record.payload.sprint = SprintTime::new(secs, hundredths);
            }
        }
    }
}

fn default_common_exercises() -> Vec<CommonExercise> {
    vec![
        CommonExercise::new(
            "Bench Press",
            ExerciseType::Strength,
            "Chest exercise with barbell or dumbbells",
        ),
        CommonExercise::new("Squat", ExerciseType::Strength, "Leg exercise with barbell"),
        CommonExercise::new(
            "Deadlift",
            ExerciseType::Strength,
            "Full body exercise with barbell",
        ),
        CommonExercise::new(
            "Running",
            ExerciseType::Running,
            "Distance running with time tracking",
        ),
        CommonExercise::new(
            "Jogging",
            ExerciseType::Running,
            "Light running with time tracking",
        ),
        CommonExercise::new(
            "Sprint",
            ExerciseType::Sprinting,
            "High-intensity sprinting with seconds and hundredths",
        ),
        CommonExercise::new("100m Sprint", ExerciseType::Sprinting, "100 meter sprint timing"),
        CommonExercise::new(
            "Sled Sprint",
            ExerciseType::SledSprint,
            "Weighted sled sprint with time, distance and weight",
        ),
        CommonExercise::new(
            "Prowler Push",
            ExerciseType::SledSprint,
            "Prowler sled push exercise",
        ),
        CommonExercise::new("Cycling", ExerciseType::Cardio, "Bike riding exercise"),
        CommonExercise::new("Swimming", ExerciseType::Cardio, "Full body cardio in water"),
    ]
}

fn default_training_types() -> Vec<String> {
    [
        "Strength Training",
        "Running",
        "Sprint",
        "Circuit Training",
        "Cycling",
        "Swimming",
        "Yoga",
        "Pilates",
        "CrossFit",
        "Boxing",
        "Cardio",
        "HIIT",
        "Walking",
        "Hiking",
        "Rowing",
        "Other",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
