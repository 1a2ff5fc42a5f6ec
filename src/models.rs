// src/models.rs
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::sets::{SequenceError, SetId, SetRecord, SetSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    Strength,
    Cardio,
    Time,
    Running,
    Sprinting,
    SledSprint,
}

impl ExerciseType {
    /// Exercise types whose sets carry running metrics rather than reps.
    #[must_use]
    pub const fn uses_running_sets(self) -> bool {
        matches!(self, Self::Running | Self::Sprinting | Self::SledSprint)
    }

    /// How many working sets a freshly saved exercise starts with.
    #[must_use]
    pub const fn default_set_count(self) -> u32 {
        match self {
            Self::Strength | Self::Sprinting | Self::SledSprint => 3,
            Self::Running => 1,
            Self::Cardio | Self::Time => 0,
        }
    }

    /// Step used by the +/- distance controls on an exercise.
    #[must_use]
    pub const fn distance_step(self) -> f64 {
        match self {
            Self::SledSprint => 5.0,
            Self::Sprinting => 100.0,
            _ => 1.0,
        }
    }

    /// Step used by the +/- distance controls on a running set. Sled sprints
    /// move in short weighted shuttles, everything else in 100 m repeats.
    #[must_use]
    pub const fn set_distance_step(self) -> f64 {
        match self {
            Self::SledSprint => 5.0,
            _ => 100.0,
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strength => write!(f, "strength"),
            Self::Cardio => write!(f, "cardio"),
            Self::Time => write!(f, "time"),
            Self::Running => write!(f, "running"),
            Self::Sprinting => write!(f, "sprinting"),
            Self::SledSprint => write!(f, "sled-sprint"),
        }
    }
}

impl TryFrom<&str> for ExerciseType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "strength" => Ok(Self::Strength),
            "cardio" => Ok(Self::Cardio),
            "time" => Ok(Self::Time),
            "running" => Ok(Self::Running),
            "sprinting" | "sprint" => Ok(Self::Sprinting),
            "sled-sprint" | "sledsprint" => Ok(Self::SledSprint),
            _ => anyhow::bail!("Invalid exercise type string: {}", value),
        }
    }
}

/// Sprint stopwatch reading, seconds capped at 59 and hundredths at 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SprintTime {
    seconds: u8,
    hundredths: u8,
}

impl SprintTime {
    #[must_use]
    pub fn new(seconds: u8, hundredths: u8) -> Self {
        Self {
            seconds: seconds.min(59),
            hundredths: hundredths.min(99),
        }
    }

    #[must_use]
    pub const fn seconds(self) -> u8 {
        self.seconds
    }

    #[must_use]
    pub const fn hundredths(self) -> u8 {
        self.hundredths
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.seconds == 0 && self.hundredths == 0
    }

    pub fn increase_seconds(&mut self) {
        if self.seconds < 59 {
            self.seconds += 1;
        }
    }

    pub fn decrease_seconds(&mut self) {
        self.seconds = self.seconds.saturating_sub(1);
    }

    /// Adds one hundredth, carrying into the seconds. Pinned at 59.99.
    pub fn increase_hundredths(&mut self) {
        self.hundredths = (self.hundredths + 1) % 100;
        if self.hundredths == 0 {
            if self.seconds < 59 {
                self.seconds += 1;
            } else {
                self.hundredths = 99;
            }
        }
    }

    /// Subtracts one hundredth, borrowing from the seconds. Pinned at 00.00.
    pub fn decrease_hundredths(&mut self) {
        if self.hundredths > 0 {
            self.hundredths -= 1;
        } else if self.seconds > 0 {
            self.seconds -= 1;
            self.hundredths = 99;
        }
    }
}

impl fmt::Display for SprintTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}s", self.seconds, self.hundredths)
    }
}

/// `HH:MM:SS` rendering of a duration in whole seconds.
#[must_use]
pub fn duration_display(total_secs: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        total_secs % 3600 / 60,
        total_secs % 60
    )
}

/// Strength set payload: reps at a weight.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthSet {
    pub reps: u32,
    pub weight: f64,
    pub unit: String,
}

impl StrengthSet {
    pub fn increase_reps(&mut self) {
        self.reps += 1;
    }

    pub fn decrease_reps(&mut self) {
        if self.reps > 1 {
            self.reps -= 1;
        }
    }

    pub fn increase_weight(&mut self, step: f64) {
        self.weight += step;
    }

    pub fn decrease_weight(&mut self, step: f64) {
        self.weight = (self.weight - step).max(0.0);
    }
}

impl fmt::Display for StrengthSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weight > 0.0 {
            write!(f, "{} reps @ {:.2} {}", self.reps, self.weight, self.unit)
        } else {
            write!(f, "{} reps", self.reps)
        }
    }
}

/// Running set payload: a timed (and possibly weighted) distance effort.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningSet {
    pub duration_secs: u32,
    pub distance: f64,
    pub weight: f64,
    pub sprint: SprintTime,
}

impl RunningSet {
    pub fn increase_distance(&mut self, step: f64) {
        self.distance += step;
    }

    pub fn decrease_distance(&mut self, step: f64) {
        self.distance = (self.distance - step).max(0.0);
    }

    pub fn increase_weight(&mut self, step: f64) {
        self.weight += step;
    }

    pub fn decrease_weight(&mut self, step: f64) {
        self.weight = (self.weight - step).max(0.0);
    }
}

impl fmt::Display for RunningSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sprint.is_zero() {
            write!(f, "{}", duration_display(self.duration_secs))
        } else {
            write!(f, "{}", self.sprint)?;
            if self.distance > 0.0 {
                write!(f, " - {}m", self.distance)?;
            }
            if self.weight > 0.0 {
                write!(f, " @ {}kg", self.weight)?;
            }
            Ok(())
        }
    }
}

/// The one set list an exercise owns; the variant is fixed when the exercise
/// is created and never changes afterwards.
#[derive(Debug)]
pub enum ExerciseSets {
    Strength(SetSequence<StrengthSet>),
    Running(SetSequence<RunningSet>),
}

impl ExerciseSets {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Strength(seq) => seq.len(),
            Self::Running(seq) => seq.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<SetId> {
        match self {
            Self::Strength(seq) => seq.id_at(index),
            Self::Running(seq) => seq.id_at(index),
        }
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        match self {
            Self::Strength(seq) => seq.revision(),
            Self::Running(seq) => seq.revision(),
        }
    }

    /// (label, warmup flag, metrics text) per set, in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<(String, bool, String)> {
        fn collect<P: fmt::Display>(seq: &SetSequence<P>) -> Vec<(String, bool, String)> {
            seq.iter()
                .map(|r| (r.label(), r.is_warmup(), r.payload.to_string()))
                .collect()
        }
        match self {
            Self::Strength(seq) => collect(seq),
            Self::Running(seq) => collect(seq),
        }
    }

    pub fn remove(&mut self, id: SetId) -> Result<(), SequenceError> {
        match self {
            Self::Strength(seq) => seq.remove(id),
            Self::Running(seq) => seq.remove(id),
        }
    }

    pub fn move_to(&mut self, id: SetId, target: SetId) {
        match self {
            Self::Strength(seq) => seq.move_to(id, target),
            Self::Running(seq) => seq.move_to(id, target),
        }
    }

    pub fn toggle_warmup(&mut self, id: SetId) {
        match self {
            Self::Strength(seq) => seq.toggle_warmup(id),
            Self::Running(seq) => seq.toggle_warmup(id),
        }
    }
}

/// One exercise within a session. The scalar fields double as defaults for
/// new sets when the set list is empty.
#[derive(Debug)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub exercise_type: ExerciseType,
    pub reps: u32,
    pub weight: f64,
    pub duration_secs: u32,
    pub distance: f64,
    pub unit: String,
    pub sprint: SprintTime,
    pub sets: ExerciseSets,
}

impl Exercise {
    /// Duration moves in 5-minute steps, floored at zero.
    pub fn increase_duration(&mut self) {
        self.duration_secs += 5 * 60;
    }

    pub fn decrease_duration(&mut self) {
        self.duration_secs = self.duration_secs.saturating_sub(5 * 60);
    }

    /// Appends a working set, seeding it from the last set's metrics
    /// (falling back to the exercise defaults for the first one).
    pub fn add_set(&mut self) -> SetId {
        match &mut self.sets {
            ExerciseSets::Strength(seq) => {
                let payload = seq.last().map_or_else(
                    || StrengthSet {
                        reps: self.reps,
                        weight: self.weight,
                        unit: self.unit.clone(),
                    },
                    |r| r.payload.clone(),
                );
                seq.append(payload)
            }
            ExerciseSets::Running(seq) => {
                let payload = seq.last().map_or_else(
                    || RunningSet {
                        duration_secs: self.duration_secs,
                        distance: self.distance,
                        weight: self.weight,
                        sprint: self.sprint,
                    },
                    |r| r.payload.clone(),
                );
                seq.append(payload)
            }
        }
    }

    pub fn strength_set_mut(&mut self, id: SetId) -> Option<&mut SetRecord<StrengthSet>> {
        match &mut self.sets {
            ExerciseSets::Strength(seq) => seq.get_mut(id),
            ExerciseSets::Running(_) => None,
        }
    }

    pub fn running_set_mut(&mut self, id: SetId) -> Option<&mut SetRecord<RunningSet>> {
        match &mut self.sets {
            ExerciseSets::Running(seq) => seq.get_mut(id),
            ExerciseSets::Strength(_) => None,
        }
    }

    /// One-line summary, matching the list view.
    #[must_use]
    pub fn display_text(&self) -> String {
        let set_count = self.sets.len();
        match self.exercise_type {
            ExerciseType::Strength => {
                if self.weight > 0.0 {
                    format!(
                        "{} set × {} reps @ {} {}",
                        set_count, self.reps, self.weight, self.unit
                    )
                } else {
                    format!("{} set × {} reps", set_count, self.reps)
                }
            }
            ExerciseType::Cardio => {
                if self.distance > 0.0 {
                    format!(
                        "{:.1} km - {}",
                        self.distance,
                        duration_display(self.duration_secs)
                    )
                } else {
                    duration_display(self.duration_secs)
                }
            }
            ExerciseType::Time => duration_display(self.duration_secs),
            ExerciseType::Running => {
                if set_count > 0 {
                    format!(
                        "{} sets - {}",
                        set_count,
                        duration_display(self.duration_secs)
                    )
                } else {
                    duration_display(self.duration_secs)
                }
            }
            ExerciseType::Sprinting => {
                if set_count > 0 {
                    format!("{} sets - {}", set_count, self.sprint)
                } else {
                    self.sprint.to_string()
                }
            }
            ExerciseType::SledSprint => {
                if set_count > 0 {
                    format!("{} sets - {} @ {}kg", set_count, self.sprint, self.weight)
                } else {
                    format!("{} @ {}kg", self.sprint, self.weight)
                }
            }
        }
    }
}

/// One scheduled training session, exclusively owning its exercises.
#[derive(Debug)]
pub struct TrainingSession {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub duration_min: u32,
    pub kind: String,
    intensity: u8,
    pub exercises: Vec<Exercise>,
}

impl TrainingSession {
    #[must_use]
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        duration_min: u32,
        kind: impl Into<String>,
        intensity: u8,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            date,
            duration_min,
            kind: kind.into(),
            intensity: intensity.clamp(1, 10),
            exercises: Vec::new(),
        }
    }

    #[must_use]
    pub const fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Clamped to the 1..=10 scale.
    pub fn set_intensity(&mut self, intensity: u8) {
        self.intensity = intensity.clamp(1, 10);
    }

    #[must_use]
    pub fn has_exercises(&self) -> bool {
        !self.exercises.is_empty()
    }

    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    pub fn exercise(&self, exercise_id: i64) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    pub fn exercise_mut(&mut self, exercise_id: i64) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }

    /// Title, falling back to the type and date when the title is blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.title.trim().is_empty() {
            self.title.clone()
        } else if !self.kind.trim().is_empty() {
            format!("{} - {}", self.kind, self.date.format("%Y-%m-%d"))
        } else {
            format!("Training Session - {}", self.date.format("%Y-%m-%d"))
        }
    }

    /// `HH:MM` rendering of the planned duration.
    #[must_use]
    pub fn duration_display(&self) -> String {
        format!("{:02}:{:02}", self.duration_min / 60, self.duration_min % 60)
    }

    /// Case-insensitive match against name, type, and description, as the
    /// list view's search box filters.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.display_name().to_lowercase().contains(&needle)
            || self.kind.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
