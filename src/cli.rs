// src/cli.rs
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
#[command(about = "A CLI tool to plan and review training sessions (in-memory demo store)")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseTypeCli {
    Strength,
    Cardio,
    Time,
    Running,
    Sprinting,
    SledSprint,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a month of sessions as a calendar grid
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
        /// Highlight a day and list its sessions
        #[arg(short, long)]
        select: Option<NaiveDate>,
    },
    /// List sessions, newest first
    List {
        /// Filter by title, type, or description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one session with its exercises and sets
    Show {
        /// Session ID (see `list`)
        id: i64,
    },
    /// Add a training session
    AddSession {
        /// Title (may be empty; the display name falls back to type/date)
        #[arg(short, long, default_value = "")]
        title: String,
        /// Session date (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Planned duration in minutes
        #[arg(long, default_value_t = 60)]
        duration: u32,
        /// Training type label, e.g. "Running"
        #[arg(long = "type", default_value = "")]
        kind: String,
        /// Intensity on the 1-10 scale
        #[arg(short, long, default_value_t = 5)]
        intensity: u8,
        #[arg(long, default_value = "")]
        description: String,
    },
    DeleteSession {
        id: i64,
    },
    /// Add an exercise to a session, pre-filled from its type's template
    AddExercise {
        session: i64,
        name: String,
        #[arg(short, long = "type", value_enum)]
        type_: ExerciseTypeCli,
        #[arg(long, default_value = "")]
        description: String,
    },
    DeleteExercise {
        session: i64,
        exercise: i64,
    },
    /// Append a working set to an exercise
    AddSet {
        session: i64,
        exercise: i64,
    },
    /// Remove a set by its display row (1-based)
    RemoveSet {
        session: i64,
        exercise: i64,
        row: usize,
    },
    /// Move a set onto another row (1-based), renumbering afterwards
    MoveSet {
        session: i64,
        exercise: i64,
        from: usize,
        to: usize,
    },
    /// Toggle the warmup flag of a set by display row (1-based)
    ToggleWarmup {
        session: i64,
        exercise: i64,
        row: usize,
    },
    /// Search the exercise picker catalog
    Exercises {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List known training-type labels
    Types {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Write every session as CSV
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the path to the config file
    ConfigPath,
    /// Set the measurement units used for new exercises
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Generate shell completion scripts
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
