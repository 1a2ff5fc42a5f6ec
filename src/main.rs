//src/main.rs
mod cli;

use std::fs::File;
use std::io::stdout;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

use sprint_track_lib::{
    calendar, parse_color, ExerciseType, NewSession, SetId, TrainingSession, TrainingService,
    Units,
};

fn main() -> Result<()> {
    let cli_args = cli::parse_args();

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        TrainingService::initialize().context("Failed to initialize training service")?;
    let today = Local::now().date_naive();
    // The store is volatile; every invocation starts from the sample data.
    service.seed_sample_data(today);

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Calendar { month, select } => {
            let (year, month) = match month {
                Some(ref text) => parse_year_month(text)?,
                None => (today.year(), today.month()),
            };
            print_calendar(&service, year, month, today, select);
            if let Some(date) = select {
                print_day_sessions(&service, date);
            }
        }
        cli::Commands::List { search } => {
            let needle = search.unwrap_or_default();
            let sessions = service.search_sessions(&needle);
            if sessions.is_empty() {
                println!("No training sessions match '{needle}'.");
            } else {
                print_session_list(&service, &sessions);
            }
        }
        cli::Commands::Show { id } => {
            let Some(session) = service.session(id) else {
                bail!("Training session ID {id} not found.");
            };
            print_session_detail(&service, session);
        }
        cli::Commands::AddSession {
            title,
            date,
            duration,
            kind,
            intensity,
            description,
        } => {
            let id = service.add_session(NewSession {
                title,
                description,
                date: date.unwrap_or(today),
                duration_min: duration,
                kind,
                intensity,
            });
            let session = service.session(id).expect("session just added");
            println!(
                "Added training session '{}' (ID: {id}).",
                session.display_name()
            );
        }
        cli::Commands::DeleteSession { id } => {
            match service.remove_session(id) {
                Ok(()) => println!("Deleted training session ID {id}."),
                Err(e) => bail!("Error deleting session: {e}"),
            }
        }
        cli::Commands::AddExercise {
            session,
            name,
            type_,
            description,
        } => {
            let mut new = service.exercise_template(&name, cli_type_to_model_type(type_));
            new.description = description;
            match service.save_exercise(session, new) {
                Ok(exercise_id) => {
                    println!("Added exercise '{name}' (ID: {exercise_id}) to session {session}.");
                    let session = service.session(session).expect("session exists");
                    print_session_detail(&service, session);
                }
                Err(e) => bail!("Error adding exercise: {e}"),
            }
        }
        cli::Commands::DeleteExercise { session, exercise } => {
            match service.delete_exercise(session, exercise) {
                Ok(()) => println!("Deleted exercise ID {exercise} from session {session}."),
                Err(e) => bail!("Error deleting exercise: {e}"),
            }
        }
        cli::Commands::AddSet { session, exercise } => {
            let target = service.exercise_mut(session, exercise)?;
            target.add_set();
            println!("Added a set to '{}'.", target.name);
            print_session_detail(&service, service.session(session).expect("session exists"));
        }
        cli::Commands::RemoveSet {
            session,
            exercise,
            row,
        } => {
            let target = service.exercise_mut(session, exercise)?;
            let id = set_id_at_row(target.sets.id_at(row.wrapping_sub(1)), row)?;
            match target.sets.remove(id) {
                Ok(()) => println!("Removed set {row} from '{}'.", target.name),
                Err(e) => bail!("Cannot remove set: {e}"),
            }
            print_session_detail(&service, service.session(session).expect("session exists"));
        }
        cli::Commands::MoveSet {
            session,
            exercise,
            from,
            to,
        } => {
            let target = service.exercise_mut(session, exercise)?;
            let from_id = set_id_at_row(target.sets.id_at(from.wrapping_sub(1)), from)?;
            let to_id = set_id_at_row(target.sets.id_at(to.wrapping_sub(1)), to)?;
            target.sets.move_to(from_id, to_id);
            println!("Moved set {from} to row {to} in '{}'.", target.name);
            print_session_detail(&service, service.session(session).expect("session exists"));
        }
        cli::Commands::ToggleWarmup {
            session,
            exercise,
            row,
        } => {
            let target = service.exercise_mut(session, exercise)?;
            let id = set_id_at_row(target.sets.id_at(row.wrapping_sub(1)), row)?;
            target.sets.toggle_warmup(id);
            println!("Toggled warmup on set {row} of '{}'.", target.name);
            print_session_detail(&service, service.session(session).expect("session exists"));
        }
        cli::Commands::Exercises { search } => {
            let needle = search.unwrap_or_default();
            print_exercise_catalog(&service, &needle);
        }
        cli::Commands::Types { search } => {
            let needle = search.unwrap_or_default();
            for kind in service.training_types(&needle) {
                println!("{kind}");
            }
        }
        cli::Commands::Export { output } => match output {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                service.export_csv(file)?;
                println!("Exported sessions to {}.", path.display());
            }
            None => service.export_csv(stdout())?,
        },
        cli::Commands::ConfigPath => {
            println!("{}", service.get_config_path().display());
        }
        cli::Commands::SetUnits { units } => {
            let units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            match service.set_units(units) {
                Ok(()) => println!(
                    "Units set to {units:?} ({}/{}).",
                    units.weight_unit(),
                    units.distance_unit()
                ),
                Err(e) => bail!("Error saving config: {e}"),
            }
        }
    }

    Ok(())
}

const fn cli_type_to_model_type(cli_type: cli::ExerciseTypeCli) -> ExerciseType {
    match cli_type {
        cli::ExerciseTypeCli::Strength => ExerciseType::Strength,
        cli::ExerciseTypeCli::Cardio => ExerciseType::Cardio,
        cli::ExerciseTypeCli::Time => ExerciseType::Time,
        cli::ExerciseTypeCli::Running => ExerciseType::Running,
        cli::ExerciseTypeCli::Sprinting => ExerciseType::Sprinting,
        cli::ExerciseTypeCli::SledSprint => ExerciseType::SledSprint,
    }
}

fn parse_year_month(text: &str) -> Result<(i32, u32)> {
    let invalid = || anyhow::anyhow!("Invalid month '{text}', expected YYYY-MM.");
    let (year_text, month_text) = text.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year_text.parse().map_err(|_| invalid())?;
    let month: u32 = month_text.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

fn set_id_at_row(id: Option<SetId>, row: usize) -> Result<SetId> {
    id.ok_or_else(|| anyhow::anyhow!("No set at row {row}."))
}

fn theme_color(name: &str, fallback: Color) -> Color {
    parse_color(name).map_or(fallback, Into::into)
}

fn print_calendar(
    service: &TrainingService,
    year: i32,
    month: u32,
    today: NaiveDate,
    selected: Option<NaiveDate>,
) {
    let header_color = theme_color(&service.config.theme.header_color, Color::Green);
    let selected_color = theme_color(&service.config.theme.selected_day_color, Color::Cyan);
    let grid = service.calendar_month(year, month, today, selected);

    println!("{}", calendar::month_title(year, month));
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            calendar::WEEKDAY_HEADERS
                .iter()
                .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    for week in calendar::week_rows(&grid) {
        let row: Vec<Cell> = week
            .iter()
            .map(|day| {
                let mut text = day.day_number();
                if day.has_sessions() {
                    text.push_str(&format!(" ({})", day.session_ids.len()));
                }
                let mut cell = Cell::new(text);
                if day.is_selected {
                    cell = cell.fg(selected_color).add_attribute(Attribute::Bold);
                } else if day.is_today {
                    cell = cell.add_attribute(Attribute::Bold);
                } else if day.date.is_some_and(calendar::is_weekend) {
                    cell = cell.fg(Color::Grey);
                }
                cell
            })
            .collect();
        table.add_row(row);
    }
    println!("{table}");
}

fn print_exercise_catalog(service: &TrainingService, filter: &str) {
    let header_color = theme_color(&service.config.theme.header_color, Color::Green);
    let entries = service.common_exercises(filter);
    if entries.is_empty() {
        println!("No catalog exercises match '{filter}'.");
        if service.can_add_custom_exercise(filter) {
            println!("'{filter}' could be added as a custom exercise.");
        }
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Name", "Type", "Description"]
                .iter()
                .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.exercise_type),
            Cell::new(&entry.description),
        ]);
    }
    println!("{table}");
}

fn print_day_sessions(service: &TrainingService, date: NaiveDate) {
    let sessions = service.sessions_on(date);
    if sessions.is_empty() {
        println!("No sessions on {}.", date.format("%A, %d %B %Y"));
    } else {
        println!("Sessions on {}:", date.format("%A, %d %B %Y"));
        print_session_list(service, &sessions);
    }
}

fn print_session_list(service: &TrainingService, sessions: &[&TrainingSession]) {
    let header_color = theme_color(&service.config.theme.header_color, Color::Green);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["ID", "Date", "Name", "Type", "Duration", "Intensity", "Exercises"]
                .iter()
                .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    for session in sessions {
        table.add_row(vec![
            Cell::new(session.id),
            Cell::new(session.date.format("%Y-%m-%d")),
            Cell::new(session.display_name()),
            Cell::new(&session.kind),
            Cell::new(session.duration_display()),
            Cell::new(format!("{}/10", session.intensity())),
            Cell::new(session.exercise_count()),
        ]);
    }
    println!("{table}");
}

fn print_session_detail(service: &TrainingService, session: &TrainingSession) {
    let header_color = theme_color(&service.config.theme.header_color, Color::Green);
    let warmup_color = theme_color(&service.config.theme.warmup_color, Color::DarkYellow);

    println!(
        "{} - {} ({}, intensity {}/10)",
        session.display_name(),
        session.date.format("%Y-%m-%d"),
        session.duration_display(),
        session.intensity()
    );
    if !session.description.is_empty() {
        println!("{}", session.description);
    }
    if !session.has_exercises() {
        println!("No exercises yet.");
        return;
    }
    for exercise in &session.exercises {
        println!(
            "\n[{}] {} ({}) - {}",
            exercise.id,
            exercise.name,
            exercise.exercise_type,
            exercise.display_text()
        );
        if exercise.sets.is_empty() {
            continue;
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(
                ["Set", "Metrics"]
                    .iter()
                    .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold))
                    .collect::<Vec<_>>(),
            );
        for (label, warmup, metrics) in exercise.sets.rows() {
            let mut label_cell = Cell::new(label);
            let mut metrics_cell = Cell::new(metrics);
            if warmup {
                label_cell = label_cell.fg(warmup_color);
                metrics_cell = metrics_cell.fg(warmup_color);
            }
            table.add_row(vec![label_cell, metrics_cell]);
        }
        println!("{table}");
    }
}
