use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use chrono::NaiveDate;
use strum::IntoEnumIterator;

use sprint_track_lib::{
    calendar, duration_display, parse, Config, ExerciseSets, ExerciseType, NewExercise,
    NewSession, RunningSet, SequenceError, SetSequence, SprintTime, StrengthSet, TrainingService,
    Units,
};

// Helper function to create a test service that never touches the disk
fn create_test_service() -> TrainingService {
    TrainingService::with_config(Config::default())
}

fn create_seeded_service(today: NaiveDate) -> TrainingService {
    let mut service = create_test_service();
    service.seed_sample_data(today);
    service
}

fn strength(reps: u32, weight: f64) -> StrengthSet {
    StrengthSet {
        reps,
        weight,
        unit: "kg".to_string(),
    }
}

// Snapshot of (number, warmup) pairs in display order
fn numbering(seq: &SetSequence<StrengthSet>) -> Vec<(u32, bool)> {
    seq.iter().map(|r| (r.number(), r.is_warmup())).collect()
}

// Checks the two-tier numbering invariant: warmups are 0, working sets are
// 1..N contiguously in their display order.
fn assert_numbering_invariant(seq: &SetSequence<StrengthSet>) {
    let mut expected_working = 1;
    for record in seq.iter() {
        if record.is_warmup() {
            assert_eq!(record.number(), 0, "warmup sets must be numbered 0");
        } else {
            assert_eq!(
                record.number(),
                expected_working,
                "working sets must be numbered contiguously"
            );
            expected_working += 1;
        }
    }
}

#[test]
fn test_append_numbers_working_sets_sequentially() {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));

    assert_eq!(numbering(&seq), vec![(1, false), (2, false), (3, false)]);
    assert_numbering_invariant(&seq);
}

#[test]
fn test_remove_refuses_last_set() {
    let mut seq = SetSequence::new();
    let only = seq.append(strength(10, 60.0));

    assert_eq!(seq.remove(only), Err(SequenceError::LastSet));
    assert_eq!(seq.len(), 1);
    assert!(seq.get(only).is_some());
}

#[test]
fn test_remove_renumbers_remaining_sets() -> Result<()> {
    let mut seq = SetSequence::new();
    let first = seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));

    seq.remove(first)?;

    assert_eq!(seq.len(), 2);
    assert_eq!(numbering(&seq), vec![(1, false), (2, false)]);
    assert_eq!(seq.iter().next().unwrap().payload.weight, 70.0);
    Ok(())
}

#[test]
fn test_remove_foreign_id_is_silent_noop() -> Result<()> {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    let before = seq.revision();

    let mut other = SetSequence::new();
    let foreign = other.append(strength(5, 100.0));

    seq.remove(foreign)?;
    assert_eq!(seq.len(), 1);
    assert_eq!(seq.revision(), before);
    Ok(())
}

#[test]
fn test_move_to_same_set_is_noop() {
    let mut seq = SetSequence::new();
    let a = seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));
    let before = numbering(&seq);
    let revision = seq.revision();

    seq.move_to(a, a);

    assert_eq!(numbering(&seq), before);
    assert_eq!(seq.revision(), revision);
}

#[test]
fn test_move_to_foreign_set_is_noop() {
    let mut seq = SetSequence::new();
    let a = seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));
    let weights_before: Vec<f64> = seq.iter().map(|r| r.payload.weight).collect();
    let revision = seq.revision();

    let mut other = SetSequence::new();
    let foreign = other.append(strength(5, 100.0));

    seq.move_to(a, foreign);
    seq.move_to(foreign, a);

    let weights_after: Vec<f64> = seq.iter().map(|r| r.payload.weight).collect();
    assert_eq!(weights_after, weights_before);
    assert_eq!(seq.revision(), revision);
}

#[test]
fn test_move_third_set_onto_first_slot() {
    // [A(1), B(2), C(3)] and dragging C onto A must give [C, A, B] with
    // positions renumbered 1, 2, 3.
    let mut seq = SetSequence::new();
    let a = seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));
    let c = seq.append(strength(8, 80.0));

    seq.move_to(c, a);

    let weights: Vec<f64> = seq.iter().map(|r| r.payload.weight).collect();
    assert_eq!(weights, vec![80.0, 60.0, 70.0]);
    assert_eq!(numbering(&seq), vec![(1, false), (2, false), (3, false)]);
}

#[test]
fn test_toggle_warmup_marks_whole_prefix() {
    // [W1, W2, W3] -> toggle the middle set -> first two become warmups,
    // order preserved, remaining working set renumbered to 1.
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    let second = seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));

    seq.toggle_warmup(second);

    assert_eq!(numbering(&seq), vec![(0, true), (0, true), (1, false)]);
    let weights: Vec<f64> = seq.iter().map(|r| r.payload.weight).collect();
    assert_eq!(weights, vec![60.0, 70.0, 80.0]);
}

#[test]
fn test_toggle_warmup_unmarks_following_run() {
    let mut seq = SetSequence::new();
    let first = seq.append(strength(10, 60.0));
    let second = seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));

    seq.toggle_warmup(second);
    assert_eq!(numbering(&seq), vec![(0, true), (0, true), (1, false)]);

    // Tapping the first warmup reverts it and the warmup run behind it.
    seq.toggle_warmup(first);
    assert_eq!(numbering(&seq), vec![(1, false), (2, false), (3, false)]);
}

#[test]
fn test_toggle_unmark_leaves_earlier_warmups_untouched() {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 50.0));
    let b = seq.append(strength(10, 60.0));
    let c = seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));

    // Mark a, b, c warmup via the cascade.
    seq.toggle_warmup(c);
    assert_eq!(
        numbering(&seq),
        vec![(0, true), (0, true), (0, true), (1, false)]
    );

    // Unmarking b clears b and c but leaves a alone.
    seq.toggle_warmup(b);
    assert_eq!(
        numbering(&seq),
        vec![(0, true), (1, false), (2, false), (3, false)]
    );
}

#[test]
fn test_toggle_warmup_foreign_id_is_noop() {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    let revision = seq.revision();

    let mut other = SetSequence::new();
    let foreign = other.append(strength(5, 100.0));

    seq.toggle_warmup(foreign);
    assert_eq!(numbering(&seq), vec![(1, false)]);
    assert_eq!(seq.revision(), revision);
}

#[test]
fn test_renumber_is_idempotent() {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    let second = seq.append(strength(10, 70.0));
    seq.append(strength(8, 80.0));
    seq.toggle_warmup(second);

    let once = numbering(&seq);
    seq.renumber();
    assert_eq!(numbering(&seq), once);
    seq.renumber();
    assert_eq!(numbering(&seq), once);
}

#[test]
fn test_numbering_invariant_survives_mixed_operations() -> Result<()> {
    let mut seq = SetSequence::new();
    let a = seq.append(strength(10, 50.0));
    let b = seq.append(strength(10, 60.0));
    let c = seq.append(strength(10, 70.0));
    let d = seq.append(strength(8, 80.0));
    assert_numbering_invariant(&seq);

    seq.toggle_warmup(b);
    assert_numbering_invariant(&seq);

    seq.move_to(d, c);
    assert_numbering_invariant(&seq);

    seq.remove(a)?;
    assert_numbering_invariant(&seq);

    seq.toggle_warmup(d);
    assert_numbering_invariant(&seq);

    seq.append(strength(12, 40.0));
    assert_numbering_invariant(&seq);
    Ok(())
}

#[test]
fn test_change_notification_fires_once_per_mutation() -> Result<()> {
    let mut seq = SetSequence::new();
    let calls = Rc::new(Cell::new(0u32));
    let listener_calls = Rc::clone(&calls);
    seq.set_on_change(move || listener_calls.set(listener_calls.get() + 1));

    let a = seq.append(strength(10, 60.0));
    assert_eq!(calls.get(), 1);
    let b = seq.append(strength(10, 70.0));
    assert_eq!(calls.get(), 2);

    seq.toggle_warmup(a);
    assert_eq!(calls.get(), 3);

    // No-ops must not notify.
    seq.move_to(b, b);
    assert_eq!(calls.get(), 3);

    seq.remove(b)?;
    assert_eq!(calls.get(), 4);

    // Refused removal is not a mutation either.
    assert!(seq.remove(a).is_err());
    assert_eq!(calls.get(), 4);
    Ok(())
}

#[test]
fn test_set_labels() {
    let mut seq = SetSequence::new();
    let first = seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));

    assert_eq!(seq.get(first).unwrap().label(), "Set 1");
    seq.toggle_warmup(first);
    assert_eq!(seq.get(first).unwrap().label(), "W");
}

#[test]
fn test_iter_mut_edits_payloads_in_place() {
    let mut seq = SetSequence::new();
    seq.append(strength(10, 60.0));
    seq.append(strength(10, 70.0));

    for record in seq.iter_mut() {
        record.payload.increase_weight(1.25);
    }

    let weights: Vec<f64> = seq.iter().map(|r| r.payload.weight).collect();
    assert_eq!(weights, vec![61.25, 71.25]);
    // Payload edits leave the numbering alone.
    assert_eq!(numbering(&seq), vec![(1, false), (2, false)]);
}

// --- Models ---

#[test]
fn test_sprint_time_increment_carries_and_pins() {
    let mut time = SprintTime::new(12, 99);
    time.increase_hundredths();
    assert_eq!((time.seconds(), time.hundredths()), (13, 0));

    let mut ceiling = SprintTime::new(59, 99);
    ceiling.increase_hundredths();
    assert_eq!((ceiling.seconds(), ceiling.hundredths()), (59, 99));
}

#[test]
fn test_sprint_time_decrement_borrows_and_pins() {
    let mut time = SprintTime::new(13, 0);
    time.decrease_hundredths();
    assert_eq!((time.seconds(), time.hundredths()), (12, 99));

    let mut floor = SprintTime::new(0, 0);
    floor.decrease_hundredths();
    assert_eq!((floor.seconds(), floor.hundredths()), (0, 0));
}

#[test]
fn test_sprint_time_constructor_clamps() {
    let time = SprintTime::new(90, 120);
    assert_eq!((time.seconds(), time.hundredths()), (59, 99));
    assert_eq!(time.to_string(), "59.99s");
}

#[test]
fn test_duration_display_formats() {
    assert_eq!(duration_display(0), "00:00:00");
    assert_eq!(duration_display(25 * 60), "00:25:00");
    assert_eq!(duration_display(3_725), "01:02:05");
}

#[test]
fn test_strength_set_weight_floor() {
    let mut set = strength(10, 1.0);
    set.decrease_weight(1.25);
    assert_eq!(set.weight, 0.0);
    set.increase_weight(1.25);
    assert_eq!(set.weight, 1.25);

    set.decrease_reps();
    for _ in 0..20 {
        set.decrease_reps();
    }
    assert_eq!(set.reps, 1);
}

#[test]
fn test_exercise_duration_moves_in_five_minute_steps() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_test_service();
    let session = service.add_session(NewSession {
        date: today,
        intensity: 5,
        ..Default::default()
    });
    let template = service.exercise_template("Plank", ExerciseType::Time);
    let id = service.save_exercise(session, template)?;

    let exercise = service.exercise_mut(session, id)?;
    assert_eq!(exercise.duration_secs, 15 * 60);
    exercise.increase_duration();
    assert_eq!(exercise.duration_secs, 20 * 60);
    exercise.decrease_duration();
    exercise.decrease_duration();
    exercise.decrease_duration();
    exercise.decrease_duration();
    assert_eq!(exercise.duration_secs, 0);
    exercise.decrease_duration();
    assert_eq!(exercise.duration_secs, 0);
    Ok(())
}

#[test]
fn test_sprint_time_second_steps_stay_in_range() {
    let mut time = SprintTime::new(58, 40);
    time.increase_seconds();
    assert_eq!((time.seconds(), time.hundredths()), (59, 40));
    time.increase_seconds();
    assert_eq!(time.seconds(), 59);

    let mut floor = SprintTime::new(1, 25);
    floor.decrease_seconds();
    assert_eq!((floor.seconds(), floor.hundredths()), (0, 25));
    floor.decrease_seconds();
    assert_eq!(floor.seconds(), 0);
}

#[test]
fn test_distance_steps_per_exercise_type() {
    assert_eq!(ExerciseType::SledSprint.distance_step(), 5.0);
    assert_eq!(ExerciseType::Sprinting.distance_step(), 100.0);
    assert_eq!(ExerciseType::Running.distance_step(), 1.0);
    assert_eq!(ExerciseType::Cardio.distance_step(), 1.0);

    // Set-level controls only distinguish sled shuttles from repeats.
    assert_eq!(ExerciseType::SledSprint.set_distance_step(), 5.0);
    assert_eq!(ExerciseType::Sprinting.set_distance_step(), 100.0);
    assert_eq!(ExerciseType::Running.set_distance_step(), 100.0);
}

#[test]
fn test_running_set_steps_floor_at_zero() {
    let mut set = RunningSet {
        duration_secs: 0,
        distance: 100.0,
        weight: 20.0,
        sprint: SprintTime::new(12, 50),
    };

    let step = ExerciseType::Sprinting.set_distance_step();
    set.increase_distance(step);
    assert_eq!(set.distance, 200.0);
    for _ in 0..3 {
        set.decrease_distance(step);
    }
    assert_eq!(set.distance, 0.0);

    set.increase_weight(5.0);
    assert_eq!(set.weight, 25.0);
    for _ in 0..6 {
        set.decrease_weight(5.0);
    }
    assert_eq!(set.weight, 0.0);
}

#[test]
fn test_exercise_type_strings_round_trip() -> Result<()> {
    for exercise_type in ExerciseType::iter() {
        let text = exercise_type.to_string();
        assert_eq!(ExerciseType::try_from(text.as_str())?, exercise_type);
    }
    assert!(ExerciseType::try_from("pilates").is_err());
    Ok(())
}

#[test]
fn test_session_display_name_fallbacks() {
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
    let mut service = create_test_service();

    let titled = service.add_session(NewSession {
        title: "Morning Run".to_string(),
        date,
        kind: "Running".to_string(),
        intensity: 5,
        ..Default::default()
    });
    assert_eq!(service.session(titled).unwrap().display_name(), "Morning Run");

    let typed = service.add_session(NewSession {
        date,
        kind: "Running".to_string(),
        intensity: 5,
        ..Default::default()
    });
    assert_eq!(
        service.session(typed).unwrap().display_name(),
        "Running - 2026-08-29"
    );

    let bare = service.add_session(NewSession {
        date,
        intensity: 5,
        ..Default::default()
    });
    assert_eq!(
        service.session(bare).unwrap().display_name(),
        "Training Session - 2026-08-29"
    );
}

#[test]
fn test_session_intensity_is_clamped() {
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
    let mut service = create_test_service();
    let id = service.add_session(NewSession {
        date,
        intensity: 99,
        ..Default::default()
    });
    assert_eq!(service.session(id).unwrap().intensity(), 10);

    let session = service.session_mut(id).unwrap();
    session.set_intensity(0);
    assert_eq!(session.intensity(), 1);
    assert_eq!(session.duration_display(), "00:00");
}

// --- Service ---

#[test]
fn test_session_crud() -> Result<()> {
    let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
    let mut service = create_test_service();

    let id = service.add_session(NewSession {
        title: "Leg Day".to_string(),
        date,
        duration_min: 45,
        kind: "Strength Training".to_string(),
        intensity: 7,
        ..Default::default()
    });
    assert_eq!(service.sessions().len(), 1);

    service.session_mut(id).unwrap().title = "Heavy Leg Day".to_string();
    assert_eq!(service.session(id).unwrap().display_name(), "Heavy Leg Day");

    let mut replacement = sprint_track_lib::TrainingSession::new(
        id,
        "Deload Leg Day",
        "",
        date,
        30,
        "Strength Training",
        4,
    );
    replacement.set_intensity(3);
    service.update_session(replacement)?;
    assert_eq!(service.session(id).unwrap().display_name(), "Deload Leg Day");
    assert_eq!(service.session(id).unwrap().intensity(), 3);

    service.remove_session(id)?;
    assert!(service.sessions().is_empty());

    let result = service.remove_session(id);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
    Ok(())
}

#[test]
fn test_search_sessions_filters_and_orders_newest_first() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let service = create_seeded_service(today);

    let all: Vec<String> = service
        .search_sessions("")
        .iter()
        .map(|s| s.display_name())
        .collect();
    assert_eq!(
        all,
        vec![
            "Yoga Session",
            "Strength Training",
            "Morning Run",
            "Sprint Training"
        ]
    );

    let runs: Vec<String> = service
        .search_sessions("run")
        .iter()
        .map(|s| s.display_name())
        .collect();
    assert_eq!(runs, vec!["Morning Run"]);

    let training: Vec<String> = service
        .search_sessions("TRAINING")
        .iter()
        .map(|s| s.display_name())
        .collect();
    assert_eq!(training, vec!["Strength Training", "Sprint Training"]);

    assert!(service.search_sessions("no such thing").is_empty());
}

#[test]
fn test_sample_data_shape() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let service = create_seeded_service(today);
    assert_eq!(service.sessions().len(), 4);

    let strength = service
        .sessions()
        .iter()
        .find(|s| s.title == "Strength Training")
        .unwrap();
    assert_eq!(strength.exercise_count(), 2);
    let bench = strength
        .exercises
        .iter()
        .find(|e| e.name == "Bench Press")
        .unwrap();
    assert_eq!(bench.sets.len(), 3);
    match &bench.sets {
        ExerciseSets::Strength(seq) => {
            let loads: Vec<(u32, f64)> =
                seq.iter().map(|r| (r.payload.reps, r.payload.weight)).collect();
            assert_eq!(loads, vec![(10, 70.0), (10, 80.0), (8, 85.0)]);
        }
        ExerciseSets::Running(_) => panic!("bench press must carry strength sets"),
    }

    let yoga = service
        .sessions()
        .iter()
        .find(|s| s.title == "Yoga Session")
        .unwrap();
    assert!(!yoga.has_exercises());
}

#[test]
fn test_save_exercise_requires_name() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_test_service();
    let id = service.add_session(NewSession {
        date: today,
        intensity: 5,
        ..Default::default()
    });

    let result = service.save_exercise(id, NewExercise::new("   ", ExerciseType::Strength));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("name cannot be empty"));
}

#[test]
fn test_save_exercise_prefills_sets_from_template() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_test_service();
    let session = service.add_session(NewSession {
        date: today,
        intensity: 5,
        ..Default::default()
    });

    let template = service.exercise_template("Deadlift", ExerciseType::Strength);
    assert_eq!(template.reps, 10);
    assert_eq!(template.set_count, Some(3));

    let exercise_id = service.save_exercise(session, template)?;
    let exercise = service.exercise_mut(session, exercise_id)?;
    assert_eq!(exercise.sets.len(), 3);
    assert_eq!(exercise.unit, "kg");

    // Sled sprint template carries the sprint-specific defaults.
    let sled = service.exercise_template("Sled Sprint", ExerciseType::SledSprint);
    assert_eq!(sled.distance, 20.0);
    assert_eq!(sled.weight, 20.0);
    assert_eq!(sled.sprint, SprintTime::new(8, 0));
    Ok(())
}

#[test]
fn test_imperial_units_label_new_exercises() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_test_service();
    service.config.units = Units::Imperial;
    let session = service.add_session(NewSession {
        date: today,
        intensity: 5,
        ..Default::default()
    });
    let id = service.save_exercise(session, NewExercise::new("Bench", ExerciseType::Strength))?;
    assert_eq!(service.exercise_mut(session, id)?.unit, "lbs");
    Ok(())
}

#[test]
fn test_delete_exercise_drops_its_sets() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_seeded_service(today);
    let (session_id, exercise_id) = {
        let session = service
            .sessions()
            .iter()
            .find(|s| s.title == "Strength Training")
            .unwrap();
        (session.id, session.exercises[0].id)
    };

    service.delete_exercise(session_id, exercise_id)?;
    let session = service.session(session_id).unwrap();
    assert_eq!(session.exercise_count(), 1);

    let result = service.delete_exercise(session_id, exercise_id);
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_add_set_seeds_from_last_set() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_seeded_service(today);
    let (session_id, bench_id) = {
        let session = service
            .sessions()
            .iter()
            .find(|s| s.title == "Strength Training")
            .unwrap();
        let bench = session
            .exercises
            .iter()
            .find(|e| e.name == "Bench Press")
            .unwrap();
        (session.id, bench.id)
    };

    let bench = service.exercise_mut(session_id, bench_id).unwrap();
    let id = bench.add_set();
    let record = bench.strength_set_mut(id).unwrap();
    assert_eq!(record.number(), 4);
    assert_eq!(record.payload.reps, 8);
    assert_eq!(record.payload.weight, 85.0);
}

#[test]
fn test_toggle_warmup_on_running_sets_via_service() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let mut service = create_seeded_service(today);
    let (session_id, sprint_id) = {
        let session = service
            .sessions()
            .iter()
            .find(|s| s.title == "Sprint Training")
            .unwrap();
        let sprint = session
            .exercises
            .iter()
            .find(|e| e.name == "100m Sprint")
            .unwrap();
        (session.id, sprint.id)
    };

    let sprint = service.exercise_mut(session_id, sprint_id).unwrap();
    let first = sprint.sets.id_at(0).unwrap();
    sprint.sets.toggle_warmup(first);

    let rows = sprint.sets.rows();
    assert_eq!(rows[0].0, "W");
    assert!(rows[0].1);
    assert_eq!(rows[1].0, "Set 1");
    assert_eq!(rows[2].0, "Set 2");
    // The seeded 13.20s opener is now the warmup rep.
    assert!(rows[0].2.starts_with("13.20s"));
}

#[test]
fn test_exercise_catalog_search() {
    let service = create_test_service();
    assert_eq!(service.common_exercises("").len(), 11);

    let presses: Vec<&str> = service
        .common_exercises("press")
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(presses, vec!["Bench Press"]);

    let sleds: Vec<&str> = service
        .common_exercises("sled")
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(sleds, vec!["Sled Sprint", "Prowler Push"]);

    assert!(!service.can_add_custom_exercise("bench press"));
    assert!(!service.can_add_custom_exercise("   "));
    assert!(service.can_add_custom_exercise("Zercher Carry"));
}

#[test]
fn test_custom_training_type_inserted_before_other() {
    let mut service = create_test_service();
    assert!(service.add_custom_training_type("Bouldering"));

    let types = service.training_types("");
    assert_eq!(types.last().copied(), Some("Other"));
    assert_eq!(types[types.len() - 2], "Bouldering");

    // Duplicates (case-insensitive) and blanks are refused.
    assert!(!service.add_custom_training_type("bouldering"));
    assert!(!service.add_custom_training_type("  "));

    let yoga: Vec<&str> = service.training_types("yog");
    assert_eq!(yoga, vec!["Yoga"]);
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.units, Units::Metric);
    assert_eq!(config.weight_increment, 1.25);
    assert_eq!(config.default_strength_sets, 3);
    assert_eq!(config.default_reps, 10);
    assert_eq!(config.theme.header_color, "Green");
    assert_eq!(config.theme.warmup_color, "DarkYellow");
}

#[test]
fn test_set_weight_increment_rejects_non_positive() {
    let mut service = create_test_service();
    assert!(service.set_weight_increment(0.0).is_err());
    assert!(service.set_weight_increment(-2.5).is_err());
    assert_eq!(service.config.weight_increment, 1.25);
}

// --- Calendar ---

#[test]
fn test_month_grid_padding_and_flags() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let service = create_seeded_service(today);
    let selected = NaiveDate::from_ymd_opt(2026, 9, 13).unwrap();

    // September 2026 starts on a Tuesday: two padding cells, then 30 days.
    let grid = service.calendar_month(2026, 9, today, Some(selected));
    assert_eq!(grid.len(), 32);
    assert!(grid[0].date.is_none());
    assert!(grid[1].date.is_none());
    assert_eq!(grid[2].date, NaiveDate::from_ymd_opt(2026, 9, 1));
    assert_eq!(grid[0].day_number(), "");
    assert_eq!(grid[2].day_number(), "1");

    let day_15 = grid.iter().find(|d| d.date == Some(today)).unwrap();
    assert!(day_15.is_today);
    assert_eq!(day_15.session_ids.len(), 1); // Yoga Session

    let day_13 = grid.iter().find(|d| d.date == Some(selected)).unwrap();
    assert!(day_13.is_selected);
    assert!(day_13.has_sessions()); // Morning Run

    let day_14 = grid
        .iter()
        .find(|d| d.date == NaiveDate::from_ymd_opt(2026, 9, 14))
        .unwrap();
    assert_eq!(day_14.session_ids.len(), 1); // Strength Training
}

#[test]
fn test_sessions_on_date() {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let service = create_seeded_service(today);

    let sprint_day = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
    let sessions = service.sessions_on(sprint_day);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].display_name(), "Sprint Training");
    assert!(service
        .sessions_on(NaiveDate::from_ymd_opt(2026, 9, 20).unwrap())
        .is_empty());
}

#[test]
fn test_month_navigation_wraps_year() {
    assert_eq!(calendar::prev_month(2026, 1), (2025, 12));
    assert_eq!(calendar::next_month(2026, 12), (2027, 1));
    assert_eq!(calendar::prev_month(2026, 7), (2026, 6));
    assert_eq!(calendar::next_month(2026, 7), (2026, 8));
}

#[test]
fn test_days_in_month_handles_leap_years() {
    assert_eq!(calendar::days_in_month(2026, 2), 28);
    assert_eq!(calendar::days_in_month(2028, 2), 29);
    assert_eq!(calendar::days_in_month(2026, 12), 31);
    assert_eq!(calendar::month_title(2026, 9), "September 2026");
}

// --- Parsing ---

#[test]
fn test_parse_duration() {
    assert_eq!(parse::parse_duration_secs("00:25"), Ok(25 * 60));
    assert_eq!(parse::parse_duration_secs("1:02:05"), Ok(3_725));
    assert!(parse::parse_duration_secs("25").is_err());
    assert!(parse::parse_duration_secs("00:61").is_err());
    assert!(parse::parse_duration_secs("00:10:60").is_err());
    assert!(parse::parse_duration_secs("abc").is_err());
}

#[test]
fn test_parse_sprint_time() {
    assert_eq!(parse::parse_sprint_time("12.50"), Ok(SprintTime::new(12, 50)));
    assert_eq!(parse::parse_sprint_time("08.05s"), Ok(SprintTime::new(8, 5)));
    assert!(parse::parse_sprint_time("60.00").is_err());
    assert!(parse::parse_sprint_time("12").is_err());
    assert!(parse::parse_sprint_time("12.345").is_err());
}

#[test]
fn test_sanitize_decimal_keeps_old_text_on_invalid_edit() {
    assert_eq!(parse::sanitize_decimal("80", "80.", 2), "80.");
    assert_eq!(parse::sanitize_decimal("80.", "80.5", 2), "80.5");
    assert_eq!(parse::sanitize_decimal("80.5", "80.5x", 2), "80.5");
    assert_eq!(parse::sanitize_decimal("80.55", "80.555", 2), "80.55");
    // Commas are normalised to periods on accept.
    assert_eq!(parse::sanitize_decimal("80", "80,5", 2), "80.5");
    assert_eq!(parse::sanitize_decimal("80.5", "", 2), "");
}

#[test]
fn test_sanitize_integer_digits_only() {
    assert_eq!(parse::sanitize_integer("12", "123"), "123");
    assert_eq!(parse::sanitize_integer("12", "12a"), "12");
    assert_eq!(parse::sanitize_integer("12", ""), "");
}

#[test]
fn test_parse_decimal_accepts_comma() {
    assert_eq!(parse::parse_decimal("1,25"), Ok(1.25));
    assert_eq!(parse::parse_decimal(" 80 "), Ok(80.0));
    assert!(parse::parse_decimal("-1").is_err());
    assert!(parse::parse_decimal("eighty").is_err());
}

// --- Export ---

#[test]
fn test_csv_export_row_counts() -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
    let service = create_seeded_service(today);

    let mut buffer = Vec::new();
    service.export_csv(&mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let lines: Vec<&str> = text.lines().collect();

    // Header + 1 run set + 6 strength sets + 1 empty yoga row + 6 sprint sets.
    assert_eq!(lines.len(), 15);
    assert_eq!(
        lines[0],
        "date,session,kind,exercise,exercise_type,set,warmup,metrics"
    );
    assert!(lines.iter().any(|l| l.contains("Bench Press")));
    assert!(lines.iter().any(|l| l.contains("Yoga Session")));
    Ok(())
}
