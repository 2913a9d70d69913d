use chrono::{Days, NaiveDate};
use ironlog_domain as domain;

pub static EXERCISES: std::sync::LazyLock<Vec<domain::Exercise>> =
    std::sync::LazyLock::new(|| vec![BENCH_PRESS.clone(), SQUAT.clone(), CURL.clone()]);

pub static BENCH_PRESS: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 1.into(),
        name: domain::Name::new("Bench Press").unwrap(),
        category: domain::ExerciseCategory::UpperBodyCompound,
    });

pub static SQUAT: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 2.into(),
        name: domain::Name::new("Squat").unwrap(),
        category: domain::ExerciseCategory::LowerBodyCompound,
    });

pub static CURL: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 3.into(),
        name: domain::Name::new("Biceps Curl").unwrap(),
        category: domain::ExerciseCategory::Isolation,
    });

/// Not part of the exercise catalog.
pub const UNKNOWN_EXERCISE_ID: u128 = 9;

/// Monday, 2 March 2026.
pub const START: NaiveDate = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

pub fn day(n: u64) -> NaiveDate {
    START + Days::new(n)
}

pub fn set(
    exercise: &domain::Exercise,
    reps: u32,
    weight: f32,
    rpe: Option<domain::RPE>,
) -> domain::WorkoutSet {
    domain::WorkoutSet {
        exercise_id: exercise.id,
        reps: domain::Reps::new(reps).unwrap(),
        weight: domain::Weight::new(weight).unwrap(),
        rpe,
        completed: true,
    }
}

/// Three identical sets.
pub fn sets(
    exercise: &domain::Exercise,
    reps: u32,
    weight: f32,
    rpe: Option<domain::RPE>,
) -> Vec<domain::WorkoutSet> {
    vec![set(exercise, reps, weight, rpe); 3]
}

pub fn workout(id: u128, day_offset: u64, sets: Vec<domain::WorkoutSet>) -> domain::Workout {
    domain::Workout {
        id: id.into(),
        date: day(day_offset),
        sets,
    }
}
