use std::collections::BTreeSet;

use chrono::NaiveDate;
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{ExerciseID, RPE, ReadError, Reps, Weight};

pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub date: NaiveDate,
    pub sets: Vec<WorkoutSet>,
}

impl Workout {
    #[must_use]
    pub fn exercises(&self) -> BTreeSet<ExerciseID> {
        self.sets
            .iter()
            .map(|s| s.exercise_id)
            .collect::<BTreeSet<_>>()
    }

    #[must_use]
    pub fn sets_of(&self, exercise_id: ExerciseID) -> Vec<&WorkoutSet> {
        self.sets
            .iter()
            .filter(|s| s.exercise_id == exercise_id)
            .collect()
    }

    /// Sum of reps × weight over all completed sets.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    #[must_use]
    pub fn avg_rpe(&self) -> Option<RPE> {
        let rpes = self
            .sets
            .iter()
            .filter(|s| s.counts())
            .filter_map(|s| s.rpe)
            .collect::<Vec<_>>();
        RPE::avg(&rpes)
    }

    /// Condense the sets of one exercise into the figures progress tracking works with.
    ///
    /// The working weight is the heaviest completed set with at least one rep. The
    /// average RPE only considers sets performed at that weight. Exercises without any
    /// such set produce no session.
    #[must_use]
    pub fn summarize(&self, exercise_id: ExerciseID) -> Option<ExerciseSession> {
        let sets = self
            .sets_of(exercise_id)
            .into_iter()
            .filter(|s| s.counts())
            .collect::<Vec<_>>();

        let working_weight = sets
            .iter()
            .map(|s| s.weight)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

        let working_sets = sets
            .iter()
            .filter(|s| s.weight.approx_eq(working_weight))
            .collect::<Vec<_>>();

        let working_reps = working_sets
            .iter()
            .map(|s| s.reps)
            .max()
            .unwrap_or_default();

        let working_rpes = working_sets
            .iter()
            .filter_map(|s| s.rpe)
            .collect::<Vec<_>>();

        #[allow(clippy::cast_possible_truncation)]
        Some(ExerciseSession {
            exercise_id,
            date: self.date,
            working_weight,
            working_reps,
            volume: sets.iter().map(|s| s.volume()).sum(),
            total_reps: sets.iter().map(|s| u32::from(s.reps)).sum(),
            sets: sets.len() as u32,
            avg_rpe: RPE::avg(&working_rpes),
        })
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub exercise_id: ExerciseID,
    pub reps: Reps,
    pub weight: Weight,
    pub rpe: Option<RPE>,
    pub completed: bool,
}

impl WorkoutSet {
    /// Whether the set was actually performed.
    #[must_use]
    pub fn counts(&self) -> bool {
        self.completed && !self.reps.is_zero()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        if self.counts() {
            #[allow(clippy::cast_precision_loss)]
            let reps = u32::from(self.reps) as f32;
            reps * f32::from(self.weight)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSession {
    pub exercise_id: ExerciseID,
    pub date: NaiveDate,
    pub working_weight: Weight,
    pub working_reps: Reps,
    pub volume: f32,
    pub total_reps: u32,
    pub sets: u32,
    pub avg_rpe: Option<RPE>,
}
