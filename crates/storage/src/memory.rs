//! Storage backed by process memory.
//!
//! Settings are kept as serialized JSON, like in a key-value store.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use ironlog_app::{log, settings};
use ironlog_domain::{
    Achievement, AchievementRepository, Exercise, ExerciseID, ExerciseProgress,
    ExerciseRepository, PersonalBests, PersonalRecordRepository, ProgressRepository, ReadError,
    StorageError, UpdateError, Workout, WorkoutID, WorkoutRepository,
};

/// A write that is rejected until the storage is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fault {
    ProgressWrite(ExerciseID),
    PersonalBestsWrite(ExerciseID),
}

pub struct InMemory {
    available: AtomicBool,
    faults: Mutex<BTreeSet<Fault>>,
    exercises: Mutex<BTreeMap<ExerciseID, Exercise>>,
    workouts: Mutex<BTreeMap<WorkoutID, Workout>>,
    progress: Mutex<BTreeMap<ExerciseID, ExerciseProgress>>,
    personal_bests: Mutex<BTreeMap<ExerciseID, PersonalBests>>,
    achievements: Mutex<BTreeSet<Achievement>>,
    settings: Mutex<Option<String>>,
}

impl Default for InMemory {
    fn default() -> Self {
        Self {
            available: AtomicBool::new(true),
            faults: Mutex::default(),
            exercises: Mutex::default(),
            workouts: Mutex::default(),
            progress: Mutex::default(),
            personal_bests: Mutex::default(),
            achievements: Mutex::default(),
            settings: Mutex::default(),
        }
    }
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable storage backend.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Relaxed);
    }

    /// Reject the given write.
    pub fn inject(&self, fault: Fault) -> Result<(), StorageError> {
        self.lock(&self.faults)?.insert(fault);
        Ok(())
    }

    fn check(&self, fault: Fault) -> Result<(), StorageError> {
        if self.lock(&self.faults)?.contains(&fault) {
            return Err(StorageError::Other(format!("{fault:?} rejected").into()));
        }
        Ok(())
    }

    pub fn add_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        let mut exercises = self.lock(&self.exercises)?;
        if exercises.contains_key(&exercise.id) {
            return Err(UpdateError::Conflict);
        }
        exercises.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    pub fn add_workout(&self, workout: Workout) -> Result<Workout, UpdateError> {
        let mut workouts = self.lock(&self.workouts)?;
        if workouts.contains_key(&workout.id) {
            return Err(UpdateError::Conflict);
        }
        workouts.insert(workout.id, workout.clone());
        Ok(workout)
    }

    pub fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, UpdateError> {
        self.lock(&self.workouts)?
            .remove(&id)
            .map(|_| id)
            .ok_or(UpdateError::Conflict)
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>, StorageError> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(StorageError::Unavailable);
        }
        mutex.lock().map_err(|_| {
            ::log::error!("storage lock poisoned");
            StorageError::Poisoned
        })
    }
}

impl ExerciseRepository for InMemory {
    fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        Ok(self.lock(&self.exercises)?.values().cloned().collect())
    }
}

impl WorkoutRepository for InMemory {
    fn read_workouts(&self) -> Result<Vec<Workout>, ReadError> {
        Ok(self.lock(&self.workouts)?.values().cloned().collect())
    }
}

impl ProgressRepository for InMemory {
    fn read_progress(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Option<ExerciseProgress>, ReadError> {
        Ok(self.lock(&self.progress)?.get(&exercise_id).cloned())
    }

    fn read_all_progress(&self) -> Result<Vec<ExerciseProgress>, ReadError> {
        Ok(self.lock(&self.progress)?.values().cloned().collect())
    }

    fn write_progress(&self, progress: ExerciseProgress) -> Result<ExerciseProgress, UpdateError> {
        self.check(Fault::ProgressWrite(progress.exercise_id))?;
        self.lock(&self.progress)?
            .insert(progress.exercise_id, progress.clone());
        Ok(progress)
    }

    fn clear_progress(&self) -> Result<(), UpdateError> {
        self.lock(&self.progress)?.clear();
        Ok(())
    }
}

impl PersonalRecordRepository for InMemory {
    fn read_personal_bests(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Option<PersonalBests>, ReadError> {
        Ok(self.lock(&self.personal_bests)?.get(&exercise_id).cloned())
    }

    fn read_all_personal_bests(&self) -> Result<Vec<PersonalBests>, ReadError> {
        Ok(self.lock(&self.personal_bests)?.values().cloned().collect())
    }

    fn write_personal_bests(&self, bests: PersonalBests) -> Result<PersonalBests, UpdateError> {
        self.check(Fault::PersonalBestsWrite(bests.exercise_id))?;
        self.lock(&self.personal_bests)?
            .insert(bests.exercise_id, bests.clone());
        Ok(bests)
    }

    fn clear_personal_bests(&self) -> Result<(), UpdateError> {
        self.lock(&self.personal_bests)?.clear();
        Ok(())
    }
}

impl AchievementRepository for InMemory {
    fn read_achievements(&self) -> Result<BTreeSet<Achievement>, ReadError> {
        Ok(self.lock(&self.achievements)?.clone())
    }

    fn unlock_achievements(
        &self,
        achievements: &[Achievement],
    ) -> Result<BTreeSet<Achievement>, UpdateError> {
        let mut unlocked = self.lock(&self.achievements)?;
        unlocked.extend(achievements);
        Ok(unlocked.clone())
    }
}

impl settings::SettingsRepository for InMemory {
    fn read_settings(&self) -> Result<Option<settings::Settings>, settings::Error> {
        let json = self
            .lock(&self.settings)
            .map_err(|err| settings::Error::Unknown(err.to_string()))?
            .clone();
        json.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|err| settings::Error::Unknown(err.to_string()))
    }

    fn write_settings(&self, settings: settings::Settings) -> Result<(), settings::Error> {
        let json = serde_json::to_string(&settings)
            .map_err(|err| settings::Error::Unknown(err.to_string()))?;
        *self
            .lock(&self.settings)
            .map_err(|err| settings::Error::Unknown(err.to_string()))? = Some(json);
        Ok(())
    }
}

/// Most recent log entries, newest first.
#[derive(Default)]
pub struct Log {
    entries: Mutex<VecDeque<log::Entry>>,
}

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| log::Error::Unknown(err.to_string()))?;
        entries.push_front(entry);
        entries.truncate(log::CAPACITY);
        Ok(())
    }
}
