use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, error, info, warn};

use crate::{
    Achievement, AchievementRepository, Estimate, ExerciseCategory, ExerciseID,
    ExerciseProgress, ExerciseRepository, ExerciseSession, PersonalBests, PersonalRecord,
    PersonalRecordRepository, ProgressRepository, ReadError, SessionOutcome, Suggestion,
    TrackerConfig, TrackerError, TrainingSummary, Trend, TrendAnalysis, UpdateDecision,
    UpdateError, VolumeTrend, Workout, WorkoutID, WorkoutRepository, newly_unlocked, one_rm,
    suggestion, trend,
};

macro_rules! log_on_error {
    ($result: expr, $action: literal, $entity: expr) => {{
        let result = $result;
        if let Err(ref err) = result {
            if err.is_unavailable() {
                debug!("failed to {} {}: {err}", $action, $entity);
            } else {
                error!("failed to {} {}: {err}", $action, $entity);
            }
        }
        result
    }};
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutReport {
    pub workout_id: WorkoutID,
    pub exercises: Vec<ExerciseReport>,
    pub achievements: Vec<Achievement>,
    /// Exercises whose progress could not be updated.
    pub failed: Vec<ExerciseID>,
}

impl WorkoutReport {
    #[must_use]
    pub fn records(&self) -> Vec<&PersonalRecord> {
        self.exercises.iter().flat_map(|e| &e.records).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseReport {
    pub exercise_id: ExerciseID,
    pub session: ExerciseSession,
    pub estimate: Option<Estimate>,
    pub decision: Option<UpdateDecision>,
    pub records: Vec<PersonalRecord>,
    pub outcome: SessionOutcome,
    pub trend: Trend,
    pub suggestion: Suggestion,
}

/// Keeps the per-exercise progress state up to date as workouts are completed.
pub struct ProgressTracker<R> {
    repository: R,
    config: TrackerConfig,
}

impl<R> ProgressTracker<R>
where
    R: ExerciseRepository
        + WorkoutRepository
        + ProgressRepository
        + PersonalRecordRepository
        + AchievementRepository,
{
    pub fn new(repository: R, config: TrackerConfig) -> Self {
        Self { repository, config }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Update estimates, records and progress of every exercise in a completed workout.
    ///
    /// The workout is expected to be stored already, as achievements are evaluated over
    /// all stored workouts. A failing exercise is logged and reported in
    /// [`WorkoutReport::failed`] without affecting the other exercises.
    pub fn process_workout(
        &self,
        workout: &Workout,
        today: NaiveDate,
    ) -> Result<WorkoutReport, TrackerError> {
        let categories = self.categories()?;
        let mut report = self.process_exercises(workout, &categories);

        report.achievements =
            log_on_error!(self.unlock_achievements(today), "unlock", "achievements")
                .unwrap_or_default();

        Ok(report)
    }

    /// Rebuild progress and personal bests by replaying all stored workouts in date order.
    ///
    /// Returns the number of replayed workouts.
    pub fn recalculate(&self, today: NaiveDate) -> Result<usize, TrackerError> {
        let categories = self.categories()?;
        let mut workouts = read("workouts", self.repository.read_workouts())?;
        workouts.sort_by_key(|w| (w.date, w.id));

        update("progress", self.repository.clear_progress())?;
        update("personal bests", self.repository.clear_personal_bests())?;

        for workout in &workouts {
            let report = self.process_exercises(workout, &categories);
            if !report.failed.is_empty() {
                warn!(
                    "{} exercises of workout {} could not be replayed",
                    report.failed.len(),
                    workout.id
                );
            }
        }

        self.unlock_achievements(today)?;

        info!("recalculated progress from {} workouts", workouts.len());

        Ok(workouts.len())
    }

    pub fn trend_of(&self, exercise_id: ExerciseID) -> Result<Option<TrendAnalysis>, TrackerError> {
        let progress = self.progress_of(exercise_id)?;
        Ok(trend::analyze(&progress.history, &self.config))
    }

    pub fn suggest(&self, exercise_id: ExerciseID) -> Result<Suggestion, TrackerError> {
        let progress = self.progress_of(exercise_id)?;
        let categories = self.categories()?;
        Ok(suggestion::suggest(
            &progress,
            category_of(&categories, exercise_id),
            &self.config,
        ))
    }

    pub fn volume_trend(&self, today: NaiveDate) -> Result<Option<VolumeTrend>, TrackerError> {
        let workouts = read("workouts", self.repository.read_workouts())?;
        Ok(trend::volume_trend(
            &workouts,
            today,
            self.config.volume_window_days,
        ))
    }

    fn process_exercises(
        &self,
        workout: &Workout,
        categories: &BTreeMap<ExerciseID, ExerciseCategory>,
    ) -> WorkoutReport {
        let mut report = WorkoutReport {
            workout_id: workout.id,
            exercises: vec![],
            achievements: vec![],
            failed: vec![],
        };

        for exercise_id in workout.exercises() {
            let category = category_of(categories, exercise_id);
            match log_on_error!(
                self.process_exercise(workout, exercise_id, category),
                "track",
                format!("exercise {exercise_id}")
            ) {
                Ok(Some(exercise_report)) => report.exercises.push(exercise_report),
                Ok(None) => debug!("no performed sets of exercise {exercise_id}"),
                Err(_) => report.failed.push(exercise_id),
            }
        }

        report
    }

    fn process_exercise(
        &self,
        workout: &Workout,
        exercise_id: ExerciseID,
        category: ExerciseCategory,
    ) -> Result<Option<ExerciseReport>, TrackerError> {
        let Some(session) = workout.summarize(exercise_id) else {
            return Ok(None);
        };

        let estimate = one_rm::best_estimate(&workout.sets_of(exercise_id), &self.config);

        let (progress, outcome) =
            match read("progress", self.repository.read_progress(exercise_id))? {
                None => (
                    ExerciseProgress::new(&session, estimate.as_ref()),
                    SessionOutcome::First,
                ),
                Some(mut progress) => {
                    let previous_trend = progress.trend;
                    let outcome =
                        progress.record_session(&session, estimate.as_ref(), &self.config);
                    if progress.trend != previous_trend {
                        info!(
                            "exercise {exercise_id} changed from {previous_trend} to {}",
                            progress.trend
                        );
                    }
                    (progress, outcome)
                }
            };

        // Sessions older than the tracked state only count after a recalculation.
        if outcome == SessionOutcome::Ignored {
            debug!(
                "session of exercise {exercise_id} on {} predates the tracked progress",
                session.date
            );
            return Ok(Some(ExerciseReport {
                exercise_id,
                estimate,
                decision: None,
                records: vec![],
                outcome,
                trend: progress.trend,
                suggestion: suggestion::suggest(&progress, category, &self.config),
                session,
            }));
        }

        let (bests, decision, records) = match read(
            "personal bests",
            self.repository.read_personal_bests(exercise_id),
        )? {
            None => (
                PersonalBests::establish(&session, estimate.as_ref()),
                estimate.as_ref().map(|_| UpdateDecision::Initial),
                vec![],
            ),
            Some(mut bests) => {
                let decision = estimate.as_ref().map(|e| {
                    one_rm::decide_update(bests.one_rep_max.as_ref(), e, &self.config)
                });
                let records = bests.apply(&session, estimate.as_ref().zip(decision));
                (bests, decision, records)
            }
        };

        if let (Some(estimate), Some(decision)) = (&estimate, decision) {
            debug!(
                "estimated one-rep max of exercise {exercise_id}: {:.1} kg (confidence {:.2}, {decision})",
                estimate.value, estimate.confidence
            );
        }

        // Bests must not count records of a session missing from the progress.
        let progress = update("progress", self.repository.write_progress(progress))?;
        update(
            "personal bests",
            self.repository.write_personal_bests(bests),
        )?;

        for record in &records {
            info!(
                "new {} for exercise {exercise_id}: {:.1} (previously {:.1})",
                record.kind, record.value, record.previous
            );
        }

        Ok(Some(ExerciseReport {
            exercise_id,
            estimate,
            decision,
            records,
            outcome,
            trend: progress.trend,
            suggestion: suggestion::suggest(&progress, category, &self.config),
            session,
        }))
    }

    fn unlock_achievements(&self, today: NaiveDate) -> Result<Vec<Achievement>, TrackerError> {
        let workouts = read("workouts", self.repository.read_workouts())?;
        let bests = read(
            "personal bests",
            self.repository.read_all_personal_bests(),
        )?;
        let unlocked = read("achievements", self.repository.read_achievements())?;

        let summary = TrainingSummary::new(&workouts, &bests, today);
        let achievements = newly_unlocked(&summary, &unlocked);

        if !achievements.is_empty() {
            update(
                "achievements",
                self.repository.unlock_achievements(&achievements),
            )?;
            for achievement in &achievements {
                info!("achievement unlocked: {achievement}");
            }
        }

        Ok(achievements)
    }

    fn progress_of(&self, exercise_id: ExerciseID) -> Result<ExerciseProgress, TrackerError> {
        read("progress", self.repository.read_progress(exercise_id))?
            .ok_or(TrackerError::NoProgress(exercise_id))
    }

    fn categories(&self) -> Result<BTreeMap<ExerciseID, ExerciseCategory>, TrackerError> {
        Ok(read("exercises", self.repository.read_exercises())?
            .into_iter()
            .map(|e| (e.id, e.category))
            .collect())
    }
}

fn category_of(
    categories: &BTreeMap<ExerciseID, ExerciseCategory>,
    exercise_id: ExerciseID,
) -> ExerciseCategory {
    if let Some(category) = categories.get(&exercise_id) {
        *category
    } else {
        warn!("unknown exercise {exercise_id}, assuming {}", ExerciseCategory::Isolation);
        ExerciseCategory::Isolation
    }
}

fn read<T>(entity: &'static str, result: Result<T, ReadError>) -> Result<T, TrackerError> {
    result.map_err(|source| TrackerError::Read { entity, source })
}

fn update<T>(entity: &'static str, result: Result<T, UpdateError>) -> Result<T, TrackerError> {
    result.map_err(|source| TrackerError::Update { entity, source })
}
