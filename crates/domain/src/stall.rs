//! Stall and plateau detection.
//!
//! Every exercise keeps a small state machine. Sessions are classified relative to the
//! previous one, and counters of consecutive stalls and regressions drive the trend.
//! The trend only changes when a counter crosses its threshold or the lifter progresses,
//! so a single bad session does not flip an improving exercise.

use chrono::NaiveDate;

use crate::{
    Estimate, ExerciseID, ExerciseSession, RPE, ReadError, Reps, TrackerConfig, UpdateError,
    Weight,
};

pub trait ProgressRepository {
    fn read_progress(&self, exercise_id: ExerciseID)
    -> Result<Option<ExerciseProgress>, ReadError>;
    fn read_all_progress(&self) -> Result<Vec<ExerciseProgress>, ReadError>;
    fn write_progress(&self, progress: ExerciseProgress) -> Result<ExerciseProgress, UpdateError>;
    fn clear_progress(&self) -> Result<(), UpdateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Trend {
    #[strum(to_string = "improving")]
    Improving,
    #[strum(to_string = "stalling")]
    Stalling,
    #[strum(to_string = "declining")]
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SessionOutcome {
    First,
    Progressed,
    Stalled,
    Deloaded,
    Regressed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProgress {
    pub exercise_id: ExerciseID,
    pub working_weight: Weight,
    pub working_reps: Reps,
    pub estimated_max: Option<f32>,
    pub consecutive_stalls: u32,
    pub consecutive_declines: u32,
    pub progression_streak: u32,
    pub sessions_tracked: u32,
    pub last_session: NaiveDate,
    pub last_progression: Option<NaiveDate>,
    pub last_deload: Option<NaiveDate>,
    pub recent_rpe: Option<RPE>,
    pub trend: Trend,
    pub last_outcome: SessionOutcome,
    /// Estimated one-rep maxes of the most recent sessions, oldest first.
    pub history: Vec<(NaiveDate, f32)>,
}

impl ExerciseProgress {
    #[must_use]
    pub fn new(session: &ExerciseSession, estimate: Option<&Estimate>) -> Self {
        Self {
            exercise_id: session.exercise_id,
            working_weight: session.working_weight,
            working_reps: session.working_reps,
            estimated_max: estimate.map(|e| e.value),
            consecutive_stalls: 0,
            consecutive_declines: 0,
            progression_streak: 0,
            sessions_tracked: 1,
            last_session: session.date,
            last_progression: Some(session.date),
            last_deload: None,
            recent_rpe: session.avg_rpe,
            trend: Trend::Improving,
            last_outcome: SessionOutcome::First,
            history: estimate
                .map(|e| vec![(session.date, e.value)])
                .unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn is_stalled(&self, config: &TrackerConfig) -> bool {
        self.trend == Trend::Stalling || self.consecutive_stalls >= config.stall_threshold
    }

    pub fn record_session(
        &mut self,
        session: &ExerciseSession,
        estimate: Option<&Estimate>,
        config: &TrackerConfig,
    ) -> SessionOutcome {
        if session.date < self.last_session {
            return SessionOutcome::Ignored;
        }

        let outcome = self.classify(session, config);

        match outcome {
            SessionOutcome::Progressed => {
                self.consecutive_stalls = 0;
                self.consecutive_declines = 0;
                self.progression_streak += 1;
                self.last_progression = Some(session.date);
            }
            SessionOutcome::Stalled => {
                self.consecutive_stalls += 1;
                self.progression_streak = 0;
            }
            SessionOutcome::Deloaded => {
                self.consecutive_stalls = 0;
                self.consecutive_declines = 0;
                self.progression_streak = 0;
                self.last_deload = Some(session.date);
            }
            SessionOutcome::Regressed => {
                self.consecutive_declines += 1;
                self.progression_streak = 0;
            }
            SessionOutcome::First | SessionOutcome::Ignored => {}
        }

        self.trend = if self.consecutive_declines >= config.decline_threshold {
            Trend::Declining
        } else if self.consecutive_stalls >= config.stall_threshold {
            Trend::Stalling
        } else if outcome == SessionOutcome::Progressed {
            Trend::Improving
        } else {
            self.trend
        };

        self.working_weight = session.working_weight;
        self.working_reps = session.working_reps;
        self.sessions_tracked += 1;
        self.last_session = session.date;
        self.recent_rpe = session.avg_rpe;
        self.last_outcome = outcome;

        if let Some(estimate) = estimate {
            self.estimated_max = Some(
                self.estimated_max
                    .map_or(estimate.value, |max| max.max(estimate.value)),
            );
            self.history.push((session.date, estimate.value));
            if self.history.len() > config.history_length {
                let excess = self.history.len() - config.history_length;
                self.history.drain(..excess);
            }
        }

        outcome
    }

    #[must_use]
    pub fn days_since_progression(&self, today: NaiveDate) -> Option<i64> {
        self.last_progression
            .map(|date| (today - date).num_days().max(0))
    }

    fn classify(&self, session: &ExerciseSession, config: &TrackerConfig) -> SessionOutcome {
        let weight = session.working_weight;
        let previous = self.working_weight;

        if weight.approx_eq(previous) {
            return if session.working_reps > self.working_reps {
                SessionOutcome::Progressed
            } else {
                SessionOutcome::Stalled
            };
        }

        if weight > previous {
            return SessionOutcome::Progressed;
        }

        let drop = 1.0 - f32::from(weight) / f32::from(previous);

        if drop >= config.deload_threshold - 1e-6 && self.is_stalled(config) {
            SessionOutcome::Deloaded
        } else {
            SessionOutcome::Regressed
        }
    }
}
