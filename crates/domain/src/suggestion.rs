use crate::{
    ExerciseCategory, ExerciseID, ExerciseProgress, RPE, SessionOutcome, TrackerConfig, Trend,
    Weight,
};

/// Target for the next session of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub exercise_id: ExerciseID,
    pub action: Action,
    pub weight: Weight,
    pub reason: Reason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Action {
    #[strum(to_string = "increase")]
    Increase,
    #[strum(to_string = "repeat")]
    Repeat,
    #[strum(to_string = "deload")]
    Deload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Reason {
    #[strum(to_string = "no progress for several sessions")]
    Plateau,
    #[strum(to_string = "performance is declining")]
    Declining,
    #[strum(to_string = "last session felt easy")]
    LowEffort,
    #[strum(to_string = "progressing as planned")]
    OnTrack,
    #[strum(to_string = "last session was close to failure")]
    NearFailure,
    #[strum(to_string = "no effort reported")]
    NoEffortData,
}

#[must_use]
pub fn suggest(
    progress: &ExerciseProgress,
    category: ExerciseCategory,
    config: &TrackerConfig,
) -> Suggestion {
    let increment = config.increment(category);
    let current = progress.working_weight;

    let (action, weight, reason) = if progress.trend == Trend::Declining {
        (Action::Deload, deload_weight(current, increment, config), Reason::Declining)
    } else if progress.consecutive_stalls >= config.stall_threshold {
        (Action::Deload, deload_weight(current, increment, config), Reason::Plateau)
    } else {
        match progress.recent_rpe {
            Some(rpe) if rpe <= RPE::SEVEN => (
                Action::Increase,
                current.plus(2.0 * increment),
                Reason::LowEffort,
            ),
            Some(rpe) if f32::from(rpe) <= 8.5 => {
                (Action::Increase, current.plus(increment), Reason::OnTrack)
            }
            Some(_) => (Action::Repeat, current, Reason::NearFailure),
            None => match progress.last_outcome {
                SessionOutcome::First | SessionOutcome::Progressed => {
                    (Action::Increase, current.plus(increment), Reason::OnTrack)
                }
                _ => (Action::Repeat, current, Reason::NoEffortData),
            },
        }
    };

    Suggestion {
        exercise_id: progress.exercise_id,
        action,
        weight,
        reason,
    }
}

fn deload_weight(current: Weight, increment: f32, config: &TrackerConfig) -> Weight {
    current
        .plus(-current.scaled(config.deload_percentage))
        .round_down_to(increment)
}
