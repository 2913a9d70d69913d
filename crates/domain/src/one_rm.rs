//! One-rep-max estimation.
//!
//! A set is converted into an estimate by treating the reps in reserve as reps that
//! could still have been performed. Every estimate carries a confidence between 0 and
//! 1 which decreases with the distance to an actual single at maximal effort.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{RIR, RPE, Reps, TrackerConfig, Weight, WorkoutSet};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Formula {
    #[default]
    Brzycki,
    Epley,
    Lombardi,
}

impl Formula {
    #[must_use]
    pub fn estimate(self, weight: f32, reps: f32) -> f32 {
        if reps <= 1.0 {
            return weight;
        }
        match self {
            Formula::Brzycki => weight * 36.0 / (37.0 - reps).max(1.0),
            Formula::Epley => weight * (1.0 + reps / 30.0),
            Formula::Lombardi => weight * reps.powf(0.10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub value: f32,
    pub confidence: f32,
    pub formula: Formula,
    pub weight: Weight,
    pub reps: Reps,
    pub rpe: Option<RPE>,
}

impl Estimate {
    #[must_use]
    pub fn to_one_rep_max(&self, date: NaiveDate) -> OneRepMax {
        OneRepMax {
            value: self.value,
            confidence: self.confidence,
            date,
            formula: self.formula,
        }
    }
}

/// Stored one-rep max of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct OneRepMax {
    pub value: f32,
    pub confidence: f32,
    pub date: NaiveDate,
    pub formula: Formula,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum UpdateDecision {
    Initial,
    Improved,
    MoreReliable,
    Keep,
}

impl UpdateDecision {
    #[must_use]
    pub fn overwrites(self) -> bool {
        !matches!(self, UpdateDecision::Keep)
    }
}

/// Reps to failure implied by the performed reps and the reported effort.
#[must_use]
pub fn effective_reps(reps: Reps, rpe: Option<RPE>) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let reps = u32::from(reps) as f32;
    reps + rpe.map_or(0.0, |rpe| f32::from(RIR::from(rpe)))
}

#[must_use]
pub fn confidence(effective_reps: f32, rpe: Option<RPE>) -> f32 {
    let rep_factor = if effective_reps <= 1.0 {
        1.0
    } else if effective_reps <= 3.0 {
        0.95
    } else if effective_reps <= 5.0 {
        0.9
    } else if effective_reps <= 8.0 {
        0.8
    } else if effective_reps <= 10.0 {
        0.7
    } else {
        0.6
    };

    let rpe_factor = match rpe {
        None => 0.85,
        Some(rpe) if rpe >= RPE::NINE => 1.0,
        Some(rpe) if rpe >= RPE::EIGHT => 0.95,
        Some(rpe) if rpe >= RPE::SEVEN => 0.85,
        Some(_) => 0.7,
    };

    rep_factor * rpe_factor
}

#[must_use]
pub fn estimate(set: &WorkoutSet, config: &TrackerConfig) -> Option<Estimate> {
    if !set.counts() || set.weight.is_zero() {
        return None;
    }

    let effective_reps = effective_reps(set.reps, set.rpe);

    if effective_reps > config.max_estimation_reps {
        return None;
    }

    Some(Estimate {
        value: config
            .formula
            .estimate(f32::from(set.weight), effective_reps),
        confidence: confidence(effective_reps, set.rpe),
        formula: config.formula,
        weight: set.weight,
        reps: set.reps,
        rpe: set.rpe,
    })
}

/// Select the highest sufficiently confident estimate, preferring the more confident one on ties.
#[must_use]
pub fn best_estimate(sets: &[&WorkoutSet], config: &TrackerConfig) -> Option<Estimate> {
    sets.iter()
        .filter_map(|set| estimate(set, config))
        .filter(|e| e.confidence >= config.min_confidence)
        .max_by(|a, b| {
            a.value
                .partial_cmp(&b.value)
                .unwrap_or(Ordering::Equal)
                .then(
                    a.confidence
                        .partial_cmp(&b.confidence)
                        .unwrap_or(Ordering::Equal),
                )
        })
}

#[must_use]
pub fn decide_update(
    current: Option<&OneRepMax>,
    candidate: &Estimate,
    config: &TrackerConfig,
) -> UpdateDecision {
    let Some(current) = current else {
        return UpdateDecision::Initial;
    };

    if candidate.confidence < config.min_confidence {
        return UpdateDecision::Keep;
    }

    if current.value <= 0.0 {
        return UpdateDecision::Improved;
    }

    let change = (candidate.value - current.value) / current.value;

    if change > 0.0 {
        if change > config.max_jump && candidate.confidence < config.high_confidence {
            return UpdateDecision::Keep;
        }
        return UpdateDecision::Improved;
    }

    if change.abs() <= config.equivalence_tolerance
        && candidate.confidence - current.confidence >= 0.1 - 1e-6
    {
        return UpdateDecision::MoreReliable;
    }

    UpdateDecision::Keep
}
