use serde::{Deserialize, Serialize};

use crate::{ExerciseCategory, Formula, Weight};

pub const MAX_VOLUME_WINDOW_DAYS: u32 = 3650;

/// Thresholds of the estimation and progress tracking pipeline.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub formula: Formula,
    /// Sets with more effective reps are not used for estimation.
    pub max_estimation_reps: f32,
    pub min_confidence: f32,
    /// Required confidence for estimates exceeding the stored value by more than `max_jump`.
    pub high_confidence: f32,
    pub max_jump: f32,
    pub equivalence_tolerance: f32,
    pub stall_threshold: u32,
    pub decline_threshold: u32,
    pub deload_threshold: f32,
    pub deload_percentage: f32,
    pub history_length: usize,
    pub trend_band: f32,
    pub volume_window_days: u32,
    pub increments: Increments,
}

impl TrackerConfig {
    #[must_use]
    pub fn increment(&self, category: ExerciseCategory) -> f32 {
        match category {
            ExerciseCategory::UpperBodyCompound => self.increments.upper_body_compound,
            ExerciseCategory::LowerBodyCompound => self.increments.lower_body_compound,
            ExerciseCategory::Isolation => self.increments.isolation,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_estimation_reps", self.max_estimation_reps, 1.0, 20.0)?;
        check_range("min_confidence", self.min_confidence, 0.0, 1.0)?;
        check_range("high_confidence", self.high_confidence, self.min_confidence, 1.0)?;
        check_range("max_jump", self.max_jump, 0.01, 1.0)?;
        check_range("equivalence_tolerance", self.equivalence_tolerance, 0.0, 0.5)?;
        check_range("deload_threshold", self.deload_threshold, 0.01, 0.5)?;
        check_range("deload_percentage", self.deload_percentage, 0.01, 0.5)?;
        check_range("trend_band", self.trend_band, 0.0, 0.1)?;
        check_increment(
            "increments.upper_body_compound",
            self.increments.upper_body_compound,
        )?;
        check_increment(
            "increments.lower_body_compound",
            self.increments.lower_body_compound,
        )?;
        check_increment("increments.isolation", self.increments.isolation)?;

        if self.stall_threshold == 0 {
            return Err(ConfigError::Zero("stall_threshold"));
        }
        if self.decline_threshold == 0 {
            return Err(ConfigError::Zero("decline_threshold"));
        }
        if self.volume_window_days == 0 {
            return Err(ConfigError::Zero("volume_window_days"));
        }
        if self.volume_window_days > MAX_VOLUME_WINDOW_DAYS {
            return Err(ConfigError::TooLarge {
                name: "volume_window_days",
                value: self.volume_window_days,
                max: MAX_VOLUME_WINDOW_DAYS,
            });
        }
        if self.history_length < 3 {
            return Err(ConfigError::HistoryTooShort(self.history_length));
        }

        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            formula: Formula::Brzycki,
            max_estimation_reps: 12.0,
            min_confidence: 0.5,
            high_confidence: 0.9,
            max_jump: 0.2,
            equivalence_tolerance: 0.025,
            stall_threshold: 3,
            decline_threshold: 2,
            deload_threshold: 0.1,
            deload_percentage: 0.1,
            history_length: 12,
            trend_band: 0.005,
            volume_window_days: 30,
            increments: Increments::default(),
        }
    }
}

/// Load added per progression step in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Increments {
    pub upper_body_compound: f32,
    pub lower_body_compound: f32,
    pub isolation: f32,
}

impl Default for Increments {
    fn default() -> Self {
        Self {
            upper_body_compound: 2.5,
            lower_body_compound: 5.0,
            isolation: 1.25,
        }
    }
}

/// Increments must lie on the weight grid.
fn check_increment(name: &'static str, value: f32) -> Result<(), ConfigError> {
    check_range(name, value, 0.05, 50.0)?;
    Weight::new(value)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidIncrement { name, value })
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be in the range {min} to {max} ({value})")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{0} must not be zero")]
    Zero(&'static str),
    #[error("{name} must be at most {max} ({value})")]
    TooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },
    #[error("{name} must be a multiple of 0.05 kg ({value})")]
    InvalidIncrement { name: &'static str, value: f32 },
    #[error("history_length must be at least 3 ({0} < 3)")]
    HistoryTooShort(usize),
}
