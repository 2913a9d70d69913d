use chrono::{Days, NaiveDate};

use crate::{TrackerConfig, Trend, Workout};

#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    /// Change of the estimated one-rep max in kilograms per week.
    pub slope_per_week: f32,
    /// Weekly change relative to the mean estimate.
    pub weekly_change: f32,
    pub direction: Trend,
    pub points: usize,
}

/// Fit a least-squares line through a series of (date, estimated one-rep max) points.
///
/// At least three points spanning more than a single day are required.
#[must_use]
pub fn analyze(history: &[(NaiveDate, f32)], config: &TrackerConfig) -> Option<TrendAnalysis> {
    if history.len() < 3 {
        return None;
    }

    let first = history.iter().map(|(date, _)| *date).min()?;

    #[allow(clippy::cast_precision_loss)]
    let points = history
        .iter()
        .map(|(date, value)| ((*date - first).num_days() as f64, f64::from(*value)))
        .collect::<Vec<_>>();

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sum_x = points.iter().map(|(x, _)| x).sum::<f64>();
    let sum_y = points.iter().map(|(_, y)| y).sum::<f64>();
    let sum_xy = points.iter().map(|(x, y)| x * y).sum::<f64>();
    let sum_x2 = points.iter().map(|(x, _)| x * x).sum::<f64>();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let mean = sum_y / n;
    if mean <= 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let slope_per_week = (slope * 7.0) as f32;
    #[allow(clippy::cast_possible_truncation)]
    let weekly_change = (slope * 7.0 / mean) as f32;

    let direction = if weekly_change > config.trend_band {
        Trend::Improving
    } else if weekly_change < -config.trend_band {
        Trend::Declining
    } else {
        Trend::Stalling
    };

    Some(TrendAnalysis {
        slope_per_week,
        weekly_change,
        direction,
        points: history.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum VolumeTrend {
    #[strum(to_string = "increasing")]
    Increasing,
    #[strum(to_string = "stable")]
    Stable,
    #[strum(to_string = "decreasing")]
    Decreasing,
}

/// Compare the training volume of the last `window_days` with the window before.
///
/// Returns `None` if there was no volume in the earlier window or the windows reach before the
/// earliest representable date.
#[must_use]
pub fn volume_trend(workouts: &[Workout], today: NaiveDate, window_days: u32) -> Option<VolumeTrend> {
    let window = Days::new(u64::from(window_days));
    let current_start = today.checked_sub_days(window)?;
    let previous_start = current_start.checked_sub_days(window)?;

    let volume_between = |start: NaiveDate, end: NaiveDate| {
        workouts
            .iter()
            .filter(|w| w.date > start && w.date <= end)
            .map(Workout::volume)
            .sum::<f32>()
    };

    let current = volume_between(current_start, today);
    let previous = volume_between(previous_start, current_start);

    if previous <= 0.0 {
        return None;
    }

    let ratio = current / previous;

    Some(if ratio > 1.1 {
        VolumeTrend::Increasing
    } else if ratio < 0.9 {
        VolumeTrend::Decreasing
    } else {
        VolumeTrend::Stable
    })
}
