use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};

use crate::{PersonalBests, ReadError, UpdateError, Workout};

pub trait AchievementRepository {
    fn read_achievements(&self) -> Result<BTreeSet<Achievement>, ReadError>;
    fn unlock_achievements(
        &self,
        achievements: &[Achievement],
    ) -> Result<BTreeSet<Achievement>, UpdateError>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
pub enum Achievement {
    #[strum(to_string = "First workout")]
    FirstWorkout,
    #[strum(to_string = "10 workouts")]
    TenWorkouts,
    #[strum(to_string = "50 workouts")]
    FiftyWorkouts,
    #[strum(to_string = "100 workouts")]
    HundredWorkouts,
    #[strum(to_string = "First personal record")]
    FirstPersonalRecord,
    #[strum(to_string = "10 personal records")]
    TenPersonalRecords,
    #[strum(to_string = "4 week streak")]
    FourWeekStreak,
    #[strum(to_string = "12 week streak")]
    TwelveWeekStreak,
    #[strum(to_string = "10 tonnes lifted")]
    TenTonnes,
    #[strum(to_string = "100 tonnes lifted")]
    HundredTonnes,
    #[strum(to_string = "1000 tonnes lifted")]
    ThousandTonnes,
    #[strum(to_string = "100 kg club")]
    HundredKiloClub,
}

impl Achievement {
    #[must_use]
    pub fn is_met(self, summary: &TrainingSummary) -> bool {
        match self {
            Achievement::FirstWorkout => summary.workouts >= 1,
            Achievement::TenWorkouts => summary.workouts >= 10,
            Achievement::FiftyWorkouts => summary.workouts >= 50,
            Achievement::HundredWorkouts => summary.workouts >= 100,
            Achievement::FirstPersonalRecord => summary.personal_records >= 1,
            Achievement::TenPersonalRecords => summary.personal_records >= 10,
            Achievement::FourWeekStreak => summary.best_weekly_streak >= 4,
            Achievement::TwelveWeekStreak => summary.best_weekly_streak >= 12,
            Achievement::TenTonnes => summary.total_volume >= 10_000.0,
            Achievement::HundredTonnes => summary.total_volume >= 100_000.0,
            Achievement::ThousandTonnes => summary.total_volume >= 1_000_000.0,
            Achievement::HundredKiloClub => summary.best_one_rep_max >= 100.0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainingSummary {
    pub workouts: u32,
    pub personal_records: u32,
    /// Total lifted volume in kilograms.
    pub total_volume: f32,
    pub best_weekly_streak: u32,
    pub best_one_rep_max: f32,
}

impl TrainingSummary {
    /// Summarize all workouts which contain at least one performed set.
    #[must_use]
    pub fn new(workouts: &[Workout], bests: &[PersonalBests], today: NaiveDate) -> Self {
        let performed = workouts
            .iter()
            .filter(|w| w.sets.iter().any(crate::WorkoutSet::counts))
            .collect::<Vec<_>>();

        #[allow(clippy::cast_possible_truncation)]
        Self {
            workouts: performed.len() as u32,
            personal_records: bests.iter().map(|b| b.records).sum(),
            total_volume: performed.iter().map(|w| w.volume()).sum(),
            best_weekly_streak: weekly_streak(
                &performed.iter().map(|w| w.date).collect::<Vec<_>>(),
                today,
            )
            .best,
            best_one_rep_max: bests
                .iter()
                .filter_map(|b| b.one_rep_max.as_ref().map(|orm| orm.value))
                .fold(0.0, f32::max),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// Count consecutive calendar weeks (starting on Monday) containing at least one workout.
///
/// The current streak is still alive if the most recent training week is this or the
/// previous week. Dates after `today` are ignored.
#[must_use]
pub fn weekly_streak(dates: &[NaiveDate], today: NaiveDate) -> Streak {
    let weeks = dates
        .iter()
        .filter(|d| **d <= today)
        .map(|d| week_start(*d))
        .collect::<BTreeSet<_>>();

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for week in &weeks {
        run = match previous {
            Some(p) if p.checked_add_days(Days::new(7)) == Some(*week) => run + 1,
            _ => 1,
        };
        best = u32::max(best, run);
        previous = Some(*week);
    }

    let this_week = week_start(today);
    let alive = previous.is_some_and(|last| {
        last == this_week || last.checked_add_days(Days::new(7)) == Some(this_week)
    });

    Streak {
        current: if alive { run } else { 0 },
        best,
    }
}

#[must_use]
pub fn newly_unlocked(
    summary: &TrainingSummary,
    unlocked: &BTreeSet<Achievement>,
) -> Vec<Achievement> {
    use strum::IntoEnumIterator;

    Achievement::iter()
        .filter(|a| !unlocked.contains(a) && a.is_met(summary))
        .collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}
