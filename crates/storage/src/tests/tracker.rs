use std::collections::BTreeSet;

use assert_approx_eq::assert_approx_eq;
use ironlog_domain::{
    Achievement, AchievementRepository, Action, PersonalRecordRepository, ProgressRepository,
    ProgressTracker, RPE, Reason, RecordKind, SessionOutcome, TrackerConfig, TrackerError, Trend,
    UpdateDecision, VolumeTrend, Workout, WorkoutReport, WorkoutSet,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::memory::{Fault, InMemory};

use super::data::{self, BENCH_PRESS, SQUAT, day, set, sets, workout};

fn tracker() -> ProgressTracker<InMemory> {
    let storage = InMemory::new();
    for exercise in data::EXERCISES.iter() {
        storage.add_exercise(exercise.clone()).unwrap();
    }
    ProgressTracker::new(storage, TrackerConfig::default())
}

fn complete(tracker: &ProgressTracker<InMemory>, workout: Workout) -> WorkoutReport {
    tracker.repository().add_workout(workout.clone()).unwrap();
    tracker.process_workout(&workout, workout.date).unwrap()
}

/// Bench press stalling for three sessions at 100 kg followed by a deload to 90 kg.
fn stalling_bench_press() -> Vec<Workout> {
    vec![
        workout(1, 0, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT))),
        workout(2, 2, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::NINE))),
        workout(3, 4, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::NINE))),
        workout(4, 7, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::NINE))),
        workout(5, 9, sets(&BENCH_PRESS, 5, 90.0, Some(RPE::SEVEN))),
    ]
}

#[test]
fn test_process_first_workout() {
    let tracker = tracker();
    let report = complete(
        &tracker,
        workout(
            1,
            0,
            [
                sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT)),
                sets(&SQUAT, 5, 140.0, Some(RPE::SEVEN)),
            ]
            .concat(),
        ),
    );

    assert_eq!(report.workout_id, 1.into());
    assert_eq!(report.failed, vec![]);
    assert_eq!(report.records(), Vec::<&ironlog_domain::PersonalRecord>::new());
    assert_eq!(
        report.achievements,
        vec![Achievement::FirstWorkout, Achievement::HundredKiloClub]
    );
    assert_eq!(report.exercises.len(), 2);

    let bench_press = &report.exercises[0];
    assert_eq!(bench_press.exercise_id, BENCH_PRESS.id);
    assert_eq!(bench_press.decision, Some(UpdateDecision::Initial));
    assert_eq!(bench_press.outcome, SessionOutcome::First);
    assert_eq!(bench_press.trend, Trend::Improving);
    let estimate = bench_press.estimate.clone().unwrap();
    assert_approx_eq!(estimate.value, 120.0, 0.001);
    assert_approx_eq!(estimate.confidence, 0.76, 0.001);
    assert_eq!(bench_press.suggestion.action, Action::Increase);
    assert_eq!(bench_press.suggestion.reason, Reason::OnTrack);
    assert_approx_eq!(f32::from(bench_press.suggestion.weight), 102.5);

    let squat = &report.exercises[1];
    assert_eq!(squat.exercise_id, SQUAT.id);
    assert_approx_eq!(squat.estimate.clone().unwrap().value, 173.793, 0.001);
    assert_eq!(squat.suggestion.reason, Reason::LowEffort);
    assert_approx_eq!(f32::from(squat.suggestion.weight), 150.0);

    assert_eq!(
        tracker.repository().read_achievements().unwrap(),
        BTreeSet::from([Achievement::FirstWorkout, Achievement::HundredKiloClub])
    );
}

#[test]
fn test_process_workout_with_new_records() {
    let tracker = tracker();
    complete(
        &tracker,
        workout(1, 0, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT))),
    );
    let report = complete(
        &tracker,
        workout(2, 3, sets(&BENCH_PRESS, 5, 102.5, Some(RPE::EIGHT))),
    );

    assert_eq!(
        report
            .records()
            .iter()
            .map(|r| (r.kind, r.date))
            .collect::<Vec<_>>(),
        vec![
            (RecordKind::MaxWeight, day(3)),
            (RecordKind::MaxVolume, day(3)),
            (RecordKind::EstimatedOneRepMax, day(3)),
        ]
    );
    assert_eq!(report.exercises[0].outcome, SessionOutcome::Progressed);
    assert_eq!(report.achievements, vec![Achievement::FirstPersonalRecord]);

    let bests = tracker
        .repository()
        .read_personal_bests(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(bests.records, 3);
    assert_eq!(bests.one_rep_max.map(|orm| orm.date), Some(day(3)));
}

#[rstest]
#[case::improved(
    sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT)),
    sets(&BENCH_PRESS, 5, 102.5, Some(RPE::EIGHT)),
    UpdateDecision::Improved,
    vec![RecordKind::MaxWeight, RecordKind::MaxVolume, RecordKind::EstimatedOneRepMax],
    123.0
)]
#[case::more_reliable(
    sets(&BENCH_PRESS, 5, 100.0, None),
    vec![set(&BENCH_PRESS, 1, 110.0, Some(RPE::TEN))],
    UpdateDecision::MoreReliable,
    vec![RecordKind::MaxWeight],
    110.0
)]
#[case::implausible_jump(
    sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT)),
    sets(&BENCH_PRESS, 5, 130.0, Some(RPE::EIGHT)),
    UpdateDecision::Keep,
    vec![RecordKind::MaxWeight, RecordKind::MaxVolume],
    120.0
)]
#[case::lower_estimate(
    sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT)),
    sets(&BENCH_PRESS, 5, 95.0, Some(RPE::EIGHT)),
    UpdateDecision::Keep,
    vec![],
    120.0
)]
fn test_one_rep_max_update(
    #[case] first: Vec<WorkoutSet>,
    #[case] second: Vec<WorkoutSet>,
    #[case] decision: UpdateDecision,
    #[case] records: Vec<RecordKind>,
    #[case] stored: f32,
) {
    let tracker = tracker();
    complete(&tracker, workout(1, 0, first));
    let report = complete(&tracker, workout(2, 3, second));

    assert_eq!(report.exercises[0].decision, Some(decision));
    assert_eq!(
        report.records().iter().map(|r| r.kind).collect::<Vec<_>>(),
        records
    );
    assert_approx_eq!(
        tracker
            .repository()
            .read_personal_bests(BENCH_PRESS.id)
            .unwrap()
            .and_then(|bests| bests.one_rep_max)
            .map_or(0.0, |orm| orm.value),
        stored,
        0.001
    );
}

#[test]
fn test_stall_leads_to_deload() {
    let tracker = tracker();
    let reports = stalling_bench_press()
        .into_iter()
        .map(|w| complete(&tracker, w))
        .map(|r| r.exercises[0].clone())
        .collect::<Vec<_>>();

    assert_eq!(
        reports
            .iter()
            .map(|r| (r.outcome, r.trend, r.suggestion.action))
            .collect::<Vec<_>>(),
        vec![
            (SessionOutcome::First, Trend::Improving, Action::Increase),
            (SessionOutcome::Stalled, Trend::Improving, Action::Repeat),
            (SessionOutcome::Stalled, Trend::Improving, Action::Repeat),
            (SessionOutcome::Stalled, Trend::Stalling, Action::Deload),
            (SessionOutcome::Deloaded, Trend::Stalling, Action::Increase),
        ]
    );
    assert_eq!(reports[1].suggestion.reason, Reason::NearFailure);
    assert_eq!(reports[3].suggestion.reason, Reason::Plateau);
    assert_approx_eq!(f32::from(reports[3].suggestion.weight), 90.0);
    assert_approx_eq!(f32::from(reports[4].suggestion.weight), 95.0);

    let progress = tracker
        .repository()
        .read_progress(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(progress.last_deload, Some(day(9)));
    assert_eq!(progress.last_progression, Some(day(0)));
    assert_eq!(progress.consecutive_stalls, 0);
    assert_eq!(progress.days_since_progression(day(9)), Some(9));
}

#[test]
fn test_earlier_workout_is_ignored() {
    let tracker = tracker();
    complete(
        &tracker,
        workout(2, 7, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT))),
    );
    let report = complete(
        &tracker,
        workout(1, 0, sets(&BENCH_PRESS, 5, 110.0, Some(RPE::EIGHT))),
    );

    assert_eq!(report.exercises[0].outcome, SessionOutcome::Ignored);
    assert_eq!(report.exercises[0].decision, None);
    assert_eq!(report.records(), Vec::<&ironlog_domain::PersonalRecord>::new());
    let bests = tracker
        .repository()
        .read_personal_bests(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(bests.records, 0);
    assert_approx_eq!(f32::from(bests.max_weight), 100.0);
    assert_eq!(bests.one_rep_max.map(|orm| orm.date), Some(day(7)));
    let progress = tracker
        .repository()
        .read_progress(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(progress.last_session, day(7));
    assert_eq!(progress.sessions_tracked, 1);
}

#[rstest]
#[case::progress_write(Fault::ProgressWrite(BENCH_PRESS.id), 1)]
#[case::personal_bests_write(Fault::PersonalBestsWrite(BENCH_PRESS.id), 2)]
fn test_failed_write_keeps_personal_bests(
    #[case] fault: Fault,
    #[case] sessions_tracked: u32,
) {
    let tracker = tracker();
    complete(
        &tracker,
        workout(
            1,
            0,
            [
                sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT)),
                sets(&SQUAT, 5, 140.0, Some(RPE::SEVEN)),
            ]
            .concat(),
        ),
    );
    tracker.repository().inject(fault).unwrap();
    let report = complete(
        &tracker,
        workout(
            2,
            3,
            [
                sets(&BENCH_PRESS, 5, 102.5, Some(RPE::EIGHT)),
                sets(&SQUAT, 5, 140.0, Some(RPE::SEVEN)),
            ]
            .concat(),
        ),
    );

    assert_eq!(report.failed, vec![BENCH_PRESS.id]);
    assert_eq!(
        report
            .exercises
            .iter()
            .map(|e| (e.exercise_id, e.outcome))
            .collect::<Vec<_>>(),
        vec![(SQUAT.id, SessionOutcome::Stalled)]
    );
    assert_eq!(report.records(), Vec::<&ironlog_domain::PersonalRecord>::new());
    assert_eq!(report.achievements, vec![]);

    let bests = tracker
        .repository()
        .read_personal_bests(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(bests.records, 0);
    assert_approx_eq!(f32::from(bests.max_weight), 100.0);
    assert_eq!(bests.one_rep_max.map(|orm| orm.date), Some(day(0)));
    assert_eq!(
        tracker
            .repository()
            .read_progress(BENCH_PRESS.id)
            .unwrap()
            .map(|p| p.sessions_tracked),
        Some(sessions_tracked)
    );
}

#[test]
fn test_recalculate() {
    let tracker = tracker();
    let workouts = stalling_bench_press();

    // Progress of the deload session only, as if earlier workouts had been imported later.
    complete(&tracker, workouts[4].clone());
    for workout in workouts.iter().take(4).rev() {
        tracker.repository().add_workout(workout.clone()).unwrap();
    }

    assert_eq!(tracker.recalculate(day(9)).unwrap(), 5);

    let progress = tracker
        .repository()
        .read_progress(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(progress.sessions_tracked, 5);
    assert_eq!(progress.last_outcome, SessionOutcome::Deloaded);
    assert_eq!(progress.trend, Trend::Stalling);
    assert_eq!(progress.history.len(), 5);

    let bests = tracker
        .repository()
        .read_personal_bests(BENCH_PRESS.id)
        .unwrap()
        .unwrap();
    assert_eq!(bests.records, 0);
    assert_approx_eq!(bests.one_rep_max.map_or(0.0, |orm| orm.value), 120.0, 0.001);

    let suggestion = tracker.suggest(BENCH_PRESS.id).unwrap();
    assert_eq!(suggestion.action, Action::Increase);
    assert_approx_eq!(f32::from(suggestion.weight), 95.0);

    assert_eq!(
        tracker.repository().read_achievements().unwrap(),
        BTreeSet::from([Achievement::FirstWorkout, Achievement::HundredKiloClub])
    );
}

#[test]
fn test_trend_of() {
    let tracker = tracker();
    complete(
        &tracker,
        workout(1, 0, sets(&BENCH_PRESS, 5, 100.0, Some(RPE::EIGHT))),
    );
    complete(
        &tracker,
        workout(2, 3, sets(&BENCH_PRESS, 5, 102.5, Some(RPE::EIGHT))),
    );

    assert_eq!(tracker.trend_of(BENCH_PRESS.id).unwrap(), None);

    complete(
        &tracker,
        workout(3, 7, sets(&BENCH_PRESS, 5, 105.0, Some(RPE::EIGHT))),
    );

    let analysis = tracker.trend_of(BENCH_PRESS.id).unwrap().unwrap();
    assert_eq!(analysis.direction, Trend::Improving);
    assert_eq!(analysis.points, 3);
    assert_approx_eq!(analysis.slope_per_week, 5.959, 0.001);
    assert_approx_eq!(analysis.weekly_change, 0.0484, 0.0001);
}

#[test]
fn test_volume_trend() {
    let tracker = tracker();
    complete(
        &tracker,
        workout(1, 5, sets(&BENCH_PRESS, 5, 100.0, None)),
    );

    assert_eq!(tracker.volume_trend(day(5)).unwrap(), None);

    complete(
        &tracker,
        workout(2, 40, sets(&BENCH_PRESS, 5, 105.0, None)),
    );

    assert_eq!(
        tracker.volume_trend(day(50)).unwrap(),
        Some(VolumeTrend::Stable)
    );
}

#[test]
fn test_unknown_exercise_is_treated_as_isolation() {
    let tracker = tracker();
    let report = complete(
        &tracker,
        workout(
            1,
            0,
            vec![WorkoutSet {
                exercise_id: data::UNKNOWN_EXERCISE_ID.into(),
                ..set(&BENCH_PRESS, 5, 20.0, Some(RPE::EIGHT))
            }],
        ),
    );

    assert_eq!(report.failed, vec![]);
    let suggestion = &report.exercises[0].suggestion;
    assert_eq!(suggestion.action, Action::Increase);
    assert_approx_eq!(f32::from(suggestion.weight), 21.25);
}

#[test]
fn test_workout_without_performed_sets() {
    let tracker = tracker();
    let report = complete(
        &tracker,
        workout(
            1,
            0,
            vec![WorkoutSet {
                completed: false,
                ..set(&BENCH_PRESS, 5, 100.0, None)
            }],
        ),
    );

    assert_eq!(report.exercises, vec![]);
    assert_eq!(report.failed, vec![]);
    assert_eq!(report.achievements, vec![]);
    assert_eq!(
        tracker.repository().read_progress(BENCH_PRESS.id).unwrap(),
        None
    );
}

#[test]
fn test_suggest_without_progress() {
    let tracker = tracker();
    assert!(matches!(
        tracker.suggest(SQUAT.id),
        Err(TrackerError::NoProgress(id)) if id == SQUAT.id
    ));
    assert!(matches!(
        tracker.trend_of(SQUAT.id),
        Err(TrackerError::NoProgress(_))
    ));
}

#[test]
fn test_unavailable_storage() {
    let tracker = tracker();
    let workout = workout(1, 0, sets(&BENCH_PRESS, 5, 100.0, None));
    tracker.repository().add_workout(workout.clone()).unwrap();
    tracker.repository().set_available(false);

    let err = tracker.process_workout(&workout, day(0)).unwrap_err();
    assert!(err.is_unavailable());
    assert_eq!(err.to_string(), "failed to read exercises: storage unavailable");
    assert!(tracker.recalculate(day(0)).unwrap_err().is_unavailable());
}
