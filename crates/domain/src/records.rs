use chrono::NaiveDate;

use crate::{
    Estimate, ExerciseID, ExerciseSession, OneRepMax, ReadError, UpdateDecision, UpdateError,
    Weight,
};

pub trait PersonalRecordRepository {
    fn read_personal_bests(
        &self,
        exercise_id: ExerciseID,
    ) -> Result<Option<PersonalBests>, ReadError>;
    fn read_all_personal_bests(&self) -> Result<Vec<PersonalBests>, ReadError>;
    fn write_personal_bests(&self, bests: PersonalBests) -> Result<PersonalBests, UpdateError>;
    fn clear_personal_bests(&self) -> Result<(), UpdateError>;
}

/// Best performances of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalBests {
    pub exercise_id: ExerciseID,
    pub max_weight: Weight,
    pub max_volume: f32,
    pub one_rep_max: Option<OneRepMax>,
    /// Number of records set after the first session.
    pub records: u32,
}

impl PersonalBests {
    /// Bests of an exercise after its first session. No records are reported for it.
    #[must_use]
    pub fn establish(session: &ExerciseSession, estimate: Option<&Estimate>) -> Self {
        Self {
            exercise_id: session.exercise_id,
            max_weight: session.working_weight,
            max_volume: session.volume,
            one_rep_max: estimate.map(|e| e.to_one_rep_max(session.date)),
            records: 0,
        }
    }

    /// Merge a session into the bests and return the records it set.
    ///
    /// The stored one-rep max is replaced whenever the decision overwrites it, but only
    /// a real improvement counts as a record.
    pub fn apply(
        &mut self,
        session: &ExerciseSession,
        estimate: Option<(&Estimate, UpdateDecision)>,
    ) -> Vec<PersonalRecord> {
        let mut records = vec![];

        if session.working_weight > self.max_weight
            && !session.working_weight.approx_eq(self.max_weight)
        {
            records.push(PersonalRecord {
                exercise_id: self.exercise_id,
                kind: RecordKind::MaxWeight,
                value: f32::from(session.working_weight),
                previous: f32::from(self.max_weight),
                date: session.date,
            });
            self.max_weight = session.working_weight;
        }

        if session.volume > self.max_volume + 0.01 {
            records.push(PersonalRecord {
                exercise_id: self.exercise_id,
                kind: RecordKind::MaxVolume,
                value: session.volume,
                previous: self.max_volume,
                date: session.date,
            });
            self.max_volume = session.volume;
        }

        if let Some((estimate, decision)) = estimate {
            if decision == UpdateDecision::Improved {
                records.push(PersonalRecord {
                    exercise_id: self.exercise_id,
                    kind: RecordKind::EstimatedOneRepMax,
                    value: estimate.value,
                    previous: self.one_rep_max.as_ref().map_or(0.0, |orm| orm.value),
                    date: session.date,
                });
            }
            if decision.overwrites() {
                self.one_rep_max = Some(estimate.to_one_rep_max(session.date));
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            self.records += records.len() as u32;
        }

        records
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RecordKind {
    #[strum(to_string = "heaviest weight")]
    MaxWeight,
    #[strum(to_string = "highest volume")]
    MaxVolume,
    #[strum(to_string = "estimated one-rep max")]
    EstimatedOneRepMax,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: ExerciseID,
    pub kind: RecordKind,
    pub value: f32,
    pub previous: f32,
    pub date: NaiveDate,
}
