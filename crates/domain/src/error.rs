use crate::ExerciseID;

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("failed to read {entity}: {source}")]
    Read {
        entity: &'static str,
        #[source]
        source: ReadError,
    },
    #[error("failed to update {entity}: {source}")]
    Update {
        entity: &'static str,
        #[source]
        source: UpdateError,
    },
    #[error("no progress recorded for exercise {0}")]
    NoProgress(ExerciseID),
}

impl TrackerError {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            TrackerError::Read {
                source: ReadError::Storage(StorageError::Unavailable),
                ..
            } | TrackerError::Update {
                source: UpdateError::Storage(StorageError::Unavailable),
                ..
            }
        )
    }
}
