use derive_more::{AsRef, Display};

/// Exercise name with normalized whitespace.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub const MAX_LEN: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized.chars().count();

        if len > Self::MAX_LEN {
            return Err(NameError::TooLong(len));
        }

        Ok(Name(normalized))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("exercise name is empty")]
    Empty,
    #[error("exercise name has {0} characters, at most {max} are allowed", max = Name::MAX_LEN)]
    TooLong(usize),
}
