use anyhow::Context;
use ironlog_domain::TrackerConfig;
use log::{LevelFilter, debug};
use serde::{Deserialize, Serialize};

use crate::log::LevelFilterDef;

#[allow(clippy::missing_errors_doc)]
pub trait SettingsRepository {
    /// Returns `None` if no settings have been stored yet.
    fn read_settings(&self) -> Result<Option<Settings>, Error>;
    fn write_settings(&self, settings: Settings) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    #[serde(with = "LevelFilterDef")]
    pub log_level: LevelFilter,
    pub tracker: TrackerConfig,
}

impl Settings {
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or describes an invalid configuration.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize settings")
    }

    /// # Errors
    ///
    /// Returns an error if the tracker configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.tracker
            .validate()
            .context("invalid tracker configuration")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            tracker: TrackerConfig::default(),
        }
    }
}

/// Load the stored settings, falling back to the defaults if nothing is stored.
///
/// # Errors
///
/// Returns an error if the settings cannot be read or are invalid.
pub fn load_settings(repository: &impl SettingsRepository) -> anyhow::Result<Settings> {
    let Some(settings) = repository
        .read_settings()
        .context("failed to read settings")?
    else {
        debug!("no settings stored, using defaults");
        return Ok(Settings::default());
    };
    settings.validate()?;
    Ok(settings)
}

/// # Errors
///
/// Returns an error if the settings are invalid or cannot be written.
pub fn store_settings(repository: &impl SettingsRepository, settings: Settings) -> anyhow::Result<()> {
    settings.validate()?;
    repository
        .write_settings(settings)
        .context("failed to write settings")
}
