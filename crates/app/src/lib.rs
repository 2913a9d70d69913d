#![warn(clippy::pedantic)]

pub mod log;
pub mod settings;

pub use settings::{Settings, SettingsRepository, load_settings, store_settings};
