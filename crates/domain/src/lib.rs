#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod achievement;
mod config;
mod error;
mod exercise;
mod name;
mod records;
mod stall;
mod tracker;
mod training;
mod workout;

pub mod one_rm;
pub mod suggestion;
pub mod trend;

pub use achievement::*;
pub use config::*;
pub use error::*;
pub use exercise::*;
pub use name::*;
pub use one_rm::{Estimate, Formula, OneRepMax, UpdateDecision};
pub use records::*;
pub use stall::*;
pub use suggestion::{Action, Reason, Suggestion};
pub use tracker::*;
pub use training::*;
pub use trend::{TrendAnalysis, VolumeTrend};
pub use workout::*;
