//! Weatherlight: renders today's forecast on LAN smart bulbs.
//!
//! A run fetches the daily forecast, reduces it to a [`weather::DaySummary`],
//! picks a [`lighting::LightingPattern`] (a pulse when rain or snow is likely,
//! otherwise a steady color for the temperature band) and plays it on every
//! discovered bulb concurrently.

pub mod config;
pub mod device;
pub mod error;
pub mod lighting;
pub mod orchestrator;
pub mod runner;
pub mod weather;

pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use orchestrator::{DeviceOutcome, Orchestrator, RunReport};
pub use runner::{setup_logging, Plan, RunOutcome, Runner};
