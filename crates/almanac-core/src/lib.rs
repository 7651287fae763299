//! Ambient layer shared by the almanac crates: settings, errors and constants.

pub mod config;
pub mod constants;
pub mod error;
