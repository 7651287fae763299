use almanac_core::error::CoreError;
use thiserror::Error;

use crate::calendar::timezone::ConversionError;
use crate::model::RuleError;

/// Errors raised around the engine: rule text, zone names and settings.
///
/// Expansion itself never fails.
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Rule error: {0}")]
    RuleError(#[from] RuleError),

    #[error("Time zone error: {0}")]
    TimeZoneError(#[from] ConversionError),

    #[error(transparent)]
    CoreError(#[from] CoreError),
}

pub type RecurrenceResult<T> = std::result::Result<T, RecurrenceError>;
