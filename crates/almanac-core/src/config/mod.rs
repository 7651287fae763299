use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_TIME_ZONE, ENV_PREFIX, ENV_SEPARATOR,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
}

/// First day of the week used for week spans and weekly patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA (or Windows / vendor-prefixed) zone identifier.
    pub time_zone: String,
    pub first_weekday: WeekStart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads settings from defaults, the optional `almanac.toml` file and
    /// `ALMANAC__`-prefixed environment variables, in increasing precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the result fails.
    pub fn load() -> CoreResult<Self> {
        let builder = Self::with_defaults()?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// ## Summary
    /// Loads settings from a TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml(document: &str) -> CoreResult<Self> {
        let builder = Self::with_defaults()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml));
        Self::finish(builder)
    }

    fn with_defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        Config::builder()
            .set_default("calendar.time_zone", DEFAULT_TIME_ZONE)
            .and_then(|builder| builder.set_default("calendar.first_weekday", "sunday"))
            .and_then(|builder| builder.set_default("logging.level", DEFAULT_LOG_LEVEL))
            .map_err(|err| CoreError::ConfigError(err.to_string()))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> CoreResult<Self> {
        let settings = builder
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(|err| CoreError::ConfigError(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidInput` for an empty time zone or log level.
    pub fn validate(&self) -> CoreResult<()> {
        if self.calendar.time_zone.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "calendar.time_zone must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "logging.level must not be empty".to_string(),
            ));
        }
        tracing::trace!(
            time_zone = %self.calendar.time_zone,
            first_weekday = ?self.calendar.first_weekday,
            "Settings validated"
        );
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Ok(Settings::load()?)
}
