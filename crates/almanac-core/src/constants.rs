/// Application name used to derive file and environment names
pub const APP_NAME: &str = "almanac";

/// Optional settings file read from the working directory
pub const CONFIG_FILE_NAME: &str = const_str::concat!(APP_NAME, ".toml");

/// Prefix for environment overrides, e.g. `ALMANAC__CALENDAR__TIME_ZONE`
pub const ENV_PREFIX: &str = "ALMANAC";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";
