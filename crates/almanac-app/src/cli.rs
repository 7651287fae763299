use std::path::PathBuf;

use almanac_recurrence::DisplayMode;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Expand recurring calendar items into concrete occurrences")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Expand recurring items inside the window of a calendar view
    Expand {
        /// JSON array of recurring items ("-" reads stdin)
        items: PathBuf,

        /// View whose window is expanded
        #[arg(short, long, value_enum, default_value_t = Mode::Week)]
        mode: Mode,

        /// Instant shown by the view (RFC 3339, defaults to now)
        #[arg(short, long)]
        at: Option<DateTime<Utc>>,
    },
    /// Show the window and cell keys of a calendar view
    Window {
        #[arg(short, long, value_enum, default_value_t = Mode::Week)]
        mode: Mode,

        /// Instant shown by the view (RFC 3339, defaults to now)
        #[arg(short, long)]
        at: Option<DateTime<Utc>>,
    },
    /// Parse a recurrence rule and print its normalized form
    Rule {
        /// Rule text, e.g. "FREQ=WEEKLY;BYDAY=MO,WE;COUNT=10"
        text: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Day,
    Week,
    Month,
    Year,
}

impl From<Mode> for DisplayMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Day => Self::Day,
            Mode::Week => Self::Week,
            Mode::Month => Self::Month,
            Mode::Year => Self::Year,
        }
    }
}
