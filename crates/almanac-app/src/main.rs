mod cli;
mod commands;

use std::io::Read;

use almanac_core::config::load_config;
use almanac_core::constants::DEFAULT_LOG_LEVEL;
use almanac_recurrence::Calendar;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping default");
    }

    let calendar = Calendar::from_settings(&config)?;
    let now = chrono::Utc::now();

    match cli.command {
        Command::Expand { items, mode, at } => {
            let json = if items.as_os_str() == "-" {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read items from stdin")?;
                buffer
            } else {
                std::fs::read_to_string(&items)
                    .with_context(|| format!("Failed to read {}", items.display()))?
            };
            let occurrences =
                commands::expand(&calendar, &json, mode.into(), at.unwrap_or(now))?;
            print_json(&occurrences, cli.pretty)
        }
        Command::Window { mode, at } => {
            let report = commands::window(&calendar, mode.into(), at.unwrap_or(now))?;
            print_json(&report, cli.pretty)
        }
        Command::Rule { text } => print_json(&commands::rule(&text)?, cli.pretty),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
