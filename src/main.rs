//! plant-hardening: run one forecast check, meant to be invoked by cron.

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use stillwater::effect::Effect;

use plant_hardening::core::{Mode, PlantState};
use plant_hardening::effects::{AppEnv, HardeningCycle, RunMode};
use plant_hardening::store::{JsonFileStore, StateStore};
use plant_hardening::Config;

#[derive(Parser)]
#[command(
    name = "plant-hardening",
    about = "Forecast-driven reminders for moving hardening plants inside and outside",
    version
)]
struct Cli {
    /// Path to a TOML config file (default: ./plant-hardening.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON state file.
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the forecast and send a reminder if the plants should move (default).
    Run {
        /// Decide and log without notifying or saving.
        #[arg(long)]
        dry_run: bool,

        /// Evaluate as if it were this local time (YYYY-MM-DDTHH:MM).
        #[arg(long, value_parser = parse_local_time)]
        now: Option<NaiveDateTime>,
    },

    /// Print the persisted plant location.
    Status,

    /// Print the forecast window that would be evaluated now.
    Forecast {
        /// Evaluate as if it were this local time (YYYY-MM-DDTHH:MM).
        #[arg(long, value_parser = parse_local_time)]
        now: Option<NaiveDateTime>,
    },

    /// Overwrite the persisted plant location.
    Set {
        /// inside or outside
        state: PlantState,
    },
}

fn parse_local_time(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {e}"))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?.with_env_overrides();
    if let Some(state_file) = &cli.state_file {
        config.state_file = state_file.clone();
    }
    Ok(config.validated()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli).context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Run {
        dry_run: false,
        now: None,
    }) {
        Commands::Run { dry_run, now } => {
            let env = AppEnv::from_config(&config)?;
            let now = match now {
                Some(now) => now,
                None => config.local_now()?,
            };
            let mode = if dry_run {
                RunMode::DryRun
            } else {
                RunMode::Live
            };

            let cycle =
                HardeningCycle::new(config.policy.clone(), config.notifier.title.clone(), now);
            let outcome = futures::executor::block_on(cycle.run(&env, mode)).map_err(|e| {
                tracing::error!(error = %e, "Run failed");
                e
            })?;

            if let Some(message) = &outcome.decision.message {
                println!("{message}");
            }
        }
        Commands::Status => {
            let store = JsonFileStore::new(config.state_file.clone());
            println!("{}", store.get());
        }
        Commands::Forecast { now } => {
            let env = AppEnv::from_config(&config)?;
            let now = match now {
                Some(now) => now,
                None => config.local_now()?,
            };

            let cycle =
                HardeningCycle::new(config.policy.clone(), config.notifier.title.clone(), now);
            let observation = futures::executor::block_on(cycle.observe::<AppEnv>().run(&env))?;

            let mode = match Mode::at(now) {
                Mode::Day => "day",
                Mode::Night => "night",
            };
            println!(
                "{} ({mode} mode, threshold {:.1}°C): {:?}",
                now.format("%Y-%m-%d %H:%M"),
                config.policy.threshold_c,
                observation.window.temperatures()
            );
        }
        Commands::Set { state } => {
            let store = JsonFileStore::new(config.state_file.clone());
            store
                .set(state)
                .with_context(|| format!("cannot write {}", store.path().display()))?;
            tracing::info!(state = %state, "State overwritten");
            println!("{state}");
        }
    }

    Ok(())
}
