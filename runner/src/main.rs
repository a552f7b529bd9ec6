//! zoo - AlphaZero Go training configs and RL environment rollouts
//!
//! Subcommands:
//! 1. `config` resolves config.toml into the nested training record and
//!    prints it as JSON or TOML for the external trainer
//! 2. `rollout` plays random-action episodes against a registered env
//! 3. `envs` lists registered environments

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod commands;

use crate::cli::{Cli, Command};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = zoo_config::load_config();

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.common.log_level.clone());
    cli::validate_log_level(&log_level)?;
    init_tracing(&log_level)?;
    info!(log_level = %log_level, "Tracing initialized");

    match &cli.command {
        Command::Config(args) => {
            if let Some(text) = commands::export_config(&config, args)? {
                println!("{text}");
            }
        }
        Command::Rollout(args) => {
            let summaries = commands::rollout(&config, args)?;
            for summary in &summaries {
                println!("{}", serde_json::to_string(summary)?);
            }
        }
        Command::Envs => {
            for metadata in commands::list_envs()? {
                println!(
                    "{:<24} {:<28} actions={} obs={} time_limit={}",
                    metadata.env_id,
                    metadata.display_name,
                    metadata.num_actions,
                    metadata.obs_size,
                    metadata
                        .max_episode_steps
                        .map_or_else(|| "none".to_string(), |n| n.to_string())
                );
            }
        }
    }

    Ok(())
}
