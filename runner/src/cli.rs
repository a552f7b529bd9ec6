//! Command-line interface for the zoo binary
//!
//! Flags take priority over `ZOO_*` environment variables, which take
//! priority over config.toml.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use zoo_config::{ExportFormat, Preset};

#[derive(Parser, Debug, Clone)]
#[command(name = "zoo")]
#[command(about = "AlphaZero Go training configs and RL environment rollouts")]
#[command(
    long_about = "Resolve the Go AlphaZero self-play training config for the external
trainer, or drive registered environments with random actions.

Configuration is loaded from config.toml with ZOO_<SECTION>_<KEY>
environment variable overrides. CLI arguments take highest priority."
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); defaults to common.log_level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve and print the training config
    Config(ConfigArgs),
    /// Run random-action episodes against an environment
    Rollout(RolloutArgs),
    /// List registered environments
    Envs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetArg {
    #[default]
    Standard,
    Debug,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Standard => Preset::Standard,
            PresetArg::Debug => Preset::Debug,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatArg {
    #[default]
    Json,
    Toml,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Toml => ExportFormat::Toml,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Override bundle applied before resolution
    #[arg(long, value_enum, default_value_t = PresetArg::Standard)]
    pub preset: PresetArg,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RolloutArgs {
    /// Registered environment ID
    #[arg(long, default_value = zoo_envs::DEFAULT_ENV_ID)]
    pub env: String,

    /// Number of episodes to play
    #[arg(long, default_value_t = 5)]
    pub episodes: u32,

    /// Seed; defaults to common.seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reuse the same seed on every reset
    #[arg(long)]
    pub no_dynamic_seed: bool,

    /// Record every episode as JSONL under this directory
    #[arg(long)]
    pub replay_dir: Option<PathBuf>,

    /// Stop an episode after this many steps
    #[arg(long)]
    pub max_steps: Option<u32>,
}

impl RolloutArgs {
    pub fn validate(&self) -> Result<()> {
        if self.env.is_empty() {
            return Err(anyhow!("env cannot be empty"));
        }
        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }
        if self.max_steps == Some(0) {
            return Err(anyhow!("max_steps must be greater than 0"));
        }
        Ok(())
    }
}

pub fn validate_log_level(level: &str) -> Result<()> {
    if level.parse::<LevelFilter>().is_err() {
        return Err(anyhow!(
            "invalid log level '{}', expected one of trace, debug, info, warn, error",
            level
        ));
    }
    Ok(())
}
