//! Centralized configuration for AlphaZero self-play training on Go.
//!
//! This crate loads the user-facing `config.toml`, layers environment
//! overrides on top of it, and resolves the result into the nested record
//! the `train` entry point consumes.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ZOO_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ZOO_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ZOO_EXPERIMENT_BOARD_SIZE=9
//!     ZOO_EXPERIMENT_NUM_SIMULATIONS=50
//!     ZOO_COMMON_SEED=3
//!     ZOO_CARTPOLE_DYNAMIC_SEED=false
//! ```

mod defaults;
mod loader;
mod resolve;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use resolve::{
    num_simulations_for, ComponentSpec, ConfigError, CreateConfig, EnvSection, ExportFormat,
    MainConfig, ManagerSection, MctsSection, ModelSection, PolicySection, Preset, TrainConfig,
    GO_OBSERVATION_PLANES, MAX_BOARD_SIZE,
};
pub use structs::*;
