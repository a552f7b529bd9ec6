//! Core traits and types for zoo environments
//!
//! This crate provides the uniform environment surface consumed by RL
//! training harnesses:
//! - `Env`: reset/step/seed/close/replay interface with fixed records
//! - `Simulator`: the dynamics an environment wraps
//! - `SimulatorEnv`: adapter from any discrete-action simulator to `Env`
//! - Wrappers (`TimeLimit`, `RecordEpisodes`) and the env registry

pub mod action;
pub mod adapter;
pub mod env;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod replay;
pub mod rollout;
pub mod settings;
pub mod simulator;
pub mod space;
pub mod timestep;
pub mod wrappers;

// Re-export main types for convenience
pub use action::Action;
pub use adapter::{SimulatorEnv, SimulatorFactory, DEFAULT_REPLAY_DIR};
pub use env::Env;
pub use error::{EnvError, EnvResult};
pub use metadata::EnvMetadata;
pub use registry::{
    clear_registry, create_env, is_registered, list_registered_envs, register_env, EnvFactory,
};
pub use replay::{read_episode, ReplayFrame, ReplayRecorder};
pub use rollout::{mean_return, run_episode, run_episodes, EpisodeSummary};
pub use settings::EnvSettings;
pub use simulator::{SimStep, Simulator};
pub use space::{SeededSpace, Space, SpaceSample};
pub use timestep::{Observation, StepInfo, Timestep, NO_PLAYER};
pub use wrappers::{RecordEpisodes, TimeLimit};
