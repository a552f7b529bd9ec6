//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time and parsed once on first
//! use, so every binary ships with the same baseline.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::structs::{BattleMode, OptimType};

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    experiment: ExperimentDefaults,
    env: EnvDefaults,
    policy: PolicyDefaults,
    cartpole: CartPoleDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    exp_root: String,
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct ExperimentDefaults {
    board_size: u32,
    collector_env_num: u32,
    n_episode: u32,
    evaluator_env_num: u32,
    update_per_collect: u32,
    batch_size: u32,
    max_env_step: u64,
    prob_random_action_in_bot: f64,
}

#[derive(Debug, Deserialize)]
struct EnvDefaults {
    komi: f64,
    battle_mode: BattleMode,
    bot_action_type: String,
    channel_last: bool,
    shared_memory: bool,
}

#[derive(Debug, Deserialize)]
struct PolicyDefaults {
    env_type: String,
    torch_compile: bool,
    tensor_float_32: bool,
    num_res_blocks: u32,
    num_channels: u32,
    cuda: bool,
    optim_type: OptimType,
    lr_piecewise_constant_decay: bool,
    learning_rate: f64,
    manual_temperature_decay: bool,
    grad_clip_value: f64,
    value_weight: f64,
    entropy_weight: f64,
    eval_freq: u64,
    replay_buffer_size: u64,
}

#[derive(Debug, Deserialize)]
struct CartPoleDefaults {
    obs_plus_prev_action_reward: bool,
    dynamic_seed: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn exp_root() -> &'static str {
    &DEFAULTS.common.exp_root
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Experiment
pub fn board_size() -> u32 {
    DEFAULTS.experiment.board_size
}
pub fn collector_env_num() -> u32 {
    DEFAULTS.experiment.collector_env_num
}
pub fn n_episode() -> u32 {
    DEFAULTS.experiment.n_episode
}
pub fn evaluator_env_num() -> u32 {
    DEFAULTS.experiment.evaluator_env_num
}
pub fn update_per_collect() -> u32 {
    DEFAULTS.experiment.update_per_collect
}
pub fn batch_size() -> u32 {
    DEFAULTS.experiment.batch_size
}
pub fn max_env_step() -> u64 {
    DEFAULTS.experiment.max_env_step
}
pub fn prob_random_action_in_bot() -> f64 {
    DEFAULTS.experiment.prob_random_action_in_bot
}

// Env
pub fn komi() -> f64 {
    DEFAULTS.env.komi
}
pub fn battle_mode() -> BattleMode {
    DEFAULTS.env.battle_mode
}
pub fn bot_action_type() -> &'static str {
    &DEFAULTS.env.bot_action_type
}
pub fn channel_last() -> bool {
    DEFAULTS.env.channel_last
}
pub fn shared_memory() -> bool {
    DEFAULTS.env.shared_memory
}

// Policy
pub fn env_type() -> &'static str {
    &DEFAULTS.policy.env_type
}
pub fn torch_compile() -> bool {
    DEFAULTS.policy.torch_compile
}
pub fn tensor_float_32() -> bool {
    DEFAULTS.policy.tensor_float_32
}
pub fn num_res_blocks() -> u32 {
    DEFAULTS.policy.num_res_blocks
}
pub fn num_channels() -> u32 {
    DEFAULTS.policy.num_channels
}
pub fn cuda() -> bool {
    DEFAULTS.policy.cuda
}
pub fn optim_type() -> OptimType {
    DEFAULTS.policy.optim_type
}
pub fn lr_piecewise_constant_decay() -> bool {
    DEFAULTS.policy.lr_piecewise_constant_decay
}
pub fn learning_rate() -> f64 {
    DEFAULTS.policy.learning_rate
}
pub fn manual_temperature_decay() -> bool {
    DEFAULTS.policy.manual_temperature_decay
}
pub fn grad_clip_value() -> f64 {
    DEFAULTS.policy.grad_clip_value
}
pub fn value_weight() -> f64 {
    DEFAULTS.policy.value_weight
}
pub fn entropy_weight() -> f64 {
    DEFAULTS.policy.entropy_weight
}
pub fn eval_freq() -> u64 {
    DEFAULTS.policy.eval_freq
}
pub fn replay_buffer_size() -> u64 {
    DEFAULTS.policy.replay_buffer_size
}

// CartPole
pub fn obs_plus_prev_action_reward() -> bool {
    DEFAULTS.cartpole.obs_plus_prev_action_reward
}
pub fn dynamic_seed() -> bool {
    DEFAULTS.cartpole.dynamic_seed
}
