//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_exp_root() -> String {
    defaults::exp_root().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_board_size() -> u32 {
    defaults::board_size()
}
fn d_collector_env_num() -> u32 {
    defaults::collector_env_num()
}
fn d_n_episode() -> u32 {
    defaults::n_episode()
}
fn d_evaluator_env_num() -> u32 {
    defaults::evaluator_env_num()
}
fn d_update_per_collect() -> u32 {
    defaults::update_per_collect()
}
fn d_batch_size() -> u32 {
    defaults::batch_size()
}
fn d_max_env_step() -> u64 {
    defaults::max_env_step()
}
fn d_prob_random() -> f64 {
    defaults::prob_random_action_in_bot()
}
fn d_komi() -> f64 {
    defaults::komi()
}
fn d_battle_mode() -> BattleMode {
    defaults::battle_mode()
}
fn d_bot_action_type() -> String {
    defaults::bot_action_type().into()
}
fn d_channel_last() -> bool {
    defaults::channel_last()
}
fn d_shared_memory() -> bool {
    defaults::shared_memory()
}
fn d_env_type() -> String {
    defaults::env_type().into()
}
fn d_torch_compile() -> bool {
    defaults::torch_compile()
}
fn d_tensor_float_32() -> bool {
    defaults::tensor_float_32()
}
fn d_num_res_blocks() -> u32 {
    defaults::num_res_blocks()
}
fn d_num_channels() -> u32 {
    defaults::num_channels()
}
fn d_cuda() -> bool {
    defaults::cuda()
}
fn d_optim_type() -> OptimType {
    defaults::optim_type()
}
fn d_lr_piecewise() -> bool {
    defaults::lr_piecewise_constant_decay()
}
fn d_lr() -> f64 {
    defaults::learning_rate()
}
fn d_manual_temp_decay() -> bool {
    defaults::manual_temperature_decay()
}
fn d_grad_clip() -> f64 {
    defaults::grad_clip_value()
}
fn d_value_weight() -> f64 {
    defaults::value_weight()
}
fn d_entropy_weight() -> f64 {
    defaults::entropy_weight()
}
fn d_eval_freq() -> u64 {
    defaults::eval_freq()
}
fn d_replay_buffer_size() -> u64 {
    defaults::replay_buffer_size()
}
fn d_obs_plus_prev() -> bool {
    defaults::obs_plus_prev_action_reward()
}
fn d_dynamic_seed() -> bool {
    defaults::dynamic_seed()
}

// ============================================================================
// Enumerated settings
// ============================================================================

/// Who the agent plays against during collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleMode {
    SelfPlayMode,
    PlayWithBotMode,
    EvalMode,
}

impl BattleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BattleMode::SelfPlayMode => "self_play_mode",
            BattleMode::PlayWithBotMode => "play_with_bot_mode",
            BattleMode::EvalMode => "eval_mode",
        }
    }
}

impl FromStr for BattleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self_play_mode" => Ok(BattleMode::SelfPlayMode),
            "play_with_bot_mode" => Ok(BattleMode::PlayWithBotMode),
            "eval_mode" => Ok(BattleMode::EvalMode),
            other => Err(format!("unknown battle mode: {other}")),
        }
    }
}

impl fmt::Display for BattleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optimizer family used by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimType {
    #[serde(rename = "SGD")]
    Sgd,
    Adam,
    AdamW,
}

impl FromStr for OptimType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SGD" => Ok(OptimType::Sgd),
            "Adam" => Ok(OptimType::Adam),
            "AdamW" => Ok(OptimType::AdamW),
            other => Err(format!("unknown optimizer: {other}")),
        }
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub experiment: ExperimentConfig,
    #[serde(default)]
    pub env: GoEnvConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub cartpole: CartPoleConfig,
}

/// Settings shared by every component
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_exp_root")]
    pub exp_root: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            exp_root: defaults::exp_root().into(),
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// The knobs most often changed between runs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    #[serde(default = "d_board_size")]
    pub board_size: u32,
    #[serde(default = "d_collector_env_num")]
    pub collector_env_num: u32,
    #[serde(default = "d_n_episode")]
    pub n_episode: u32,
    #[serde(default = "d_evaluator_env_num")]
    pub evaluator_env_num: u32,
    #[serde(default = "d_update_per_collect")]
    pub update_per_collect: u32,
    #[serde(default = "d_batch_size")]
    pub batch_size: u32,
    #[serde(default = "d_max_env_step")]
    pub max_env_step: u64,
    #[serde(default = "d_prob_random")]
    pub prob_random_action_in_bot: f64,
    /// Overrides the board-size lookup when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_simulations: Option<u32>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            collector_env_num: defaults::collector_env_num(),
            n_episode: defaults::n_episode(),
            evaluator_env_num: defaults::evaluator_env_num(),
            update_per_collect: defaults::update_per_collect(),
            batch_size: defaults::batch_size(),
            max_env_step: defaults::max_env_step(),
            prob_random_action_in_bot: defaults::prob_random_action_in_bot(),
            num_simulations: None,
        }
    }
}

/// Go environment settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GoEnvConfig {
    #[serde(default = "d_komi")]
    pub komi: f64,
    #[serde(default = "d_battle_mode")]
    pub battle_mode: BattleMode,
    #[serde(default = "d_bot_action_type")]
    pub bot_action_type: String,
    #[serde(default = "d_channel_last")]
    pub channel_last: bool,
    #[serde(default = "d_shared_memory")]
    pub shared_memory: bool,
}

impl Default for GoEnvConfig {
    fn default() -> Self {
        Self {
            komi: defaults::komi(),
            battle_mode: defaults::battle_mode(),
            bot_action_type: defaults::bot_action_type().into(),
            channel_last: defaults::channel_last(),
            shared_memory: defaults::shared_memory(),
        }
    }
}

/// Learner and network settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    #[serde(default = "d_env_type")]
    pub env_type: String,
    #[serde(default = "d_torch_compile")]
    pub torch_compile: bool,
    #[serde(default = "d_tensor_float_32")]
    pub tensor_float_32: bool,
    #[serde(default = "d_num_res_blocks")]
    pub num_res_blocks: u32,
    #[serde(default = "d_num_channels")]
    pub num_channels: u32,
    #[serde(default = "d_cuda")]
    pub cuda: bool,
    #[serde(default = "d_optim_type")]
    pub optim_type: OptimType,
    #[serde(default = "d_lr_piecewise")]
    pub lr_piecewise_constant_decay: bool,
    #[serde(default = "d_lr")]
    pub learning_rate: f64,
    #[serde(default = "d_manual_temp_decay")]
    pub manual_temperature_decay: bool,
    #[serde(default = "d_grad_clip")]
    pub grad_clip_value: f64,
    #[serde(default = "d_value_weight")]
    pub value_weight: f64,
    #[serde(default = "d_entropy_weight")]
    pub entropy_weight: f64,
    #[serde(default = "d_eval_freq")]
    pub eval_freq: u64,
    #[serde(default = "d_replay_buffer_size")]
    pub replay_buffer_size: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            env_type: defaults::env_type().into(),
            torch_compile: defaults::torch_compile(),
            tensor_float_32: defaults::tensor_float_32(),
            num_res_blocks: defaults::num_res_blocks(),
            num_channels: defaults::num_channels(),
            cuda: defaults::cuda(),
            optim_type: defaults::optim_type(),
            lr_piecewise_constant_decay: defaults::lr_piecewise_constant_decay(),
            learning_rate: defaults::learning_rate(),
            manual_temperature_decay: defaults::manual_temperature_decay(),
            grad_clip_value: defaults::grad_clip_value(),
            value_weight: defaults::value_weight(),
            entropy_weight: defaults::entropy_weight(),
            eval_freq: defaults::eval_freq(),
            replay_buffer_size: defaults::replay_buffer_size(),
        }
    }
}

/// CartPole env settings used by rollouts
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CartPoleConfig {
    #[serde(default = "d_obs_plus_prev")]
    pub obs_plus_prev_action_reward: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_path: Option<String>,
    #[serde(default = "d_dynamic_seed")]
    pub dynamic_seed: bool,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            obs_plus_prev_action_reward: defaults::obs_plus_prev_action_reward(),
            replay_path: None,
            dynamic_seed: defaults::dynamic_seed(),
        }
    }
}

impl CartPoleConfig {
    /// Env construction settings derived from this section.
    pub fn env_settings(&self) -> zoo_core::EnvSettings {
        let mut settings =
            zoo_core::EnvSettings::default().with_prev_action_reward(self.obs_plus_prev_action_reward);
        if let Some(path) = &self.replay_path {
            settings = settings.with_replay_path(path);
        }
        settings
    }
}
