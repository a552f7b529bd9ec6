//! Resolution of the user-facing config into the nested record consumed by
//! the AlphaZero `train` entry point.

use crate::structs::{BattleMode, CentralConfig, OptimType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Stacked feature planes per board position in the Go observation.
pub const GO_OBSERVATION_PLANES: u32 = 17;

/// Largest board the Go env accepts.
pub const MAX_BOARD_SIZE: u32 = 25;

/// Errors produced while resolving or exporting a training config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no default num_simulations for board size {0}; set experiment.num_simulations")]
    UnsupportedBoardSize(u32),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to encode config as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode config as TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// MCTS simulations per move for the board sizes with a tuned budget.
pub fn num_simulations_for(board_size: u32) -> Option<u32> {
    match board_size {
        19 => Some(800),
        9 => Some(180),
        6 => Some(80),
        _ => None,
    }
}

/// Named override bundles applied on top of a loaded config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Use the loaded config unchanged
    #[default]
    Standard,
    /// Tiny settings for a quick end-to-end smoke run
    Debug,
}

impl Preset {
    pub fn apply(self, config: &mut CentralConfig) {
        if self == Preset::Debug {
            let exp = &mut config.experiment;
            exp.board_size = 6;
            exp.collector_env_num = 1;
            exp.n_episode = 1;
            exp.evaluator_env_num = 1;
            exp.num_simulations = Some(2);
            exp.update_per_collect = 2;
            exp.batch_size = 2;
            exp.max_env_step = 500_000;
            exp.prob_random_action_in_bot = 0.0;
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Preset::Standard),
            "debug" => Ok(Preset::Debug),
            other => Err(format!("unknown preset: {other}")),
        }
    }
}

/// Output encoding for an exported training config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Toml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Toml => f.write_str("toml"),
        }
    }
}

// ============================================================================
// Resolved record
// ============================================================================

/// Everything `train` needs: both config dicts plus the run-level arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub seed: u64,
    pub max_env_step: u64,
    pub main_config: MainConfig,
    pub create_config: CreateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainConfig {
    pub exp_name: String,
    pub env: EnvSection,
    pub policy: PolicySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvSection {
    pub board_size: u32,
    pub komi: f64,
    pub battle_mode: BattleMode,
    pub bot_action_type: String,
    pub prob_random_action_in_bot: f64,
    pub channel_last: bool,
    pub collector_env_num: u32,
    pub evaluator_env_num: u32,
    pub n_evaluator_episode: u32,
    pub manager: ManagerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerSection {
    pub shared_memory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySection {
    pub env_type: String,
    pub torch_compile: bool,
    pub tensor_float_32: bool,
    pub cuda: bool,
    pub board_size: u32,
    pub update_per_collect: u32,
    pub batch_size: u32,
    pub optim_type: OptimType,
    pub lr_piecewise_constant_decay: bool,
    pub learning_rate: f64,
    pub manual_temperature_decay: bool,
    pub grad_clip_value: f64,
    pub value_weight: f64,
    pub entropy_weight: f64,
    pub n_episode: u32,
    pub eval_freq: u64,
    pub replay_buffer_size: u64,
    pub collector_env_num: u32,
    pub evaluator_env_num: u32,
    pub model: ModelSection,
    pub mcts: MctsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub observation_shape: [u32; 3],
    pub action_space_size: u32,
    pub num_res_blocks: u32,
    pub num_channels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MctsSection {
    pub num_simulations: u32,
}

/// Component selection for the trainer: which registered type to build and
/// which modules register it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_train_sample: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub import_names: Vec<String>,
}

impl ComponentSpec {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            get_train_sample: None,
            import_names: Vec::new(),
        }
    }

    fn imported_from(mut self, module: &str) -> Self {
        self.import_names.push(module.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConfig {
    pub env: ComponentSpec,
    pub env_manager: ComponentSpec,
    pub policy: ComponentSpec,
    pub collector: ComponentSpec,
    pub evaluator: ComponentSpec,
}

impl Default for CreateConfig {
    fn default() -> Self {
        let mut collector = ComponentSpec::new("episode_alphazero")
            .imported_from("lzero.worker.alphazero_collector");
        collector.get_train_sample = Some(false);
        Self {
            env: ComponentSpec::new("go").imported_from("zoo.board_games.go.envs.go_env"),
            env_manager: ComponentSpec::new("subprocess"),
            policy: ComponentSpec::new("alphazero").imported_from("lzero.policy.alphazero"),
            collector,
            evaluator: ComponentSpec::new("alphazero")
                .imported_from("lzero.worker.alphazero_evaluator"),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn validate(config: &CentralConfig) -> Result<(), ConfigError> {
    let exp = &config.experiment;
    let counts = [
        ("experiment.board_size", exp.board_size),
        ("experiment.collector_env_num", exp.collector_env_num),
        ("experiment.n_episode", exp.n_episode),
        ("experiment.evaluator_env_num", exp.evaluator_env_num),
        ("experiment.update_per_collect", exp.update_per_collect),
        ("experiment.batch_size", exp.batch_size),
    ];
    for (field, value) in counts {
        if value == 0 {
            return Err(invalid(field, "must be positive"));
        }
    }
    if exp.board_size > MAX_BOARD_SIZE {
        return Err(invalid(
            "experiment.board_size",
            format!("{} exceeds the maximum of {MAX_BOARD_SIZE}", exp.board_size),
        ));
    }
    if exp.max_env_step == 0 {
        return Err(invalid("experiment.max_env_step", "must be positive"));
    }
    if exp.num_simulations == Some(0) {
        return Err(invalid("experiment.num_simulations", "must be positive"));
    }
    let prob = exp.prob_random_action_in_bot;
    if !(0.0..=1.0).contains(&prob) {
        return Err(invalid(
            "experiment.prob_random_action_in_bot",
            format!("{prob} is outside [0, 1]"),
        ));
    }
    let lr = config.policy.learning_rate;
    if !(lr.is_finite() && lr > 0.0) {
        return Err(invalid("policy.learning_rate", format!("{lr} is not positive")));
    }
    Ok(())
}

impl TrainConfig {
    /// Validate `config` and expand it into the nested training record.
    pub fn resolve(config: &CentralConfig) -> Result<Self, ConfigError> {
        validate(config)?;

        let exp = &config.experiment;
        let board = exp.board_size;
        let num_simulations = match exp.num_simulations {
            Some(n) => n,
            None => num_simulations_for(board).ok_or(ConfigError::UnsupportedBoardSize(board))?,
        };

        let exp_name = format!(
            "{}/go_b{}_alphazero_sp-mode_rand{}_ns{}_upc{}_seed{}",
            config.common.exp_root,
            board,
            exp.prob_random_action_in_bot,
            num_simulations,
            exp.update_per_collect,
            config.common.seed
        );
        debug!(exp_name = %exp_name, num_simulations, "Resolved training config");

        let env = EnvSection {
            board_size: board,
            komi: config.env.komi,
            battle_mode: config.env.battle_mode,
            bot_action_type: config.env.bot_action_type.clone(),
            prob_random_action_in_bot: exp.prob_random_action_in_bot,
            channel_last: config.env.channel_last,
            collector_env_num: exp.collector_env_num,
            evaluator_env_num: exp.evaluator_env_num,
            n_evaluator_episode: exp.evaluator_env_num,
            manager: ManagerSection {
                shared_memory: config.env.shared_memory,
            },
        };

        let p = &config.policy;
        let policy = PolicySection {
            env_type: p.env_type.clone(),
            torch_compile: p.torch_compile,
            tensor_float_32: p.tensor_float_32,
            cuda: p.cuda,
            board_size: board,
            update_per_collect: exp.update_per_collect,
            batch_size: exp.batch_size,
            optim_type: p.optim_type,
            lr_piecewise_constant_decay: p.lr_piecewise_constant_decay,
            learning_rate: p.learning_rate,
            manual_temperature_decay: p.manual_temperature_decay,
            grad_clip_value: p.grad_clip_value,
            value_weight: p.value_weight,
            entropy_weight: p.entropy_weight,
            n_episode: exp.n_episode,
            eval_freq: p.eval_freq,
            replay_buffer_size: p.replay_buffer_size,
            collector_env_num: exp.collector_env_num,
            evaluator_env_num: exp.evaluator_env_num,
            model: ModelSection {
                observation_shape: [board, board, GO_OBSERVATION_PLANES],
                action_space_size: board * board + 1,
                num_res_blocks: p.num_res_blocks,
                num_channels: p.num_channels,
            },
            mcts: MctsSection { num_simulations },
        };

        Ok(Self {
            seed: config.common.seed,
            max_env_step: exp.max_env_step,
            main_config: MainConfig {
                exp_name,
                env,
                policy,
            },
            create_config: CreateConfig::default(),
        })
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, ConfigError> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Toml => self.to_toml(),
        }
    }
}
