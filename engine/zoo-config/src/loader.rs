//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "ZOO_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by ZOO_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, bool, enums via FromStr)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring unparsable {}={}", $key, raw),
            }
        }
    };
    // Optional string field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = Some(v);
        }
    };
    // Optional parseable field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = Some(v),
                Err(_) => warn!("Ignoring unparsable {}={}", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ZOO_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.exp_root, "ZOO_COMMON_EXP_ROOT");
    env_override!(config, common.log_level, "ZOO_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "ZOO_COMMON_SEED", parse);

    // Experiment
    env_override!(config, experiment.board_size, "ZOO_EXPERIMENT_BOARD_SIZE", parse);
    env_override!(
        config,
        experiment.collector_env_num,
        "ZOO_EXPERIMENT_COLLECTOR_ENV_NUM",
        parse
    );
    env_override!(config, experiment.n_episode, "ZOO_EXPERIMENT_N_EPISODE", parse);
    env_override!(
        config,
        experiment.evaluator_env_num,
        "ZOO_EXPERIMENT_EVALUATOR_ENV_NUM",
        parse
    );
    env_override!(
        config,
        experiment.update_per_collect,
        "ZOO_EXPERIMENT_UPDATE_PER_COLLECT",
        parse
    );
    env_override!(config, experiment.batch_size, "ZOO_EXPERIMENT_BATCH_SIZE", parse);
    env_override!(
        config,
        experiment.max_env_step,
        "ZOO_EXPERIMENT_MAX_ENV_STEP",
        parse
    );
    env_override!(
        config,
        experiment.prob_random_action_in_bot,
        "ZOO_EXPERIMENT_PROB_RANDOM_ACTION_IN_BOT",
        parse
    );
    env_override!(
        config,
        experiment.num_simulations,
        "ZOO_EXPERIMENT_NUM_SIMULATIONS",
        optional_parse
    );

    // Env
    env_override!(config, env.komi, "ZOO_ENV_KOMI", parse);
    env_override!(config, env.battle_mode, "ZOO_ENV_BATTLE_MODE", parse);
    env_override!(config, env.bot_action_type, "ZOO_ENV_BOT_ACTION_TYPE");
    env_override!(config, env.channel_last, "ZOO_ENV_CHANNEL_LAST", parse);
    env_override!(config, env.shared_memory, "ZOO_ENV_SHARED_MEMORY", parse);

    // Policy
    env_override!(config, policy.env_type, "ZOO_POLICY_ENV_TYPE");
    env_override!(config, policy.torch_compile, "ZOO_POLICY_TORCH_COMPILE", parse);
    env_override!(
        config,
        policy.tensor_float_32,
        "ZOO_POLICY_TENSOR_FLOAT_32",
        parse
    );
    env_override!(config, policy.cuda, "ZOO_POLICY_CUDA", parse);
    env_override!(config, policy.optim_type, "ZOO_POLICY_OPTIM_TYPE", parse);
    env_override!(config, policy.learning_rate, "ZOO_POLICY_LEARNING_RATE", parse);
    env_override!(
        config,
        policy.num_res_blocks,
        "ZOO_POLICY_NUM_RES_BLOCKS",
        parse
    );
    env_override!(config, policy.num_channels, "ZOO_POLICY_NUM_CHANNELS", parse);
    env_override!(
        config,
        policy.lr_piecewise_constant_decay,
        "ZOO_POLICY_LR_PIECEWISE_CONSTANT_DECAY",
        parse
    );
    env_override!(
        config,
        policy.manual_temperature_decay,
        "ZOO_POLICY_MANUAL_TEMPERATURE_DECAY",
        parse
    );
    env_override!(
        config,
        policy.grad_clip_value,
        "ZOO_POLICY_GRAD_CLIP_VALUE",
        parse
    );
    env_override!(config, policy.value_weight, "ZOO_POLICY_VALUE_WEIGHT", parse);
    env_override!(
        config,
        policy.entropy_weight,
        "ZOO_POLICY_ENTROPY_WEIGHT",
        parse
    );
    env_override!(config, policy.eval_freq, "ZOO_POLICY_EVAL_FREQ", parse);
    env_override!(
        config,
        policy.replay_buffer_size,
        "ZOO_POLICY_REPLAY_BUFFER_SIZE",
        parse
    );

    // CartPole
    env_override!(
        config,
        cartpole.obs_plus_prev_action_reward,
        "ZOO_CARTPOLE_OBS_PLUS_PREV_ACTION_REWARD",
        parse
    );
    env_override!(config, cartpole.replay_path, "ZOO_CARTPOLE_REPLAY_PATH", optional);
    env_override!(config, cartpole.dynamic_seed, "ZOO_CARTPOLE_DYNAMIC_SEED", parse);

    config
}
