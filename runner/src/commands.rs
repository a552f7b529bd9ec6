//! Subcommand implementations

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{info, warn};
use zoo_config::{CentralConfig, TrainConfig};
use zoo_core::{
    create_env, list_registered_envs, mean_return, run_episodes, EnvMetadata, EnvSettings,
    EpisodeSummary,
};

use crate::cli::{ConfigArgs, RolloutArgs};

/// Resolve the training config and write it to `args.output` or return it.
///
/// Returns the rendered text when no output path is given.
pub fn export_config(config: &CentralConfig, args: &ConfigArgs) -> Result<Option<String>> {
    let mut config = config.clone();
    zoo_config::Preset::from(args.preset).apply(&mut config);

    let train = TrainConfig::resolve(&config).context("Failed to resolve training config")?;
    if train.main_config.policy.tensor_float_32 {
        info!("TF32 matmul enabled for the learner");
    }
    let text = train.render(args.format.into())?;

    match &args.output {
        Some(path) => {
            write_file(path, &text)?;
            info!(
                exp_name = %train.main_config.exp_name,
                path = %path.display(),
                "Wrote training config"
            );
            Ok(None)
        }
        None => Ok(Some(text)),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Play random episodes and return their summaries.
pub fn rollout(config: &CentralConfig, args: &RolloutArgs) -> Result<Vec<EpisodeSummary>> {
    args.validate()?;
    zoo_envs::register_all_envs();

    let mut settings = config.cartpole.env_settings();
    if let Some(dir) = &args.replay_dir {
        settings = settings.with_replay_path(dir);
    }

    let mut env = create_env(&args.env, &settings)
        .ok_or_else(|| {
            anyhow!(
                "Unknown environment '{}' (available: {})",
                args.env,
                list_registered_envs().join(", ")
            )
        })?
        .with_context(|| format!("Failed to create environment '{}'", args.env))?;

    let seed = args.seed.unwrap_or(config.common.seed);
    let dynamic_seed = config.cartpole.dynamic_seed && !args.no_dynamic_seed;
    env.seed(seed, dynamic_seed);
    info!(env = %env, seed, dynamic_seed, episodes = args.episodes, "Starting rollout");

    let summaries = run_episodes(env.as_mut(), args.episodes, args.max_steps)?;
    for (i, summary) in summaries.iter().enumerate() {
        info!(
            episode = i,
            steps = summary.steps,
            episode_return = summary.episode_return,
            truncated = summary.truncated,
            "Episode finished"
        );
        if !summary.finished {
            warn!(episode = i, "Episode hit the step cap before terminating");
        }
    }
    if let Some(mean) = mean_return(&summaries) {
        info!(mean_return = mean, episodes = summaries.len(), "Rollout complete");
    }

    env.close()?;
    Ok(summaries)
}

/// Metadata of every registered environment, sorted by ID.
pub fn list_envs() -> Result<Vec<EnvMetadata>> {
    zoo_envs::register_all_envs();
    let settings = EnvSettings::default();
    list_registered_envs()
        .iter()
        .filter_map(|id| create_env(id, &settings))
        .map(|created| -> Result<EnvMetadata> {
            let mut env = created?;
            let metadata = env.metadata();
            env.close()?;
            Ok(metadata)
        })
        .collect()
}
