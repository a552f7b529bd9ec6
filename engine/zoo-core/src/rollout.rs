//! Random-policy rollouts
//!
//! Drives an `Env` with `random_action` until the episode ends. Used to
//! smoke-test environments from the CLI and as a conformance harness in
//! tests.

use serde::Serialize;
use tracing::debug;

use crate::env::Env;
use crate::error::EnvResult;

/// Outcome of one rollout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub steps: u32,
    pub episode_return: f32,
    /// Ended by a time limit rather than the dynamics
    pub truncated: bool,
    /// `false` when `max_steps` was hit before the env reported done
    pub finished: bool,
}

/// Play one episode with uniformly random actions
///
/// `max_steps` guards against environments without a time limit.
pub fn run_episode(env: &mut dyn Env, max_steps: Option<u32>) -> EnvResult<EpisodeSummary> {
    env.reset()?;
    let mut steps = 0u32;
    let mut running_return = 0.0f32;

    loop {
        if max_steps.is_some_and(|cap| steps >= cap) {
            debug!(env_id = env.env_id(), steps, "Rollout stopped at step cap");
            return Ok(EpisodeSummary {
                steps,
                episode_return: running_return,
                truncated: false,
                finished: false,
            });
        }

        let action = env.random_action();
        let timestep = env.step(&action)?;
        steps += 1;
        running_return += timestep.reward;

        if timestep.done {
            return Ok(EpisodeSummary {
                steps,
                episode_return: timestep.info.eval_episode_return.unwrap_or(running_return),
                truncated: timestep.info.truncated,
                finished: true,
            });
        }
    }
}

/// Play `episodes` episodes back to back
pub fn run_episodes(
    env: &mut dyn Env,
    episodes: u32,
    max_steps: Option<u32>,
) -> EnvResult<Vec<EpisodeSummary>> {
    (0..episodes).map(|_| run_episode(env, max_steps)).collect()
}

/// Mean return over summaries, `None` when empty
pub fn mean_return(summaries: &[EpisodeSummary]) -> Option<f32> {
    if summaries.is_empty() {
        return None;
    }
    let total: f32 = summaries.iter().map(|s| s.episode_return).sum();
    Some(total / summaries.len() as f32)
}
