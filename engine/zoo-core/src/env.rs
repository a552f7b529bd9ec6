//! Uniform environment interface consumed by training harnesses
//!
//! Every environment exposes the same lifecycle: `seed` (optional) then
//! `reset`, repeated `step` calls until `done`, then `reset` again or
//! `close`. Observations always arrive as an `Observation` record and
//! transitions as a `Timestep`, whatever the underlying simulator.

use std::path::PathBuf;

use crate::action::Action;
use crate::error::EnvResult;
use crate::metadata::EnvMetadata;
use crate::space::Space;
use crate::timestep::{Observation, Timestep};

/// Environment trait used by collectors and evaluators
///
/// # Example
///
/// ```rust,ignore
/// use zoo_core::{Env, create_env, EnvSettings};
///
/// let mut env = create_env("cartpole_lightzero", &EnvSettings::default()).unwrap()?;
/// env.seed(0, true);
/// let obs = env.reset()?;
/// let action = env.random_action();
/// let timestep = env.step(&action)?;
/// if timestep.done {
///     println!("return: {:?}", timestep.info.eval_episode_return);
/// }
/// ```
pub trait Env: Send + std::fmt::Debug + std::fmt::Display {
    /// Registry identifier of this environment
    fn env_id(&self) -> &str;

    fn metadata(&self) -> EnvMetadata;

    /// Start a new episode
    ///
    /// The first call initialises the wrapped simulator. Pending seeds are
    /// applied on every call.
    fn reset(&mut self) -> EnvResult<Observation>;

    /// Advance one step
    ///
    /// # Errors
    ///
    /// `NotInitialized` before the first `reset` (or after `close`),
    /// `InvalidAction` for malformed or out-of-range actions.
    fn step(&mut self, action: &Action) -> EnvResult<Timestep>;

    /// Set the seed used by subsequent resets
    ///
    /// With `dynamic_seed`, each reset adds a fresh random offset to `seed`
    /// so that consecutive episodes differ while remaining reproducible
    /// from the seed as a whole.
    fn seed(&mut self, seed: u64, dynamic_seed: bool);

    /// Shut down the simulator; a later `reset` re-creates it
    fn close(&mut self) -> EnvResult<()>;

    /// Record episodes under `replay_path` (defaults to `./video`)
    ///
    /// Takes effect the next time the simulator is created.
    fn enable_save_replay(&mut self, replay_path: Option<PathBuf>);

    /// Sample an action uniformly from the action space
    fn random_action(&mut self) -> Action;

    fn observation_space(&self) -> &Space;

    fn action_space(&self) -> &Space;

    fn reward_space(&self) -> &Space;
}
