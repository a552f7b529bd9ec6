//! Simulator trait wrapped by environment adapters
//!
//! A simulator owns the dynamics of a control task and nothing else: it
//! knows its spaces, how to reset, and how to advance one step. Masking,
//! turn indicators, episode accounting, seeding policy and replay
//! recording all live in the adapter layer (`SimulatorEnv`) and the
//! wrappers, so a simulator stays a plain state machine.

use rand_chacha::ChaCha20Rng;

use crate::error::EnvResult;
use crate::space::Space;

/// Raw output of one simulator transition
#[derive(Debug, Clone, PartialEq)]
pub struct SimStep {
    pub observation: Vec<f32>,
    pub reward: f32,
    /// The dynamics reached a terminal state
    pub terminated: bool,
    /// The episode was cut short by a wrapper (time limit)
    pub truncated: bool,
}

impl SimStep {
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Main trait for simulators
///
/// Implementations receive the RNG from the caller so that the adapter
/// controls seeding; a simulator must not keep its own entropy source.
pub trait Simulator: Send + std::fmt::Debug + 'static {
    /// Registry-style identifier, e.g. "CartPole-v0"
    fn spec_id(&self) -> &str;

    fn observation_space(&self) -> Space;

    fn action_space(&self) -> Space;

    /// Step cap applied by a time-limit wrapper, if any
    fn max_episode_steps(&self) -> Option<u32> {
        None
    }

    /// Start a new episode and return the initial observation
    fn reset(&mut self, rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>>;

    /// Advance one step
    fn step(&mut self, action: i64, rng: &mut ChaCha20Rng) -> EnvResult<SimStep>;

    /// Release resources (open replay files and the like)
    fn close(&mut self) -> EnvResult<()> {
        Ok(())
    }
}

impl<S: Simulator + ?Sized> Simulator for Box<S> {
    fn spec_id(&self) -> &str {
        (**self).spec_id()
    }

    fn observation_space(&self) -> Space {
        (**self).observation_space()
    }

    fn action_space(&self) -> Space {
        (**self).action_space()
    }

    fn max_episode_steps(&self) -> Option<u32> {
        (**self).max_episode_steps()
    }

    fn reset(&mut self, rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
        (**self).reset(rng)
    }

    fn step(&mut self, action: i64, rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
        (**self).step(action, rng)
    }

    fn close(&mut self) -> EnvResult<()> {
        (**self).close()
    }
}
