//! Environment metadata for listings and harness configuration
//!
//! Harnesses use this to size policy heads (`num_actions`), observation
//! encoders (`obs_size`) and to know whether `to_play` carries meaning.

use serde::{Deserialize, Serialize};

/// Descriptive metadata about a registered environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvMetadata {
    /// Registry identifier (e.g., "cartpole_lightzero")
    pub env_id: String,

    /// Human-readable name
    pub display_name: String,

    /// Identifier of the wrapped simulator (e.g., "CartPole-v0")
    pub simulator_id: String,

    /// Number of discrete actions
    pub num_actions: usize,

    /// Length of the observation vector
    pub obs_size: usize,

    /// Number of agents taking turns (1 for control tasks)
    pub player_count: usize,

    /// Episode step cap imposed by a time limit, if any
    pub max_episode_steps: Option<u32>,

    /// Brief description for listings
    pub description: String,
}

impl EnvMetadata {
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            simulator_id: String::new(),
            num_actions: 0,
            obs_size: 0,
            player_count: 1,
            max_episode_steps: None,
            description: String::new(),
        }
    }

    pub fn with_simulator(mut self, simulator_id: impl Into<String>) -> Self {
        self.simulator_id = simulator_id.into();
        self
    }

    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    pub fn with_observation(mut self, obs_size: usize) -> Self {
        self.obs_size = obs_size;
        self
    }

    pub fn with_time_limit(mut self, max_episode_steps: Option<u32>) -> Self {
        self.max_episode_steps = max_episode_steps;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
