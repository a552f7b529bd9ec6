//! Per-instance environment settings (the `cfg` an env is built from).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options recognised by environment factories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSettings {
    /// Augment observations with the previous action and reward
    pub obs_plus_prev_action_reward: bool,
    /// Record every episode under this directory
    pub replay_path: Option<PathBuf>,
}

impl EnvSettings {
    pub fn with_prev_action_reward(mut self, enabled: bool) -> Self {
        self.obs_plus_prev_action_reward = enabled;
        self
    }

    pub fn with_replay_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.replay_path = Some(path.into());
        self
    }
}
