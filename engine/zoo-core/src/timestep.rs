//! Per-step records handed to the training harness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Turn indicator used by single-player environments
pub const NO_PLAYER: i32 = -1;

/// Observation record returned by `reset` and `step`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Raw state vector from the simulator
    pub observation: Vec<f32>,
    /// Legal action mask (1 = legal, 0 = illegal)
    pub action_mask: Vec<i8>,
    /// Player to move, `NO_PLAYER` for single-agent control tasks
    pub to_play: i32,
    /// Previous action, only when prev-action/reward augmentation is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_action: Option<i64>,
    /// Previous reward, only when prev-action/reward augmentation is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_reward: Option<f32>,
}

impl Observation {
    /// Single-player observation where every action is legal.
    pub fn all_legal(observation: Vec<f32>, num_actions: usize) -> Self {
        Self {
            observation,
            action_mask: vec![1; num_actions],
            to_play: NO_PLAYER,
            prev_action: None,
            prev_reward: None,
        }
    }

    pub fn with_prev(mut self, action: i64, reward: f32) -> Self {
        self.prev_action = Some(action);
        self.prev_reward = Some(reward);
        self
    }
}

/// Side-channel info produced alongside a step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Sum of rewards over the episode, set on the terminal step only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_episode_return: Option<f32>,
    /// The episode was cut by a time limit rather than by the dynamics
    #[serde(rename = "TimeLimit.truncated", default)]
    pub truncated: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, f64>,
}

/// Result of one environment transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestep {
    pub obs: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_serializes_three_keys() {
        let obs = Observation::all_legal(vec![0.0; 4], 2);
        let value = serde_json::to_value(&obs).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 3);
        for key in ["observation", "action_mask", "to_play"] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
        assert_eq!(value["to_play"], -1);
        assert_eq!(value["action_mask"], serde_json::json!([1, 1]));
    }

    #[test]
    fn test_prev_fields_serialized_when_present() {
        let obs = Observation::all_legal(vec![0.0; 4], 2).with_prev(-1, 0.0);
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(value["prev_action"], -1);
        assert_eq!(value["prev_reward"], 0.0);
    }

    #[test]
    fn test_step_info_keys() {
        let info = StepInfo {
            eval_episode_return: Some(12.0),
            truncated: true,
            extra: BTreeMap::new(),
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["eval_episode_return"], 12.0);
        assert_eq!(value["TimeLimit.truncated"], true);

        let empty = serde_json::to_value(StepInfo::default()).unwrap();
        assert!(empty.get("eval_episode_return").is_none());
    }
}
