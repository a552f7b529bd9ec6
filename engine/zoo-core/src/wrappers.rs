//! Simulator wrappers
//!
//! Wrappers are themselves simulators, so they stack: the adapter builds
//! `RecordEpisodes(TimeLimit(CartPole))` and treats the result as opaque.

use rand_chacha::ChaCha20Rng;
use std::path::PathBuf;

use crate::error::{EnvError, EnvResult};
use crate::replay::{ReplayFrame, ReplayRecorder};
use crate::simulator::{SimStep, Simulator};
use crate::space::Space;

/// Ends episodes after a fixed number of steps
#[derive(Debug)]
pub struct TimeLimit<S> {
    inner: S,
    max_episode_steps: u32,
    /// `None` until the first reset
    elapsed_steps: Option<u32>,
}

impl<S: Simulator> TimeLimit<S> {
    pub fn new(inner: S, max_episode_steps: u32) -> Self {
        Self {
            inner,
            max_episode_steps,
            elapsed_steps: None,
        }
    }

    pub fn elapsed_steps(&self) -> Option<u32> {
        self.elapsed_steps
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Simulator> Simulator for TimeLimit<S> {
    fn spec_id(&self) -> &str {
        self.inner.spec_id()
    }

    fn observation_space(&self) -> Space {
        self.inner.observation_space()
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn max_episode_steps(&self) -> Option<u32> {
        Some(self.max_episode_steps)
    }

    fn reset(&mut self, rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
        self.elapsed_steps = Some(0);
        self.inner.reset(rng)
    }

    fn step(&mut self, action: i64, rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
        let elapsed = self
            .elapsed_steps
            .as_mut()
            .ok_or(EnvError::NotInitialized("step"))?;
        let mut out = self.inner.step(action, rng)?;
        *elapsed += 1;
        if *elapsed >= self.max_episode_steps && !out.terminated {
            out.truncated = true;
        }
        Ok(out)
    }

    fn close(&mut self) -> EnvResult<()> {
        self.inner.close()
    }
}

/// Records every episode as a replay file
#[derive(Debug)]
pub struct RecordEpisodes<S> {
    inner: S,
    recorder: ReplayRecorder,
    step: u32,
}

impl<S: Simulator> RecordEpisodes<S> {
    pub fn new(
        inner: S,
        replay_dir: impl Into<PathBuf>,
        name_prefix: impl Into<String>,
    ) -> EnvResult<Self> {
        Ok(Self {
            inner,
            recorder: ReplayRecorder::new(replay_dir, name_prefix)?,
            step: 0,
        })
    }

    pub fn recorder(&self) -> &ReplayRecorder {
        &self.recorder
    }
}

impl<S: Simulator> Simulator for RecordEpisodes<S> {
    fn spec_id(&self) -> &str {
        self.inner.spec_id()
    }

    fn observation_space(&self) -> Space {
        self.inner.observation_space()
    }

    fn action_space(&self) -> Space {
        self.inner.action_space()
    }

    fn max_episode_steps(&self) -> Option<u32> {
        self.inner.max_episode_steps()
    }

    fn reset(&mut self, rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
        let observation = self.inner.reset(rng)?;
        self.step = 0;
        self.recorder.begin_episode()?;
        self.recorder.record(&ReplayFrame {
            step: 0,
            observation: observation.clone(),
            action: None,
            reward: 0.0,
            done: false,
        })?;
        Ok(observation)
    }

    fn step(&mut self, action: i64, rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
        let out = self.inner.step(action, rng)?;
        self.step += 1;
        self.recorder.record(&ReplayFrame {
            step: self.step,
            observation: out.observation.clone(),
            action: Some(action),
            reward: out.reward,
            done: out.done(),
        })?;
        if out.done() {
            self.recorder.finish_episode()?;
        }
        Ok(out)
    }

    fn close(&mut self) -> EnvResult<()> {
        self.recorder.finish_episode()?;
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::read_episode;
    use rand::SeedableRng;

    /// Counts steps; terminates at `terminal_at` if set
    #[derive(Debug)]
    struct Counter {
        count: u32,
        terminal_at: Option<u32>,
    }

    impl Simulator for Counter {
        fn spec_id(&self) -> &str {
            "Counter-v0"
        }

        fn observation_space(&self) -> Space {
            Space::bounded(vec![0.0], vec![f32::INFINITY])
        }

        fn action_space(&self) -> Space {
            Space::discrete(2)
        }

        fn reset(&mut self, _rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
            self.count = 0;
            Ok(vec![0.0])
        }

        fn step(&mut self, _action: i64, _rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
            self.count += 1;
            Ok(SimStep {
                observation: vec![self.count as f32],
                reward: 1.0,
                terminated: self.terminal_at == Some(self.count),
                truncated: false,
            })
        }
    }

    fn counter(terminal_at: Option<u32>) -> Counter {
        Counter {
            count: 0,
            terminal_at,
        }
    }

    #[test]
    fn test_time_limit_truncates() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut sim = TimeLimit::new(counter(None), 3);
        sim.reset(&mut rng).unwrap();

        assert!(!sim.step(0, &mut rng).unwrap().done());
        assert!(!sim.step(0, &mut rng).unwrap().done());
        let last = sim.step(0, &mut rng).unwrap();
        assert!(last.truncated);
        assert!(!last.terminated);
        assert_eq!(sim.max_episode_steps(), Some(3));
    }

    #[test]
    fn test_time_limit_does_not_flag_terminal_step() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut sim = TimeLimit::new(counter(Some(2)), 2);
        sim.reset(&mut rng).unwrap();
        sim.step(0, &mut rng).unwrap();
        let last = sim.step(0, &mut rng).unwrap();
        assert!(last.terminated);
        assert!(!last.truncated);
    }

    #[test]
    fn test_time_limit_requires_reset() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut sim = TimeLimit::new(counter(None), 3);
        assert!(matches!(
            sim.step(0, &mut rng),
            Err(EnvError::NotInitialized("step"))
        ));
    }

    #[test]
    fn test_time_limit_resets_counter() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut sim = TimeLimit::new(counter(None), 2);
        sim.reset(&mut rng).unwrap();
        sim.step(0, &mut rng).unwrap();
        sim.reset(&mut rng).unwrap();
        assert_eq!(sim.elapsed_steps(), Some(0));
        assert!(!sim.step(0, &mut rng).unwrap().done());
    }

    #[test]
    fn test_record_episodes_writes_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut sim = RecordEpisodes::new(counter(Some(2)), dir.path(), "rec").unwrap();

        sim.reset(&mut rng).unwrap();
        sim.step(1, &mut rng).unwrap();
        sim.step(0, &mut rng).unwrap();
        sim.close().unwrap();

        let frames = read_episode(sim.recorder().episode_path(0)).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].action, None);
        assert_eq!(frames[1].action, Some(1));
        assert_eq!(frames[2].observation, vec![2.0]);
        assert!(frames[2].done);
    }
}
