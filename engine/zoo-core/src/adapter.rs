//! Adapter exposing any `Simulator` through the `Env` interface
//!
//! `SimulatorEnv` owns the seeding policy, the episode-return bookkeeping
//! and the observation record layout. The simulator itself is created
//! lazily on the first `reset` from a factory, wrapped in a replay
//! recorder when replays are enabled.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::action::Action;
use crate::env::Env;
use crate::error::{EnvError, EnvResult};
use crate::metadata::EnvMetadata;
use crate::settings::EnvSettings;
use crate::simulator::Simulator;
use crate::space::{SeededSpace, Space, SpaceSample};
use crate::timestep::{Observation, StepInfo, Timestep};
use crate::wrappers::RecordEpisodes;

/// Directory used by `enable_save_replay(None)`
pub const DEFAULT_REPLAY_DIR: &str = "./video";

/// Creates a fresh simulator stack
pub type SimulatorFactory = Box<dyn Fn() -> Box<dyn Simulator> + Send>;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(0);

/// Generic `Env` implementation over a discrete-action simulator
pub struct SimulatorEnv {
    env_id: String,
    display_name: String,
    settings: EnvSettings,
    factory: SimulatorFactory,
    /// `Some` once initialised
    sim: Option<Box<dyn Simulator>>,
    simulator_id: String,
    max_episode_steps: Option<u32>,
    replay_path: Option<PathBuf>,
    observation_space: Space,
    action_space: SeededSpace,
    reward_space: Space,
    num_actions: usize,
    seed: Option<u64>,
    dynamic_seed: bool,
    /// Draws the per-reset offsets of dynamic seeding
    seed_rng: ChaCha20Rng,
    /// Handed to the simulator on reset/step
    sim_rng: ChaCha20Rng,
    eval_episode_return: f32,
    instance_id: u64,
}

impl SimulatorEnv {
    /// Create an adapter; the factory is probed once for spaces and limits.
    ///
    /// # Errors
    ///
    /// Fails with `Simulator` if the simulator does not expose a discrete
    /// action space.
    pub fn new(
        env_id: impl Into<String>,
        display_name: impl Into<String>,
        settings: EnvSettings,
        factory: SimulatorFactory,
    ) -> EnvResult<Self> {
        let probe = factory();
        let action_space = probe.action_space();
        let num_actions = action_space.n().ok_or_else(|| {
            EnvError::Simulator(format!(
                "{} has a non-discrete action space",
                probe.spec_id()
            ))
        })? as usize;

        Ok(Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            replay_path: settings.replay_path.clone(),
            settings,
            simulator_id: probe.spec_id().to_string(),
            max_episode_steps: probe.max_episode_steps(),
            observation_space: probe.observation_space(),
            action_space: SeededSpace::new(action_space),
            reward_space: Space::bounded(vec![0.0], vec![1.0]),
            num_actions,
            factory,
            sim: None,
            seed: None,
            dynamic_seed: true,
            seed_rng: ChaCha20Rng::seed_from_u64(0),
            sim_rng: ChaCha20Rng::from_entropy(),
            eval_episode_return: 0.0,
            instance_id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Observation space reported until the simulator is initialised
    pub fn with_declared_observation_space(mut self, space: Space) -> Self {
        self.observation_space = space;
        self
    }

    pub fn with_reward_space(mut self, space: Space) -> Self {
        self.reward_space = space;
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.sim.is_some()
    }

    /// Return accumulated since the last reset
    pub fn episode_return(&self) -> f32 {
        self.eval_episode_return
    }

    pub fn replay_path(&self) -> Option<&PathBuf> {
        self.replay_path.as_ref()
    }

    fn init_simulator(&mut self) -> EnvResult<()> {
        let mut sim = (self.factory)();
        if let Some(path) = &self.replay_path {
            let prefix = format!("rl-replay-{}", self.instance_id);
            info!(env_id = %self.env_id, path = %path.display(), "Recording episodes");
            sim = Box::new(RecordEpisodes::new(sim, path.clone(), prefix)?);
        }
        debug!(env_id = %self.env_id, simulator = sim.spec_id(), "Simulator initialized");
        self.observation_space = sim.observation_space();
        self.sim = Some(sim);
        Ok(())
    }

    fn apply_seed(&mut self) {
        let Some(seed) = self.seed else {
            return;
        };
        let effective = if self.dynamic_seed {
            let offset = 100 * self.seed_rng.gen_range(1..1000u64);
            seed.wrapping_add(offset)
        } else {
            seed
        };
        self.sim_rng = ChaCha20Rng::seed_from_u64(effective);
        self.action_space.seed(effective);
    }

    fn observation(&self, raw: Vec<f32>) -> Observation {
        Observation::all_legal(raw, self.num_actions)
    }
}

impl Env for SimulatorEnv {
    fn env_id(&self) -> &str {
        &self.env_id
    }

    fn metadata(&self) -> EnvMetadata {
        EnvMetadata::new(&self.env_id, &self.display_name)
            .with_simulator(&self.simulator_id)
            .with_actions(self.num_actions)
            .with_observation(self.observation_space.flat_len())
            .with_time_limit(self.max_episode_steps)
    }

    fn reset(&mut self) -> EnvResult<Observation> {
        if self.sim.is_none() {
            self.init_simulator()?;
        }
        self.apply_seed();
        self.eval_episode_return = 0.0;

        let sim = self.sim.as_mut().ok_or(EnvError::NotInitialized("reset"))?;
        let raw = sim.reset(&mut self.sim_rng)?;

        let obs = self.observation(raw);
        if self.settings.obs_plus_prev_action_reward {
            return Ok(obs.with_prev(-1, 0.0));
        }
        Ok(obs)
    }

    fn step(&mut self, action: &Action) -> EnvResult<Timestep> {
        let action = action.squeeze()?;
        let sim = self.sim.as_mut().ok_or(EnvError::NotInitialized("step"))?;
        let out = sim.step(action, &mut self.sim_rng)?;

        self.eval_episode_return += out.reward;
        let done = out.done();
        let mut info = StepInfo {
            truncated: out.truncated,
            ..StepInfo::default()
        };
        if done {
            info.eval_episode_return = Some(self.eval_episode_return);
            debug!(
                env_id = %self.env_id,
                episode_return = self.eval_episode_return,
                truncated = out.truncated,
                "Episode finished"
            );
        }

        let mut obs = self.observation(out.observation);
        if self.settings.obs_plus_prev_action_reward {
            obs = obs.with_prev(action, out.reward);
        }

        Ok(Timestep {
            obs,
            reward: out.reward,
            done,
            info,
        })
    }

    fn seed(&mut self, seed: u64, dynamic_seed: bool) {
        self.seed = Some(seed);
        self.dynamic_seed = dynamic_seed;
        self.seed_rng = ChaCha20Rng::seed_from_u64(seed);
    }

    fn close(&mut self) -> EnvResult<()> {
        if let Some(mut sim) = self.sim.take() {
            sim.close()?;
        }
        Ok(())
    }

    fn enable_save_replay(&mut self, replay_path: Option<PathBuf>) {
        let path = replay_path.unwrap_or_else(|| PathBuf::from(DEFAULT_REPLAY_DIR));
        if self.sim.is_some() {
            debug!(env_id = %self.env_id, "Replay path takes effect after close()");
        }
        self.replay_path = Some(path);
    }

    fn random_action(&mut self) -> Action {
        match self.action_space.sample() {
            SpaceSample::Discrete(a) => Action::Array(vec![a]),
            SpaceSample::Box(_) => {
                unreachable!("action space is discrete, checked in SimulatorEnv::new")
            }
        }
    }

    fn observation_space(&self) -> &Space {
        &self.observation_space
    }

    fn action_space(&self) -> &Space {
        self.action_space.space()
    }

    fn reward_space(&self) -> &Space {
        &self.reward_space
    }
}

impl fmt::Debug for SimulatorEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatorEnv")
            .field("env_id", &self.env_id)
            .field("simulator_id", &self.simulator_id)
            .field("initialized", &self.sim.is_some())
            .field("seed", &self.seed)
            .field("dynamic_seed", &self.dynamic_seed)
            .field("replay_path", &self.replay_path)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SimulatorEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LightZero {} Env", self.display_name)
    }
}
