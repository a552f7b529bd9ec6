//! CartPole simulator for zoo
//!
//! A pole is attached by an unactuated joint to a cart moving along a
//! frictionless track. The agent pushes the cart left or right; the episode
//! ends when the pole tilts more than 12 degrees or the cart leaves the
//! track. Dynamics follow Barto, Sutton & Anderson (1983).
//!
//! # Observation
//!
//! ```text
//! [0] cart position        [-4.8, 4.8]
//! [1] cart velocity        (-inf, inf)
//! [2] pole angle (rad)     [-0.418, 0.418]
//! [3] pole angular vel.    (-inf, inf)
//! ```
//!
//! # Actions
//!
//! `0` pushes the cart left, `1` pushes it right.
//!
//! # Usage
//!
//! ```rust
//! use zoo_cartpole::{register_cartpole, ENV_ID};
//! use zoo_core::{create_env, EnvSettings};
//!
//! register_cartpole();
//!
//! let mut env = create_env(ENV_ID, &EnvSettings::default())
//!     .expect("cartpole should be registered")
//!     .unwrap();
//! env.seed(0, false);
//! let obs = env.reset().unwrap();
//! assert_eq!(obs.action_mask, vec![1, 1]);
//! ```

use rand::Rng;
use rand_chacha::ChaCha20Rng;
use std::f64::consts::PI;
use tracing::warn;
use zoo_core::{
    register_env, EnvError, EnvResult, EnvSettings, SimStep, Simulator, SimulatorEnv, Space,
    TimeLimit,
};

/// Registry identifier of the adapted environment
pub const ENV_ID: &str = "cartpole_lightzero";

/// Identifier of the wrapped simulator
pub const SPEC_ID: &str = "CartPole-v0";

/// Time limit of CartPole-v0
pub const MAX_EPISODE_STEPS: u32 = 200;

pub const NUM_ACTIONS: u32 = 2;

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
/// Half the pole's length
const LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
/// Seconds between state updates
const TAU: f64 = 0.02;

/// Pole angle at which the episode fails
pub const THETA_THRESHOLD_RADIANS: f64 = 12.0 * 2.0 * PI / 360.0;
/// Cart position at which the episode fails
pub const X_THRESHOLD: f64 = 2.4;

/// Half-width of the initial state distribution
const RESET_BOUND: f64 = 0.05;

/// Register CartPole with the global environment registry
///
/// Call once at startup to make it available via
/// `create_env("cartpole_lightzero", ..)`.
pub fn register_cartpole() {
    register_env!(ENV_ID, cartpole_env);
}

/// Build the time-limited simulator stack
pub fn make_simulator() -> Box<dyn Simulator> {
    Box::new(TimeLimit::new(CartPole::new(), MAX_EPISODE_STEPS))
}

/// Build the adapted environment directly, bypassing the registry
pub fn cartpole_env(settings: &EnvSettings) -> EnvResult<SimulatorEnv> {
    let env = SimulatorEnv::new(ENV_ID, "CartPole", settings.clone(), Box::new(make_simulator))?;
    Ok(env.with_declared_observation_space(declared_observation_space()))
}

/// Observation bounds the environment advertises before its first reset
pub fn declared_observation_space() -> Space {
    Space::bounded(
        vec![-4.8, f32::NEG_INFINITY, -0.42, f32::NEG_INFINITY],
        vec![4.8, f32::INFINITY, 0.42, f32::INFINITY],
    )
}

/// Integration scheme for the equations of motion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Kinematics {
    #[default]
    Euler,
    SemiImplicitEuler,
}

/// Cart and pole state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    pub fn to_observation(&self) -> Vec<f32> {
        vec![
            self.x as f32,
            self.x_dot as f32,
            self.theta as f32,
            self.theta_dot as f32,
        ]
    }

    /// Cart off the track or pole past the failure angle
    pub fn is_terminal(&self) -> bool {
        self.x < -X_THRESHOLD
            || self.x > X_THRESHOLD
            || self.theta < -THETA_THRESHOLD_RADIANS
            || self.theta > THETA_THRESHOLD_RADIANS
    }
}

/// CartPole simulator
#[derive(Debug, Clone, Default)]
pub struct CartPole {
    kinematics: Kinematics,
    /// `None` until the first reset
    state: Option<CartPoleState>,
    /// Steps taken since the pole fell; `None` while the episode is live
    steps_beyond_done: Option<u32>,
}

impl CartPole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinematics(mut self, kinematics: Kinematics) -> Self {
        self.kinematics = kinematics;
        self
    }

    pub fn state(&self) -> Option<CartPoleState> {
        self.state
    }

    /// Overwrite the state (for tests and replays)
    pub fn set_state(&mut self, state: CartPoleState) {
        self.state = Some(state);
        self.steps_beyond_done = None;
    }

    /// Integrate one time step under `force`
    fn integrate(&self, s: CartPoleState, force: f64) -> CartPoleState {
        let (sin_theta, cos_theta) = s.theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * s.theta_dot * s.theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        match self.kinematics {
            Kinematics::Euler => CartPoleState {
                x: s.x + TAU * s.x_dot,
                x_dot: s.x_dot + TAU * x_acc,
                theta: s.theta + TAU * s.theta_dot,
                theta_dot: s.theta_dot + TAU * theta_acc,
            },
            Kinematics::SemiImplicitEuler => {
                let x_dot = s.x_dot + TAU * x_acc;
                let theta_dot = s.theta_dot + TAU * theta_acc;
                CartPoleState {
                    x: s.x + TAU * x_dot,
                    x_dot,
                    theta: s.theta + TAU * theta_dot,
                    theta_dot,
                }
            }
        }
    }
}

impl Simulator for CartPole {
    fn spec_id(&self) -> &str {
        SPEC_ID
    }

    fn observation_space(&self) -> Space {
        let high = vec![
            (X_THRESHOLD * 2.0) as f32,
            f32::MAX,
            (THETA_THRESHOLD_RADIANS * 2.0) as f32,
            f32::MAX,
        ];
        let low = high.iter().map(|h| -h).collect();
        Space::bounded(low, high)
    }

    fn action_space(&self) -> Space {
        Space::discrete(NUM_ACTIONS)
    }

    fn reset(&mut self, rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
        let mut sample = || rng.gen_range(-RESET_BOUND..RESET_BOUND);
        let state = CartPoleState {
            x: sample(),
            x_dot: sample(),
            theta: sample(),
            theta_dot: sample(),
        };
        self.state = Some(state);
        self.steps_beyond_done = None;
        Ok(state.to_observation())
    }

    fn step(&mut self, action: i64, _rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
        if !(0..NUM_ACTIONS as i64).contains(&action) {
            return Err(EnvError::InvalidAction(format!(
                "{action} is not in Discrete({NUM_ACTIONS})"
            )));
        }
        let state = self.state.ok_or(EnvError::NotInitialized("step"))?;

        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let next = self.integrate(state, force);
        self.state = Some(next);

        let terminated = next.is_terminal();
        let reward = match (terminated, self.steps_beyond_done) {
            (false, _) => 1.0,
            (true, None) => {
                self.steps_beyond_done = Some(0);
                1.0
            }
            (true, Some(beyond)) => {
                if beyond == 0 {
                    warn!(
                        "step() called after the episode terminated; \
                         call reset() once done is true. Further steps yield zero reward."
                    );
                }
                self.steps_beyond_done = Some(beyond + 1);
                0.0
            }
        };

        Ok(SimStep {
            observation: next.to_observation(),
            reward,
            terminated,
            truncated: false,
        })
    }
}

#[cfg(test)]
mod tests;
