use super::*;
use once_cell::sync::Lazy;
use rand::SeedableRng;
use std::sync::Mutex;
use zoo_core::{
    create_env, is_registered, read_episode, run_episode, Action, Env, Observation, SpaceSample,
};

static REGISTRY_TEST_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn test_reset_within_bounds() {
    let mut sim = CartPole::new();
    let mut rng = rng(1);
    for _ in 0..50 {
        let obs = sim.reset(&mut rng).unwrap();
        assert_eq!(obs.len(), 4);
        assert!(obs.iter().all(|v| v.abs() < 0.05));
    }
}

#[test]
fn test_step_before_reset() {
    let mut sim = CartPole::new();
    let err = sim.step(0, &mut rng(0)).unwrap_err();
    assert!(matches!(err, EnvError::NotInitialized("step")));
}

#[test]
fn test_invalid_action() {
    let mut sim = CartPole::new();
    let mut rng = rng(0);
    sim.reset(&mut rng).unwrap();
    for bad in [-1, 2, 100] {
        let err = sim.step(bad, &mut rng).unwrap_err();
        assert!(matches!(err, EnvError::InvalidAction(_)));
    }
}

#[test]
fn test_push_direction() {
    let mut sim = CartPole::new();
    let mut rng = rng(0);

    sim.set_state(CartPoleState::default());
    sim.step(1, &mut rng).unwrap();
    sim.step(1, &mut rng).unwrap();
    let right = sim.state().unwrap();
    assert!(right.x_dot > 0.0);
    assert!(right.x > 0.0);
    // Pushing the cart right tips the pole left
    assert!(right.theta_dot < 0.0);

    sim.set_state(CartPoleState::default());
    sim.step(0, &mut rng).unwrap();
    let left = sim.state().unwrap();
    assert!(left.x_dot < 0.0);
    assert!(left.theta_dot > 0.0);
}

#[test]
fn test_euler_single_step_values() {
    let mut sim = CartPole::new();
    sim.set_state(CartPoleState::default());
    let out = sim.step(1, &mut rng(0)).unwrap();

    // From rest: temp = 10/1.1, theta_acc = -temp / (0.5 * (4/3 - 0.1/1.1))
    let temp = FORCE_MAG / TOTAL_MASS;
    let theta_acc = -temp / (LENGTH * (4.0 / 3.0 - MASS_POLE / TOTAL_MASS));
    let x_acc = temp - POLE_MASS_LENGTH * theta_acc / TOTAL_MASS;

    let state = sim.state().unwrap();
    assert_eq!(state.x, 0.0);
    assert_eq!(state.theta, 0.0);
    assert!((state.x_dot - TAU * x_acc).abs() < 1e-12);
    assert!((state.theta_dot - TAU * theta_acc).abs() < 1e-12);
    assert_eq!(out.reward, 1.0);
    assert!(!out.terminated);
}

#[test]
fn test_semi_implicit_euler_moves_position_immediately() {
    let mut sim = CartPole::new().with_kinematics(Kinematics::SemiImplicitEuler);
    sim.set_state(CartPoleState::default());
    sim.step(1, &mut rng(0)).unwrap();
    let state = sim.state().unwrap();
    assert!(state.x > 0.0);
    assert!((state.x - TAU * state.x_dot).abs() < 1e-12);
}

#[test]
fn test_terminates_on_pole_angle() {
    let mut sim = CartPole::new();
    sim.set_state(CartPoleState {
        theta: THETA_THRESHOLD_RADIANS - 1e-4,
        theta_dot: 1.0,
        ..CartPoleState::default()
    });
    let out = sim.step(0, &mut rng(0)).unwrap();
    assert!(out.terminated);
    assert_eq!(out.reward, 1.0);
}

#[test]
fn test_terminates_on_cart_position() {
    let mut sim = CartPole::new();
    sim.set_state(CartPoleState {
        x: -X_THRESHOLD + 1e-3,
        x_dot: -1.0,
        ..CartPoleState::default()
    });
    let out = sim.step(0, &mut rng(0)).unwrap();
    assert!(out.terminated);
}

#[test]
fn test_steps_beyond_done_yield_zero_reward() {
    let mut sim = CartPole::new();
    let mut rng = rng(0);
    sim.set_state(CartPoleState {
        theta: THETA_THRESHOLD_RADIANS + 0.01,
        ..CartPoleState::default()
    });
    assert_eq!(sim.step(0, &mut rng).unwrap().reward, 1.0);
    assert_eq!(sim.step(0, &mut rng).unwrap().reward, 0.0);
    assert_eq!(sim.step(0, &mut rng).unwrap().reward, 0.0);

    sim.reset(&mut rng).unwrap();
    assert_eq!(sim.step(0, &mut rng).unwrap().reward, 1.0);
}

#[test]
fn test_constant_push_fails_quickly() {
    let mut sim = CartPole::new();
    let mut rng = rng(5);
    sim.reset(&mut rng).unwrap();
    let mut steps = 0;
    while !sim.step(1, &mut rng).unwrap().terminated {
        steps += 1;
        assert!(steps < 100, "pole should fall under a constant push");
    }
}

#[test]
fn test_simulator_spaces() {
    let sim = CartPole::new();
    assert_eq!(sim.action_space(), Space::discrete(2));
    let Space::Box { low, high, shape } = sim.observation_space() else {
        panic!("expected box observation space");
    };
    assert_eq!(shape, vec![4]);
    assert_eq!(high[0], 4.8);
    assert_eq!(high[1], f32::MAX);
    assert!((high[2] - 0.418_879).abs() < 1e-5);
    assert_eq!(low[0], -4.8);
}

#[test]
fn test_time_limit_truncates_live_episode() {
    // Five steps from the reset distribution cannot tip the pole past 12 degrees
    let mut sim = TimeLimit::new(CartPole::new(), 5);
    let mut rng = rng(0);
    sim.reset(&mut rng).unwrap();

    for _ in 0..4 {
        assert!(!sim.step(1, &mut rng).unwrap().done());
    }
    let out = sim.step(1, &mut rng).unwrap();
    assert!(out.truncated);
    assert!(!out.terminated);
}

#[test]
fn test_registered_stack_has_v0_time_limit() {
    let sim = make_simulator();
    assert_eq!(sim.max_episode_steps(), Some(MAX_EPISODE_STEPS));
    assert_eq!(sim.spec_id(), SPEC_ID);
}

#[test]
fn test_env_reset_record() {
    let mut env = cartpole_env(&EnvSettings::default()).unwrap();
    env.seed(0, true);
    let obs: Observation = env.reset().unwrap();

    assert_eq!(obs.observation.len(), 4);
    assert_eq!(obs.action_mask, vec![1, 1]);
    assert_eq!(obs.to_play, -1);

    let json = serde_json::to_value(&obs).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["action_mask", "observation", "to_play"]);
}

#[test]
fn test_env_declared_then_simulator_space() {
    let mut env = cartpole_env(&EnvSettings::default()).unwrap();
    assert_eq!(env.observation_space(), &declared_observation_space());
    env.reset().unwrap();
    assert_eq!(env.observation_space(), &CartPole::new().observation_space());
}

#[test]
fn test_env_episode_return_matches_steps() {
    let mut env = cartpole_env(&EnvSettings::default()).unwrap();
    env.seed(3, false);
    env.reset().unwrap();

    let mut steps = 0u32;
    loop {
        let action = env.random_action();
        let timestep = env.step(&action).unwrap();
        steps += 1;
        if timestep.done {
            assert_eq!(timestep.info.eval_episode_return, Some(steps as f32));
            break;
        }
    }
    assert!(steps <= MAX_EPISODE_STEPS);
}

#[test]
fn test_env_truncation_flag_in_info() {
    let factory: zoo_core::SimulatorFactory =
        Box::new(|| Box::new(TimeLimit::new(CartPole::new(), 3)) as Box<dyn Simulator>);
    let mut env = SimulatorEnv::new("short_cartpole", "CartPole", EnvSettings::default(), factory)
        .unwrap();
    env.seed(0, false);
    env.reset().unwrap();

    assert!(!env.step(&Action::Scalar(0)).unwrap().done);
    assert!(!env.step(&Action::Scalar(1)).unwrap().done);
    let timestep = env.step(&Action::Scalar(0)).unwrap();
    assert!(timestep.done);
    assert!(timestep.info.truncated);
    assert_eq!(timestep.info.eval_episode_return, Some(3.0));
}

#[test]
fn test_env_static_seed_reproducible() {
    let mut a = cartpole_env(&EnvSettings::default()).unwrap();
    let mut b = cartpole_env(&EnvSettings::default()).unwrap();
    a.seed(11, false);
    b.seed(11, false);

    let summary_a = run_episode(&mut a, None).unwrap();
    let summary_b = run_episode(&mut b, None).unwrap();
    assert_eq!(summary_a, summary_b);
    assert!(summary_a.finished);
}

#[test]
fn test_env_random_action_in_space() {
    let mut env = cartpole_env(&EnvSettings::default()).unwrap();
    env.seed(9, true);
    env.reset().unwrap();
    for _ in 0..50 {
        let Action::Array(values) = env.random_action() else {
            panic!("random_action must return a shape (1,) array");
        };
        assert_eq!(values.len(), 1);
        assert!(values[0] == 0 || values[0] == 1);
    }
    assert!(matches!(
        zoo_core::SeededSpace::new(Space::discrete(2)).sample(),
        SpaceSample::Discrete(_)
    ));
}

#[test]
fn test_env_replay_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut env = cartpole_env(&EnvSettings::default().with_replay_path(dir.path())).unwrap();
    env.seed(1, true);

    let first = run_episode(&mut env, None).unwrap();
    run_episode(&mut env, None).unwrap();
    env.close().unwrap();

    let mut files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    assert_eq!(files.len(), 2);

    let frames = read_episode(&files[0]).unwrap();
    assert_eq!(frames.len() as u32, first.steps + 1);
    assert!(frames.last().unwrap().done);
}

#[test]
fn test_display() {
    let env = cartpole_env(&EnvSettings::default()).unwrap();
    assert_eq!(env.to_string(), "LightZero CartPole Env");
    let meta = env.metadata();
    assert_eq!(meta.simulator_id, SPEC_ID);
    assert_eq!(meta.max_episode_steps, Some(MAX_EPISODE_STEPS));
    assert_eq!(meta.num_actions, 2);
    assert_eq!(meta.obs_size, 4);
}

#[test]
fn test_register_cartpole() {
    let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
    register_cartpole();
    assert!(is_registered(ENV_ID));

    let mut env = create_env(ENV_ID, &EnvSettings::default())
        .expect("registered")
        .unwrap();
    assert_eq!(env.env_id(), ENV_ID);
    assert!(env.reset().is_ok());
}
