//! Static environment registry
//!
//! Environment crates register a factory under an identifier at startup;
//! harnesses then build instances by name with `create_env`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::env::Env;
use crate::error::EnvResult;
use crate::settings::EnvSettings;

/// Factory function type for creating environment instances
pub type EnvFactory = fn(&EnvSettings) -> EnvResult<Box<dyn Env>>;

/// Thread-safe registry mapping env_id to factory functions
static REGISTRY: Lazy<Mutex<HashMap<String, EnvFactory>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn registry() -> MutexGuard<'static, HashMap<String, EnvFactory>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register an environment factory under `env_id`
///
/// Registering an id twice replaces the earlier factory.
pub fn register_env(env_id: impl Into<String>, factory: EnvFactory) {
    let env_id = env_id.into();
    let mut registry = registry();
    if registry.contains_key(&env_id) {
        warn!(env_id = %env_id, "Overriding existing environment registration");
    }
    registry.insert(env_id, factory);
}

/// Create a new environment instance by env_id
///
/// Returns `None` if the id is unknown, `Some(Err(_))` if the factory
/// itself failed.
pub fn create_env(env_id: &str, settings: &EnvSettings) -> Option<EnvResult<Box<dyn Env>>> {
    let factory = registry().get(env_id).copied();
    match factory {
        Some(factory) => Some(factory(settings)),
        None => {
            warn!(env_id = %env_id, "Attempted to create unregistered environment");
            None
        }
    }
}

/// All registered env ids, sorted
pub fn list_registered_envs() -> Vec<String> {
    let mut ids: Vec<String> = registry().keys().cloned().collect();
    ids.sort();
    ids
}

pub fn is_registered(env_id: &str) -> bool {
    registry().contains_key(env_id)
}

/// Remove every registration (mainly for tests)
pub fn clear_registry() {
    registry().clear();
}

/// Register an environment constructor with the global registry
///
/// The constructor takes `&EnvSettings` and returns `EnvResult<E>` for any
/// concrete `E: Env`; the macro generates the boxing factory.
///
/// # Example
///
/// ```ignore
/// zoo_core::register_env!("cartpole_lightzero", cartpole_env);
/// ```
#[macro_export]
macro_rules! register_env {
    ($env_id:expr, $ctor:path) => {{
        fn factory(
            settings: &$crate::settings::EnvSettings,
        ) -> $crate::error::EnvResult<Box<dyn $crate::env::Env>> {
            let env = $ctor(settings)?;
            Ok(Box::new(env))
        }
        $crate::registry::register_env($env_id, factory);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SimulatorEnv;
    use crate::error::EnvError;
    use crate::simulator::{SimStep, Simulator};
    use crate::space::Space;
    use crate::test_utils::REGISTRY_TEST_MUTEX;
    use rand_chacha::ChaCha20Rng;

    #[derive(Debug)]
    struct Idle;

    impl Simulator for Idle {
        fn spec_id(&self) -> &str {
            "Idle-v0"
        }

        fn observation_space(&self) -> Space {
            Space::bounded(vec![0.0], vec![0.0])
        }

        fn action_space(&self) -> Space {
            Space::discrete(1)
        }

        fn reset(&mut self, _rng: &mut ChaCha20Rng) -> EnvResult<Vec<f32>> {
            Ok(vec![0.0])
        }

        fn step(&mut self, _action: i64, _rng: &mut ChaCha20Rng) -> EnvResult<SimStep> {
            Ok(SimStep {
                observation: vec![0.0],
                reward: 0.0,
                terminated: true,
                truncated: false,
            })
        }
    }

    fn idle_env(settings: &EnvSettings) -> EnvResult<SimulatorEnv> {
        SimulatorEnv::new(
            "idle",
            "Idle",
            settings.clone(),
            Box::new(|| Box::new(Idle) as Box<dyn Simulator>),
        )
    }

    fn idle_factory(settings: &EnvSettings) -> EnvResult<Box<dyn Env>> {
        Ok(Box::new(idle_env(settings)?))
    }

    fn failing_factory(_settings: &EnvSettings) -> EnvResult<Box<dyn Env>> {
        Err(EnvError::Simulator("boom".into()))
    }

    #[test]
    fn test_register_and_create() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_env("idle", idle_factory);
        assert!(is_registered("idle"));

        let env = create_env("idle", &EnvSettings::default())
            .expect("registered")
            .expect("factory succeeds");
        assert_eq!(env.env_id(), "idle");
    }

    #[test]
    fn test_unknown_env() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        assert!(!is_registered("missing"));
        assert!(create_env("missing", &EnvSettings::default()).is_none());
    }

    #[test]
    fn test_factory_error_surfaces() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_env("broken", failing_factory);
        let result = create_env("broken", &EnvSettings::default()).expect("registered");
        assert!(matches!(result, Err(EnvError::Simulator(_))));
    }

    #[test]
    fn test_list_sorted_and_override() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        register_env("b", idle_factory);
        register_env("a", idle_factory);
        register_env("a", failing_factory);

        assert_eq!(list_registered_envs(), vec!["a".to_string(), "b".to_string()]);
        assert!(create_env("a", &EnvSettings::default()).unwrap().is_err());
    }

    #[test]
    fn test_register_macro() {
        let _guard = REGISTRY_TEST_MUTEX.lock().unwrap();
        clear_registry();

        crate::register_env!("idle-macro", idle_env);
        let env = create_env("idle-macro", &EnvSettings::default())
            .expect("registered")
            .expect("factory succeeds");
        assert_eq!(env.metadata().simulator_id, "Idle-v0");
    }
}
