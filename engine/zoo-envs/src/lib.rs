//! Environment registration for zoo
//!
//! This crate provides a single initialization point for registering all
//! available environments with the zoo-core registry.
//!
//! # Usage
//!
//! ```rust
//! use zoo_envs::register_all_envs;
//!
//! // Call once at startup - safe to call multiple times
//! register_all_envs();
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Register all available environments with the zoo-core registry.
///
/// Uses `std::sync::Once`, so repeated or concurrent calls register each
/// environment exactly once.
///
/// Currently registers:
/// - CartPole (`"cartpole_lightzero"`)
pub fn register_all_envs() {
    INIT.call_once(|| {
        zoo_cartpole::register_cartpole();
    });
}

pub use zoo_cartpole::register_cartpole;

/// Environment used when a caller does not name one
pub const DEFAULT_ENV_ID: &str = zoo_cartpole::ENV_ID;
