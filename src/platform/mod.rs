//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend (console on web, env_logger natively)
//! - Entropy for fresh game seeds

/// Install the log backend for the current target. Safe to call twice.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the log backend for the current target. Safe to call twice.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Seed for a new game when the host has none to replay
pub fn entropy_seed() -> u64 {
    rand::random()
}
