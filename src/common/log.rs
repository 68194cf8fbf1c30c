//! Logging setup
//!
//! This module provides the initialization helper for the logging system.

/// Initialize the global logger
///
/// `level` is the default filter; `RUST_LOG` overrides it.
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    env_logger::init_from_env(env);
}
