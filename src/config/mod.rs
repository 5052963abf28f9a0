//! Engine Configuration Module
//!
//! Provides deployment configuration loaded from TOML files. Every model
//! constant (prices, rule thresholds, reliability parameters) is an
//! operator-tunable value with a built-in default.
//!
//! ## Loading Order
//!
//! 1. `ROUTEWISE_CONFIG` environment variable (path to TOML file)
//! 2. `routewise.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The engines take their config sections explicitly. The binary also
//! publishes the loaded config process-wide, calling `init()` before anything
//! reads it:
//!
//! ```ignore
//! // In main():
//! config::init(AppConfig::load());
//!
//! // Anywhere in the binary:
//! let cap = config::get().network.bounded_result_cap;
//! ```

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;

use std::sync::OnceLock;

/// Process-wide configuration, initialized once at startup.
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Publish the process-wide configuration.
///
/// Subsequent calls are ignored with a warning.
pub fn init(config: AppConfig) {
    if APP_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the process-wide configuration.
///
/// The first call before `init()` freezes the built-in defaults and any
/// later `init()` is ignored. Library code should pass an `AppConfig`
/// explicitly (`RouteOptimizer::with_config`, `MonitoringService::new`).
pub fn get() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::default)
}
