//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Wall-clock time (daily challenge selection, seeds)
//! - The JS-facing game handle (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the logger and panic hook for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already installed
        log::debug!("Logger already initialized");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // try_init: tests and the demo may both call this
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_unix_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_unix_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(now_unix_ms() > 1_577_836_800_000.0);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging();
        init_logging();
    }
}
