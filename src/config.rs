//! System configuration parameters
//!
//! Tuning values for the control loops and peripherals.  These are compiled
//! defaults; user-facing settings live in [`crate::settings`] instead.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Loop timing ---
    /// Control actor tick (inbox drain + auto-off check), milliseconds
    pub actor_tick_ms: u32,
    /// Button pad poll interval, milliseconds
    pub input_poll_ms: u32,
    /// IR sample interval, milliseconds
    pub ir_poll_ms: u32,
    /// Ultrasonic ranging interval, milliseconds
    pub ultrasonic_poll_ms: u32,
    /// Activity watcher interval, milliseconds
    pub watcher_interval_ms: u32,

    // --- Sensors ---
    /// Delay between the two IR reads that confirm one pulse, milliseconds
    pub ir_settle_ms: u32,
    /// Bound on each ultrasonic echo phase, microseconds
    pub echo_timeout_us: u32,

    // --- Buttons ---
    /// Press confirmation delay, milliseconds
    pub button_confirm_ms: u32,
    /// Upper bound on the wait for a button release, milliseconds
    pub button_release_timeout_ms: u32,

    // --- Menu / log ---
    /// Depth of the menu back-navigation stack
    pub menu_stack_depth: usize,
    /// Number of records the activity log holds before refusing appends
    pub activity_log_capacity: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Loop timing
            actor_tick_ms: 10,
            input_poll_ms: 20,
            ir_poll_ms: 100,
            ultrasonic_poll_ms: 250,
            watcher_interval_ms: 500,

            // Sensors
            ir_settle_ms: 50,
            echo_timeout_us: 24_000,

            // Buttons
            button_confirm_ms: 5,
            button_release_timeout_ms: 1_000,

            // Menu / log
            menu_stack_depth: crate::menu::MAX_STACK_DEPTH,
            activity_log_capacity: 256,
        }
    }
}

impl SystemConfig {
    /// Range-check every tuning value.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.actor_tick_ms) {
            return Err(Error::Config("actor_tick_ms must be 1–100"));
        }
        if self.input_poll_ms == 0 || self.ir_poll_ms == 0 || self.ultrasonic_poll_ms == 0 {
            return Err(Error::Config("poll intervals must be non-zero"));
        }
        if !(100..=10_000).contains(&self.watcher_interval_ms) {
            return Err(Error::Config("watcher_interval_ms must be 100–10000"));
        }
        if self.ir_settle_ms > 500 {
            return Err(Error::Config("ir_settle_ms must be at most 500"));
        }
        if !(1_000..=50_000).contains(&self.echo_timeout_us) {
            return Err(Error::Config("echo_timeout_us must be 1000–50000"));
        }
        if !(1..=10_000).contains(&self.button_release_timeout_ms) {
            return Err(Error::Config("button_release_timeout_ms must be 1–10000"));
        }
        if !(1..=crate::menu::MAX_STACK_DEPTH).contains(&self.menu_stack_depth) {
            return Err(Error::Config("menu_stack_depth out of range"));
        }
        if !(1..=crate::adapters::event_log::MAX_RECORDS).contains(&self.activity_log_capacity) {
            return Err(Error::Config("activity_log_capacity out of range"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.echo_timeout_us, 24_000);
        assert_eq!(c.menu_stack_depth, 10);
        assert_eq!(c.activity_log_capacity, 256);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.ir_settle_ms, c2.ir_settle_ms);
        assert_eq!(c.watcher_interval_ms, c2.watcher_interval_ms);
        assert_eq!(c.menu_stack_depth, c2.menu_stack_depth);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(
            c.actor_tick_ms <= c.input_poll_ms,
            "actor must drain at least as fast as buttons are sampled"
        );
        assert!(
            c.ir_settle_ms < c.ir_poll_ms,
            "settle re-check must fit inside one IR cycle"
        );
        assert!(
            u64::from(c.echo_timeout_us) * 2 < u64::from(c.ultrasonic_poll_ms) * 1000,
            "worst-case ranging must fit inside one ultrasonic cycle"
        );
    }

    #[test]
    fn rejects_zero_release_timeout() {
        let c = SystemConfig {
            button_release_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_oversized_stack_depth() {
        let c = SystemConfig {
            menu_stack_depth: 11,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn postcard_roundtrip() {
        let c = SystemConfig::default();
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: SystemConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c.echo_timeout_us, c2.echo_timeout_us);
        assert_eq!(c.activity_log_capacity, c2.activity_log_capacity);
    }
}
