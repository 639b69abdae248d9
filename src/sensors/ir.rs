//! PIR motion sensor: confirmed reads and the pulse-count debouncer.
//!
//! A single reading counts as one *confirmed pulse* only when the pin is
//! active and still active after the settle delay.  The debouncer then
//! needs a run of consecutive confirmed pulses before it reports motion;
//! the run length is derived from the IR sensitivity setting.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::ports::MotionSensorPort;

/// Longest pulse run, used at sensitivity 1.
pub const MAX_REQUIRED_PULSES: u8 = 25;

/// One motion claim from the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion;

/// Consecutive confirmed pulses required at the given sensitivity (1–100).
///
/// `25 - (s - 1) * 24 / 99`, clamped to `1..=25`.  Out-of-range input is
/// clamped first so the map stays monotone.
pub fn required_pulses(sensitivity: u8) -> u8 {
    let s = i32::from(sensitivity.clamp(1, 100));
    let required = 25 - (s - 1) * 24 / 99;
    required.clamp(1, i32::from(MAX_REQUIRED_PULSES)) as u8
}

// ── Debouncer ─────────────────────────────────────────────────

/// Counts consecutive confirmed pulses.  No partial credit survives an
/// idle reading.
#[derive(Debug, Default, Clone)]
pub struct IrDebouncer {
    count: u8,
}

impl IrDebouncer {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Feed one sample.  Emits [`Motion`] on the sample that reaches the
    /// threshold and starts counting from zero again.
    pub fn feed(&mut self, confirmed: bool, sensitivity: u8) -> Option<Motion> {
        if !confirmed {
            self.count = 0;
            return None;
        }
        self.count = self.count.saturating_add(1);
        if self.count >= required_pulses(sensitivity) {
            self.count = 0;
            Some(Motion)
        } else {
            None
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

// ── Hardware reader ───────────────────────────────────────────

/// PIR output pin (active-high) plus the delay used for the settle
/// re-check.
pub struct IrSensor<P, D> {
    pin: P,
    delay: D,
    settle_ms: u32,
}

impl<P: InputPin, D: DelayNs> IrSensor<P, D> {
    pub fn new(pin: P, delay: D, settle_ms: u32) -> Self {
        Self {
            pin,
            delay,
            settle_ms,
        }
    }

    fn is_active(&mut self) -> bool {
        // A failed GPIO read is indistinguishable from "no motion".
        self.pin.is_high().unwrap_or_else(|_| {
            debug!("IR: GPIO read failed, treating as inactive");
            false
        })
    }
}

impl<P: InputPin, D: DelayNs> MotionSensorPort for IrSensor<P, D> {
    fn sample_confirmed(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.delay.delay_ms(self.settle_ms);
        self.is_active()
    }
}
