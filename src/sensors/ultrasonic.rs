//! HC-SR04 ultrasonic ranger and the presence edge detector.
//!
//! ## Ranging sequence
//!
//! ```text
//!   TRIG  ──┐  2 µs  ┌── 10 µs ──┐
//!           └────────┘           └──────────────
//!   ECHO  ─────────────────────────┐  duration  ┌───
//!                                  └────────────┘
//!         wait-for-rise ≤ timeout    wait-for-fall ≤ timeout
//! ```
//!
//! Both echo phases are bounded; expiry returns
//! [`SensorError::EchoTimeout`] and the caller skips the cycle.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::RangingPort;
use crate::error::SensorError;

/// Speed of sound, centimetres per microsecond.
const SOUND_CM_PER_US: f32 = 0.0343;

/// Default bound on each echo phase, microseconds.
pub const DEFAULT_ECHO_TIMEOUT_US: u32 = 24_000;

/// Monotonic microsecond time source for echo timing.
pub trait MicrosClock {
    fn now_us(&self) -> u64;
}

/// Convert an echo pulse width to a one-way distance.
pub fn echo_to_cm(duration_us: u64) -> f32 {
    duration_us as f32 * SOUND_CM_PER_US / 2.0
}

// ── Ranger ────────────────────────────────────────────────────

pub struct UltrasonicRanger<T, E, D, C> {
    trig: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u64,
}

impl<T, E, D, C> UltrasonicRanger<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    pub fn new(trig: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trig,
            echo,
            delay,
            clock,
            timeout_us: u64::from(timeout_us),
        }
    }

    fn trigger(&mut self) -> Result<(), SensorError> {
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(2);
        self.trig.set_high().map_err(|_| SensorError::GpioFailed)?;
        self.delay.delay_us(10);
        self.trig.set_low().map_err(|_| SensorError::GpioFailed)
    }

    /// Spin until ECHO reads `level`, returning the time it did.
    fn wait_for(&mut self, level: bool) -> Result<u64, SensorError> {
        let start = self.clock.now_us();
        loop {
            let now = self.clock.now_us();
            if self.echo.is_high().map_err(|_| SensorError::GpioFailed)? == level {
                return Ok(now);
            }
            if now.wrapping_sub(start) >= self.timeout_us {
                return Err(SensorError::EchoTimeout);
            }
        }
    }
}

impl<T, E, D, C> RangingPort for UltrasonicRanger<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    fn measure_distance_cm(&mut self) -> Result<f32, SensorError> {
        self.trigger()?;
        let rise = self.wait_for(true)?;
        let fall = self.wait_for(false)?;
        Ok(echo_to_cm(fall.wrapping_sub(rise)))
    }
}

// ── Presence edges ────────────────────────────────────────────

/// A threshold crossing reported by [`PresenceDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    /// Reading dropped below the threshold.
    Left,
    /// Reading rose back to or above the threshold.
    Returned,
}

/// Edge-triggered threshold detector.  Starts in an unknown state, so the
/// first valid reading always produces an edge.
#[derive(Debug, Default, Clone)]
pub struct PresenceDetector {
    below: Option<bool>,
}

impl PresenceDetector {
    pub const fn new() -> Self {
        Self { below: None }
    }

    pub fn update(&mut self, distance_cm: f32, threshold_cm: u16) -> Option<PresenceEdge> {
        let below = distance_cm < f32::from(threshold_cm);
        if self.below == Some(below) {
            return None;
        }
        self.below = Some(below);
        Some(if below {
            PresenceEdge::Left
        } else {
            PresenceEdge::Returned
        })
    }

    /// Forget the last level; the next reading is an edge again.
    pub fn reset(&mut self) {
        self.below = None;
    }
}
