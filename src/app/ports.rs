//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightController (domain)
//! ```
//!
//! Driven adapters (display, LED, speaker, sensors, event log, storage)
//! implement these traits.  The
//! [`LightController`](super::service::LightController) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! ## Failure notes
//!
//! - Output ports (display, LED, audio) are infallible at this boundary:
//!   adapters log and swallow bus faults, since the core has no fatal path.
//! - Sensor and storage errors are typed; callers handle every variant.

use crate::error::{SensorError, StorageError};
use crate::settings::catalog::Signal;

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → two-line character display)
// ───────────────────────────────────────────────────────────────

/// Two-row, 16-column text display.
pub trait DisplayPort {
    /// Replace both rows.  Each line is at most 16 characters.
    fn render(&mut self, line1: &str, line2: &str);

    /// Blank the screen.
    fn clear(&mut self);

    /// Mark the selected row (1 or 2) with a blinking block.
    fn highlight_row(&mut self, row: u8);

    fn enable_cursor(&mut self);

    fn disable_cursor(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Light output port (driven adapter: domain → RGB PWM)
// ───────────────────────────────────────────────────────────────

pub trait LedPort {
    /// Drive the output at the given 8-bit components.
    fn set_color(&mut self, r: u8, g: u8, b: u8);

    /// Drive every channel to zero.
    fn turn_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Audio port (driven adapter: domain → speaker)
// ───────────────────────────────────────────────────────────────

pub trait AudioPort {
    /// Start playing `signal` at `volume` percent.  Returns immediately;
    /// playback runs on the speaker worker.
    fn play_signal(&mut self, signal: &Signal, volume: u8);

    /// Abort whatever is playing.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → sampler threads)
// ───────────────────────────────────────────────────────────────

/// Ultrasonic distance measurement.
pub trait RangingPort {
    /// One ranging cycle.  Blocks for at most two bounded echo phases.
    fn measure_distance_cm(&mut self) -> Result<f32, SensorError>;
}

/// Binary motion sensor.
pub trait MotionSensorPort {
    /// `true` when the sensor reads active and is still active after the
    /// settle delay.
    fn sample_confirmed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event log port (driven adapter: domain → append-only flash log)
// ───────────────────────────────────────────────────────────────

pub trait EventLogPort {
    /// Append one line.  Fails with [`StorageError::Full`] when the log has
    /// no free records.
    fn append(&mut self, event: &str) -> Result<(), StorageError>;

    /// Every stored line, oldest first.
    fn read_all(&self) -> Vec<String>;

    /// `(used_bytes, total_bytes)`.
    fn usage(&self) -> (usize, usize);

    /// Drop every record.
    fn clear(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage backing the activity log.
///
/// - Keys are namespaced to prevent collisions between subsystems.
/// - Write operations MUST be atomic, with no partial writes on power loss.
///   The ESP-IDF NVS API guarantees this natively; in-memory simulation
///   achieves it trivially.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the loop bodies)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a loop is due.
///
/// The [`LoopScheduler`](crate::scheduler::LoopScheduler) only tracks
/// deadlines; what a loop actually does is up to the delegate.
pub trait SchedulerDelegate {
    fn on_loop_due(&mut self, which: ControlLoop, now_ms: u64);
}

/// The periodically woken control loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLoop {
    /// Button pad poll.
    Input,
    /// PIR sample.
    Ir,
    /// Ultrasonic ranging.
    Ultrasonic,
    /// Settings-change watcher feeding the activity log.
    Watcher,
}

impl ControlLoop {
    pub const ALL: [ControlLoop; 4] = [Self::Input, Self::Ir, Self::Ultrasonic, Self::Watcher];

    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Ir => "ir",
            Self::Ultrasonic => "ultrasonic",
            Self::Watcher => "watcher",
        }
    }
}
