//! Outbound application events.
//!
//! The [`LightController`](super::service::LightController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them; the firmware logs them to
//! the serial console.

use crate::arbiter::LightCause;
use crate::error::SensorError;
use crate::sensors::PresenceEdge;
use crate::settings::SettingKey;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started; carries the initial light state.
    Started { light: bool },

    /// The arbiter accepted an ON/OFF transition.
    LightChanged { on: bool, cause: LightCause },

    /// The IR debouncer reached its pulse threshold.
    MotionDetected,

    /// The ultrasonic reading crossed the presence threshold.
    PresenceChanged { edge: PresenceEdge, distance_cm: f32 },

    /// A ranging cycle failed and was skipped.
    RangingSkipped(SensorError),

    /// An editor or toggle committed a new value.
    SettingChanged { key: SettingKey, value: i32 },

    /// Settings were reset to defaults from the menu.
    SettingsReset,

    /// The activity log refused an append because it is full.
    ActivityLogFull,

    /// The activity log was cleared from the menu.
    ActivityLogCleared,
}
