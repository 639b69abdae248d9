//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::PresenceEdge;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { light } => {
                info!("START | light={}", if *light { "ON" } else { "OFF" });
            }
            AppEvent::LightChanged { on, cause } => {
                info!(
                    "LIGHT | {} | cause={:?}",
                    if *on { "ON" } else { "OFF" },
                    cause
                );
            }
            AppEvent::MotionDetected => {
                info!("MOTION | threshold reached");
            }
            AppEvent::PresenceChanged { edge, distance_cm } => {
                let what = match edge {
                    PresenceEdge::Left => "left",
                    PresenceEdge::Returned => "returned",
                };
                info!("RANGE | presence {} at {:.1}cm", what, distance_cm);
            }
            AppEvent::RangingSkipped(e) => {
                // Timeouts are routine; keep them out of the info stream.
                debug!("RANGE | cycle skipped: {}", e);
            }
            AppEvent::SettingChanged { key, value } => {
                info!("SETTING | {} = {}", key.label(), value);
            }
            AppEvent::SettingsReset => {
                info!("SETTING | reset to defaults");
            }
            AppEvent::ActivityLogFull => {
                warn!("ACTLOG | full, appends refused");
            }
            AppEvent::ActivityLogCleared => {
                info!("ACTLOG | cleared");
            }
        }
    }
}
