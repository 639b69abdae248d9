//! Actuation arbiter: one authoritative ON/OFF decision for the light.
//!
//! ```text
//!                  ┌──────── ManualToggle (flip, clears latch) ────────┐
//!                  │                                                   ▼
//!   ┌─────┐  Motion (IR on)                 ┌────┐
//!   │ OFF │ ───────────────────────────────▶│ ON │  arms auto-off timer
//!   └─────┘ ◀───────────────────────────────└────┘
//!       PresenceLeft (US on, sets latch) / AutoOffExpired
//! ```
//!
//! Every accepted transition runs its side effects in a fixed order:
//!
//! 1. write `light` through the settings store,
//! 2. push the LED output (palette colour × brightness, or off),
//! 3. give the audio cue (stop, then play the selected signal if sound is on),
//! 4. arm or disarm the auto-off timer.
//!
//! The controller then redraws the menu and feeds the activity notifier.
//! Requests are processed one at a time to completion; there is no
//! priority scheme beyond "manual always wins and clears the latch".

use log::debug;

use crate::app::ports::{AudioPort, LedPort};
use crate::settings::{SettingKey, Settings, SettingsStore};

/// A request to change the light state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRequest {
    /// Menu "Light" toggle.
    ManualToggle,
    /// IR debouncer reached its threshold.
    Motion,
    /// Ultrasonic reading dropped below the threshold.
    PresenceLeft,
    /// Ultrasonic reading rose back to the threshold.
    PresenceReturned,
    /// The auto-off deadline passed.
    AutoOffExpired,
}

/// Why an accepted transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCause {
    Manual,
    Motion,
    Presence,
    AutoOff,
    /// Settings were reset while the light was on.
    Reset,
}

/// An accepted ON/OFF edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub on: bool,
    pub cause: LightCause,
}

// ── Auto-off timer ────────────────────────────────────────────

/// One-shot deadline on the monotonic millisecond clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AutoOffTimer {
    deadline_ms: Option<u64>,
}

impl AutoOffTimer {
    /// Arm for `secs` seconds from `now_ms`.  Zero leaves the timer disarmed.
    pub fn arm(&mut self, now_ms: u64, secs: u16) {
        self.deadline_ms = (secs > 0).then(|| now_ms.saturating_add(u64::from(secs) * 1000));
    }

    pub fn disarm(&mut self) {
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// `true` once the deadline has been reached.  Does not disarm.
    pub fn expired(&self, now_ms: u64) -> bool {
        self.deadline_ms.is_some_and(|d| now_ms >= d)
    }
}

// ── Arbiter ───────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct Arbiter {
    /// A sensor, not the user, last forced the light off.
    turned_off_by_sensor: bool,
    timer: AutoOffTimer,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latched(&self) -> bool {
        self.turned_off_by_sensor
    }

    pub fn timer(&self) -> &AutoOffTimer {
        &self.timer
    }

    /// Decide on `req` and, if it causes an edge, run the side effects.
    pub fn request(
        &mut self,
        req: LightRequest,
        now_ms: u64,
        settings: &mut SettingsStore,
        hw: &mut (impl LedPort + AudioPort),
    ) -> Option<Transition> {
        let s = *settings.values();
        let target = match req {
            LightRequest::ManualToggle => {
                self.turned_off_by_sensor = false;
                Some((!s.light, LightCause::Manual))
            }
            LightRequest::Motion => {
                (s.ir_enabled && !s.light).then_some((true, LightCause::Motion))
            }
            LightRequest::PresenceLeft => {
                if s.us_enabled && s.light {
                    self.turned_off_by_sensor = true;
                    Some((false, LightCause::Presence))
                } else {
                    None
                }
            }
            LightRequest::PresenceReturned => {
                if s.us_enabled {
                    self.turned_off_by_sensor = false;
                }
                None
            }
            LightRequest::AutoOffExpired => {
                self.timer.disarm();
                s.light.then_some((false, LightCause::AutoOff))
            }
        };

        let (on, cause) = target.or_else(|| {
            debug!("Arbiter: {:?} ignored (light={})", req, s.light);
            None
        })?;
        Some(self.apply(on, cause, now_ms, settings, hw))
    }

    /// Fire the auto-off timer if its deadline has passed.
    pub fn poll_auto_off(
        &mut self,
        now_ms: u64,
        settings: &mut SettingsStore,
        hw: &mut (impl LedPort + AudioPort),
    ) -> Option<Transition> {
        if !self.timer.expired(now_ms) {
            return None;
        }
        self.request(LightRequest::AutoOffExpired, now_ms, settings, hw)
    }

    /// Reset settings to defaults.  If the light was on this is an OFF edge
    /// with the usual side effects.
    pub fn reset(
        &mut self,
        settings: &mut SettingsStore,
        hw: &mut (impl LedPort + AudioPort),
    ) -> Option<Transition> {
        let was_on = settings.values().light;
        self.turned_off_by_sensor = false;
        self.timer.disarm();
        settings.reset();
        if !was_on {
            return None;
        }
        // `light` is already false after the reset; run steps 2–3.
        push_led(settings.values(), hw);
        audio_cue(settings.values(), hw);
        Some(Transition {
            on: false,
            cause: LightCause::Reset,
        })
    }

    fn apply(
        &mut self,
        on: bool,
        cause: LightCause,
        now_ms: u64,
        settings: &mut SettingsStore,
        hw: &mut (impl LedPort + AudioPort),
    ) -> Transition {
        // Flag domain: a 0/1 write is always accepted.
        settings.set_flag(SettingKey::Light, on);
        push_led(settings.values(), hw);
        audio_cue(settings.values(), hw);
        if on {
            self.timer.arm(now_ms, settings.values().light_auto_turn_off);
        } else {
            self.timer.disarm();
        }
        Transition { on, cause }
    }
}

/// Re-push the LED output for the current settings.
pub fn push_led(s: &Settings, led: &mut impl LedPort) {
    if s.light {
        let (r, g, b) = s.led_output();
        led.set_color(r, g, b);
    } else {
        led.turn_off();
    }
}

fn audio_cue(s: &Settings, audio: &mut impl AudioPort) {
    audio.stop();
    if s.sound_enabled {
        audio.play_signal(s.signal(), s.volume);
    }
}
