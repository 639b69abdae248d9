//! Settings Store: the single shared record of user-configurable and
//! runtime state.
//!
//! ```text
//!   Menu editors ──┐
//!   Arbiter ───────┼──▶ set_field(key, value) ──▶ domain check ──▶ Settings
//!   Reset ─────────┘                    │
//!                                       └── rejected: record unchanged
//! ```
//!
//! Every write goes through [`SettingsStore::set_field`], which accepts a
//! value only if it lies in the field's [`Domain`].  Out-of-range values are
//! rejected, never clamped.  Boolean fields are written as `0`/`1`.
//!
//! The store has no locking of its own: it is owned by the control actor
//! ([`LightController`](crate::app::service::LightController)) and reached
//! only through it.

pub mod catalog;

use core::fmt::Write;

use log::info;
use serde::{Deserialize, Serialize};

use crate::text::{Line, fit_fmt};
use catalog::{AUTO_OFF_OPTIONS, Color, PALETTE, SIGNALS, Signal};

// ───────────────────────────────────────────────────────────────
// Keys and domains
// ───────────────────────────────────────────────────────────────

/// Addressable fields of the settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettingKey {
    Brightness = 0,
    SelectedColor = 1,
    SelectedSignal = 2,
    SensitivityIr = 3,
    SensitivityUr = 4,
    TimingIr = 5,
    TimingUr = 6,
    Light = 7,
    LightAutoTurnOff = 8,
    IrEnabled = 9,
    UsEnabled = 10,
    SoundEnabled = 11,
    Volume = 12,
}

/// The set of values a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Inclusive integer range.
    Range { min: i32, max: i32 },
    /// Index into a catalogue of `len` entries.
    Index { len: usize },
    /// One of an explicit list.
    OneOf(&'static [i32]),
    /// Boolean written as 0 or 1.
    Flag,
}

impl Domain {
    pub fn contains(&self, value: i32) -> bool {
        match *self {
            Self::Range { min, max } => (min..=max).contains(&value),
            Self::Index { len } => usize::try_from(value).is_ok_and(|v| v < len),
            Self::OneOf(options) => options.contains(&value),
            Self::Flag => value == 0 || value == 1,
        }
    }

    /// Smallest and largest accepted value.
    pub fn bounds(&self) -> (i32, i32) {
        match *self {
            Self::Range { min, max } => (min, max),
            Self::Index { len } => (0, len as i32 - 1),
            Self::OneOf(options) => (
                options.first().copied().unwrap_or(0),
                options.last().copied().unwrap_or(0),
            ),
            Self::Flag => (0, 1),
        }
    }
}

impl SettingKey {
    pub const COUNT: usize = 13;

    pub const ALL: [SettingKey; Self::COUNT] = [
        Self::Brightness,
        Self::SelectedColor,
        Self::SelectedSignal,
        Self::SensitivityIr,
        Self::SensitivityUr,
        Self::TimingIr,
        Self::TimingUr,
        Self::Light,
        Self::LightAutoTurnOff,
        Self::IrEnabled,
        Self::UsEnabled,
        Self::SoundEnabled,
        Self::Volume,
    ];

    pub fn domain(self) -> Domain {
        match self {
            Self::Brightness | Self::Volume | Self::TimingIr | Self::TimingUr => {
                Domain::Range { min: 0, max: 100 }
            }
            Self::SensitivityIr => Domain::Range { min: 1, max: 100 },
            Self::SensitivityUr => Domain::Range { min: 2, max: 400 },
            Self::SelectedColor => Domain::Index { len: PALETTE.len() },
            Self::SelectedSignal => Domain::Index { len: SIGNALS.len() },
            Self::LightAutoTurnOff => Domain::OneOf(&AUTO_OFF_OPTIONS),
            Self::Light | Self::IrEnabled | Self::UsEnabled | Self::SoundEnabled => Domain::Flag,
        }
    }

    /// Name used for the menu row that shows this field's live value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Brightness => "Brightness",
            Self::SelectedColor => "Color",
            Self::SelectedSignal => "Signal",
            Self::SensitivityIr => "IR sens",
            Self::SensitivityUr => "US dist",
            Self::TimingIr => "IR timing",
            Self::TimingUr => "US timing",
            Self::Light => "Light",
            Self::LightAutoTurnOff => "Auto unplug",
            Self::IrEnabled => "IR active",
            Self::UsEnabled => "US active",
            Self::SoundEnabled => "Sound",
            Self::Volume => "Volume",
        }
    }

    /// Reverse of [`label`](Self::label): the live-value placeholder lookup.
    pub fn from_label(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == name)
    }
}

// ───────────────────────────────────────────────────────────────
// Settings record
// ───────────────────────────────────────────────────────────────

/// Plain snapshot of every setting.  Copies are handed out freely; the
/// authoritative instance is only mutable through [`SettingsStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// 0–100 %
    pub brightness: u8,
    /// Index into [`PALETTE`]
    pub selected_color: u8,
    /// Index into [`SIGNALS`]
    pub selected_signal: u8,
    /// 1–100 %, maps inversely to the IR pulse count
    pub sensitivity_ir: u8,
    /// 2–400 cm presence threshold
    pub sensitivity_ur: u16,
    /// 0–100, reserved scaling factor
    pub timing_ir: u8,
    /// 0–100, reserved scaling factor
    pub timing_ur: u8,
    /// Authoritative light output state
    pub light: bool,
    /// Seconds, one of [`AUTO_OFF_OPTIONS`]; 0 = disabled
    pub light_auto_turn_off: u16,
    pub ir_enabled: bool,
    pub us_enabled: bool,
    pub sound_enabled: bool,
    /// 0–100 %
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brightness: 50,
            selected_color: 0, // Red
            selected_signal: 0,
            sensitivity_ir: 50,
            sensitivity_ur: 50,
            timing_ir: 50,
            timing_ur: 50,
            light: false,
            light_auto_turn_off: 0,
            ir_enabled: true,
            us_enabled: true,
            sound_enabled: false,
            volume: 50,
        }
    }
}

impl Settings {
    pub fn color(&self) -> &'static Color {
        // Index is domain-checked on every write.
        &PALETTE[usize::from(self.selected_color) % PALETTE.len()]
    }

    pub fn signal(&self) -> &'static Signal {
        &SIGNALS[usize::from(self.selected_signal) % SIGNALS.len()]
    }

    /// LED output for the current state: palette colour scaled by
    /// brightness, or black when the light is off.
    pub fn led_output(&self) -> (u8, u8, u8) {
        if self.light {
            self.color().scaled(self.brightness)
        } else {
            (0, 0, 0)
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Store
// ───────────────────────────────────────────────────────────────

/// Bounds-checked owner of the [`Settings`] record.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    values: Settings,
}

impl SettingsStore {
    /// Create the store with documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the record.
    pub fn values(&self) -> &Settings {
        &self.values
    }

    /// Copy of the record, for diffing.
    pub fn snapshot(&self) -> Settings {
        self.values
    }

    /// Current value of `key`.  Booleans read as 0/1.
    pub fn get_field(&self, key: SettingKey) -> i32 {
        let v = &self.values;
        match key {
            SettingKey::Brightness => i32::from(v.brightness),
            SettingKey::SelectedColor => i32::from(v.selected_color),
            SettingKey::SelectedSignal => i32::from(v.selected_signal),
            SettingKey::SensitivityIr => i32::from(v.sensitivity_ir),
            SettingKey::SensitivityUr => i32::from(v.sensitivity_ur),
            SettingKey::TimingIr => i32::from(v.timing_ir),
            SettingKey::TimingUr => i32::from(v.timing_ur),
            SettingKey::Light => i32::from(v.light),
            SettingKey::LightAutoTurnOff => i32::from(v.light_auto_turn_off),
            SettingKey::IrEnabled => i32::from(v.ir_enabled),
            SettingKey::UsEnabled => i32::from(v.us_enabled),
            SettingKey::SoundEnabled => i32::from(v.sound_enabled),
            SettingKey::Volume => i32::from(v.volume),
        }
    }

    /// Write `value` to `key` if it lies in the field's domain.
    ///
    /// Returns `false` and leaves the record untouched otherwise.
    pub fn set_field(&mut self, key: SettingKey, value: i32) -> bool {
        if !key.domain().contains(value) {
            return false;
        }
        // Domain check above guarantees every narrowing below is lossless.
        let v = &mut self.values;
        match key {
            SettingKey::Brightness => v.brightness = value as u8,
            SettingKey::SelectedColor => v.selected_color = value as u8,
            SettingKey::SelectedSignal => v.selected_signal = value as u8,
            SettingKey::SensitivityIr => v.sensitivity_ir = value as u8,
            SettingKey::SensitivityUr => v.sensitivity_ur = value as u16,
            SettingKey::TimingIr => v.timing_ir = value as u8,
            SettingKey::TimingUr => v.timing_ur = value as u8,
            SettingKey::Light => v.light = value == 1,
            SettingKey::LightAutoTurnOff => v.light_auto_turn_off = value as u16,
            SettingKey::IrEnabled => v.ir_enabled = value == 1,
            SettingKey::UsEnabled => v.us_enabled = value == 1,
            SettingKey::SoundEnabled => v.sound_enabled = value == 1,
            SettingKey::Volume => v.volume = value as u8,
        }
        true
    }

    /// Convenience for boolean fields.
    pub fn set_flag(&mut self, key: SettingKey, on: bool) -> bool {
        self.set_field(key, i32::from(on))
    }

    /// Human-readable value as shown on the display and in dumps.
    pub fn get_display_value(&self, key: SettingKey) -> Line {
        let v = &self.values;
        let on_off = |b: bool| if b { "On" } else { "Off" };
        match key {
            SettingKey::Brightness => fit_fmt(format_args!("{}%", v.brightness)),
            SettingKey::Volume => fit_fmt(format_args!("{}%", v.volume)),
            SettingKey::SensitivityIr => fit_fmt(format_args!("{}%", v.sensitivity_ir)),
            SettingKey::TimingIr => fit_fmt(format_args!("{}%", v.timing_ir)),
            SettingKey::TimingUr => fit_fmt(format_args!("{}%", v.timing_ur)),
            SettingKey::SensitivityUr => fit_fmt(format_args!("{}cm", v.sensitivity_ur)),
            SettingKey::SelectedColor => fit_fmt(format_args!("{}", v.color().name)),
            SettingKey::SelectedSignal => fit_fmt(format_args!("{}", v.signal().name)),
            SettingKey::Light => fit_fmt(format_args!("{}", on_off(v.light))),
            SettingKey::IrEnabled => fit_fmt(format_args!("{}", on_off(v.ir_enabled))),
            SettingKey::UsEnabled => fit_fmt(format_args!("{}", on_off(v.us_enabled))),
            SettingKey::SoundEnabled => fit_fmt(format_args!("{}", on_off(v.sound_enabled))),
            SettingKey::LightAutoTurnOff => match v.light_auto_turn_off {
                0 => fit_fmt(format_args!("Off")),
                secs => fit_fmt(format_args!("{}s", secs)),
            },
        }
    }

    /// Re-apply the documented defaults.
    pub fn reset(&mut self) {
        self.values = Settings::default();
        info!("Settings: reset to defaults");
    }

    /// Log every field with its display value.
    pub fn dump(&self) {
        let mut out = String::new();
        for key in SettingKey::ALL {
            let _ = write!(out, "{}={} ", key.label(), self.get_display_value(key));
        }
        info!("Settings: {}", out.trim_end());
    }

    /// JSON rendering of the record for diagnostics.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documentation() {
        let s = SettingsStore::new();
        let v = s.values();
        assert_eq!(v.brightness, 50);
        assert!(!v.light);
        assert!(v.ir_enabled);
        assert_eq!(v.light_auto_turn_off, 0);
        assert_eq!(v.color().name, "Red");
    }

    #[test]
    fn in_domain_write_is_accepted_exactly() {
        let mut s = SettingsStore::new();
        assert!(s.set_field(SettingKey::SensitivityUr, 400));
        assert_eq!(s.get_field(SettingKey::SensitivityUr), 400);
        assert!(s.set_field(SettingKey::LightAutoTurnOff, 300));
        assert_eq!(s.values().light_auto_turn_off, 300);
        assert!(s.set_field(SettingKey::SelectedColor, 6));
        assert_eq!(s.values().color().name, "Magenta");
    }

    #[test]
    fn out_of_domain_write_is_rejected_not_clamped() {
        let mut s = SettingsStore::new();
        assert!(!s.set_field(SettingKey::Brightness, 101));
        assert_eq!(s.get_field(SettingKey::Brightness), 50);
        assert!(!s.set_field(SettingKey::SensitivityIr, 0));
        assert!(!s.set_field(SettingKey::SensitivityUr, 1));
        assert!(!s.set_field(SettingKey::LightAutoTurnOff, 7));
        assert!(!s.set_field(SettingKey::SelectedColor, 7));
        assert!(!s.set_field(SettingKey::SelectedSignal, -1));
        assert!(!s.set_field(SettingKey::Light, 2));
        assert_eq!(s.snapshot(), Settings::default());
    }

    #[test]
    fn display_values() {
        let mut s = SettingsStore::new();
        assert_eq!(s.get_display_value(SettingKey::Brightness).as_str(), "50%");
        assert_eq!(s.get_display_value(SettingKey::Light).as_str(), "Off");
        assert_eq!(s.get_display_value(SettingKey::SensitivityUr).as_str(), "50cm");
        assert_eq!(s.get_display_value(SettingKey::LightAutoTurnOff).as_str(), "Off");
        s.set_field(SettingKey::LightAutoTurnOff, 30);
        assert_eq!(s.get_display_value(SettingKey::LightAutoTurnOff).as_str(), "30s");
        s.set_field(SettingKey::SelectedColor, 4);
        assert_eq!(s.get_display_value(SettingKey::SelectedColor).as_str(), "Yellow");
    }

    #[test]
    fn label_lookup_round_trips() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::from_label(key.label()), Some(key));
        }
        assert_eq!(SettingKey::from_label("About"), None);
    }

    #[test]
    fn led_output_scales_and_blanks() {
        let mut s = SettingsStore::new();
        assert_eq!(s.values().led_output(), (0, 0, 0));
        s.set_flag(SettingKey::Light, true);
        assert_eq!(s.values().led_output(), (127, 0, 0));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = SettingsStore::new();
        s.set_field(SettingKey::Volume, 90);
        s.set_flag(SettingKey::Light, true);
        s.reset();
        assert_eq!(s.snapshot(), Settings::default());
    }

    #[test]
    fn json_dump_contains_fields() {
        let s = SettingsStore::new();
        let json = s.to_json().unwrap();
        assert!(json.contains("\"brightness\":50"));
        assert!(json.contains("\"light\":false"));
    }
}
