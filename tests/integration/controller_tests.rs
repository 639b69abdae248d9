//! Integration tests for the inputs → LightController → ports pipeline.
//!
//! Every input goes through `LightController::handle` exactly as the
//! control actor feeds it, against recording mocks.

use super::mock_hw::{HwCall, LogSink, MemoryLog, MockHardware};

use superlights::app::commands::{ButtonId, ControlInput};
use superlights::app::events::AppEvent;
use superlights::app::service::LightController;
use superlights::arbiter::LightCause;
use superlights::config::SystemConfig;
use superlights::error::SensorError;
use superlights::sensors::PresenceEdge;
use superlights::settings::SettingKey;

use ButtonId::{Back, Down, Enter, Up};

pub struct Rig {
    pub ctl: LightController,
    pub hw: MockHardware,
    pub log: MemoryLog,
    pub sink: LogSink,
    pub now_ms: u64,
}

impl Rig {
    pub fn start() -> Self {
        let mut rig = Self {
            ctl: LightController::new(&SystemConfig::default()),
            hw: MockHardware::new(),
            log: MemoryLog::new(256),
            sink: LogSink::new(),
            now_ms: 0,
        };
        rig.ctl
            .start(rig.now_ms, &mut rig.hw, &mut rig.log, &mut rig.sink);
        rig
    }

    pub fn input(&mut self, input: ControlInput) {
        self.ctl
            .handle(input, self.now_ms, &mut self.hw, &mut self.log, &mut self.sink);
    }

    pub fn press(&mut self, buttons: &[ButtonId]) {
        for &b in buttons {
            self.input(ControlInput::Button(b));
        }
    }

    pub fn ir(&mut self, confirmed: bool, times: usize) {
        for _ in 0..times {
            self.input(ControlInput::IrSample { confirmed });
        }
    }

    pub fn range(&mut self, cm: f32) {
        self.input(ControlInput::Ranging(Ok(cm)));
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
        self.ctl
            .poll_timers(self.now_ms, &mut self.hw, &mut self.log, &mut self.sink);
    }

    pub fn watch(&mut self) {
        self.ctl
            .observe_activity(self.now_ms, &mut self.log, &mut self.sink);
    }

    pub fn light(&self) -> bool {
        self.ctl.settings().values().light
    }
}

/// Root → Settings → Light settings.
const TO_LIGHT_SETTINGS: [ButtonId; 2] = [Enter, Enter];

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_draws_root_and_logs_power_on() {
    let rig = Rig::start();
    assert_eq!(rig.hw.screen(), ("Settings".into(), "Activity log".into()));
    assert_eq!(rig.hw.led(), None);
    assert_eq!(rig.log.events(), ["Power on"]);
    assert!(rig.sink.contains(&AppEvent::Started { light: false }));
}

// ── IR motion ─────────────────────────────────────────────────

#[test]
fn twenty_five_pulses_at_lowest_sensitivity_turn_light_on() {
    let mut rig = Rig::start();
    // Light settings → Sensitivity → IR sens slider, 50 down to 1.
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Down, Down, Down, Enter, Enter]);
    rig.press(&[Up; 7]);
    rig.press(&[Enter]);
    assert_eq!(rig.ctl.settings().values().sensitivity_ir, 1);

    rig.ir(true, 24);
    assert!(!rig.light());
    assert_eq!(rig.ctl.ir_count(), 24);

    rig.ir(true, 1);
    assert!(rig.light());
    assert_eq!(rig.hw.led(), Some((127, 0, 0)));
    assert!(rig.sink.contains(&AppEvent::LightChanged {
        on: true,
        cause: LightCause::Motion,
    }));
}

#[test]
fn idle_sample_discards_partial_count() {
    let mut rig = Rig::start();
    rig.ir(true, 13);
    rig.ir(false, 1);
    rig.ir(true, 13);
    assert!(!rig.light());
    rig.ir(true, 1);
    assert!(rig.light(), "default sensitivity needs 14 pulses");
}

#[test]
fn disabled_ir_never_turns_light_on() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Down, Down, Down, Down, Down, Enter]);
    assert!(!rig.ctl.settings().values().ir_enabled);
    rig.ir(true, 100);
    assert!(!rig.light());
    assert_eq!(rig.ctl.ir_count(), 0);
}

// ── Auto-off ──────────────────────────────────────────────────

fn set_auto_off_5s(rig: &mut Rig) {
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Down, Down, Down, Down, Enter, Enter, Down, Enter]);
    assert_eq!(rig.ctl.settings().values().light_auto_turn_off, 5);
    // Back to Light settings, cursor on "Light".
    rig.press(&[Back]);
}

#[test]
fn auto_off_fires_after_five_seconds() {
    let mut rig = Rig::start();
    set_auto_off_5s(&mut rig);
    rig.press(&[Enter]);
    assert!(rig.light());

    rig.advance(4_999);
    assert!(rig.light());
    rig.advance(1);
    assert!(!rig.light());
    assert_eq!(rig.hw.led(), None);
    assert!(rig.sink.contains(&AppEvent::LightChanged {
        on: false,
        cause: LightCause::AutoOff,
    }));
    assert!(!rig.ctl.arbiter().timer().is_armed());
}

#[test]
fn auto_off_zero_never_fires() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter]);
    assert!(rig.light());
    rig.advance(24 * 3_600_000);
    assert!(rig.light());
}

#[test]
fn manual_off_disarms_timer() {
    let mut rig = Rig::start();
    set_auto_off_5s(&mut rig);
    rig.press(&[Enter, Enter]);
    assert!(!rig.light());
    rig.advance(10_000);
    assert!(!rig.sink.contains(&AppEvent::LightChanged {
        on: false,
        cause: LightCause::AutoOff,
    }));
}

// ── Ultrasonic presence ───────────────────────────────────────

#[test]
fn presence_while_off_is_inert() {
    let mut rig = Rig::start();
    rig.hw.clear_calls();
    rig.range(10.0);
    rig.range(100.0);
    rig.range(10.0);
    assert!(!rig.light());
    assert!(rig.hw.calls.is_empty());
    assert!(!rig.ctl.arbiter().latched());
}

#[test]
fn presence_left_turns_light_off_once() {
    let mut rig = Rig::start();
    rig.range(100.0);
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter]);
    assert!(rig.light());

    rig.range(10.0);
    assert!(!rig.light());
    assert!(rig.ctl.arbiter().latched());
    assert!(rig.sink.contains(&AppEvent::PresenceChanged {
        edge: PresenceEdge::Left,
        distance_cm: 10.0,
    }));

    // Motion brings the light back; no fresh edge, so it stays on.
    rig.ir(true, 14);
    assert!(rig.light());
    rig.range(12.0);
    assert!(rig.light());

    // Returning clears the latch; the next departure turns it off again.
    rig.range(80.0);
    assert!(!rig.ctl.arbiter().latched());
    rig.range(10.0);
    assert!(!rig.light());
}

#[test]
fn presence_left_after_us_reenable_turns_light_off() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter]);
    rig.range(10.0);
    assert!(!rig.light());
    assert!(rig.ctl.arbiter().latched());

    // Motion turns the light back on; the latch is still set.
    rig.ir(true, 14);
    assert!(rig.light());
    assert!(rig.ctl.arbiter().latched());

    // "US active" off then on: the next reading is an edge again.
    rig.press(&[Down; 6]);
    rig.press(&[Enter]);
    assert!(!rig.ctl.settings().values().us_enabled);
    rig.press(&[Enter]);
    assert!(rig.ctl.settings().values().us_enabled);

    rig.range(10.0);
    assert!(!rig.light(), "departure while on turns the light off");
    let offs = rig
        .sink
        .events
        .iter()
        .filter(|e| {
            **e == AppEvent::LightChanged {
                on: false,
                cause: LightCause::Presence,
            }
        })
        .count();
    assert_eq!(offs, 2);
}

#[test]
fn ranging_timeout_skips_cycle() {
    let mut rig = Rig::start();
    let lines = rig.log.lines.len();
    rig.input(ControlInput::Ranging(Err(SensorError::EchoTimeout)));
    assert!(rig
        .sink
        .contains(&AppEvent::RangingSkipped(SensorError::EchoTimeout)));
    assert_eq!(rig.log.lines.len(), lines);
}

// ── Settings through the menu ─────────────────────────────────

#[test]
fn brightness_commit_repushes_led_while_on() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter]);
    assert_eq!(rig.hw.led(), Some((127, 0, 0)));

    rig.press(&[Down, Enter, Down, Enter]);
    assert_eq!(rig.ctl.settings().values().brightness, 57);
    assert_eq!(rig.hw.led(), Some((145, 0, 0)));
    assert!(rig.sink.contains(&AppEvent::SettingChanged {
        key: SettingKey::Brightness,
        value: 57,
    }));
}

#[test]
fn light_toggle_redraws_once() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.hw.clear_calls();
    rig.press(&[Enter]);
    let renders = rig
        .hw
        .calls
        .iter()
        .filter(|c| matches!(c, HwCall::Render(..)))
        .count();
    assert_eq!(renders, 1);
    assert_eq!(rig.hw.screen().0, "Light: On");
}

#[test]
fn cancelled_edit_leaves_value() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Down, Enter, Down, Down, Back]);
    assert_eq!(rig.ctl.settings().values().brightness, 50);
    assert!(rig.ctl.menu().is_browsing());
}

#[test]
fn sound_cue_plays_on_edges() {
    let mut rig = Rig::start();
    // Settings → Audio settings → Sound toggle.
    rig.press(&[Enter, Down, Enter, Enter]);
    assert!(rig.ctl.settings().values().sound_enabled);
    rig.press(&[Back, Enter, Enter]);
    assert!(rig.light());
    assert_eq!(rig.hw.plays(), 1);
    assert!(rig.hw.calls.contains(&HwCall::Play {
        signal: "Beep",
        volume: 50,
    }));
}

#[test]
fn reset_while_on_is_an_off_edge() {
    let mut rig = Rig::start();
    set_auto_off_5s(&mut rig);
    rig.press(&[Enter]);
    assert!(rig.light());

    // Back to Settings, select "Reset settings".
    rig.press(&[Back, Down, Down, Enter]);
    assert!(!rig.light());
    assert_eq!(rig.ctl.settings().values().light_auto_turn_off, 0);
    assert_eq!(rig.hw.led(), None);
    assert!(!rig.ctl.arbiter().timer().is_armed());
    assert!(rig.sink.contains(&AppEvent::SettingsReset));
    assert!(rig.sink.contains(&AppEvent::LightChanged {
        on: false,
        cause: LightCause::Reset,
    }));
    assert!(rig.log.events().contains(&"Settings reset"));
}

// ── Activity notifier ─────────────────────────────────────────

#[test]
fn light_edges_are_logged_immediately() {
    let mut rig = Rig::start();
    rig.now_ms = 3_723_000;
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter]);
    assert_eq!(
        rig.log.lines.last().map(String::as_str),
        Some("time: 01:02:03 - Light ON")
    );
}

#[test]
fn watcher_logs_setting_changes() {
    let mut rig = Rig::start();
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Down, Down, Enter, Down, Down, Enter]);
    rig.watch();
    assert_eq!(rig.log.events(), ["Power on", "Color changed to Blue"]);
    rig.watch();
    assert_eq!(rig.log.lines.len(), 2);
}

#[test]
fn full_log_reported_once() {
    let mut rig = Rig::start();
    rig.log.capacity = 1;
    rig.press(&TO_LIGHT_SETTINGS);
    rig.press(&[Enter, Enter, Enter]);
    let full = rig
        .sink
        .events
        .iter()
        .filter(|e| **e == AppEvent::ActivityLogFull)
        .count();
    assert_eq!(full, 1);
    assert_eq!(rig.ctl.notifier().dropped(), 3);
}
