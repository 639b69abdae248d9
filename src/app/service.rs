//! Application service: the hexagonal core.
//!
//! [`LightController`] owns the settings store, the menu navigation state,
//! the arbiter working state, both sensor filters and the activity
//! notifier.  It is the one serialising owner of all of them: the control
//! actor drains the inbox and feeds each input through
//! [`handle`](LightController::handle) to completion before the next.
//!
//! ```text
//!  Inbox ──▶ ┌──────────────────────────────┐ ──▶ DisplayPort / LedPort / AudioPort
//!            │        LightController        │
//!  timers ──▶│ Settings · Menu · Arbiter ·   │ ──▶ EventLogPort
//!            │ IR/US filters · Notifier      │ ──▶ EventSink
//!            └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::arbiter::{self, Arbiter, LightRequest, Transition};
use crate::config::SystemConfig;
use crate::menu::editor::Pager;
use crate::menu::tree::{Action, MenuTree};
use crate::menu::{Menu, MenuSignal};
use crate::notifier::{ActivityNotifier, Report};
use crate::sensors::{IrDebouncer, PresenceDetector, PresenceEdge};
use crate::settings::{SettingKey, SettingsStore};
use crate::text::{DISPLAY_COLS, Line, fit, fit_fmt};

use super::commands::ControlInput;
use super::events::AppEvent;
use super::ports::{AudioPort, DisplayPort, EventLogPort, EventSink, LedPort};

// ───────────────────────────────────────────────────────────────
// LightController
// ───────────────────────────────────────────────────────────────

pub struct LightController {
    settings: SettingsStore,
    menu: Menu,
    arbiter: Arbiter,
    ir: IrDebouncer,
    presence: PresenceDetector,
    notifier: ActivityNotifier,
}

impl LightController {
    /// Controller over the standard menu tree.
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_tree(config, MenuTree::standard())
    }

    pub fn with_tree(config: &SystemConfig, tree: MenuTree) -> Self {
        Self {
            settings: SettingsStore::new(),
            menu: Menu::with_depth(tree, config.menu_stack_depth),
            arbiter: Arbiter::new(),
            ir: IrDebouncer::new(),
            presence: PresenceDetector::new(),
            notifier: ActivityNotifier::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Draw the root menu, drive the LED to the initial state and take the
    /// notifier baseline.
    pub fn start(
        &mut self,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        arbiter::push_led(self.settings.values(), hw);
        self.menu.init(&self.settings, hw);
        self.notifier.observe(now_ms, self.settings.values(), log);
        let report = self.notifier.note(now_ms, "Power on", log);
        self.report_log(report, sink);
        sink.emit(&AppEvent::Started {
            light: self.settings.values().light,
        });
        info!("LightController started");
        self.settings.dump();
    }

    // ── Input handling ────────────────────────────────────────

    /// Process one input to completion.
    pub fn handle(
        &mut self,
        input: ControlInput,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        match input {
            ControlInput::Button(button) => {
                let signal = self.menu.handle_button(button, &mut self.settings, hw);
                self.on_menu_signal(signal, now_ms, hw, log, sink);
            }
            ControlInput::IrSample { confirmed } => {
                let s = self.settings.values();
                if !s.ir_enabled {
                    self.ir.reset();
                    return;
                }
                if self.ir.feed(confirmed, s.sensitivity_ir).is_some() {
                    sink.emit(&AppEvent::MotionDetected);
                    self.request(LightRequest::Motion, now_ms, hw, log, sink);
                }
            }
            ControlInput::Ranging(Err(e)) => {
                // Skip the cycle; never reaches the activity log.
                sink.emit(&AppEvent::RangingSkipped(e));
            }
            ControlInput::Ranging(Ok(distance_cm)) => {
                let s = self.settings.values();
                if !s.us_enabled {
                    self.presence.reset();
                    return;
                }
                if let Some(edge) = self.presence.update(distance_cm, s.sensitivity_ur) {
                    sink.emit(&AppEvent::PresenceChanged { edge, distance_cm });
                    let req = match edge {
                        PresenceEdge::Left => LightRequest::PresenceLeft,
                        PresenceEdge::Returned => LightRequest::PresenceReturned,
                    };
                    self.request(req, now_ms, hw, log, sink);
                }
            }
        }
    }

    /// Fire the auto-off timer if due.
    pub fn poll_timers(
        &mut self,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(t) = self.arbiter.poll_auto_off(now_ms, &mut self.settings, hw) {
            self.finish_transition(t, now_ms, hw, log, sink);
        }
    }

    /// Settings-change watcher cycle.
    pub fn observe_activity(
        &mut self,
        now_ms: u64,
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        let report = self.notifier.observe(now_ms, self.settings.values(), log);
        self.report_log(report, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn ir_count(&self) -> u8 {
        self.ir.count()
    }

    pub fn notifier(&self) -> &ActivityNotifier {
        &self.notifier
    }

    // ── Internal ──────────────────────────────────────────────

    fn request(
        &mut self,
        req: LightRequest,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        if let Some(t) = self.arbiter.request(req, now_ms, &mut self.settings, hw) {
            self.finish_transition(t, now_ms, hw, log, sink);
        }
    }

    /// Steps after the arbiter's own side effects: menu redraw, then the
    /// notifier.
    fn finish_transition(
        &mut self,
        t: Transition,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        self.menu
            .refresh_if_showing(SettingKey::Light, &self.settings, hw);
        let report = self.notifier.observe(now_ms, self.settings.values(), log);
        self.report_log(report, sink);
        sink.emit(&AppEvent::LightChanged {
            on: t.on,
            cause: t.cause,
        });
    }

    fn on_menu_signal(
        &mut self,
        signal: MenuSignal,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        match signal {
            MenuSignal::None => {}
            MenuSignal::Committed(key, value) => {
                self.on_commit(key, value, hw);
                sink.emit(&AppEvent::SettingChanged { key, value });
            }
            MenuSignal::Invoke(action) => self.invoke(action, now_ms, hw, log, sink),
        }
    }

    /// Follow-up for a value the menu wrote through the store.
    fn on_commit(&mut self, key: SettingKey, value: i32, hw: &mut (impl LedPort + AudioPort)) {
        match key {
            SettingKey::Brightness | SettingKey::SelectedColor if self.settings.values().light => {
                arbiter::push_led(self.settings.values(), hw);
            }
            SettingKey::IrEnabled if value == 0 => self.ir.reset(),
            SettingKey::UsEnabled if value == 0 => self.presence.reset(),
            SettingKey::SoundEnabled if value == 0 => hw.stop(),
            _ => {}
        }
    }

    fn invoke(
        &mut self,
        action: Action,
        now_ms: u64,
        hw: &mut (impl DisplayPort + LedPort + AudioPort),
        log: &mut impl EventLogPort,
        sink: &mut impl EventSink,
    ) {
        match action {
            // The Light row is on screen, so the transition redraws it.
            Action::ToggleLight => {
                self.request(LightRequest::ManualToggle, now_ms, hw, log, sink);
            }
            Action::ResetSettings => {
                let t = self.arbiter.reset(&mut self.settings, hw);
                self.ir.reset();
                self.presence.reset();
                hw.clear();
                self.menu.render(&self.settings, hw);
                let report = self.notifier.note(now_ms, "Settings reset", log);
                self.report_log(report, sink);
                let report = self.notifier.observe(now_ms, self.settings.values(), log);
                self.report_log(report, sink);
                sink.emit(&AppEvent::SettingsReset);
                if let Some(t) = t {
                    sink.emit(&AppEvent::LightChanged {
                        on: t.on,
                        cause: t.cause,
                    });
                }
            }
            Action::ViewLog => {
                let lines = log_pages(log);
                self.menu.open_pager(Pager::new(lines), &self.settings, hw);
            }
            Action::ClearLog => {
                match log.clear() {
                    Ok(()) => {
                        self.notifier.log_cleared();
                        sink.emit(&AppEvent::ActivityLogCleared);
                    }
                    Err(e) => warn!("Activity log: clear failed: {}", e),
                }
                self.menu.render(&self.settings, hw);
            }
            // Editors and toggles are handled inside the menu.
            Action::Toggle(_)
            | Action::Slider(_)
            | Action::Picker(_)
            | Action::AutoOffOptions
            | Action::About => self.menu.render(&self.settings, hw),
        }
    }

    fn report_log(&self, report: Report, sink: &mut impl EventSink) {
        if report.newly_full {
            sink.emit(&AppEvent::ActivityLogFull);
        }
    }
}

/// Pager lines for the activity log: a usage header, then every entry
/// wrapped to the display width.
pub fn log_pages(log: &impl EventLogPort) -> Vec<Line> {
    let (used, total) = log.usage();
    let mut lines = vec![fit_fmt(format_args!("Log {}/{}B", used, total))];
    let entries = log.read_all();
    if entries.is_empty() {
        lines.push(fit("(empty)"));
    }
    for entry in &entries {
        let chars: Vec<char> = entry.chars().collect();
        for chunk in chars.chunks(DISPLAY_COLS) {
            let s: String = chunk.iter().collect();
            lines.push(fit(&s));
        }
    }
    lines
}
