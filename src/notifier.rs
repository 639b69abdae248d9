//! Activity notifier: turns settings transitions into log lines.
//!
//! The watcher loop hands the notifier a settings snapshot; the notifier
//! diffs it against the previous one and appends one line per changed
//! field to the [`EventLogPort`].  The first snapshot is a silent baseline.
//!
//! Each line is stamped from uptime and capped at [`RECORD_BYTES`]:
//!
//! ```text
//!   time: 01:02:03 - Brightness set to 57%
//! ```

use log::warn;

use crate::app::ports::EventLogPort;
use crate::error::StorageError;
use crate::settings::Settings;
use crate::text::truncate_fmt;

/// Largest stored line, in bytes.
pub const RECORD_BYTES: usize = 64;

/// One stamped log line.
pub type Record = heapless::String<RECORD_BYTES>;

/// What a notifier call did to the log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub appended: usize,
    /// The log refused its first append since it was last cleared.
    pub newly_full: bool,
}

#[derive(Debug, Default)]
pub struct ActivityNotifier {
    last: Option<Settings>,
    dropped: u32,
    full_reported: bool,
}

/// `time: HH:MM:SS - event`, hours wrapping at 24.
pub fn stamp(now_ms: u64, event: &str) -> Record {
    let secs = now_ms / 1000;
    truncate_fmt(format_args!(
        "time: {:02}:{:02}:{:02} - {}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        event
    ))
}

/// Lines describing every field that differs between `old` and `new`.
pub fn describe_changes(old: &Settings, new: &Settings) -> Vec<String> {
    let on_off = |b: bool| if b { "ON" } else { "OFF" };
    let mut out = Vec::new();
    if old.light != new.light {
        out.push(format!("Light {}", on_off(new.light)));
    }
    if old.brightness != new.brightness {
        out.push(format!("Brightness set to {}%", new.brightness));
    }
    if old.selected_color != new.selected_color {
        out.push(format!("Color changed to {}", new.color().name));
    }
    if old.sound_enabled != new.sound_enabled {
        out.push(format!("Sound {}", on_off(new.sound_enabled)));
    }
    if old.volume != new.volume {
        out.push(format!("Volume set to {}%", new.volume));
    }
    if old.selected_signal != new.selected_signal {
        out.push(format!("Signal changed to {}", new.signal().name));
    }
    if old.light_auto_turn_off != new.light_auto_turn_off {
        match new.light_auto_turn_off {
            0 => out.push("Auto off disabled".into()),
            secs => out.push(format!("Auto off set to {}s", secs)),
        }
    }
    if old.ir_enabled != new.ir_enabled {
        out.push(format!("IR sensor {}", on_off(new.ir_enabled)));
    }
    if old.us_enabled != new.us_enabled {
        out.push(format!("US sensor {}", on_off(new.us_enabled)));
    }
    out
}

impl ActivityNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines lost to a full or failing log since the last clear.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Diff `current` against the previous snapshot and log the changes.
    pub fn observe(
        &mut self,
        now_ms: u64,
        current: &Settings,
        log: &mut impl EventLogPort,
    ) -> Report {
        let Some(prev) = self.last.replace(*current) else {
            return Report::default();
        };
        let mut report = Report::default();
        for event in describe_changes(&prev, current) {
            self.append(now_ms, &event, log, &mut report);
        }
        report
    }

    /// Log an explicit event such as "Power on".
    pub fn note(&mut self, now_ms: u64, event: &str, log: &mut impl EventLogPort) -> Report {
        let mut report = Report::default();
        self.append(now_ms, event, log, &mut report);
        report
    }

    /// The log was cleared; warn again the next time it fills.
    pub fn log_cleared(&mut self) {
        self.dropped = 0;
        self.full_reported = false;
    }

    fn append(
        &mut self,
        now_ms: u64,
        event: &str,
        log: &mut impl EventLogPort,
        report: &mut Report,
    ) {
        let record = stamp(now_ms, event);
        match log.append(&record) {
            Ok(()) => report.appended += 1,
            Err(e) => {
                self.dropped = self.dropped.saturating_add(1);
                if e == StorageError::Full && !self.full_reported {
                    self.full_reported = true;
                    report.newly_full = true;
                } else if e != StorageError::Full {
                    warn!("Activity log: append failed: {}", e);
                }
            }
        }
    }
}
