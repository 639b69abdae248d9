//! Mock hardware adapter for integration tests.
//!
//! Records every display, light and audio call so tests can assert on the
//! full command history without touching real I2C/PWM/I2S peripherals.

use superlights::app::events::AppEvent;
use superlights::app::ports::{AudioPort, DisplayPort, EventLogPort, EventSink, LedPort};
use superlights::error::StorageError;
use superlights::settings::catalog::Signal;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Render(String, String),
    Clear,
    Highlight(u8),
    CursorOn,
    CursorOff,
    SetLed { r: u8, g: u8, b: u8 },
    LedOff,
    Play { signal: &'static str, volume: u8 },
    Stop,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last rendered screen.
    pub fn screen(&self) -> (String, String) {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Render(a, b) => Some((a.clone(), b.clone())),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// The light's last commanded output; `None` when off.
    pub fn led(&self) -> Option<(u8, u8, u8)> {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::SetLed { r, g, b } => Some(Some((*r, *g, *b))),
                HwCall::LedOff => Some(None),
                _ => None,
            })
            .flatten()
    }

    pub fn plays(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::Play { .. }))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl DisplayPort for MockHardware {
    fn render(&mut self, line1: &str, line2: &str) {
        assert!(line1.chars().count() <= 16, "line 1 too long: {line1:?}");
        assert!(line2.chars().count() <= 16, "line 2 too long: {line2:?}");
        self.calls.push(HwCall::Render(line1.into(), line2.into()));
    }

    fn clear(&mut self) {
        self.calls.push(HwCall::Clear);
    }

    fn highlight_row(&mut self, row: u8) {
        self.calls.push(HwCall::Highlight(row));
    }

    fn enable_cursor(&mut self) {
        self.calls.push(HwCall::CursorOn);
    }

    fn disable_cursor(&mut self) {
        self.calls.push(HwCall::CursorOff);
    }
}

impl LedPort for MockHardware {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(HwCall::SetLed { r, g, b });
    }

    fn turn_off(&mut self) {
        self.calls.push(HwCall::LedOff);
    }
}

impl AudioPort for MockHardware {
    fn play_signal(&mut self, signal: &Signal, volume: u8) {
        self.calls.push(HwCall::Play {
            signal: signal.name,
            volume,
        });
    }

    fn stop(&mut self) {
        self.calls.push(HwCall::Stop);
    }
}

// ── MemoryLog ─────────────────────────────────────────────────

pub struct MemoryLog {
    pub lines: Vec<String>,
    pub capacity: usize,
}

#[allow(dead_code)]
impl MemoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Vec::new(),
            capacity,
        }
    }

    /// Event text of every line, without the time stamp.
    pub fn events(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(|l| l.split_once(" - ").map_or(l.as_str(), |(_, e)| e))
            .collect()
    }
}

impl EventLogPort for MemoryLog {
    fn append(&mut self, event: &str) -> Result<(), StorageError> {
        if self.lines.len() >= self.capacity {
            return Err(StorageError::Full);
        }
        self.lines.push(event.into());
        Ok(())
    }

    fn read_all(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn usage(&self) -> (usize, usize) {
        (self.lines.len() * 64, self.capacity * 64)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.lines.clear();
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
