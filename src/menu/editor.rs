//! Edit sub-states: slider, cyclic picker, auto-off option list, and the
//! read-only pager.
//!
//! An editor snapshots the field on entry and adjusts a private working
//! value.  Nothing reaches the settings store until `Enter`
//! ([`EditOutcome::Commit`]); `Back` drops the working value.
//!
//! ```text
//!   Slider          Picker           Options             Pager
//!   ┌────────────┐  ┌────────────┐   ┌────────────────┐  ┌──────────────┐
//!   │Brightness 57│ │Select Color│   │Auto unplug 30s │  │Super Lights..│
//!   │[||||||||   ]│ │< Green >   │   │10 15>30 1m 2m  │  │By: Alzner    │
//!   └────────────┘  └────────────┘   └────────────────┘  └──────────────┘
//! ```

use core::fmt::Write;

use crate::app::commands::ButtonId;
use crate::settings::catalog::{AUTO_OFF_OPTIONS, PALETTE, SIGNALS};
use crate::settings::{SettingKey, SettingsStore};
use crate::text::{DISPLAY_COLS, Line, fit, fit_fmt};

/// Cells between the slider stoppers.
pub const SLIDER_CELLS: i32 = 14;

/// Options shown at once in the auto-off list.
pub const OPTION_WINDOW: usize = 5;

/// Slider tick for `key`: `max(1, range / 14)`.
pub fn slider_step(key: SettingKey) -> i32 {
    let (min, max) = key.domain().bounds();
    ((max - min) / SLIDER_CELLS).max(1)
}

/// Result of feeding one button to an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Still editing; redraw.
    Continue,
    /// Write this value and return to browsing.
    Commit(SettingKey, i32),
    /// Discard and return to browsing.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Editor {
    Slider { key: SettingKey, original: i32, value: i32 },
    Picker { key: SettingKey, original: usize, index: usize },
    Options { original: usize, index: usize },
}

impl Editor {
    /// Slider over a ranged field, starting at its current value.
    pub fn slider(key: SettingKey, settings: &SettingsStore) -> Self {
        let v = settings.get_field(key);
        Self::Slider {
            key,
            original: v,
            value: v,
        }
    }

    /// Cyclic picker over the palette or the signal list.
    pub fn picker(key: SettingKey, settings: &SettingsStore) -> Self {
        let i = usize::try_from(settings.get_field(key)).unwrap_or(0);
        Self::Picker {
            key,
            original: i,
            index: i,
        }
    }

    /// Auto-off option list, starting on the current option.
    pub fn auto_off(settings: &SettingsStore) -> Self {
        let current = settings.get_field(SettingKey::LightAutoTurnOff);
        let i = AUTO_OFF_OPTIONS
            .iter()
            .position(|&o| o == current)
            .unwrap_or(0);
        Self::Options {
            original: i,
            index: i,
        }
    }

    pub fn key(&self) -> SettingKey {
        match self {
            Self::Slider { key, .. } | Self::Picker { key, .. } => *key,
            Self::Options { .. } => SettingKey::LightAutoTurnOff,
        }
    }

    /// The value `Enter` would commit right now.
    pub fn working_value(&self) -> i32 {
        match *self {
            Self::Slider { value, .. } => value,
            Self::Picker { index, .. } => index as i32,
            Self::Options { index, .. } => AUTO_OFF_OPTIONS[index],
        }
    }

    /// The value on entry.
    pub fn original_value(&self) -> i32 {
        match *self {
            Self::Slider { original, .. } => original,
            Self::Picker { original, .. } => original as i32,
            Self::Options { original, .. } => AUTO_OFF_OPTIONS[original],
        }
    }

    pub fn handle(&mut self, button: ButtonId) -> EditOutcome {
        match button {
            ButtonId::Enter => return EditOutcome::Commit(self.key(), self.working_value()),
            ButtonId::Back => return EditOutcome::Cancel,
            ButtonId::Up | ButtonId::Down => {}
        }
        let forward = button == ButtonId::Down;
        match self {
            Self::Slider { key, value, .. } => {
                let (min, max) = key.domain().bounds();
                let step = slider_step(*key);
                *value = if forward {
                    (*value + step).min(max)
                } else {
                    (*value - step).max(min)
                };
            }
            Self::Picker { key, index, .. } => {
                let len = picker_len(*key);
                *index = if forward {
                    (*index + 1) % len
                } else {
                    (*index + len - 1) % len
                };
            }
            Self::Options { index, .. } => {
                if forward {
                    *index = (*index + 1).min(AUTO_OFF_OPTIONS.len() - 1);
                } else {
                    *index = index.saturating_sub(1);
                }
            }
        }
        EditOutcome::Continue
    }

    /// The two display rows for the current working value.
    pub fn screen(&self) -> (Line, Line) {
        match *self {
            Self::Slider { key, value, .. } => (
                fit_fmt(format_args!("{} {}", key.label(), value)),
                slider_bar(key, value),
            ),
            Self::Picker { key, index, .. } => (
                fit_fmt(format_args!("Select {}", key.label())),
                fit_fmt(format_args!("< {} >", picker_name(key, index))),
            ),
            Self::Options { index, .. } => {
                let secs = AUTO_OFF_OPTIONS[index];
                let head = if secs == 0 {
                    fit_fmt(format_args!("{} Off", SettingKey::LightAutoTurnOff.label()))
                } else {
                    fit_fmt(format_args!(
                        "{} {}s",
                        SettingKey::LightAutoTurnOff.label(),
                        secs
                    ))
                };
                (head, option_window(index))
            }
        }
    }
}

fn picker_len(key: SettingKey) -> usize {
    match key {
        SettingKey::SelectedSignal => SIGNALS.len(),
        _ => PALETTE.len(),
    }
}

fn picker_name(key: SettingKey, index: usize) -> &'static str {
    match key {
        SettingKey::SelectedSignal => SIGNALS.get(index).map_or("?", |s| s.name),
        _ => PALETTE.get(index).map_or("?", |c| c.name),
    }
}

/// `[` + 14 cells + `]`, filled in proportion to the value's position in
/// its domain.
pub fn slider_bar(key: SettingKey, value: i32) -> Line {
    let (min, max) = key.domain().bounds();
    let span = (max - min).max(1);
    let filled = ((value - min).clamp(0, span) * SLIDER_CELLS / span) as usize;
    let mut bar = Line::new();
    let _ = bar.push('[');
    for i in 0..SLIDER_CELLS as usize {
        let _ = bar.push(if i < filled { '|' } else { ' ' });
    }
    let _ = bar.push(']');
    bar
}

/// Compact option label: plain seconds, whole minutes as `Nm`.
fn option_label(secs: i32) -> Line {
    if secs == 0 {
        fit("Off")
    } else if secs >= 60 && secs % 60 == 0 {
        fit_fmt(format_args!("{}m", secs / 60))
    } else {
        fit_fmt(format_args!("{}", secs))
    }
}

/// Up to five options around `index`; the selected one is marked with `>`.
pub fn option_window(index: usize) -> Line {
    let len = AUTO_OFF_OPTIONS.len();
    let start = index
        .saturating_sub(OPTION_WINDOW / 2)
        .min(len.saturating_sub(OPTION_WINDOW));
    let end = (start + OPTION_WINDOW).min(len);
    let mut out: heapless::String<{ DISPLAY_COLS * 2 }> = heapless::String::new();
    for i in start..end {
        let sep = if i == index {
            ">"
        } else if i == start {
            ""
        } else {
            " "
        };
        let _ = write!(out, "{}{}", sep, option_label(AUTO_OFF_OPTIONS[i]));
    }
    fit(&out)
}

// ── Pager ─────────────────────────────────────────────────────

/// Full-screen read-only text, two lines at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    lines: Vec<Line>,
    offset: usize,
}

impl Pager {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines, offset: 0 }
    }

    pub fn from_strs(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|l| fit(l)).collect())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns `false` once the pager should close.
    pub fn handle(&mut self, button: ButtonId) -> bool {
        match button {
            ButtonId::Down => {
                if self.offset + 1 < self.lines.len() {
                    self.offset += 1;
                }
                true
            }
            ButtonId::Up => {
                self.offset = self.offset.saturating_sub(1);
                true
            }
            ButtonId::Enter | ButtonId::Back => false,
        }
    }

    pub fn screen(&self) -> (Line, Line) {
        let line = |i: usize| self.lines.get(i).cloned().unwrap_or_default();
        (line(self.offset), line(self.offset + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_steps_and_clamps() {
        let s = SettingsStore::new();
        let mut e = Editor::slider(SettingKey::Brightness, &s);
        assert_eq!(slider_step(SettingKey::Brightness), 7);
        e.handle(ButtonId::Down);
        assert_eq!(e.working_value(), 57);
        for _ in 0..10 {
            e.handle(ButtonId::Down);
        }
        assert_eq!(e.working_value(), 100);
        for _ in 0..20 {
            e.handle(ButtonId::Up);
        }
        assert_eq!(e.working_value(), 0);
        assert_eq!(e.original_value(), 50);
    }

    #[test]
    fn slider_respects_non_zero_minimum() {
        let s = SettingsStore::new();
        let mut e = Editor::slider(SettingKey::SensitivityUr, &s);
        assert_eq!(slider_step(SettingKey::SensitivityUr), 28);
        for _ in 0..5 {
            e.handle(ButtonId::Up);
        }
        assert_eq!(e.working_value(), 2);
    }

    #[test]
    fn slider_screen() {
        let s = SettingsStore::new();
        let e = Editor::slider(SettingKey::Brightness, &s);
        let (l1, l2) = e.screen();
        assert_eq!(l1.as_str(), "Brightness 50");
        assert_eq!(l2.as_str(), "[|||||||       ]");
        assert_eq!(slider_bar(SettingKey::Volume, 100).as_str(), "[||||||||||||||]");
        assert_eq!(slider_bar(SettingKey::Volume, 0).as_str(), "[              ]");
    }

    #[test]
    fn picker_cycles() {
        let s = SettingsStore::new();
        let mut e = Editor::picker(SettingKey::SelectedColor, &s);
        e.handle(ButtonId::Up);
        assert_eq!(e.working_value(), 6);
        e.handle(ButtonId::Down);
        e.handle(ButtonId::Down);
        assert_eq!(e.working_value(), 1);
        let (l1, l2) = e.screen();
        assert_eq!(l1.as_str(), "Select Color");
        assert_eq!(l2.as_str(), "< Green >");
    }

    #[test]
    fn enter_commits_back_cancels() {
        let s = SettingsStore::new();
        let mut e = Editor::picker(SettingKey::SelectedSignal, &s);
        e.handle(ButtonId::Down);
        assert_eq!(
            e.handle(ButtonId::Enter),
            EditOutcome::Commit(SettingKey::SelectedSignal, 1)
        );
        assert_eq!(e.handle(ButtonId::Back), EditOutcome::Cancel);
    }

    #[test]
    fn options_are_bounded() {
        let s = SettingsStore::new();
        let mut e = Editor::auto_off(&s);
        e.handle(ButtonId::Up);
        assert_eq!(e.working_value(), 0);
        for _ in 0..20 {
            e.handle(ButtonId::Down);
        }
        assert_eq!(e.working_value(), 600);
        assert_eq!(e.screen().0.as_str(), "Auto unplug 600s");
    }

    #[test]
    fn option_window_fits_and_marks_selection() {
        assert_eq!(option_window(0).as_str(), ">Off 5 10 15 30");
        assert_eq!(option_window(4).as_str(), "10 15>30 1m 2m");
        assert_eq!(option_window(8).as_str(), "1m 2m 5m>500 10m");
        for i in 0..AUTO_OFF_OPTIONS.len() {
            let w = option_window(i);
            assert!(w.contains('>'), "window {i} lost its marker: {w}");
        }
    }

    #[test]
    fn pager_bounds() {
        let mut p = Pager::from_strs(&["a", "b", "c"]);
        p.handle(ButtonId::Up);
        assert_eq!(p.offset(), 0);
        p.handle(ButtonId::Down);
        p.handle(ButtonId::Down);
        p.handle(ButtonId::Down);
        assert_eq!(p.offset(), 2);
        let (l1, l2) = p.screen();
        assert_eq!((l1.as_str(), l2.as_str()), ("c", ""));
        assert!(!p.handle(ButtonId::Back));
    }
}
