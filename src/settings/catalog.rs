//! Fixed catalogues referenced by index from the settings record:
//! the colour palette, the notification signals, and the auto-off options.

use serde::Serialize;

// ── Colour palette ────────────────────────────────────────────

/// A named palette entry.  Components are full-scale (0–255) and get
/// scaled by brightness on the way to the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub name: &'static str,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self { name, r, g, b }
    }

    /// Scale every component by `brightness` percent (0–100).
    pub fn scaled(&self, brightness: u8) -> (u8, u8, u8) {
        let pct = u16::from(brightness.min(100));
        let scale = |c: u8| (u16::from(c) * pct / 100) as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

pub const PALETTE: [Color; 7] = [
    Color::new("Red", 255, 0, 0),
    Color::new("Green", 0, 255, 0),
    Color::new("Blue", 0, 0, 255),
    Color::new("White", 255, 255, 255),
    Color::new("Yellow", 255, 255, 0),
    Color::new("Cyan", 0, 255, 255),
    Color::new("Magenta", 255, 0, 255),
];

// ── Signals ───────────────────────────────────────────────────

/// One tone of a signal.  A frequency of 0 is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    pub frequency_hz: u16,
    pub duration_ms: u16,
}

const fn tone(frequency_hz: u16, duration_ms: u16) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
    }
}

/// Most tones a single signal may carry.
pub const MAX_TONES: usize = 10;

/// A named tone sequence played on light edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub name: &'static str,
    pub tones: &'static [Tone],
}

impl Signal {
    /// Total play time in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.tones.iter().map(|t| u32::from(t.duration_ms)).sum()
    }
}

pub const SIGNALS: [Signal; 5] = [
    Signal {
        name: "Beep",
        tones: &[tone(1000, 150)],
    },
    Signal {
        name: "Chime",
        tones: &[tone(880, 120), tone(1175, 120), tone(1568, 200)],
    },
    Signal {
        name: "Alarm",
        tones: &[
            tone(1500, 100),
            tone(1000, 100),
            tone(1500, 100),
            tone(1000, 100),
        ],
    },
    Signal {
        name: "Melody",
        tones: &[
            tone(523, 150),
            tone(659, 150),
            tone(784, 150),
            tone(0, 50),
            tone(1047, 300),
        ],
    },
    Signal {
        name: "Bell",
        tones: &[tone(1319, 80), tone(0, 40), tone(1319, 80), tone(0, 40), tone(988, 250)],
    },
];

// ── Auto-off ──────────────────────────────────────────────────

/// Permitted auto-off delays in seconds.  0 disables the timer.
pub const AUTO_OFF_OPTIONS: [i32; 10] = [0, 5, 10, 15, 30, 60, 120, 300, 500, 600];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_half_brightness() {
        assert_eq!(PALETTE[0].scaled(50), (127, 0, 0));
        assert_eq!(PALETTE[3].scaled(100), (255, 255, 255));
        assert_eq!(PALETTE[4].scaled(0), (0, 0, 0));
    }

    #[test]
    fn signals_fit_tone_budget() {
        for s in &SIGNALS {
            assert!(!s.tones.is_empty(), "{} has no tones", s.name);
            assert!(s.tones.len() <= MAX_TONES, "{} too long", s.name);
        }
        assert_eq!(SIGNALS[0].duration_ms(), 150);
    }

    #[test]
    fn auto_off_options_sorted_and_start_disabled() {
        assert_eq!(AUTO_OFF_OPTIONS[0], 0);
        assert!(AUTO_OFF_OPTIONS.windows(2).all(|w| w[0] < w[1]));
    }
}
