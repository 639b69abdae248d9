//! Hardware adapter: bridges the output peripherals to domain port traits.
//!
//! Owns the display, light and speaker handles, exposing them through
//! [`DisplayPort`], [`LedPort`] and [`AudioPort`] so the control actor
//! can hand one `&mut` bundle to the controller.  The drivers themselves
//! are generic; on non-espidf targets the caller supplies simulation or
//! recording implementations.

use crate::app::ports::{AudioPort, DisplayPort, LedPort};
use crate::settings::catalog::Signal;

/// Concrete adapter that combines all actuator-side hardware.
pub struct HardwareAdapter<D, L, A> {
    display: D,
    led: L,
    audio: A,
}

impl<D, L, A> HardwareAdapter<D, L, A> {
    pub fn new(display: D, led: L, audio: A) -> Self {
        Self {
            display,
            led,
            audio,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn into_parts(self) -> (D, L, A) {
        (self.display, self.led, self.audio)
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<D: DisplayPort, L, A> DisplayPort for HardwareAdapter<D, L, A> {
    fn render(&mut self, line1: &str, line2: &str) {
        self.display.render(line1, line2);
    }

    fn clear(&mut self) {
        self.display.clear();
    }

    fn highlight_row(&mut self, row: u8) {
        self.display.highlight_row(row);
    }

    fn enable_cursor(&mut self) {
        self.display.enable_cursor();
    }

    fn disable_cursor(&mut self) {
        self.display.disable_cursor();
    }
}

// ── LedPort implementation ────────────────────────────────────

impl<D, L: LedPort, A> LedPort for HardwareAdapter<D, L, A> {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.led.set_color(r, g, b);
    }

    fn turn_off(&mut self) {
        self.led.turn_off();
    }
}

// ── AudioPort implementation ──────────────────────────────────

impl<D, L, A: AudioPort> AudioPort for HardwareAdapter<D, L, A> {
    fn play_signal(&mut self, signal: &Signal, volume: u8) {
        self.audio.play_signal(signal, volume);
    }

    fn stop(&mut self) {
        self.audio.stop();
    }
}
