//! Four-button pad with press confirmation and a bounded release wait.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups.  The pad is polled from
//! the button thread; a press is reported once, after it has been held
//! through the confirm delay, and the poll then waits for the release.
//!
//! ## Release wait
//!
//! | Situation                 | Result                                    |
//! |---------------------------|-------------------------------------------|
//! | Released within the bound | Press reported, pad idle                  |
//! | Still held at the bound   | Press reported, button marked held        |
//! | Held button on next poll  | Ignored until it reads released           |
//!
//! No other button is observed while one is being confirmed or released.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::commands::ButtonId;

/// Granularity of the release wait.
const RELEASE_STEP_MS: u32 = 1;

pub struct ButtonPad<P, D> {
    buttons: [(ButtonId, P); 4],
    delay: D,
    confirm_ms: u32,
    release_timeout_ms: u32,
    /// A button still held when its release wait gave up.
    held: Option<ButtonId>,
}

impl<P: InputPin, D: DelayNs> ButtonPad<P, D> {
    /// `pins` in the order enter, back, up, down.
    pub fn new(pins: [P; 4], delay: D, confirm_ms: u32, release_timeout_ms: u32) -> Self {
        let [enter, back, up, down] = pins;
        Self {
            buttons: [
                (ButtonId::Enter, enter),
                (ButtonId::Back, back),
                (ButtonId::Up, up),
                (ButtonId::Down, down),
            ],
            delay,
            confirm_ms,
            release_timeout_ms,
            held: None,
        }
    }

    /// Scan the pad once.  Returns the first confirmed press.
    pub fn poll(&mut self) -> Option<ButtonId> {
        for i in 0..self.buttons.len() {
            let id = self.buttons[i].0;
            let pressed = Self::is_pressed(&mut self.buttons[i].1);

            if self.held == Some(id) {
                if !pressed {
                    self.held = None;
                }
                continue;
            }
            if !pressed {
                continue;
            }

            self.delay.delay_ms(self.confirm_ms);
            if !Self::is_pressed(&mut self.buttons[i].1) {
                continue;
            }
            if !self.wait_release(i) {
                warn!("Button {:?}: still held after {} ms", id, self.release_timeout_ms);
                self.held = Some(id);
            }
            return Some(id);
        }
        None
    }

    /// `true` if the button at `index` read released within the bound.
    fn wait_release(&mut self, index: usize) -> bool {
        let mut waited = 0;
        while waited < self.release_timeout_ms {
            if !Self::is_pressed(&mut self.buttons[index].1) {
                return true;
            }
            self.delay.delay_ms(RELEASE_STEP_MS);
            waited += RELEASE_STEP_MS;
        }
        !Self::is_pressed(&mut self.buttons[index].1)
    }

    fn is_pressed(pin: &mut P) -> bool {
        match pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                debug!("Button: GPIO read failed, treating as released");
                false
            }
        }
    }
}
