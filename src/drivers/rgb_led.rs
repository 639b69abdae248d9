//! RGB light output driver.
//!
//! Three LEDC PWM channels (CH0-2) drive the light's R/G/B legs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::app::ports::LedPort;
use crate::drivers::hw_init;

#[derive(Debug, Default)]
pub struct RgbLed {
    current: (u8, u8, u8),
}

impl RgbLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_colour(&self) -> (u8, u8, u8) {
        self.current
    }

    pub fn is_lit(&self) -> bool {
        self.current != (0, 0, 0)
    }
}

impl LedPort for RgbLed {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_LIGHT_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LIGHT_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LIGHT_B, b);
        self.current = (r, g, b);
    }

    fn turn_off(&mut self) {
        self.set_color(0, 0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_last_colour() {
        let mut led = RgbLed::new();
        assert!(!led.is_lit());
        led.set_color(127, 0, 0);
        assert_eq!(led.current_colour(), (127, 0, 0));
        led.turn_off();
        assert!(!led.is_lit());
    }
}
