//! Peripheral drivers and one-shot hardware initialisation.

pub mod button;
pub mod hw_init;
pub mod lcd;
pub mod rgb_led;
pub mod speaker;
