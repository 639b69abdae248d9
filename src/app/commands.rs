//! Inbound inputs to the control actor.
//!
//! Sampler threads (button pad, IR, ultrasonic) turn raw hardware reads
//! into these and post them to the [`Inbox`](super::inbox::Inbox); the
//! [`LightController`](super::service::LightController) consumes them one
//! at a time, in posting order.

use crate::error::SensorError;

/// The four logical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Enter,
    Back,
    /// Scroll up while browsing, decrement ("left") while editing.
    Up,
    /// Scroll down while browsing, increment ("right") while editing.
    Down,
}

impl ButtonId {
    pub const ALL: [ButtonId; 4] = [Self::Enter, Self::Back, Self::Up, Self::Down];
}

/// Everything that can wake the control actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlInput {
    /// An edge-confirmed button press.
    Button(ButtonId),

    /// One IR sample; `confirmed` is true when the pin read active across
    /// the settle delay.
    IrSample { confirmed: bool },

    /// One ultrasonic ranging result.  Timeouts are carried through so the
    /// actor can skip the cycle explicitly.
    Ranging(Result<f32, SensorError>),
}
