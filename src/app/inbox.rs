//! Control inbox: the single serialisation point for every input.
//!
//! Uses an `embassy-sync` bounded channel so sampler threads and the
//! control actor share it without heap allocation.
//!
//! ```text
//! ┌───────────────┐
//! │ button thread │──┐
//! └───────────────┘  │  ControlInput  ┌──────────────┐
//! ┌───────────────┐  ├──────────────▶│ control actor │ (sole owner of
//! │ sensor thread │──┘   try_send    │  drain()      │  LightController)
//! └───────────────┘                  └──────────────┘
//! ```
//!
//! Producers only post; one consumer drains in arrival order, so the
//! total order of inputs is the posting order.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use super::commands::ControlInput;

/// Inputs buffered before producers start dropping.
pub const INBOX_DEPTH: usize = 16;

pub struct Inbox {
    chan: Channel<CriticalSectionRawMutex, ControlInput, INBOX_DEPTH>,
    dropped: AtomicU32,
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            chan: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue `input` for the actor.  Returns `false` if the inbox was full
    /// and the input was dropped.
    pub fn post(&self, input: ControlInput) -> bool {
        if self.chan.try_send(input).is_ok() {
            return true;
        }
        let n = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("Inbox: full, dropped {:?} ({} total)", input, n);
        false
    }

    /// Hand every queued input to `f`, oldest first.  Returns how many
    /// were processed.
    pub fn drain(&self, mut f: impl FnMut(ControlInput)) -> usize {
        let mut n = 0;
        while let Ok(input) = self.chan.try_receive() {
            f(input);
            n += 1;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.chan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chan.is_empty()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::ButtonId;

    #[test]
    fn drains_in_posting_order() {
        let inbox = Inbox::new();
        inbox.post(ControlInput::Button(ButtonId::Down));
        inbox.post(ControlInput::IrSample { confirmed: true });
        inbox.post(ControlInput::Button(ButtonId::Enter));
        let mut seen = Vec::new();
        assert_eq!(inbox.drain(|i| seen.push(i)), 3);
        assert_eq!(
            seen,
            [
                ControlInput::Button(ButtonId::Down),
                ControlInput::IrSample { confirmed: true },
                ControlInput::Button(ButtonId::Enter),
            ]
        );
        assert!(inbox.is_empty());
    }

    #[test]
    fn overflow_is_counted_not_blocking() {
        let inbox = Inbox::new();
        for _ in 0..INBOX_DEPTH {
            assert!(inbox.post(ControlInput::IrSample { confirmed: false }));
        }
        assert!(!inbox.post(ControlInput::Button(ButtonId::Back)));
        assert_eq!(inbox.dropped(), 1);
        assert_eq!(inbox.len(), INBOX_DEPTH);
    }
}
