//! Periodic loop scheduler.
//!
//! Each thread that runs more than one control loop owns a
//! [`LoopScheduler`] and ticks it from the monotonic millisecond clock.
//! When a loop's period has elapsed the scheduler notifies a
//! [`SchedulerDelegate`]; it knows nothing about what the loops do.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Periodic control loops                   │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │
//! │  │  Input    │  │    IR     │  │ Ultrasonic │  │ Watcher  │  │
//! │  │  20 ms    │  │  100 ms   │  │   250 ms   │  │  500 ms  │  │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬──────┘  └────┬─────┘  │
//! │        │              │              │              │        │
//! │        ▼              ▼              ▼              ▼        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate::on_loop_due            │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │          sampler threads post into the Inbox;                │
//! │          the actor runs the watcher cycle itself             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use log::info;

use crate::app::ports::{ControlLoop, SchedulerDelegate};
use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Loop entries
// ═══════════════════════════════════════════════════════════════

/// Most loops one scheduler tracks (stack-allocated).
const MAX_LOOPS: usize = 4;

#[derive(Debug, Clone, Copy)]
struct LoopEntry {
    which: ControlLoop,
    period_ms: u64,
    /// `None` until the first tick; the first tick always fires.
    last_run_ms: Option<u64>,
}

impl LoopEntry {
    fn due(&self, now_ms: u64) -> bool {
        self.last_run_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.period_ms)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Fires each registered loop at most once per tick, in registration
/// order, whenever its period has elapsed.
#[derive(Debug, Default)]
pub struct LoopScheduler {
    loops: heapless::Vec<LoopEntry, MAX_LOOPS>,
}

impl LoopScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler for `which`, with periods taken from `config`.
    pub fn for_loops(config: &SystemConfig, which: &[ControlLoop]) -> Self {
        let mut s = Self::new();
        for &w in which {
            s.add(w, period_for(config, w));
        }
        s
    }

    /// Register a loop.  Returns `false` if the scheduler is full or the
    /// loop is already registered.
    pub fn add(&mut self, which: ControlLoop, period_ms: u32) -> bool {
        if self.loops.iter().any(|l| l.which == which) {
            return false;
        }
        let entry = LoopEntry {
            which,
            period_ms: u64::from(period_ms.max(1)),
            last_run_ms: None,
        };
        if self.loops.push(entry).is_err() {
            return false;
        }
        info!("Scheduler: '{}' every {} ms", which.label(), period_ms);
        true
    }

    /// Run every due loop.  Returns how many fired.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) -> usize {
        let mut fired = 0;
        for entry in &mut self.loops {
            if entry.due(now_ms) {
                entry.last_run_ms = Some(now_ms);
                delegate.on_loop_due(entry.which, now_ms);
                fired += 1;
            }
        }
        fired
    }

    /// Milliseconds until the next loop is due (0 if one is due now).
    pub fn next_due_in(&self, now_ms: u64) -> Option<u64> {
        self.loops
            .iter()
            .map(|l| match l.last_run_ms {
                None => 0,
                Some(last) => (last + l.period_ms).saturating_sub(now_ms),
            })
            .min()
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

/// Configured period of `which`, milliseconds.
pub fn period_for(config: &SystemConfig, which: ControlLoop) -> u32 {
    match which {
        ControlLoop::Input => config.input_poll_ms,
        ControlLoop::Ir => config.ir_poll_ms,
        ControlLoop::Ultrasonic => config.ultrasonic_poll_ms,
        ControlLoop::Watcher => config.watcher_interval_ms,
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
