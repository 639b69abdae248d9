//! Fuzz target: `LightController::handle`
//!
//! Decodes arbitrary bytes into a stream of buttons, IR samples, ranging
//! results and clock jumps, and asserts that the controller never panics,
//! never draws past the panel and keeps the light output in step with the
//! light flag.
//!
//! cargo fuzz run fuzz_controller_inputs

#![no_main]

use critical_section as _;
use libfuzzer_sys::fuzz_target;
use superlights::app::commands::{ButtonId, ControlInput};
use superlights::app::events::AppEvent;
use superlights::app::ports::{AudioPort, DisplayPort, EventLogPort, EventSink, LedPort};
use superlights::app::service::LightController;
use superlights::config::SystemConfig;
use superlights::error::{SensorError, StorageError};
use superlights::settings::catalog::Signal;

#[derive(Default)]
struct Hw {
    lit: bool,
}

impl DisplayPort for Hw {
    fn render(&mut self, line1: &str, line2: &str) {
        assert!(line1.chars().count() <= 16 && line2.chars().count() <= 16);
    }
    fn clear(&mut self) {}
    fn highlight_row(&mut self, row: u8) {
        assert!(row == 1 || row == 2);
    }
    fn enable_cursor(&mut self) {}
    fn disable_cursor(&mut self) {}
}

impl LedPort for Hw {
    fn set_color(&mut self, _r: u8, _g: u8, _b: u8) {
        self.lit = true;
    }
    fn turn_off(&mut self) {
        self.lit = false;
    }
}

impl AudioPort for Hw {
    fn play_signal(&mut self, _signal: &Signal, _volume: u8) {}
    fn stop(&mut self) {}
}

struct Log(usize);

impl EventLogPort for Log {
    fn append(&mut self, _event: &str) -> Result<(), StorageError> {
        if self.0 >= 8 {
            return Err(StorageError::Full);
        }
        self.0 += 1;
        Ok(())
    }
    fn read_all(&self) -> Vec<String> {
        vec!["time: 00:00:00 - Power on".into(); self.0]
    }
    fn usage(&self) -> (usize, usize) {
        (self.0 * 64, 8 * 64)
    }
    fn clear(&mut self) -> Result<(), StorageError> {
        self.0 = 0;
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut ctl = LightController::new(&SystemConfig::default());
    let mut hw = Hw::default();
    let mut log = Log(0);
    let mut now_ms = 0u64;
    ctl.start(now_ms, &mut hw, &mut log, &mut Discard);

    for pair in data.chunks_exact(2) {
        let (op, arg) = (pair[0], pair[1]);
        match op % 6 {
            0 => {
                let button = ButtonId::ALL[usize::from(arg) % 4];
                ctl.handle(ControlInput::Button(button), now_ms, &mut hw, &mut log, &mut Discard);
            }
            1 => {
                let input = ControlInput::IrSample { confirmed: arg & 1 == 1 };
                ctl.handle(input, now_ms, &mut hw, &mut log, &mut Discard);
            }
            2 => {
                let input = ControlInput::Ranging(Ok(f32::from(arg) * 2.0));
                ctl.handle(input, now_ms, &mut hw, &mut log, &mut Discard);
            }
            3 => {
                let input = ControlInput::Ranging(Err(SensorError::EchoTimeout));
                ctl.handle(input, now_ms, &mut hw, &mut log, &mut Discard);
            }
            4 => {
                now_ms += u64::from(arg) * 1_000;
                ctl.poll_timers(now_ms, &mut hw, &mut log, &mut Discard);
            }
            _ => ctl.observe_activity(now_ms, &mut log, &mut Discard),
        }
        assert_eq!(hw.lit, ctl.settings().values().light);
    }
});
