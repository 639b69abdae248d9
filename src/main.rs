//! Super Lights Firmware: Main Entry Point
//!
//! One control actor owns the whole application core; sampler threads
//! only post into the inbox.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ButtonPad       IrSensor        UltrasonicRanger              │
//! │  (button thread: (sensor thread: LoopScheduler Ir + Ultrasonic)│
//! │   Input loop)                                                  │
//! │        │               │                 │                     │
//! │        └──── post ─────┴────── post ─────┘                     │
//! │                        ▼                                       │
//! │  ──────────────── Inbox (embassy-sync) ──────────────────      │
//! │                        ▼                                       │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          LightController (control actor)               │    │
//! │  │  Settings · Menu · Arbiter · Filters · Notifier        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │        │ HardwareAdapter            │ NvsEventLog  LogEventSink │
//! │  Lcd1602 · RgbLed · SpeakerAudio ──▶ speaker thread (I2S)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::thread;

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{IOPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use log::{error, info};

use superlights::adapters::event_log::NvsEventLog;
use superlights::adapters::hardware::HardwareAdapter;
use superlights::adapters::log_sink::LogEventSink;
use superlights::adapters::nvs::NvsAdapter;
use superlights::adapters::time::Esp32TimeAdapter;
use superlights::app::commands::ControlInput;
use superlights::app::inbox::Inbox;
use superlights::app::ports::{
    ControlLoop, EventLogPort, EventSink, MotionSensorPort, RangingPort, SchedulerDelegate,
};
use superlights::app::service::LightController;
use superlights::config::SystemConfig;
use superlights::drivers::button::ButtonPad;
use superlights::drivers::lcd::Lcd1602;
use superlights::drivers::rgb_led::RgbLed;
use superlights::drivers::speaker::{AudioQueue, I2sSink, SpeakerAudio, SpeakerWorker};
use superlights::error::Error;
use superlights::pins;
use superlights::scheduler::LoopScheduler;
use superlights::sensors::{IrSensor, UltrasonicRanger};

static INBOX: Inbox = Inbox::new();
static AUDIO: AudioQueue = AudioQueue::new();

const SAMPLER_STACK: usize = 4 * 1024;
const SPEAKER_STACK: usize = 8 * 1024;

// ── Scheduler delegates ───────────────────────────────────────
//
// The button and sensor threads' delegates turn a due loop into input
// posted to the inbox; the actor's delegate runs the activity watcher in
// place.

struct ButtonScan<P, D> {
    pad: ButtonPad<P, D>,
}

impl<P: InputPin, D: DelayNs> SchedulerDelegate for ButtonScan<P, D> {
    fn on_loop_due(&mut self, which: ControlLoop, _now_ms: u64) {
        if which == ControlLoop::Input {
            if let Some(button) = self.pad.poll() {
                INBOX.post(ControlInput::Button(button));
            }
        }
    }
}

struct SensorSampler<I, R> {
    ir: I,
    ranger: R,
}

impl<I: MotionSensorPort, R: RangingPort> SchedulerDelegate for SensorSampler<I, R> {
    fn on_loop_due(&mut self, which: ControlLoop, _now_ms: u64) {
        match which {
            ControlLoop::Ir => {
                INBOX.post(ControlInput::IrSample {
                    confirmed: self.ir.sample_confirmed(),
                });
            }
            ControlLoop::Ultrasonic => {
                INBOX.post(ControlInput::Ranging(self.ranger.measure_distance_cm()));
            }
            ControlLoop::Input | ControlLoop::Watcher => {}
        }
    }
}

struct WatcherCycle<'a, L, S> {
    controller: &'a mut LightController,
    log: &'a mut L,
    sink: &'a mut S,
}

impl<L: EventLogPort, S: EventSink> SchedulerDelegate for WatcherCycle<'_, L, S> {
    fn on_loop_due(&mut self, which: ControlLoop, now_ms: u64) {
        if which == ControlLoop::Watcher {
            self.controller.observe_activity(now_ms, self.log, self.sink);
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Super Lights v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate()?;
    let time = Esp32TimeAdapter::new();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = superlights::drivers::hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(Error::from(e).into());
    }
    let peripherals = Peripherals::take()?;
    let p = peripherals.pins;

    let mut buttons = Vec::with_capacity(4);
    for pin in [
        p.gpio15.downgrade(),
        p.gpio18.downgrade(),
        p.gpio19.downgrade(),
        p.gpio21.downgrade(),
    ] {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        buttons.push(driver);
    }
    let buttons: [_; 4] = buttons
        .try_into()
        .map_err(|_| Error::Init("button pins"))?;
    let pad = ButtonPad::new(
        buttons,
        FreeRtos,
        config.button_confirm_ms,
        config.button_release_timeout_ms,
    );

    let ir = IrSensor::new(PinDriver::input(p.gpio27)?, FreeRtos, config.ir_settle_ms);
    let ranger = UltrasonicRanger::new(
        PinDriver::output(p.gpio26)?,
        PinDriver::input(p.gpio5)?,
        Ets,
        time,
        config.echo_timeout_us,
    );

    let i2c = I2cDriver::new(
        peripherals.i2c0,
        p.gpio22,
        p.gpio23,
        &I2cConfig::new().baudrate(pins::LCD_I2C_FREQ_HZ.Hz().into()),
    )?;
    let mut lcd = Lcd1602::new(i2c, FreeRtos, pins::LCD_I2C_ADDR);
    lcd.init().map_err(Error::from)?;
    lcd.splash("Loading...");

    // ── 3. Activity log ───────────────────────────────────────
    let nvs = NvsAdapter::new().map_err(Error::from)?;
    let mut log = NvsEventLog::open(nvs, config.activity_log_capacity);

    // ── 4. Worker threads ─────────────────────────────────────
    thread::Builder::new()
        .name("speaker".into())
        .stack_size(SPEAKER_STACK)
        .spawn(|| match I2sSink::new() {
            Ok(sink) => SpeakerWorker::new(&AUDIO, sink).run(),
            Err(e) => error!("Speaker disabled: {}", e),
        })?;

    let mut input_sched = LoopScheduler::for_loops(&config, &[ControlLoop::Input]);
    thread::Builder::new()
        .name("buttons".into())
        .stack_size(SAMPLER_STACK)
        .spawn(move || {
            let mut scan = ButtonScan { pad };
            loop {
                input_sched.tick(time.now_ms(), &mut scan);
                let wait = input_sched.next_due_in(time.now_ms()).unwrap_or(10);
                FreeRtos::delay_ms(wait.clamp(1, 100) as u32);
            }
        })?;

    let mut sensor_sched =
        LoopScheduler::for_loops(&config, &[ControlLoop::Ir, ControlLoop::Ultrasonic]);
    thread::Builder::new()
        .name("sensors".into())
        .stack_size(SAMPLER_STACK)
        .spawn(move || {
            let mut sampler = SensorSampler { ir, ranger };
            loop {
                sensor_sched.tick(time.now_ms(), &mut sampler);
                let wait = sensor_sched.next_due_in(time.now_ms()).unwrap_or(10);
                FreeRtos::delay_ms(wait.clamp(1, 100) as u32);
            }
        })?;

    // ── 5. Control actor ──────────────────────────────────────
    let mut hw = HardwareAdapter::new(lcd, RgbLed::new(), SpeakerAudio::new(&AUDIO));
    let mut sink = LogEventSink::new();
    let mut controller = LightController::new(&config);
    controller.start(time.now_ms(), &mut hw, &mut log, &mut sink);

    let mut watcher = LoopScheduler::for_loops(&config, &[ControlLoop::Watcher]);
    info!("System ready. Entering control loop.");

    loop {
        INBOX.drain(|input| {
            controller.handle(input, time.now_ms(), &mut hw, &mut log, &mut sink);
        });
        let now = time.now_ms();
        controller.poll_timers(now, &mut hw, &mut log, &mut sink);
        watcher.tick(
            now,
            &mut WatcherCycle {
                controller: &mut controller,
                log: &mut log,
                sink: &mut sink,
            },
        );
        FreeRtos::delay_ms(config.actor_tick_ms);
    }
}
