//! 16x2 HD44780 character LCD behind a PCF8574 I2C backpack.
//!
//! The backpack maps one I2C byte onto the LCD bus:
//!
//! ```text
//!   bit  7   6   5   4   3    2   1   0
//!       D7  D6  D5  D4  BL   EN  RW  RS
//! ```
//!
//! Every byte goes out as two 4-bit nibbles, high first, each latched by
//! an EN high → low pulse with the backlight bit held on.
//!
//! Bus errors are logged and swallowed: the display is an output the
//! control core cannot recover, so it carries on blind.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;
use crate::text::DISPLAY_COLS;

// ── Backpack bits ─────────────────────────────────────────────

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// ── HD44780 commands ──────────────────────────────────────────

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_CURSOR_ON: u8 = 0x0E;
const CMD_CURSOR_BLINK: u8 = 0x0F;
const CMD_FUNCTION_SET: u8 = 0x28;
const LINE1_ADDR: u8 = 0x80;
const LINE2_ADDR: u8 = 0xC0;

/// Steps of the boot loading bar, one per column.
const SPLASH_STEPS: usize = DISPLAY_COLS;
const SPLASH_STEP_MS: u32 = 125;
const SPLASH_HOLD_MS: u32 = 1_500;

pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    bus_errors: u32,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            bus_errors: 0,
        }
    }

    /// Power-on sequence: force 8-bit mode three times, drop to 4-bit,
    /// then two lines, display on, increment, clear.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x30, 0)?;
        self.delay.delay_ms(1);
        self.write_nibble(0x30, 0)?;
        self.write_nibble(0x20, 0)?;

        for cmd in [CMD_FUNCTION_SET, CMD_DISPLAY_ON, CMD_ENTRY_MODE, CMD_CLEAR] {
            self.send(cmd, 0)?;
        }
        info!("LCD: initialised at 0x{:02X}", self.address);
        Ok(())
    }

    /// Loading bar across line 2, then the ready banner.
    pub fn splash(&mut self, message: &str) {
        let mut bar: heapless::String<DISPLAY_COLS> = heapless::String::new();
        self.render(message, "");
        for _ in 0..SPLASH_STEPS {
            let _ = bar.push('#');
            self.render(message, &bar);
            self.delay.delay_ms(SPLASH_STEP_MS);
        }
        self.render("All ready", "to go!!");
        self.delay.delay_ms(SPLASH_HOLD_MS);
        self.clear();
    }

    /// Failed transfers since power-on.
    pub fn bus_errors(&self) -> u32 {
        self.bus_errors
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let byte = (nibble & 0xF0) | mode | BACKLIGHT;
        self.i2c
            .write(self.address, &[byte | EN])
            .map_err(|_| DisplayError::BusError)?;
        self.delay.delay_us(1);
        self.i2c
            .write(self.address, &[byte & !EN])
            .map_err(|_| DisplayError::BusError)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)?;
        if mode == 0 {
            self.delay.delay_ms(2);
        }
        Ok(())
    }

    fn write_line(&mut self, addr: u8, text: &str) -> Result<(), DisplayError> {
        self.send(addr, 0)?;
        let mut chars = text.chars();
        for _ in 0..DISPLAY_COLS {
            let c = chars.next().unwrap_or(' ');
            let byte = if c.is_ascii() { c as u8 } else { b'?' };
            self.send(byte, RS)?;
        }
        Ok(())
    }

    fn command(&mut self, cmd: u8) {
        let result = self.send(cmd, 0);
        self.check(result);
    }

    fn check(&mut self, result: Result<(), DisplayError>) {
        if let Err(e) = result {
            self.bus_errors = self.bus_errors.saturating_add(1);
            warn!("LCD: {} ({} total)", e, self.bus_errors);
        }
    }
}

impl<I2C: I2c, D: DelayNs> DisplayPort for Lcd1602<I2C, D> {
    fn render(&mut self, line1: &str, line2: &str) {
        let result = self
            .write_line(LINE1_ADDR, line1)
            .and_then(|()| self.write_line(LINE2_ADDR, line2));
        self.check(result);
    }

    fn clear(&mut self) {
        self.command(CMD_CLEAR);
    }

    fn highlight_row(&mut self, row: u8) {
        let addr = if row == 2 { LINE2_ADDR } else { LINE1_ADDR };
        self.command(addr);
        self.command(CMD_CURSOR_BLINK);
    }

    fn enable_cursor(&mut self) {
        self.command(CMD_CURSOR_ON);
    }

    fn disable_cursor(&mut self) {
        self.command(CMD_DISPLAY_ON);
    }
}
