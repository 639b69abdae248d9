//! GPIO / peripheral pin assignments for the Super Lights controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Buttons (active-low momentary switches, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_ENTER_GPIO: i32 = 15;
pub const BUTTON_BACK_GPIO: i32 = 18;
/// Up in browsing mode, "left" (decrement) in edit mode.
pub const BUTTON_UP_GPIO: i32 = 19;
/// Down in browsing mode, "right" (increment) in edit mode.
pub const BUTTON_DOWN_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// PIR motion sensor output (HIGH = motion).
pub const IR_SENSOR_GPIO: i32 = 27;
/// HC-SR04 trigger (output).
pub const US_TRIG_GPIO: i32 = 26;
/// HC-SR04 echo (input).
pub const US_ECHO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// 16x2 character LCD (PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const LCD_SDA_GPIO: i32 = 22;
pub const LCD_SCL_GPIO: i32 = 23;
/// 7-bit I2C address of the backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;
pub const LCD_I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// I2S speaker amplifier (MAX98357A)
// ---------------------------------------------------------------------------

pub const SPEAKER_DIN_GPIO: i32 = 33;
pub const SPEAKER_BCK_GPIO: i32 = 25;
pub const SPEAKER_LCK_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// RGB light output (LEDC PWM)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 13;
pub const LED_G_GPIO: i32 = 14;
pub const LED_B_GPIO: i32 = 4;
/// LEDC timer frequency for the light output.
pub const LED_PWM_FREQ_HZ: u32 = 5_000;
