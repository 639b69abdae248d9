//! Sensor subsystem: the two motion/presence inputs and their filters.
//!
//! Each sensor is split into a hardware reader (generic over
//! `embedded-hal` 1.0 traits, so host tests can drive it with mocks) and a
//! pure filter that turns raw readings into at most one clean event:
//!
//! ```text
//!   IrSensor ──sample_confirmed()──▶ IrDebouncer ──▶ Motion
//!   UltrasonicRanger ──cm / timeout──▶ PresenceDetector ──▶ Left | Returned
//! ```
//!
//! The filters live inside the control actor; the readers run on their own
//! sampler threads and only post readings.

pub mod ir;
pub mod ultrasonic;

pub use ir::{IrDebouncer, IrSensor, Motion};
pub use ultrasonic::{MicrosClock, PresenceDetector, PresenceEdge, UltrasonicRanger};
