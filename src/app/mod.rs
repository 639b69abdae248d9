//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the coordination rules for the Super Lights
//! controller: input serialisation, menu dispatch, light arbitration and
//! activity logging.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod inbox;
pub mod ports;
pub mod service;
