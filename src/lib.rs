//! Super Lights firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

#[cfg(test)]
use critical_section as _;

pub mod app;
pub mod arbiter;
pub mod config;
pub mod error;
pub mod menu;
pub mod notifier;
pub mod pins;
pub mod scheduler;
pub mod settings;
pub mod text;

pub mod adapters;
pub mod drivers;
pub mod sensors;
