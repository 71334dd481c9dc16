//! Kerf Settings Crate
//!
//! Handles device configuration and settings persistence.

pub mod config;

pub use config::DeviceConfig;
