//! Sensor discovery library.
//!
//! Describes sensing devices and the quantities they measure, and announces
//! them to Home Assistant through MQTT discovery.

pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod mqtt;
pub mod simulation;
