//! Board-agnostic core logic for the orientation tracker
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Register word decoding for the accelerometer bus
//! - Sensitivity ranges and unit conversion
//! - Servo pulse position and jog stepping
//! - Dead-band deviation classification for the tracking loop
//! - Hardware abstraction traits (attitude sensor, pulse output)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod position;
pub mod range;
pub mod tracking;
pub mod traits;
pub mod units;
