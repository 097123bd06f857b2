//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in plumbline-core for the tracker's hardware:
//!
//! - Orientation sensor (MPU-6050 over `embedded-hal` I2C)
//! - Servo actuator channel (pigpio daemon frames over an `embedded-io` stream)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuator;
pub mod sensor;
