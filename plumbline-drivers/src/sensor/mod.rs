//! Orientation sensor implementations

pub mod mpu6050;

pub use mpu6050::{MotionData, Mpu6050, RangePolicy, DEFAULT_ADDRESS};
