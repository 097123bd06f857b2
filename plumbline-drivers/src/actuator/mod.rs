//! Servo actuator implementations

pub mod channel;

pub use channel::ActuatorChannel;
