//! Hardware abstraction traits
//!
//! These traits define the interface between the tracking logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod sensor;

pub use actuator::{ActuatorStatus, PulseOutput};
pub use sensor::{AttitudeSensor, SensorError};
