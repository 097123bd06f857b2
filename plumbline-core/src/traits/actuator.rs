//! Actuator output traits

/// Status returned by the servo daemon for one command
///
/// The daemon reports a signed result; negative values are daemon-side
/// error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorStatus(pub i32);

impl ActuatorStatus {
    /// Raw status value
    pub fn code(self) -> i32 {
        self.0
    }

    /// True unless the daemon reported an error code
    pub fn is_ok(self) -> bool {
        self.0 >= 0
    }
}

/// Trait for pulse-width servo outputs
///
/// Implementations deliver one pulse duration to the actuator and report
/// the status the remote end returned.
pub trait PulseOutput {
    /// Error type for delivery failures
    type Error;

    /// Command the servo to `pulse` microseconds
    fn set_pulse(&mut self, pulse: u16) -> Result<ActuatorStatus, Self::Error>;
}
