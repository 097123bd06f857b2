//! Servo position state
//!
//! Pairs the last commanded pulse with the output that delivers it. The
//! position is updated before every send, so it always reflects what was
//! last asked of the servo.

use std::sync::Arc;

use parking_lot::Mutex;
use plumbline_core::position::{JogDirection, PulseLimits, ServoPosition};
use plumbline_core::traits::{ActuatorStatus, PulseOutput};

/// Servo shared between the console, repeat triggers and tracking
pub type SharedServo<O> = Arc<Mutex<Servo<O>>>;

/// Result of one position command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Pulse sent (µs)
    pub position: u16,
    /// Daemon status for the command
    pub status: ActuatorStatus,
}

/// Servo position plus the output that drives it
pub struct Servo<O> {
    output: O,
    position: ServoPosition,
}

impl<O: PulseOutput> Servo<O> {
    /// Create at the window's midpoint; nothing is sent until a move
    pub fn new(output: O, limits: PulseLimits) -> Self {
        Self {
            output,
            position: ServoPosition::centered(limits),
        }
    }

    pub fn position(&self) -> u16 {
        self.position.pulse()
    }

    pub fn limits(&self) -> PulseLimits {
        self.position.limits()
    }

    /// True if no further movement is possible in `direction`
    pub fn is_saturated(&self, direction: JogDirection) -> bool {
        self.position.is_saturated(direction)
    }

    /// Move to the midpoint and send it
    pub fn center(&mut self) -> Result<StepReport, O::Error> {
        let pulse = self.position.center();
        self.send(pulse)
    }

    /// Move `step` µs in `direction`, clamped to the window, and send it
    ///
    /// The command is sent even when clamping leaves the pulse unchanged.
    pub fn step(&mut self, direction: JogDirection, step: u16) -> Result<StepReport, O::Error> {
        let pulse = self.position.step(direction, step);
        self.send(pulse)
    }

    fn send(&mut self, pulse: u16) -> Result<StepReport, O::Error> {
        let status = self.output.set_pulse(pulse)?;
        log::info!("pos={}", pulse);
        if !status.is_ok() {
            log::warn!("servo daemon returned status {}", status.code());
        }
        Ok(StepReport {
            position: pulse,
            status,
        })
    }

    #[cfg(test)]
    pub fn output(&self) -> &O {
        &self.output
    }
}
