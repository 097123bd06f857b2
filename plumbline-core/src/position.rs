//! Servo pulse position
//!
//! The servo is commanded with a pulse duration in microseconds. The
//! position only ever moves through [`ServoPosition::step`] or
//! [`ServoPosition::center`], and every result is clamped into the
//! configured window; saturating at a limit is not an error.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shortest pulse the mechanism accepts (µs)
pub const MIN_PULSE: u16 = 500;

/// Longest pulse the mechanism accepts (µs)
pub const MAX_PULSE: u16 = 1900;

/// Number of manual jog clicks across the full window
pub const STEPS_PER_FULL_SCALE: u16 = 40;

/// Jog direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JogDirection {
    /// Shorter pulse
    Clockwise,
    /// Longer pulse
    CounterClockwise,
}

impl JogDirection {
    /// Short label used in console commands and logs
    pub fn label(self) -> &'static str {
        match self {
            Self::Clockwise => "cw",
            Self::CounterClockwise => "ccw",
        }
    }
}

/// Inclusive pulse window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseLimits {
    pub min: u16,
    pub max: u16,
}

impl Default for PulseLimits {
    fn default() -> Self {
        Self {
            min: MIN_PULSE,
            max: MAX_PULSE,
        }
    }
}

impl PulseLimits {
    /// Create a window; returns None unless `min < max`
    pub fn new(min: u16, max: u16) -> Option<Self> {
        if min < max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Midpoint of the window
    pub fn mid(&self) -> u16 {
        self.min + (self.max - self.min) / 2
    }

    /// Default jog step: the window divided into equal clicks
    pub fn click_step(&self) -> u16 {
        ((self.max - self.min) / STEPS_PER_FULL_SCALE).max(1)
    }

    /// Clamp a signed pulse into the window
    pub fn clamp(&self, pulse: i32) -> u16 {
        pulse.clamp(self.min as i32, self.max as i32) as u16
    }
}

/// Commanded servo position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoPosition {
    pulse: u16,
    limits: PulseLimits,
}

impl Default for ServoPosition {
    fn default() -> Self {
        Self::centered(PulseLimits::default())
    }
}

impl ServoPosition {
    /// Start at the middle of the window
    pub fn centered(limits: PulseLimits) -> Self {
        Self {
            pulse: limits.mid(),
            limits,
        }
    }

    /// Current pulse duration (µs)
    pub fn pulse(&self) -> u16 {
        self.pulse
    }

    /// Window this position is clamped to
    pub fn limits(&self) -> PulseLimits {
        self.limits
    }

    /// Move back to the midpoint and return it
    pub fn center(&mut self) -> u16 {
        self.pulse = self.limits.mid();
        self.pulse
    }

    /// Move by `step` in `direction`, clamped, and return the new pulse
    ///
    /// Clockwise shortens the pulse, counter-clockwise lengthens it.
    pub fn step(&mut self, direction: JogDirection, step: u16) -> u16 {
        let delta = match direction {
            JogDirection::Clockwise => -(step as i32),
            JogDirection::CounterClockwise => step as i32,
        };
        self.pulse = self.limits.clamp(self.pulse as i32 + delta);
        self.pulse
    }

    /// True when no further movement is possible in `direction`
    pub fn is_saturated(&self, direction: JogDirection) -> bool {
        match direction {
            JogDirection::Clockwise => self.pulse <= self.limits.min,
            JogDirection::CounterClockwise => self.pulse >= self.limits.max,
        }
    }
}
