//! Configuration type definitions
//!
//! Every section has a complete default, so a configuration file only
//! needs to name the values it changes.

use heapless::String;

use crate::position::{PulseLimits, MAX_PULSE, MIN_PULSE};
use crate::range::{AccelRange, GyroRange};
use crate::tracking::DEFAULT_TOLERANCE_DEG;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum bus device path length
pub const MAX_PATH_LEN: usize = 64;

/// Maximum actuator host name length
pub const MAX_HOST_LEN: usize = 64;

/// Maximum log level label length
pub const MAX_LEVEL_LEN: usize = 16;

/// Default 7-bit address of the accelerometer
pub const DEFAULT_SENSOR_ADDRESS: u8 = 0x68;

/// Default I2C bus device
pub const DEFAULT_BUS: &str = "/dev/i2c-1";

/// Default servo daemon host
pub const DEFAULT_HOST: &str = "localhost";

/// Default servo daemon port
pub const DEFAULT_PORT: u16 = 8888;

/// Default GPIO driving the servo
pub const DEFAULT_SERVO_GPIO: u8 = 17;

fn label<const N: usize>(text: &str) -> String<N> {
    let mut s = String::new();
    // Defaults are all shorter than their capacity
    let _ = s.push_str(text);
    s
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// `min_pulse` must be below `max_pulse`
    InvalidPulseWindow,
    /// A step size is zero
    ZeroStep,
    /// Tolerance is negative or not a number
    InvalidTolerance,
    /// Tracking would run zero iterations
    ZeroIterations,
    /// Repeat interval is zero
    ZeroRepeatInterval,
    /// Connect or read timeout is zero
    ZeroTimeout,
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ValidationError::InvalidPulseWindow => "min_pulse must be below max_pulse",
            ValidationError::ZeroStep => "step sizes must be non-zero",
            ValidationError::InvalidTolerance => "tolerance_deg must be a non-negative number",
            ValidationError::ZeroIterations => "max_iterations must be non-zero",
            ValidationError::ZeroRepeatInterval => "repeat_interval_ms must be non-zero",
            ValidationError::ZeroTimeout => {
                "connect_timeout_ms and read_timeout_ms must be non-zero"
            }
        };
        f.write_str(msg)
    }
}

/// Accelerometer configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// I2C bus device path
    pub bus: String<MAX_PATH_LEN>,
    /// 7-bit device address
    pub address: u8,
    /// Accelerometer range applied at startup
    pub accel_range: AccelRange,
    /// Gyroscope range applied at startup
    pub gyro_range: GyroRange,
    /// Reject unknown range patterns instead of falling back to the default
    pub strict_range: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            bus: label(DEFAULT_BUS),
            address: DEFAULT_SENSOR_ADDRESS,
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
            strict_range: false,
        }
    }
}

/// Servo daemon connection and pulse window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActuatorConfig {
    /// Daemon host name or address
    pub host: String<MAX_HOST_LEN>,
    /// Daemon TCP port
    pub port: u16,
    /// GPIO channel the servo is wired to
    pub channel: u8,
    /// Shortest pulse (µs)
    pub min_pulse: u16,
    /// Longest pulse (µs)
    pub max_pulse: u16,
    /// Manual jog step (µs); defaults to 1/40 of the window
    pub jog_step: Option<u16>,
    /// TCP connect timeout (ms)
    pub connect_timeout_ms: u32,
    /// Response read timeout (ms)
    pub read_timeout_ms: u32,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            host: label(DEFAULT_HOST),
            port: DEFAULT_PORT,
            channel: DEFAULT_SERVO_GPIO,
            min_pulse: MIN_PULSE,
            max_pulse: MAX_PULSE,
            jog_step: None,
            connect_timeout_ms: 2000,
            read_timeout_ms: 1000,
        }
    }
}

impl ActuatorConfig {
    /// Pulse window, if valid
    pub fn limits(&self) -> Option<PulseLimits> {
        PulseLimits::new(self.min_pulse, self.max_pulse)
    }

    /// Manual jog step, falling back to the window's click step
    pub fn jog_step(&self) -> u16 {
        match (self.jog_step, self.limits()) {
            (Some(step), _) => step,
            (None, Some(limits)) => limits.click_step(),
            (None, None) => PulseLimits::default().click_step(),
        }
    }
}

/// Closed-loop tracking parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackingConfig {
    /// Dead-band half-width (degrees)
    pub tolerance_deg: f32,
    /// Top-level iterations per session
    pub max_iterations: u32,
    /// Wait between top-level samples (ms)
    pub sample_interval_ms: u32,
    /// Settle delay between correction steps (ms)
    pub correction_interval_ms: u32,
    /// Pulse change per correction step (µs)
    pub correction_step: u16,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            max_iterations: 300,
            sample_interval_ms: 100,
            correction_interval_ms: 20,
            correction_step: 10,
        }
    }
}

/// Long-press repeat timing for manual jog
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JogConfig {
    /// Hold time before the first repeat (ms)
    pub initial_delay_ms: u32,
    /// Time between repeats (ms)
    pub repeat_interval_ms: u32,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            repeat_interval_ms: 200,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoggingConfig {
    /// Default filter (trace, debug, info, warn, error)
    pub level: String<MAX_LEVEL_LEN>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: label("info"),
        }
    }
}

/// Complete tracker configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlumblineConfig {
    pub sensor: SensorConfig,
    pub actuator: ActuatorConfig,
    pub tracking: TrackingConfig,
    pub jog: JogConfig,
    pub logging: LoggingConfig,
}

impl PlumblineConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.actuator.limits().is_none() {
            return Err(ValidationError::InvalidPulseWindow);
        }
        if self.actuator.jog_step() == 0 || self.tracking.correction_step == 0 {
            return Err(ValidationError::ZeroStep);
        }
        let tolerance = self.tracking.tolerance_deg;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ValidationError::InvalidTolerance);
        }
        if self.tracking.max_iterations == 0 {
            return Err(ValidationError::ZeroIterations);
        }
        if self.jog.repeat_interval_ms == 0 {
            return Err(ValidationError::ZeroRepeatInterval);
        }
        if self.actuator.connect_timeout_ms == 0 || self.actuator.read_timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }
}
