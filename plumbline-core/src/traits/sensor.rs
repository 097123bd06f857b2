//! Orientation sensor traits

use crate::range::ConfigError;
use crate::units::Attitude;

/// Errors that can occur with orientation sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus handle could not be obtained or the wake-up write failed
    DeviceUnavailable,
    /// A register read failed
    ReadFailed,
    /// A register write failed after initialization
    WriteFailed,
    /// Range register holds an unknown pattern (strict range policy only)
    UnknownRange(ConfigError),
}

impl core::fmt::Display for SensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorError::DeviceUnavailable => f.write_str("sensor device unavailable"),
            SensorError::ReadFailed => f.write_str("sensor register read failed"),
            SensorError::WriteFailed => f.write_str("sensor register write failed"),
            SensorError::UnknownRange(err) => write!(f, "{}", err),
        }
    }
}

impl From<ConfigError> for SensorError {
    fn from(err: ConfigError) -> Self {
        SensorError::UnknownRange(err)
    }
}

/// Trait for sensors that report roll and pitch
///
/// Takes `&mut self` because every reading is a fresh bus transaction.
pub trait AttitudeSensor {
    /// Read roll and pitch (degrees) from a single sample
    fn read_attitude(&mut self) -> Result<Attitude, SensorError>;

    /// Read roll alone (degrees)
    fn read_roll(&mut self) -> Result<f32, SensorError> {
        self.read_attitude().map(|attitude| attitude.roll)
    }

    /// Read the sensor's temperature (°C), if it has one
    fn temperature(&mut self) -> Result<Option<f32>, SensorError> {
        Ok(None)
    }
}
