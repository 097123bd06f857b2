//! Physical units and derived angles
//!
//! Raw sensor counts are converted using the sensitivity range that was
//! active when the counts were read. Angles are pure functions of a
//! single sample; nothing here filters or smooths.

use libm::{atan2f, sqrtf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Standard gravitational acceleration (m/s²)
pub const STANDARD_GRAVITY: f32 = 9.80665;

/// Radians to degrees
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Acceleration output unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccelUnit {
    /// Multiples of standard gravity
    Gravities,
    /// Meters per second squared
    #[default]
    MetersPerSecondSquared,
}

/// Three raw axis counts from one read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTriple {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawTriple {
    /// Create a raw triple
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Convert accelerometer counts using the given scale modifier (counts per g)
    pub fn to_acceleration(self, unit: AccelUnit, scale_modifier: f32) -> OrientationSample {
        let factor = match unit {
            AccelUnit::Gravities => 1.0 / scale_modifier,
            AccelUnit::MetersPerSecondSquared => STANDARD_GRAVITY / scale_modifier,
        };

        OrientationSample {
            x: self.x as f32 * factor,
            y: self.y as f32 * factor,
            z: self.z as f32 * factor,
            unit,
        }
    }

    /// Convert gyroscope counts using the given scale modifier (counts per deg/s)
    pub fn to_angular_rate(self, scale_modifier: f32) -> AngularRate {
        AngularRate {
            x: self.x as f32 / scale_modifier,
            y: self.y as f32 / scale_modifier,
            z: self.z as f32 / scale_modifier,
        }
    }
}

/// Acceleration vector tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub unit: AccelUnit,
}

impl OrientationSample {
    /// Roll in degrees: rotation about the X axis
    pub fn roll(&self) -> f32 {
        atan2f(self.y, self.z) * RAD_TO_DEG
    }

    /// Pitch in degrees: rotation about the Y axis
    pub fn pitch(&self) -> f32 {
        atan2f(-self.x, sqrtf(self.y * self.y + self.z * self.z)) * RAD_TO_DEG
    }

    /// Both angles from this one sample
    pub fn attitude(&self) -> Attitude {
        Attitude {
            roll: self.roll(),
            pitch: self.pitch(),
        }
    }

    /// Re-express this sample in another unit
    pub fn in_unit(self, unit: AccelUnit) -> Self {
        let factor = match (self.unit, unit) {
            (AccelUnit::Gravities, AccelUnit::MetersPerSecondSquared) => STANDARD_GRAVITY,
            (AccelUnit::MetersPerSecondSquared, AccelUnit::Gravities) => 1.0 / STANDARD_GRAVITY,
            _ => 1.0,
        };

        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
            unit,
        }
    }
}

/// Angular rate in deg/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AngularRate {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Roll and pitch in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
}

/// Die temperature in °C from the raw TEMP_OUT word
///
/// Formula from the MPU-6050 register map, rev 4.2, p. 30.
pub fn temperature_celsius(raw: i16) -> f32 {
    raw as f32 / 340.0 + 36.53
}
