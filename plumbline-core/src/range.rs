//! Sensitivity ranges
//!
//! The accelerometer and gyroscope each hold exactly one active range in a
//! single configuration register. Ranges trade measurement span for
//! resolution; each maps to a fixed scale modifier (LSB per unit).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value reported by range queries when the register holds an unknown pattern
pub const UNKNOWN_RANGE: i32 = -1;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Range register holds a bit pattern matching none of the known ranges
    UnknownSensitivityRange(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::UnknownSensitivityRange(raw) => {
                write!(f, "unknown sensitivity range pattern {:#04x}", raw)
            }
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccelRange {
    /// ±2g (most sensitive, power-on default)
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "2g"))]
    G2,
    /// ±4g
    #[cfg_attr(feature = "serde", serde(rename = "4g"))]
    G4,
    /// ±8g
    #[cfg_attr(feature = "serde", serde(rename = "8g"))]
    G8,
    /// ±16g (least sensitive)
    #[cfg_attr(feature = "serde", serde(rename = "16g"))]
    G16,
}

impl AccelRange {
    /// All ranges in register order
    pub const ALL: [AccelRange; 4] = [Self::G2, Self::G4, Self::G8, Self::G16];

    /// Bit pattern written to ACCEL_CONFIG
    pub const fn register_value(self) -> u8 {
        match self {
            Self::G2 => 0x00,
            Self::G4 => 0x08,
            Self::G8 => 0x10,
            Self::G16 => 0x18,
        }
    }

    /// Parse the raw ACCEL_CONFIG value
    pub fn from_register(raw: u8) -> Result<Self, ConfigError> {
        match raw {
            0x00 => Ok(Self::G2),
            0x08 => Ok(Self::G4),
            0x10 => Ok(Self::G8),
            0x18 => Ok(Self::G16),
            other => Err(ConfigError::UnknownSensitivityRange(other)),
        }
    }

    /// Counts per g
    pub const fn scale_modifier(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    /// Full-scale span in g
    pub const fn full_scale(self) -> i32 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Report a raw register value as {2, 4, 8, 16}, or -1 if unrecognized
    pub fn report(raw: u8) -> i32 {
        Self::from_register(raw)
            .map(Self::full_scale)
            .unwrap_or(UNKNOWN_RANGE)
    }
}

/// Gyroscope full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GyroRange {
    /// ±250 deg/s (power-on default)
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "250dps"))]
    Dps250,
    /// ±500 deg/s
    #[cfg_attr(feature = "serde", serde(rename = "500dps"))]
    Dps500,
    /// ±1000 deg/s
    #[cfg_attr(feature = "serde", serde(rename = "1000dps"))]
    Dps1000,
    /// ±2000 deg/s
    #[cfg_attr(feature = "serde", serde(rename = "2000dps"))]
    Dps2000,
}

impl GyroRange {
    /// All ranges in register order
    pub const ALL: [GyroRange; 4] = [Self::Dps250, Self::Dps500, Self::Dps1000, Self::Dps2000];

    /// Bit pattern written to GYRO_CONFIG
    pub const fn register_value(self) -> u8 {
        match self {
            Self::Dps250 => 0x00,
            Self::Dps500 => 0x08,
            Self::Dps1000 => 0x10,
            Self::Dps2000 => 0x18,
        }
    }

    /// Parse the raw GYRO_CONFIG value
    pub fn from_register(raw: u8) -> Result<Self, ConfigError> {
        match raw {
            0x00 => Ok(Self::Dps250),
            0x08 => Ok(Self::Dps500),
            0x10 => Ok(Self::Dps1000),
            0x18 => Ok(Self::Dps2000),
            other => Err(ConfigError::UnknownSensitivityRange(other)),
        }
    }

    /// Counts per deg/s
    pub const fn scale_modifier(self) -> f32 {
        match self {
            Self::Dps250 => 131.0,
            Self::Dps500 => 65.5,
            Self::Dps1000 => 32.8,
            Self::Dps2000 => 16.4,
        }
    }

    /// Full-scale span in deg/s
    pub const fn full_scale(self) -> i32 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1000,
            Self::Dps2000 => 2000,
        }
    }

    /// Report a raw register value as {250, 500, 1000, 2000}, or -1 if unrecognized
    pub fn report(raw: u8) -> i32 {
        Self::from_register(raw)
            .map(Self::full_scale)
            .unwrap_or(UNKNOWN_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_accel_patterns() {
        assert_eq!(AccelRange::report(0x00), 2);
        assert_eq!(AccelRange::report(0x08), 4);
        assert_eq!(AccelRange::report(0x10), 8);
        assert_eq!(AccelRange::report(0x18), 16);
    }

    #[test]
    fn test_register_roundtrip() {
        for range in AccelRange::ALL {
            assert_eq!(AccelRange::from_register(range.register_value()), Ok(range));
        }
        for range in GyroRange::ALL {
            assert_eq!(GyroRange::from_register(range.register_value()), Ok(range));
        }
    }

    #[test]
    fn test_unknown_pattern_is_reported() {
        // Self-test bits set on top of the ±2g pattern
        assert_eq!(
            AccelRange::from_register(0xE0),
            Err(ConfigError::UnknownSensitivityRange(0xE0))
        );
        assert_eq!(AccelRange::report(0xE0), UNKNOWN_RANGE);
        assert_eq!(GyroRange::report(0x01), UNKNOWN_RANGE);
    }

    #[test]
    fn test_scale_halves_per_step() {
        for pair in AccelRange::ALL.windows(2) {
            assert_eq!(pair[0].scale_modifier(), pair[1].scale_modifier() * 2.0);
        }
    }

    proptest! {
        #[test]
        fn unknown_bytes_report_minus_one(raw: u8) {
            prop_assume!(![0x00u8, 0x08, 0x10, 0x18].contains(&raw));
            prop_assert_eq!(AccelRange::report(raw), -1);
            prop_assert_eq!(GyroRange::report(raw), -1);
        }
    }
}
