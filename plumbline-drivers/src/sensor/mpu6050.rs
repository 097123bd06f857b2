//! MPU-6050 accelerometer/gyroscope (I2C)
//!
//! The device powers up asleep; [`Mpu6050::initialize`] clears the sleep
//! bit. Every measurement is a big-endian register pair decoded with
//! [`decode_word`].
//!
//! # Range Handling
//!
//! The range register is read on every converted sample rather than
//! cached, so a range change by any party is honored on the next read.
//! An unrecognized range pattern either falls back to the power-on
//! default with a warning ([`RangePolicy::Fallback`]) or is returned to
//! the caller as an error ([`RangePolicy::Strict`]).

use embedded_hal::i2c::{Error as _, I2c};
use plumbline_core::codec::decode_word;
use plumbline_core::range::{AccelRange, ConfigError, GyroRange};
use plumbline_core::traits::{AttitudeSensor, SensorError};
use plumbline_core::units::{
    temperature_celsius, AccelUnit, AngularRate, Attitude, OrientationSample, RawTriple,
};

/// Default 7-bit I2C address (AD0 low)
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// MPU-6050 register addresses
pub mod reg {
    /// Gyroscope configuration (full-scale range)
    pub const GYRO_CONFIG: u8 = 0x1B;
    /// Accelerometer configuration (full-scale range)
    pub const ACCEL_CONFIG: u8 = 0x1C;
    /// Accelerometer X, high byte
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    /// Accelerometer Y, high byte
    pub const ACCEL_YOUT_H: u8 = 0x3D;
    /// Accelerometer Z, high byte
    pub const ACCEL_ZOUT_H: u8 = 0x3F;
    /// Die temperature, high byte
    pub const TEMP_OUT_H: u8 = 0x41;
    /// Gyroscope X, high byte
    pub const GYRO_XOUT_H: u8 = 0x43;
    /// Gyroscope Y, high byte
    pub const GYRO_YOUT_H: u8 = 0x45;
    /// Gyroscope Z, high byte
    pub const GYRO_ZOUT_H: u8 = 0x47;
    /// Power management 1 (sleep, clock source)
    pub const PWR_MGMT_1: u8 = 0x6B;
}

/// What to do when a range register holds an unknown pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangePolicy {
    /// Use the power-on default range and log a warning
    #[default]
    Fallback,
    /// Fail the read with [`SensorError::UnknownRange`]
    Strict,
}

/// One pass over every measurement the device offers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionData {
    pub acceleration: OrientationSample,
    pub rate: AngularRate,
    pub temperature_c: f32,
}

/// MPU-6050 driver
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
    policy: RangePolicy,
    fallbacks: u32,
}

impl<I2C: I2c> Mpu6050<I2C> {
    /// Create a driver for the device at `address`
    ///
    /// The device is not touched until [`initialize`](Self::initialize).
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            policy: RangePolicy::Fallback,
            fallbacks: 0,
        }
    }

    /// Set the unknown-range policy
    pub fn with_policy(mut self, policy: RangePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Number of reads that fell back to a default range
    pub fn fallback_count(&self) -> u32 {
        self.fallbacks
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Wake the device out of sleep mode
    pub fn initialize(&mut self) -> Result<(), SensorError> {
        log::debug!("init: waking MPU-6050 at {:#04x}", self.address);
        self.i2c
            .write(self.address, &[reg::PWR_MGMT_1, 0x00])
            .map_err(|e| {
                log::warn!("init: wake write failed: {:?}", e.kind());
                SensorError::DeviceUnavailable
            })?;
        log::debug!("init: device initialized");
        Ok(())
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| {
                log::debug!("read {:#04x} failed: {:?}", register, e.kind());
                SensorError::ReadFailed
            })?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| {
                log::debug!("write {:#04x} failed: {:?}", register, e.kind());
                SensorError::WriteFailed
            })
    }

    /// Read the register pair at `register`/`register + 1` as a signed word
    fn read_word(&mut self, register: u8) -> Result<i16, SensorError> {
        let high = self.read_register(register)?;
        let low = self.read_register(register + 1)?;
        Ok(decode_word(high, low))
    }

    fn read_triple(&mut self, x: u8, y: u8, z: u8) -> Result<RawTriple, SensorError> {
        Ok(RawTriple::new(
            self.read_word(x)?,
            self.read_word(y)?,
            self.read_word(z)?,
        ))
    }

    /// Apply the range policy to an unknown pattern
    fn resolve<R: Copy>(
        &mut self,
        parsed: Result<R, ConfigError>,
        default: R,
    ) -> Result<R, SensorError> {
        match parsed {
            Ok(range) => Ok(range),
            Err(err) => match self.policy {
                RangePolicy::Strict => Err(SensorError::UnknownRange(err)),
                RangePolicy::Fallback => {
                    self.fallbacks = self.fallbacks.saturating_add(1);
                    log::warn!("{} - using the power-on default range", err);
                    Ok(default)
                }
            },
        }
    }

    /// Read ACCEL_CONFIG
    ///
    /// With `raw` the register value is returned unchanged; otherwise the
    /// range in g (2, 4, 8 or 16), or -1 for an unknown pattern.
    pub fn read_acceleration_range(&mut self, raw: bool) -> Result<i32, SensorError> {
        let value = self.read_register(reg::ACCEL_CONFIG)?;
        if raw {
            Ok(value as i32)
        } else {
            Ok(AccelRange::report(value))
        }
    }

    /// Set the accelerometer range
    ///
    /// The register is zeroed first so no stale bits survive.
    pub fn set_acceleration_range(&mut self, range: AccelRange) -> Result<(), SensorError> {
        self.write_register(reg::ACCEL_CONFIG, 0x00)?;
        self.write_register(reg::ACCEL_CONFIG, range.register_value())
    }

    /// Read GYRO_CONFIG; same reporting rules as the accelerometer range
    pub fn read_gyro_range(&mut self, raw: bool) -> Result<i32, SensorError> {
        let value = self.read_register(reg::GYRO_CONFIG)?;
        if raw {
            Ok(value as i32)
        } else {
            Ok(GyroRange::report(value))
        }
    }

    /// Set the gyroscope range (zeroed first, as for acceleration)
    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), SensorError> {
        self.write_register(reg::GYRO_CONFIG, 0x00)?;
        self.write_register(reg::GYRO_CONFIG, range.register_value())
    }

    /// Read the acceleration vector in `unit`
    pub fn read_acceleration(&mut self, unit: AccelUnit) -> Result<OrientationSample, SensorError> {
        let raw = self.read_triple(reg::ACCEL_XOUT_H, reg::ACCEL_YOUT_H, reg::ACCEL_ZOUT_H)?;
        let pattern = self.read_register(reg::ACCEL_CONFIG)?;
        let range = self.resolve(AccelRange::from_register(pattern), AccelRange::G2)?;
        Ok(raw.to_acceleration(unit, range.scale_modifier()))
    }

    /// Read the angular rate in deg/s
    pub fn read_gyro(&mut self) -> Result<AngularRate, SensorError> {
        let raw = self.read_triple(reg::GYRO_XOUT_H, reg::GYRO_YOUT_H, reg::GYRO_ZOUT_H)?;
        let pattern = self.read_register(reg::GYRO_CONFIG)?;
        let range = self.resolve(GyroRange::from_register(pattern), GyroRange::Dps250)?;
        Ok(raw.to_angular_rate(range.scale_modifier()))
    }

    /// Read the die temperature in °C
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.read_word(reg::TEMP_OUT_H).map(temperature_celsius)
    }

    /// Roll in degrees from a fresh sample
    pub fn roll(&mut self) -> Result<f32, SensorError> {
        self.read_acceleration(AccelUnit::default()).map(|s| s.roll())
    }

    /// Pitch in degrees from a fresh sample
    ///
    /// Calling [`roll`](Self::roll) then `pitch` reads the sensor twice;
    /// use [`read_attitude`](AttitudeSensor::read_attitude) when both
    /// angles must come from one sample.
    pub fn pitch(&mut self) -> Result<f32, SensorError> {
        self.read_acceleration(AccelUnit::default()).map(|s| s.pitch())
    }

    /// Read acceleration, rate and temperature
    pub fn read_all(&mut self) -> Result<MotionData, SensorError> {
        Ok(MotionData {
            temperature_c: self.read_temperature()?,
            acceleration: self.read_acceleration(AccelUnit::default())?,
            rate: self.read_gyro()?,
        })
    }
}

impl<I2C: I2c> AttitudeSensor for Mpu6050<I2C> {
    fn read_attitude(&mut self) -> Result<Attitude, SensorError> {
        self.read_acceleration(AccelUnit::default())
            .map(|sample| sample.attitude())
    }

    fn temperature(&mut self) -> Result<Option<f32>, SensorError> {
        self.read_temperature().map(Some)
    }
}
