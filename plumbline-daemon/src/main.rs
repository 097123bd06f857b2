//! Plumbline - Orientation Tracking Servo Controller
//!
//! Reads roll from an MPU-6050 on the local I2C bus and drives a hobby
//! servo through the pigpio daemon's socket interface. An operator jogs
//! the servo from a line console and can hand control to a tracking loop
//! that holds the current roll angle.
//!
//! ```text
//!   stdin ──► Console ──┬──► RepeatTrigger (cw/ccw) ──┐
//!                       │                             ├──► Servo ──► pigpiod (TCP)
//!                       └──► tracking thread ─────────┘
//!                                  │
//!                                  └──► Mpu6050 (I2C)
//! ```

mod cancel;
mod config;
mod console;
mod error;
mod link;
mod repeat;
mod servo;
mod tracking;

use std::io::{self, BufRead};
use std::sync::Arc;

use linux_embedded_hal::I2cdev;
use parking_lot::Mutex;
use plumbline_core::config::SensorConfig;
use plumbline_core::traits::SensorError;
use plumbline_drivers::sensor::{Mpu6050, RangePolicy};

use crate::config::ConfigSource;
use crate::console::{Command, Console};
use crate::error::{Error, Result};
use crate::link::LinkTimeouts;
use crate::servo::Servo;
use crate::tracking::TrackingParams;

const HELP: &str =
    "commands: cw | ccw | hold cw|ccw | release cw|ccw | track [deg] | stop | status | quit";

/// Open the bus, wake the sensor and apply the configured ranges
fn open_sensor(config: &SensorConfig) -> Result<Mpu6050<I2cdev>> {
    let bus = I2cdev::new(config.bus.as_str()).map_err(|e| {
        log::error!("init: cannot open {}: {}", config.bus, e);
        Error::Sensor(SensorError::DeviceUnavailable)
    })?;

    let policy = if config.strict_range {
        RangePolicy::Strict
    } else {
        RangePolicy::Fallback
    };
    let mut sensor = Mpu6050::new(bus, config.address).with_policy(policy);
    sensor.initialize()?;
    sensor.set_acceleration_range(config.accel_range)?;
    sensor.set_gyro_range(config.gyro_range)?;

    log::info!(
        "init: MPU-6050 at {:#04x}, ±{}g, ±{}°/s",
        sensor.address(),
        sensor.read_acceleration_range(false)?,
        sensor.read_gyro_range(false)?
    );
    Ok(sensor)
}

fn main() -> Result<()> {
    let source = config::source_from_args();
    let config = config::load(&source)?;

    // Initialize logger; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Plumbline v{} starting...", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File(path) => log::info!("Using config: {}", path),
        ConfigSource::Embedded => log::info!("Using embedded default config"),
    }

    let sensor = open_sensor(&config.sensor)?;

    let limits = config
        .actuator
        .limits()
        .ok_or_else(|| Error::Config("min_pulse must be below max_pulse".to_string()))?;
    let channel = link::connect(
        config.actuator.host.as_str(),
        config.actuator.port,
        config.actuator.channel,
        LinkTimeouts::from(&config.actuator),
    )?;

    let mut servo = Servo::new(channel, limits);
    let report = servo.center()?;
    let window = servo.limits();
    log::info!(
        "init. pos={} (window {}..{} µs)",
        report.position,
        window.min,
        window.max
    );

    let console = Arc::new(Console::new(
        Arc::new(Mutex::new(sensor)),
        console::share(servo),
        config.actuator.jog_step(),
        &config.jog,
        TrackingParams::from(&config.tracking),
    ));

    // Set up shutdown signal handler
    let handler_console = Arc::clone(&console);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        handler_console.shutdown();
        std::process::exit(0);
    })?;

    println!("{}", HELP);
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(command) => {
                let outcome = console.execute(command);
                if outcome.ok {
                    println!("{}", outcome.message);
                } else {
                    println!("error: {}", outcome.message);
                }
            }
            None => println!("unknown command '{}'; {}", line.trim(), HELP),
        }
    }

    log::info!("Shutting down...");
    console.shutdown();
    log::info!("Plumbline stopped");
    Ok(())
}
