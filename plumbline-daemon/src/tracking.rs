//! Closed-loop roll tracking
//!
//! Holds the mechanism at a reference roll angle. Each iteration samples
//! the sensor and, when the angle has left the dead band, runs a burst of
//! fixed-size correction steps until it is back inside.
//!
//! ```text
//!   sample ──► classify ──► NoChange ─────────────────────────► wait
//!                  │
//!                  └─► Leaned ──► step ─► settle ─► resample ─┐
//!                         ▲                                   │
//!                         └──────── still same side ◄─────────┘
//! ```
//!
//! A burst also ends when the servo reaches the end of its window or the
//! lean flips to the other side; the next iteration picks it up from
//! there.

use std::time::Duration;

use parking_lot::Mutex;
use plumbline_core::config::TrackingConfig;
use plumbline_core::tracking::{classify, Deviation};
use plumbline_core::traits::{AttitudeSensor, PulseOutput};

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::servo::Servo;

/// Where the target angle comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference {
    /// Capture the current roll once at session start
    Live,
    /// Use a supplied roll angle (degrees)
    Fixed(f32),
}

/// Tracking loop timing and gains
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingParams {
    pub tolerance_deg: f32,
    pub max_iterations: u32,
    pub sample_interval: Duration,
    pub correction_interval: Duration,
    pub correction_step: u16,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

impl From<&TrackingConfig> for TrackingParams {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            tolerance_deg: config.tolerance_deg,
            max_iterations: config.max_iterations,
            sample_interval: Duration::from_millis(config.sample_interval_ms as u64),
            correction_interval: Duration::from_millis(config.correction_interval_ms as u64),
            correction_step: config.correction_step,
        }
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    /// Top-level iterations started
    pub iterations: u32,
    /// Correction steps sent
    pub corrections: u32,
    /// Stopped by cancellation rather than the iteration budget
    pub cancelled: bool,
    /// Last commanded pulse (µs)
    pub final_position: u16,
    /// Roll angle held (degrees)
    pub reference: f32,
}

fn sample_roll<S: AttitudeSensor>(sensor: &Mutex<S>) -> Result<f32> {
    Ok(sensor.lock().read_attitude()?.roll)
}

/// Run one tracking session to completion
///
/// Cancellation ends the session normally with `cancelled` set in the
/// report. If it lands before a live reference was captured the report
/// has no iterations and a NaN reference. Any sensor or servo failure
/// ends the session with that error.
pub fn run_tracking_session<S, O>(
    sensor: &Mutex<S>,
    servo: &Mutex<Servo<O>>,
    reference: Reference,
    params: &TrackingParams,
    cancel: &CancelToken,
) -> Result<SessionReport>
where
    S: AttitudeSensor,
    O: PulseOutput,
    Error: From<O::Error>,
{
    let mut report = SessionReport {
        iterations: 0,
        corrections: 0,
        cancelled: false,
        final_position: servo.lock().position(),
        reference: f32::NAN,
    };

    let reference = match reference {
        Reference::Fixed(angle) => angle,
        Reference::Live if cancel.is_cancelled() => {
            report.cancelled = true;
            log::info!("tracking: cancelled before start");
            return Ok(report);
        }
        Reference::Live => sample_roll(sensor)?,
    };
    report.reference = reference;
    log::info!("tracking: reference r={:.1}", reference);

    'session: while report.iterations < params.max_iterations {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        report.iterations += 1;

        let roll = sample_roll(sensor)?;
        let mut state = classify(roll, reference, params.tolerance_deg);
        log::info!("r={:.0}, {:?}", roll, state);

        if let Some(direction) = state.correction() {
            while state.is_leaning() {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'session;
                }
                {
                    let mut servo = servo.lock();
                    if servo.is_saturated(direction) {
                        log::warn!("tracking: servo at {} limit", direction.label());
                        break;
                    }
                    servo.step(direction, params.correction_step)?;
                }
                report.corrections += 1;

                if cancel.wait(params.correction_interval) {
                    report.cancelled = true;
                    break 'session;
                }

                let roll = sample_roll(sensor)?;
                let next = classify(roll, reference, params.tolerance_deg);
                log::debug!("r={:.1}, {:?}", roll, next);
                if next != state {
                    state = next;
                    break;
                }
            }
        }
        if state == Deviation::NoChange {
            log::info!("on track");
        }

        if cancel.wait(params.sample_interval) {
            report.cancelled = true;
            break;
        }
    }

    report.final_position = servo.lock().position();
    log::info!(
        "tracking: done after {} iterations, {} corrections{}",
        report.iterations,
        report.corrections,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servo::mock::RecordingOutput;
    use plumbline_core::position::PulseLimits;
    use plumbline_core::traits::SensorError;
    use plumbline_core::units::Attitude;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Plays back a fixed list of roll angles, repeating the last one
    struct ScriptedSensor {
        rolls: VecDeque<f32>,
        last: f32,
        fail: bool,
    }

    impl ScriptedSensor {
        fn new(rolls: &[f32]) -> Self {
            Self {
                rolls: rolls.iter().copied().collect(),
                last: 0.0,
                fail: false,
            }
        }
    }

    impl AttitudeSensor for ScriptedSensor {
        fn read_attitude(&mut self) -> core::result::Result<Attitude, SensorError> {
            if self.fail {
                return Err(SensorError::ReadFailed);
            }
            if let Some(roll) = self.rolls.pop_front() {
                self.last = roll;
            }
            Ok(Attitude {
                roll: self.last,
                pitch: 0.0,
            })
        }
    }

    /// Roll responds to the servo: 10 µs of pulse per degree
    struct PlantSensor {
        tilt: f32,
        pulse: Arc<Mutex<u16>>,
    }

    impl AttitudeSensor for PlantSensor {
        fn read_attitude(&mut self) -> core::result::Result<Attitude, SensorError> {
            let offset = *self.pulse.lock() as f32 - 1200.0;
            Ok(Attitude {
                roll: self.tilt - offset / 10.0,
                pitch: 0.0,
            })
        }
    }

    /// Output that also moves the plant
    struct PlantOutput {
        inner: RecordingOutput,
        pulse: Arc<Mutex<u16>>,
    }

    impl PulseOutput for PlantOutput {
        type Error = plumbline_protocol::ProtocolError;

        fn set_pulse(
            &mut self,
            pulse: u16,
        ) -> core::result::Result<plumbline_core::traits::ActuatorStatus, Self::Error> {
            *self.pulse.lock() = pulse;
            self.inner.set_pulse(pulse)
        }
    }

    fn fast_params(max_iterations: u32) -> TrackingParams {
        TrackingParams {
            max_iterations,
            sample_interval: Duration::ZERO,
            correction_interval: Duration::ZERO,
            ..TrackingParams::default()
        }
    }

    fn plant(tilt: f32) -> (Mutex<PlantSensor>, Mutex<Servo<PlantOutput>>) {
        let pulse = Arc::new(Mutex::new(1200));
        let sensor = PlantSensor {
            tilt,
            pulse: Arc::clone(&pulse),
        };
        let output = PlantOutput {
            inner: RecordingOutput::default(),
            pulse,
        };
        (
            Mutex::new(sensor),
            Mutex::new(Servo::new(output, PulseLimits::default())),
        )
    }

    fn recording_servo() -> Mutex<Servo<RecordingOutput>> {
        Mutex::new(Servo::new(RecordingOutput::default(), PulseLimits::default()))
    }

    #[test]
    fn test_corrects_back_into_band() {
        // Reference 10, leaning to 15: three 10 µs steps bring it to 12
        let (sensor, servo) = plant(15.0);
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(10.0),
            &fast_params(5),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.iterations, 5);
        assert_eq!(report.corrections, 3);
        assert_eq!(report.final_position, 1230);
        assert!(!report.cancelled);
        assert_eq!(servo.lock().output().inner.pulses, vec![1210, 1220, 1230]);

        let roll = sensor.lock().read_attitude().unwrap().roll;
        assert!((8.0..=12.0).contains(&roll));
    }

    #[test]
    fn test_negative_lean_steps_clockwise() {
        let (sensor, servo) = plant(5.0);
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(10.0),
            &fast_params(2),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.corrections, 3);
        assert_eq!(report.final_position, 1170);
    }

    #[test]
    fn test_dead_band_sends_nothing() {
        let sensor = Mutex::new(ScriptedSensor::new(&[10.0, 11.5, 8.5, 12.0]));
        let servo = recording_servo();
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Live,
            &fast_params(3),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.reference, 10.0);
        assert_eq!(report.corrections, 0);
        assert!(servo.lock().output().pulses.is_empty());
    }

    #[test]
    fn test_live_reference_burst() {
        let sensor = Mutex::new(ScriptedSensor::new(&[10.0, 15.0, 13.0, 11.0]));
        let servo = recording_servo();
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Live,
            &fast_params(2),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.corrections, 2);
        assert_eq!(servo.lock().output().pulses, vec![1210, 1220]);
    }

    #[test]
    fn test_burst_ends_when_lean_flips() {
        let sensor = Mutex::new(ScriptedSensor::new(&[15.0, 5.0]));
        let servo = recording_servo();
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(10.0),
            &fast_params(1),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.corrections, 1);
        assert_eq!(servo.lock().output().pulses, vec![1210]);
    }

    #[test]
    fn test_saturation_ends_burst() {
        let (sensor, servo) = plant(500.0);
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(0.0),
            &fast_params(3),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.final_position, 1900);
        assert_eq!(report.corrections, 70);
        assert_eq!(report.iterations, 3);
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let sensor = Mutex::new(ScriptedSensor::new(&[10.0]));
        let servo = recording_servo();
        let report = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(0.0),
            &fast_params(300),
            &cancel,
        )
        .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.iterations, 0);

        let report =
            run_tracking_session(&sensor, &servo, Reference::Live, &fast_params(300), &cancel)
                .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.final_position, 1200);
        assert!(report.reference.is_nan());
        // Reference was never sampled
        assert_eq!(sensor.lock().rolls.len(), 1);
    }

    #[test]
    fn test_cancel_during_burst_stops_stepping() {
        let (sensor, servo) = plant(500.0);
        let (sensor, servo) = (Arc::new(sensor), Arc::new(servo));
        let cancel = CancelToken::new();

        let params = TrackingParams {
            correction_interval: Duration::from_millis(40),
            ..fast_params(300)
        };
        let handle = {
            let (sensor, servo, cancel) = (Arc::clone(&sensor), Arc::clone(&servo), cancel.clone());
            std::thread::spawn(move || {
                run_tracking_session(&*sensor, &*servo, Reference::Fixed(0.0), &params, &cancel)
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        cancel.cancel();
        let report = handle.join().unwrap().unwrap();
        assert!(report.cancelled);
        assert_eq!(report.iterations, 1);
        // Still leaning hard when stopped: nowhere near the window edge
        assert!(report.corrections >= 1 && report.corrections < 20);

        let sent = servo.lock().output().inner.pulses.len();
        assert_eq!(sent as u32, report.corrections);
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(servo.lock().output().inner.pulses.len(), sent);
        assert_eq!(report.final_position, 1200 + 10 * report.corrections as u16);
    }

    #[test]
    fn test_cancel_interrupts_sample_wait() {
        let sensor = Arc::new(Mutex::new(ScriptedSensor::new(&[0.0])));
        let servo = Arc::new(recording_servo());
        let cancel = CancelToken::new();

        let params = TrackingParams {
            sample_interval: Duration::from_secs(10),
            ..fast_params(300)
        };
        let handle = {
            let (sensor, servo, cancel) = (Arc::clone(&sensor), Arc::clone(&servo), cancel.clone());
            std::thread::spawn(move || {
                run_tracking_session(&*sensor, &*servo, Reference::Fixed(0.0), &params, &cancel)
            })
        };

        std::thread::sleep(Duration::from_millis(50));
        cancel.cancel();
        let report = handle.join().unwrap().unwrap();
        assert!(report.cancelled);
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn test_sensor_failure_ends_session() {
        let mut scripted = ScriptedSensor::new(&[]);
        scripted.fail = true;
        let sensor = Mutex::new(scripted);
        let servo = recording_servo();
        let result = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(0.0),
            &fast_params(3),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(Error::Sensor(SensorError::ReadFailed))));
    }

    #[test]
    fn test_servo_failure_ends_session() {
        let sensor = Mutex::new(ScriptedSensor::new(&[20.0]));
        let servo = Mutex::new(Servo::new(
            RecordingOutput {
                fail: true,
                ..Default::default()
            },
            PulseLimits::default(),
        ));
        let result = run_tracking_session(
            &sensor,
            &servo,
            Reference::Fixed(0.0),
            &fast_params(3),
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(Error::Protocol(_))));
    }
}
