//! Jog console
//!
//! The operator surface: single jog clicks, held jogs that repeat,
//! starting and stopping a tracking session, and a status readout. Every
//! operation answers with an [`Outcome`] whose message is shown to the
//! operator as is.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use plumbline_core::config::JogConfig;
use plumbline_core::position::JogDirection;
use plumbline_core::traits::{AttitudeSensor, PulseOutput, SensorError};
use plumbline_core::units::Attitude;

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::repeat::RepeatTrigger;
use crate::servo::{Servo, SharedServo};
use crate::tracking::{run_tracking_session, Reference, SessionReport, TrackingParams};

/// Result of one console operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub message: String,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

impl From<Error> for Outcome {
    fn from(e: Error) -> Self {
        Outcome::failed(e.to_string())
    }
}

/// One console command as typed by the operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Rotate(JogDirection),
    Press(JogDirection),
    Release(JogDirection),
    /// Hold the current roll, or the given angle in degrees
    Track(Option<f32>),
    Stop,
    Status,
    Quit,
}

fn parse_direction(word: Option<&str>) -> Option<JogDirection> {
    match word? {
        "cw" => Some(JogDirection::Clockwise),
        "ccw" => Some(JogDirection::CounterClockwise),
        _ => None,
    }
}

impl Command {
    /// Parse a console line; `None` for anything unrecognized
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "cw" => Command::Rotate(JogDirection::Clockwise),
            "ccw" => Command::Rotate(JogDirection::CounterClockwise),
            "hold" => Command::Press(parse_direction(words.next())?),
            "release" => Command::Release(parse_direction(words.next())?),
            "track" => match words.next() {
                None => Command::Track(None),
                Some(angle) => Command::Track(Some(angle.parse().ok()?)),
            },
            "stop" => Command::Stop,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        // Trailing words are a typo, not a command
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

struct Session {
    cancel: CancelToken,
    handle: JoinHandle<Result<SessionReport>>,
}

/// Operator console over a shared sensor and servo
pub struct Console<S, O> {
    sensor: Arc<Mutex<S>>,
    servo: SharedServo<O>,
    jog_step: u16,
    params: TrackingParams,
    clockwise: RepeatTrigger,
    counter_clockwise: RepeatTrigger,
    session: Mutex<Option<Session>>,
}

impl<S, O> Console<S, O>
where
    S: AttitudeSensor + Send + 'static,
    O: PulseOutput + Send + 'static,
    Error: From<O::Error>,
{
    pub fn new(
        sensor: Arc<Mutex<S>>,
        servo: SharedServo<O>,
        jog_step: u16,
        jog: &JogConfig,
        params: TrackingParams,
    ) -> Self {
        let trigger = |direction: JogDirection| {
            let servo = Arc::clone(&servo);
            RepeatTrigger::new(
                direction.label(),
                Duration::from_millis(jog.initial_delay_ms as u64),
                Duration::from_millis(jog.repeat_interval_ms as u64),
                Arc::new(move || {
                    if let Err(e) = servo.lock().step(direction, jog_step) {
                        log::error!("{}: {}", direction.label(), Error::from(e));
                    }
                }),
            )
        };

        Self {
            clockwise: trigger(JogDirection::Clockwise),
            counter_clockwise: trigger(JogDirection::CounterClockwise),
            sensor,
            servo,
            jog_step,
            params,
            session: Mutex::new(None),
        }
    }

    fn trigger(&self, direction: JogDirection) -> &RepeatTrigger {
        match direction {
            JogDirection::Clockwise => &self.clockwise,
            JogDirection::CounterClockwise => &self.counter_clockwise,
        }
    }

    /// Run a parsed command; `Quit` is handled by the caller
    pub fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::Rotate(direction) => self.rotate(direction),
            Command::Press(direction) => self.press(direction),
            Command::Release(direction) => self.release(direction),
            Command::Track(None) => self.track(),
            Command::Track(Some(angle)) => self.track_angle(angle),
            Command::Stop => self.stop(),
            Command::Status => self.status(),
            Command::Quit => Outcome::ok("bye"),
        }
    }

    /// One jog step
    pub fn rotate(&self, direction: JogDirection) -> Outcome {
        match self.servo.lock().step(direction, self.jog_step) {
            Ok(report) if report.status.is_ok() => Outcome::ok(format!("pos={}", report.position)),
            Ok(report) => Outcome::failed(format!(
                "pos={} (daemon status {})",
                report.position,
                report.status.code()
            )),
            Err(e) => Error::from(e).into(),
        }
    }

    /// Start repeating jog steps after the hold delay
    pub fn press(&self, direction: JogDirection) -> Outcome {
        match self.trigger(direction).press() {
            Ok(true) => Outcome::ok(format!("holding {}", direction.label())),
            Ok(false) => Outcome::ok(format!("already holding {}", direction.label())),
            Err(e) => e.into(),
        }
    }

    /// Stop a held jog
    pub fn release(&self, direction: JogDirection) -> Outcome {
        self.trigger(direction).release();
        Outcome::ok(format!(
            "released {}, pos={}",
            direction.label(),
            self.servo.lock().position()
        ))
    }

    /// Start a tracking session holding the current roll
    pub fn track(&self) -> Outcome {
        match self.start_session(Reference::Live) {
            Ok(()) => Outcome::ok("tracking"),
            Err(e) => e.into(),
        }
    }

    /// Start a tracking session holding `angle` degrees of roll
    pub fn track_angle(&self, angle: f32) -> Outcome {
        if !angle.is_finite() {
            return Outcome::failed(format!("invalid angle {}", angle));
        }
        match self.start_session(Reference::Fixed(angle)) {
            Ok(()) => Outcome::ok(format!("tracking r={:.1}", angle)),
            Err(e) => e.into(),
        }
    }

    /// Start a session unless one is running
    ///
    /// A previous session that ended on an error hands that error back
    /// instead of starting; the next call starts normally.
    fn start_session(&self, reference: Reference) -> Result<()> {
        let mut session = self.session.lock();
        Self::reap(&mut session)?;
        if session.is_some() {
            return Err(Error::Busy);
        }

        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let sensor = Arc::clone(&self.sensor);
        let servo = Arc::clone(&self.servo);
        let params = self.params.clone();

        let handle = thread::Builder::new()
            .name("tracking".to_string())
            .spawn(move || {
                let result =
                    run_tracking_session(&*sensor, &*servo, reference, &params, &worker_cancel);
                if let Err(e) = &result {
                    log::error!("tracking stopped: {}", e);
                }
                result
            })?;

        *session = Some(Session { cancel, handle });
        Ok(())
    }

    fn join(session: Session) -> Result<SessionReport> {
        session
            .handle
            .join()
            .unwrap_or(Err(Error::SessionPanicked))
    }

    /// Clear out a session that has ended on its own, passing on its error
    fn reap(slot: &mut Option<Session>) -> Result<()> {
        if !slot.as_ref().is_some_and(|s| s.handle.is_finished()) {
            return Ok(());
        }
        if let Some(session) = slot.take() {
            let report = Self::join(session)?;
            log::debug!(
                "previous session: {} iterations, {} corrections",
                report.iterations,
                report.corrections
            );
        }
        Ok(())
    }

    /// Cancel the tracking session, if any, and wait for it to end
    pub fn stop(&self) -> Outcome {
        let Some(session) = self.session.lock().take() else {
            return Outcome::ok("not tracking");
        };
        session.cancel.cancel();
        match Self::join(session) {
            Ok(report) => Outcome::ok(format!(
                "stopped after {} iterations, {} corrections, pos={}",
                report.iterations, report.corrections, report.final_position
            )),
            Err(e) => e.into(),
        }
    }

    /// True while a tracking session is running
    pub fn is_tracking(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }

    /// Current roll, pitch, temperature, position and mode
    ///
    /// Reports the error of a session that has ended on its own since the
    /// last call.
    pub fn status(&self) -> Outcome {
        if let Err(e) = Self::reap(&mut self.session.lock()) {
            return Outcome::failed(format!("tracking stopped: {}", e));
        }
        let reading = Self::sample(&mut *self.sensor.lock());
        let position = self.servo.lock().position();
        let mode = if self.is_tracking() {
            "tracking"
        } else if self.clockwise.is_armed() {
            "holding cw"
        } else if self.counter_clockwise.is_armed() {
            "holding ccw"
        } else {
            "idle"
        };
        match reading {
            Ok((a, Some(t))) => Outcome::ok(format!(
                "r={:.1} p={:.1} t={:.1}C pos={} {}",
                a.roll, a.pitch, t, position, mode
            )),
            Ok((a, None)) => Outcome::ok(format!(
                "r={:.1} p={:.1} pos={} {}",
                a.roll, a.pitch, position, mode
            )),
            Err(e) => Outcome::failed(format!("pos={} {}: {}", position, mode, Error::Sensor(e))),
        }
    }

    fn sample(sensor: &mut S) -> core::result::Result<(Attitude, Option<f32>), SensorError> {
        let attitude = sensor.read_attitude()?;
        Ok((attitude, sensor.temperature()?))
    }

    /// Stop everything: held jogs and tracking
    pub fn shutdown(&self) {
        self.clockwise.cancel();
        self.counter_clockwise.cancel();
        let outcome = self.stop();
        log::info!("{}", outcome.message);
    }

    #[cfg(test)]
    fn servo(&self) -> &SharedServo<O> {
        &self.servo
    }
}

/// Create a servo handle for sharing
pub fn share<O: PulseOutput>(servo: Servo<O>) -> SharedServo<O> {
    Arc::new(Mutex::new(servo))
}
