//! Servo daemon channel
//!
//! One persistent, strictly request/response connection to the servo
//! daemon. There is no multiplexing: a request must be answered before
//! the next one is written, so callers sharing a channel must serialize
//! access to it.

use embedded_io::{Read, Write};
use plumbline_core::traits::{ActuatorStatus, PulseOutput};
use plumbline_protocol::{
    encode_set_position, ActuatorCommand, ActuatorResponse, ProtocolError, RESPONSE_LEN,
};

/// Channel to the servo daemon over a byte stream
pub struct ActuatorChannel<T> {
    stream: T,
    channel: u8,
}

impl<T: Read + Write> ActuatorChannel<T> {
    /// Wrap a connected stream; `channel` is the GPIO the servo is wired to
    pub fn new(stream: T, channel: u8) -> Self {
        Self { stream, channel }
    }

    /// GPIO channel commands are addressed to
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Release the stream
    pub fn into_inner(self) -> T {
        self.stream
    }

    /// Write one frame and read back the 4-byte reply
    pub fn send(&mut self, command: ActuatorCommand) -> Result<ActuatorStatus, ProtocolError> {
        self.stream
            .write_all(command.as_bytes())
            .map_err(|_| ProtocolError::WriteFailed)?;
        self.stream.flush().map_err(|_| ProtocolError::WriteFailed)?;

        let mut reply = [0u8; RESPONSE_LEN];
        self.stream
            .read_exact(&mut reply)
            .map_err(|_| ProtocolError::ShortRead)?;

        let response = ActuatorResponse::parse(&reply)?;
        Ok(ActuatorStatus(response.status()))
    }

    /// Command the servo to `pulse` microseconds
    pub fn set_position(&mut self, pulse: u16) -> Result<ActuatorStatus, ProtocolError> {
        self.send(encode_set_position(self.channel, pulse))
    }
}

impl<T: Read + Write> PulseOutput for ActuatorChannel<T> {
    type Error = ProtocolError;

    fn set_pulse(&mut self, pulse: u16) -> Result<ActuatorStatus, Self::Error> {
        self.set_position(pulse)
    }
}
