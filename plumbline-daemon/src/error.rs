//! Error types for the Plumbline daemon

use plumbline_core::traits::SensorError;
use plumbline_protocol::ProtocolError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to reach the servo daemon
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// TCP connect failed or timed out
    #[error("servo daemon at {addr} unreachable: {source}")]
    Unreachable {
        /// Peer address as configured
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },
}

/// Plumbline daemon error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Accelerometer unavailable or a bus transfer failed
    #[error("Sensor error: {0}")]
    Sensor(SensorError),

    /// Command exchange with the servo daemon failed
    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    /// Servo daemon could not be reached
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but is not usable
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signal handler registration failed
    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    /// A tracking session is already running
    #[error("tracking already active")]
    Busy,

    /// The tracking thread panicked
    #[error("tracking thread panicked")]
    SessionPanicked,
}

// The no_std error enums do not implement std::error::Error, so these
// conversions are written out instead of derived with #[from].
impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}
