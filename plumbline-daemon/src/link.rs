//! TCP link to the servo daemon
//!
//! The socket is adapted to `embedded-io` so the no_std
//! [`ActuatorChannel`] can drive it unchanged.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use embedded_io_adapters::std::FromStd;
use plumbline_core::config::ActuatorConfig;
use plumbline_drivers::actuator::ActuatorChannel;

use crate::error::ConnectError;

/// Channel over a blocking TCP stream
pub type TcpChannel = ActuatorChannel<FromStd<TcpStream>>;

/// Socket timeouts for the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTimeouts {
    pub connect: Duration,
    pub io: Duration,
}

impl From<&ActuatorConfig> for LinkTimeouts {
    fn from(config: &ActuatorConfig) -> Self {
        Self {
            connect: Duration::from_millis(config.connect_timeout_ms as u64),
            io: Duration::from_millis(config.read_timeout_ms as u64),
        }
    }
}

fn unreachable(addr: &str, source: std::io::Error) -> ConnectError {
    ConnectError::Unreachable {
        addr: addr.to_string(),
        source,
    }
}

fn open_stream(host: &str, port: u16, timeouts: LinkTimeouts) -> Result<TcpStream, ConnectError> {
    let addr = format!("{}:{}", host, port);
    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|e| unreachable(&addr, e))?
        .collect();

    let mut last_error = std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "host resolved to no addresses",
    );
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, timeouts.connect) {
            Ok(stream) => {
                // Zero is rejected here; config validation keeps it out
                stream
                    .set_read_timeout(Some(timeouts.io))
                    .and_then(|_| stream.set_write_timeout(Some(timeouts.io)))
                    .and_then(|_| stream.set_nodelay(true))
                    .map_err(|e| unreachable(&addr, e))?;
                log::info!("connected to servo daemon at {}", candidate);
                return Ok(stream);
            }
            Err(e) => {
                log::debug!("connect {} failed: {}", candidate, e);
                last_error = e;
            }
        }
    }
    Err(unreachable(&addr, last_error))
}

/// Connect to the servo daemon and wrap the socket in a channel
pub fn connect(
    host: &str,
    port: u16,
    channel: u8,
    timeouts: LinkTimeouts,
) -> Result<TcpChannel, ConnectError> {
    let stream = open_stream(host, port, timeouts)?;
    Ok(ActuatorChannel::new(FromStd::new(stream), channel))
}
