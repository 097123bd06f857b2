//! Response parsing and protocol errors

/// Bytes read back for every request
pub const RESPONSE_LEN: usize = 4;

/// Offset of the status byte within the response
const STATUS_OFFSET: usize = 3;

/// Errors that can occur while exchanging frames with the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Fewer than [`RESPONSE_LEN`] bytes arrived before EOF or timeout
    ShortRead,
    /// The request could not be written
    WriteFailed,
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::ShortRead => f.write_str("short read from servo daemon"),
            ProtocolError::WriteFailed => f.write_str("write to servo daemon failed"),
        }
    }
}

/// A parsed daemon reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorResponse {
    bytes: [u8; RESPONSE_LEN],
}

impl ActuatorResponse {
    /// Parse the first [`RESPONSE_LEN`] bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let block = bytes.get(..RESPONSE_LEN).ok_or(ProtocolError::ShortRead)?;
        let mut raw = [0u8; RESPONSE_LEN];
        raw.copy_from_slice(block);
        Ok(Self { bytes: raw })
    }

    /// Status code: byte 3 interpreted as a signed byte
    pub fn status(&self) -> i32 {
        self.bytes[STATUS_OFFSET] as i8 as i32
    }

    /// Raw reply bytes
    pub fn as_bytes(&self) -> &[u8; RESPONSE_LEN] {
        &self.bytes
    }
}
