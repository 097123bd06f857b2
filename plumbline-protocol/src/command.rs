//! Request frame encoding

/// Size of every request frame
pub const COMMAND_LEN: usize = 16;

/// Offset of the opcode byte
const OPCODE_OFFSET: usize = 0;

/// Offset of the channel (GPIO) byte
const CHANNEL_OFFSET: usize = 4;

/// Offset of the little-endian 16-bit value
const VALUE_OFFSET: usize = 8;

/// Daemon command opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Start servo pulses on a GPIO (value = pulse width in µs)
    Servo = 8,
}

/// An encoded request frame
///
/// Constructed fresh for every send and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorCommand {
    bytes: [u8; COMMAND_LEN],
}

impl ActuatorCommand {
    /// Encode `opcode`, `channel` and a 16-bit `value`; all other bytes are zero
    pub fn new(opcode: Opcode, channel: u8, value: u16) -> Self {
        let mut bytes = [0u8; COMMAND_LEN];
        bytes[OPCODE_OFFSET] = opcode as u8;
        bytes[CHANNEL_OFFSET] = channel;
        bytes[VALUE_OFFSET..VALUE_OFFSET + 2].copy_from_slice(&value.to_le_bytes());
        Self { bytes }
    }

    /// Wire bytes
    pub fn as_bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.bytes
    }

    /// Opcode byte
    pub fn opcode(&self) -> u8 {
        self.bytes[OPCODE_OFFSET]
    }

    /// Channel byte
    pub fn channel(&self) -> u8 {
        self.bytes[CHANNEL_OFFSET]
    }

    /// Decoded 16-bit value
    pub fn value(&self) -> u16 {
        u16::from_le_bytes([self.bytes[VALUE_OFFSET], self.bytes[VALUE_OFFSET + 1]])
    }
}

/// Encode a set-servo-position frame for `channel`
pub fn encode_set_position(channel: u8, pulse: u16) -> ActuatorCommand {
    ActuatorCommand::new(Opcode::Servo, channel, pulse)
}
