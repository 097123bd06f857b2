//! Servo daemon socket protocol
//!
//! This crate defines the binary protocol spoken to the remote servo
//! daemon (pigpiod) over a persistent TCP connection. Every request is a
//! fixed 16-byte frame and every reply is read as a fixed 4-byte block.
//!
//! # Request Frame
//!
//! ```text
//! ┌────────┬─────────┬─────────┬─────────┬───────────┬───────────┬─────────┐
//! │ OPCODE │ 0 0 0   │ CHANNEL │ 0 0 0   │ VALUE LSB │ VALUE MSB │ 0 × 6   │
//! │ 1B     │ 3B      │ 1B      │ 3B      │ 1B        │ 1B        │ 6B      │
//! └────────┴─────────┴─────────┴─────────┴───────────┴───────────┴─────────┘
//! ```
//!
//! # Response
//!
//! Four bytes; the status is the signed value of byte 3.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod response;

pub use command::{encode_set_position, ActuatorCommand, Opcode, COMMAND_LEN};
pub use response::{ActuatorResponse, ProtocolError, RESPONSE_LEN};
