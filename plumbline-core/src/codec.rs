//! Register word decoding
//!
//! The accelerometer exposes every measurement as a big-endian pair of
//! 8-bit registers holding a two's-complement value.

/// Threshold at which an unsigned register word represents a negative value
const SIGN_THRESHOLD: u32 = 0x8000;

/// Full range of a 16-bit word
const WORD_RANGE: u32 = 0x1_0000;

/// Combine a high/low register pair into a signed 16-bit word
///
/// `(high << 8) | low` is reinterpreted as two's complement: magnitudes
/// at or above 0x8000 map to `value - 65536`.
pub fn decode_word(high: u8, low: u8) -> i16 {
    let value = ((high as u32) << 8) | low as u32;

    if value >= SIGN_THRESHOLD {
        (value as i32 - WORD_RANGE as i32) as i16
    } else {
        value as i16
    }
}
