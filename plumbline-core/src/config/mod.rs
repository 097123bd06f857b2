//! Configuration types
//!
//! Board-agnostic configuration structures, deserialized from the
//! daemon's TOML file when the `serde` feature is enabled.

pub mod types;

pub use types::*;
