//! Animation sinks.

/// Looping GIF writer built on the `gif` crate.
pub mod sink;
