//! Errors raised while turning raw user input into a [`crate::TimeWindow`].

use thiserror::Error;

/// Why an event window could not be resolved.
///
/// Variants are checked in declaration order; the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid timezone: '{name}'")]
    InvalidTimezone { name: String },

    #[error("invalid start date/time '{input}': {reason}")]
    InvalidStartTime { input: String, reason: String },

    #[error("invalid end date/time '{input}': {reason}")]
    InvalidEndTime { input: String, reason: String },

    #[error("end date ({end}) should be after start date ({start})")]
    InvalidRange { start: String, end: String },
}
