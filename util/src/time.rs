//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Number of microseconds in a second
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Number of milliseconds in a second
pub const MILLIS_PER_SECOND: f64 = 1_000.0;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a timestamp in microseconds into seconds.
pub fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

/// Convert a number of milliseconds into seconds.
pub fn millis_to_seconds(millis: f64) -> f64 {
    millis / MILLIS_PER_SECOND
}
