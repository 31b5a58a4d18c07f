//! Elapsed-time display.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wall-clock time spent dispatching a request.
///
/// The hour/minute/second/millisecond split is only used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ElapsedTime(Duration);

impl ElapsedTime {
    /// Wraps a measured duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// The raw duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.0
    }

    /// Whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn as_millis(&self) -> u64 {
        self.0.as_millis() as u64
    }

    /// Hours, wrapped at 24.
    #[must_use]
    pub const fn hours(&self) -> u64 {
        (self.as_millis() / 3_600_000) % 24
    }

    /// Minutes within the hour.
    #[must_use]
    pub const fn minutes(&self) -> u64 {
        (self.as_millis() / 60_000) % 60
    }

    /// Seconds within the minute.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        (self.as_millis() / 1000) % 60
    }

    /// Milliseconds within the second.
    #[must_use]
    pub const fn millis(&self) -> u64 {
        self.as_millis() % 1000
    }
}

impl From<Duration> for ElapsedTime {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}h {}m {}s {}ms",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.millis()
        )
    }
}
