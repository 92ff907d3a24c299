//! Time-anchored payloads.

use serde::{Deserialize, Serialize};

/// A payload anchored to `[start, end)` seconds of the job's timeline.
///
/// Payloads are caption text, lists of search queries or chosen asset URLs.
///
/// # Examples
///
/// ```
/// use reelsmith_core::TimedEntry;
///
/// let caption = TimedEntry::new(0.0, 1.5, "FIVE FACTS".to_string());
/// assert_eq!(caption.duration(), 1.5);
/// assert!(caption.is_within(30.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEntry<T> {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Anchored value
    pub payload: T,
}

impl<T> TimedEntry<T> {
    /// Create a timed entry.
    pub fn new(start: f64, end: f64, payload: T) -> Self {
        Self {
            start,
            end,
            payload,
        }
    }

    /// Length of the entry in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when `0 <= start < end <= total`.
    pub fn is_within(&self, total: f64) -> bool {
        0.0 <= self.start && self.start < self.end && self.end <= total
    }

    /// Replace the payload, keeping the timing.
    pub fn with_payload<U>(&self, payload: U) -> TimedEntry<U> {
        TimedEntry::new(self.start, self.end, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(TimedEntry::new(0.0, 2.0, ()).is_within(2.0));
        assert!(!TimedEntry::new(2.0, 2.0, ()).is_within(5.0));
        assert!(!TimedEntry::new(-0.5, 2.0, ()).is_within(5.0));
        assert!(!TimedEntry::new(1.0, 6.0, ()).is_within(5.0));
    }
}
