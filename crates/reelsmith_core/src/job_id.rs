//! Job identity.

use reelsmith_error::{PersistenceError, PersistenceErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Opaque, stable identity of a video-generation job.
///
/// A job id doubles as the checkpoint file stem, so it must be a single path
/// component: not empty, not `.` or `..`, and free of path separators.
///
/// # Examples
///
/// ```
/// use reelsmith_core::JobId;
///
/// let fresh = JobId::new();
/// assert_eq!(fresh.as_str().len(), 36);
///
/// let resumed: JobId = "job-42".parse().unwrap();
/// assert_eq!(resumed.as_str(), "job-42");
///
/// assert!("../escape".parse::<JobId>().is_err());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Allocate a fresh random (UUID v4) job id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(raw: &str) -> Result<(), PersistenceError> {
        let invalid = raw.is_empty()
            || raw == "."
            || raw == ".."
            || raw.contains(['/', '\\', '\0'])
            || raw.chars().any(char::is_control);
        if invalid {
            return Err(PersistenceError::new(PersistenceErrorKind::InvalidJobId(
                raw.to_string(),
            )));
        }
        Ok(())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for JobId {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for JobId {
    type Error = PersistenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
