//! Simple wrappers to make many errors hard to make

#![warn(unused_crate_dependencies)]


use std::{fmt::Display, time::Duration};

/// Intended to be similar to Duration but always clear that it is in
/// milliseconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
pub struct Millis(u64);

/// Point in time stored as milliseconds since the unix epoch
///
/// Serializes as a bare integer so it matches what browsers produce with
/// `Date.now()`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        let elapsed = web_time::SystemTime::UNIX_EPOCH
            .elapsed()
            .expect("expected date on system to be after the epoch");
        // Saturates in roughly 584 million years
        Self(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    pub const fn from_millis_since_unix_epoch(value: u64) -> Self {
        Self(value)
    }

    pub fn as_millis_since_unix_epoch(&self) -> u64 {
        self.0
    }

    /// Returns `None` if the value cannot be represented as a date
    pub fn as_utc_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(i64::try_from(self.0).ok()?)
    }

    pub fn as_local_datetime(&self) -> Option<chrono::DateTime<chrono::Local>> {
        self.as_utc_datetime().map(Into::into)
    }

    pub fn display_as_locale_datetime(&self) -> String {
        match self.as_local_datetime() {
            Some(dt) => dt.format("%c").to_string(),
            None => format!("{}ms", self.0),
        }
    }

    pub fn abs_diff(&self, other: Self) -> Millis {
        self.0.abs_diff(other.0).into()
    }

    /// Returns the time since `past_time` or None if `past_time` is in the
    /// future
    pub fn millis_since(self, past_time: Self) -> Option<Millis> {
        self.0.checked_sub(past_time.0).map(Millis)
    }

    /// Returns the time since this timestamp or None if this timestamp is in
    /// the future
    pub fn elapsed(self) -> Option<Millis> {
        Self::now().millis_since(self)
    }
}

impl std::ops::Add<Millis> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Millis) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl Millis {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Millis {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Millis> for Duration {
    fn from(value: Millis) -> Self {
        Duration::from_millis(value.0)
    }
}

impl Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_integer() {
        // Arrange
        let timestamp = Timestamp::from_millis_since_unix_epoch(1_700_000_000_123);

        // Act
        let actual = serde_json::to_string(&timestamp).unwrap();

        // Assert
        assert_eq!(actual, "1700000000123");
    }

    #[test]
    fn millis_since_past_and_future() {
        let earlier = Timestamp::from(1_000);
        let later = earlier + Millis::new(250);
        assert_eq!(later.millis_since(earlier), Some(Millis::new(250)));
        assert_eq!(earlier.millis_since(later), None);
    }

    #[test]
    fn now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(Timestamp::now() > Timestamp::from(1_577_836_800_000));
    }

    #[test]
    fn utc_datetime_keeps_millis() {
        let dt = Timestamp::from(1_500).as_utc_datetime().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_500);
    }
}
