//! Network time
//!
//! On-chain timestamps count whole seconds since the nemesis block was
//! created (2015-03-29T00:06:25Z).

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Seconds between the Unix epoch and the nemesis block
pub const NEMESIS_UNIX_SECONDS: i64 = 1_427_587_585;

/// Instant the nemesis block was created
pub fn nemesis() -> DateTime<Utc> {
    Utc.timestamp_opt(NEMESIS_UNIX_SECONDS, 0)
        .single()
        .unwrap_or_default()
}

/// A point in time as seconds since the nemesis block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkTime(u32);

impl NetworkTime {
    pub fn from_timestamp(timestamp: u32) -> Self {
        Self(timestamp)
    }

    /// The current network time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The network time `offset` from now
    pub fn from_now(offset: Duration) -> Self {
        Self::from_datetime(Utc::now() + offset)
    }

    /// Convert a UTC instant, clamping to the representable range
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let seconds = (instant - nemesis()).num_seconds();
        Self(seconds.clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Seconds since the nemesis block
    pub fn timestamp(&self) -> u32 {
        self.0
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        nemesis() + Duration::seconds(i64::from(self.0))
    }
}

impl fmt::Display for NetworkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_datetime().to_rfc3339())
    }
}

/// Latest network time at which a transaction may be included in a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(NetworkTime);

impl Deadline {
    pub fn from_timestamp(timestamp: u32) -> Self {
        Self(NetworkTime::from_timestamp(timestamp))
    }

    /// A deadline `hours` from now
    pub fn create_hours(hours: i64) -> Self {
        Self(NetworkTime::from_now(Duration::hours(hours)))
    }

    /// A deadline `minutes` from now
    pub fn create_minutes(minutes: i64) -> Self {
        Self(NetworkTime::from_now(Duration::minutes(minutes)))
    }

    pub fn time(&self) -> NetworkTime {
        self.0
    }

    pub fn timestamp(&self) -> u32 {
        self.0.timestamp()
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0.to_datetime()
    }
}

impl From<NetworkTime> for Deadline {
    fn from(time: NetworkTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nemesis_instant() {
        assert_eq!(nemesis().to_rfc3339(), "2015-03-29T00:06:25+00:00");
        assert_eq!(NetworkTime::from_timestamp(0).to_datetime(), nemesis());
    }

    #[test]
    fn test_datetime_round_trip() {
        let instant = Utc.with_ymd_and_hms(2018, 1, 23, 10, 0, 0).unwrap();
        let time = NetworkTime::from_datetime(instant);
        assert_eq!(time.to_datetime(), instant);
        assert_eq!(NetworkTime::from_timestamp(time.timestamp()), time);
    }

    #[test]
    fn test_before_nemesis_clamps() {
        let early = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(NetworkTime::from_datetime(early).timestamp(), 0);
    }

    #[test]
    fn test_deadline_after_now() {
        let now = NetworkTime::now();
        let deadline = Deadline::create_hours(2);
        let diff = deadline.timestamp() - now.timestamp();
        assert!((7199..=7201).contains(&diff));

        let short = Deadline::create_minutes(5);
        assert!(short < deadline);
        assert!(short.time() >= now);
    }
}
