//! [`Instant`] and associated impls.
use std::fmt;
use std::ops;

use serde::{Deserialize, Serialize};

use crate::Parts;
use crate::conv;

/// An absolute point in time, as integer milliseconds relative to the unix
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    millis: i64,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Instant {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        // anywhere within the epoch..'9999-12-31' span
        u.int_in_range(0..=253_402_300_799_999_i64)
            .map(Self::from_millis)
    }
}

impl Instant {
    /// The unix epoch, '1970-01-01T00:00:00.000Z'.
    pub const UNIX_EPOCH: Self = Self { millis: 0 };

    /// Builds an [`Instant`] from integer milliseconds relative to the unix
    /// epoch.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    /// Returns the number of milliseconds relative to the unix epoch.
    #[inline]
    pub const fn as_millis(self) -> i64 {
        self.millis
    }

    /// Returns the number of whole minutes since the unix epoch, rounding
    /// toward negative infinity.
    #[inline]
    pub const fn as_minutes(self) -> i64 {
        self.millis.div_euclid(conv::MILLIS_PER_MINUTE)
    }
}

impl fmt::Display for Instant {
    /// Writes an ISO-8601 UTC datetime string, i.e '2022-11-06T05:59:59.000Z'.
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        Parts::from_naive_millis(self.millis).format_into(formatter)?;
        formatter.write_str("Z")
    }
}

impl ops::Add<i64> for Instant {
    type Output = Self;

    fn add(self, millis: i64) -> Self {
        Self::from_millis(self.millis + millis)
    }
}

impl ops::Sub<i64> for Instant {
    type Output = Self;

    fn sub(self, millis: i64) -> Self {
        Self::from_millis(self.millis - millis)
    }
}

impl ops::Sub for Instant {
    type Output = i64;

    /// Returns the millisecond delta between two instants.
    fn sub(self, rhs: Self) -> i64 {
        self.millis - rhs.millis
    }
}

impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.millis)
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::Instant;

    #[test]
    fn test_minute_flooring() {
        assert_eq!(Instant::from_millis(0).as_minutes(), 0);
        assert_eq!(Instant::from_millis(59_999).as_minutes(), 0);
        assert_eq!(Instant::from_millis(60_000).as_minutes(), 1);

        // pre-epoch instants floor toward negative infinity
        assert_eq!(Instant::from_millis(-1).as_minutes(), -1);
        assert_eq!(Instant::from_millis(-60_000).as_minutes(), -1);
        assert_eq!(Instant::from_millis(-60_001).as_minutes(), -2);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Instant::UNIX_EPOCH.to_string(),
            "1970-01-01T00:00:00.000Z"
        );
        assert_eq!(
            Instant::from_millis(1_667_714_399_000).to_string(),
            "2022-11-06T05:59:59.000Z"
        );
    }

    #[test]
    fn test_serde_as_millis() {
        let instant = Instant::from_millis(1_667_714_399_123);

        let encoded = serde_json::to_string(&instant).unwrap();
        assert_eq!(encoded, "1667714399123");

        let decoded: Instant = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, instant);
    }
}
