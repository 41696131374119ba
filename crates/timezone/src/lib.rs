#![deny(clippy::suspicious, clippy::complexity, clippy::perf, clippy::style)]
#![deny(missing_docs)]
//! Civil time [`Zone`] schedules, with conversions between absolute instants
//! and wall clock calendar fields.
//!
//! A [`Zone`] is a piecewise-constant UTC offset schedule: a list of [`Era`]s
//! sorted by descending start, plus a fallback offset for all time before the
//! earliest era. [`Zone::to_parts`] resolves an [`Instant`] into [`Parts`]
//! (year through millisecond), and [`Zone::from_parts`] resolves wall clock
//! fields back into an [`Instant`], including near daylight-saving
//! transitions where a wall clock time maps to zero, one or two instants.
//!
//! Zones also carry a compact wire encoding ([`Zone::encode`] /
//! [`Zone::decode`]) so two processes can exchange the same schedule without
//! sharing a system time zone database. The calendar arithmetic is
//! implemented directly (see [`calendar`]) for the same reason: results never
//! depend on the host platform's zone data.

pub mod calendar;
mod de;
mod era;
mod error;
mod instant;
mod month;
mod parts;
mod ser;
pub(crate) mod util;
mod zone;

pub use crate::era::Era;
pub use crate::error::DecodeError;
pub use crate::instant::Instant;
pub use crate::month::{InvalidMonth, Month};
pub use crate::parts::Parts;
pub use crate::zone::Zone;

/// Conversion constants between units of time.
pub(crate) mod conv {
    /// Number of milliseconds per second.
    pub(crate) const MILLIS_PER_SECOND: i64 = 1_000;

    /// Number of milliseconds per minute.
    pub(crate) const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;

    /// Number of milliseconds per hour.
    pub(crate) const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

    /// Number of milliseconds per day.
    pub(crate) const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_zero_point() {
        let parts = Zone::utc().to_parts(Instant::UNIX_EPOCH);

        assert_eq!(parts, crate::parts!(1970 - 1 - 1));
        assert_eq!(Zone::utc().from_parts(parts), Instant::UNIX_EPOCH);
    }

    #[test]
    fn test_utc_conversion_round_trip() {
        let utc = Zone::utc();
        let mut rng = rand::rng();

        for _ in 0..1000 {
            // anywhere between the epoch and 2100-01-01
            let instant = Instant::from_millis(rng.random_range(0..4_102_444_800_000));
            assert_eq!(utc.from_parts(utc.to_parts(instant)), instant);
        }
    }

    #[test]
    fn test_wire_round_trip_via_json_string() {
        let zone = Zone::custom(
            "America/New_York",
            vec![Era::new(27_795_240, -300), Era::new(27_452_580, -240)],
            -300,
        );

        let encoded = serde_json::to_string(&zone).unwrap();
        let decoded: Zone = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, zone);
    }
}
