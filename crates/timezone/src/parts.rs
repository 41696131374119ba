//! [`Parts`] and assiciated impls.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU8;

use crate::util::clamp;
use crate::{Month, calendar, conv};

/// The floor applied to years; no instant before the epoch is representable
/// through the setters.
const MIN_YEAR: i32 = 1970;

/// Wall clock calendar fields: year through millisecond, with no attached
/// zone.
///
/// A [`Parts`] value is always a real calendar date: the constructors and the
/// `with_*` setters clamp out-of-range fields instead of failing, so the
/// whole surface is total over integer inputs. Each setter returns a new
/// value.
///
/// Produced by [`Zone::to_parts`], consumed by [`Zone::from_parts`].
///
/// [`Zone::to_parts`]: crate::Zone::to_parts
/// [`Zone::from_parts`]: crate::Zone::from_parts
#[derive(Clone, Copy)]
pub struct Parts {
    year: i32,
    month: Month,
    day: NonZeroU8,
    hour: u8,
    minute: u8,
    second: u8,
    millis: u16,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Parts {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let year = u.int_in_range(1970..=9999)?;
        let month: u8 = u.int_in_range(1..=12)?;

        let month = Month::from_number(month).expect("1..=12 is valid");

        let max_day = month.days_in(year);
        let day = u.int_in_range(1..=max_day)?;
        // SAFETY: we get the int within the range 1..#, so this is always non-zero
        let day = unsafe { NonZeroU8::new_unchecked(day) };

        Ok(Self {
            year,
            month,
            day,
            hour: u.int_in_range(0..=23)?,
            minute: u.int_in_range(0..=59)?,
            second: u.int_in_range(0..=59)?,
            millis: u.int_in_range(0..=999)?,
        })
    }
}

impl PartialEq for Parts {
    fn eq(&self, rhs: &Self) -> bool {
        self.year == rhs.year
            && self.month == rhs.month
            && self.day.get() == rhs.day.get()
            && self.hour == rhs.hour
            && self.minute == rhs.minute
            && self.second == rhs.second
            && self.millis == rhs.millis
    }
}

impl Eq for Parts {}

impl Hash for Parts {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.year);
        state.write_u8(self.month as u8);
        state.write_u8(self.day.get());
        state.write_u8(self.hour);
        state.write_u8(self.minute);
        state.write_u8(self.second);
        state.write_u16(self.millis);
    }
}

impl PartialOrd for Parts {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Parts {
    fn cmp(&self, other: &Self) -> Ordering {
        self.const_cmp(other)
    }
}

/// Constructs a [`Parts`] value at compile time, clamping fields the same way
/// the `with_*` setters do.
///
/// ```
/// # #[macro_use]
/// # extern crate timezone;
/// # fn main() {
/// let midnight = timezone::parts!(2022 - 11 - 06);
/// let last_tick = timezone::parts!(2022 - 11 - 06 23:59:59);
///
/// assert_eq!(midnight, last_tick.with_hour(0).with_minute(0).with_second(0));
/// # }
/// ```
#[macro_export]
macro_rules! parts {
    ($year:literal - $month:literal - $day:literal) => {
        $crate::parts!($year - $month - $day 0:0:0)
    };
    ($year:literal - $month:literal - $day:literal $hour:literal : $minute:literal : $second:literal) => {{
        let month = match $crate::Month::from_number($month) {
            Some(month) => month,
            None => panic!("month out of range, must be within '1..=12'"),
        };

        $crate::Parts::new($year, month, $day, $hour, $minute, $second, 0)
    }};
}

#[test]
fn test_parts_macro() {
    let parts = crate::parts!(2022 - 11 - 06 1:59:59);

    assert_eq!(parts.year(), 2022);
    assert_eq!(parts.month(), Month::November);
    assert_eq!(parts.day(), 6);
    assert_eq!(parts.hour(), 1);
    assert_eq!(parts.minute(), 59);
    assert_eq!(parts.second(), 59);
    assert_eq!(parts.millis(), 0);

    assert_eq!(crate::parts!(2022 - 11 - 06), parts.with_hour(0).with_minute(0).with_second(0));
}

impl fmt::Debug for Parts {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("Parts")
            .field("year", &self.year)
            .field("month", &self.month)
            .field("day", &self.day.get())
            .field("hour", &self.hour)
            .field("minute", &self.minute)
            .field("second", &self.second)
            .field("millis", &self.millis)
            .finish()
    }
}

impl fmt::Display for Parts {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.format_into(formatter)
    }
}

impl Parts {
    /// Builds a [`Parts`] value, running every field through the same
    /// clamping the `with_*` setters apply. No unclamped value can exist.
    pub const fn new(
        year: i32,
        month: Month,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        millis: u16,
    ) -> Self {
        let year = if year < MIN_YEAR { MIN_YEAR } else { year };

        let max_day = month.days_in(year);
        let day = clamp!(day; 1..=max_day);

        Self {
            year,
            month,
            // SAFETY: clamped to '1..=max_day' above, so never zero.
            day: unsafe { NonZeroU8::new_unchecked(day) },
            hour: clamp!(hour; 0..=23),
            minute: clamp!(minute; 0..=59),
            second: clamp!(second; 0..=59),
            millis: clamp!(millis; 0..=999),
        }
    }

    /// Returns the year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month.
    #[inline]
    pub const fn month(&self) -> Month {
        self.month
    }

    /// Returns the non-zero day of the month.
    #[inline]
    pub const fn day_non_zero(&self) -> NonZeroU8 {
        self.day
    }

    /// Returns the day of the month. Identical to 'parts.day_non_zero().get()'.
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Returns the hour of the day, within '0..24'.
    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute of the hour, within '0..60'.
    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second of the minute, within '0..60'.
    #[inline]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns the milliseconds toward the next second, within '0..1000'.
    #[inline]
    pub const fn millis(&self) -> u16 {
        self.millis
    }

    /// Returns a new value with the given year, floored at 1970.
    ///
    /// If the current day of the month does not exist in the new year (Feb 29
    /// moving off a leap year), the day clamps down to the last valid day.
    pub const fn with_year(self, year: i32) -> Self {
        let year = if year < MIN_YEAR { MIN_YEAR } else { year };

        Self {
            year,
            day: clamp_day(self.day, self.month, year),
            ..self
        }
    }

    /// Returns a new value with the given month, clamping the day down to the
    /// new month's day count if needed.
    pub const fn with_month(self, month: Month) -> Self {
        Self {
            month,
            day: clamp_day(self.day, month, self.year),
            ..self
        }
    }

    /// Returns a new value with the given day, clamped to the current
    /// year + month's valid range.
    pub const fn with_day(self, day: u8) -> Self {
        let max_day = self.month.days_in(self.year);
        let day = clamp!(day; 1..=max_day);

        Self {
            // SAFETY: clamped to '1..=max_day' above, so never zero.
            day: unsafe { NonZeroU8::new_unchecked(day) },
            ..self
        }
    }

    /// Returns a new value with the given hour, clamped to '0..=23'.
    pub const fn with_hour(self, hour: u8) -> Self {
        Self {
            hour: clamp!(hour; 0..=23),
            ..self
        }
    }

    /// Returns a new value with the given minute, clamped to '0..=59'.
    pub const fn with_minute(self, minute: u8) -> Self {
        Self {
            minute: clamp!(minute; 0..=59),
            ..self
        }
    }

    /// Returns a new value with the given second, clamped to '0..=59'.
    pub const fn with_second(self, second: u8) -> Self {
        Self {
            second: clamp!(second; 0..=59),
            ..self
        }
    }

    /// Returns a new value with the given milliseconds, clamped to '0..=999'.
    pub const fn with_millis(self, millis: u16) -> Self {
        Self {
            millis: clamp!(millis; 0..=999),
            ..self
        }
    }

    /// Const-able version of [`Ord::cmp`]. This is the internal method used by both
    /// [`Ord`]/[`PartialOrd`].
    pub const fn const_cmp(&self, rhs: &Self) -> Ordering {
        macro_rules! cmp_ret_if_neq {
            ($a:expr, $b:expr) => {{
                if $a > $b {
                    return std::cmp::Ordering::Greater;
                } else if $a < $b {
                    return std::cmp::Ordering::Less;
                }
            }};
        }

        cmp_ret_if_neq!(self.year, rhs.year);

        match self.month.const_cmp(&rhs.month) {
            Ordering::Equal => (),
            other => return other,
        }

        cmp_ret_if_neq!(self.day.get(), rhs.day.get());
        cmp_ret_if_neq!(self.hour, rhs.hour);
        cmp_ret_if_neq!(self.minute, rhs.minute);
        cmp_ret_if_neq!(self.second, rhs.second);
        cmp_ret_if_neq!(self.millis, rhs.millis);

        // if none of those return, we're equal.
        Ordering::Equal
    }

    /// Recomposes these fields into naive milliseconds: the millisecond count
    /// the fields would denote if read as a UTC datetime.
    pub(crate) const fn to_naive_millis(&self) -> i64 {
        calendar::millis_before_year(self.year)
            + calendar::millis_before_month(self.year, self.month)
            + (self.day.get() as i64 - 1) * conv::MILLIS_PER_DAY
            + self.hour as i64 * conv::MILLIS_PER_HOUR
            + self.minute as i64 * conv::MILLIS_PER_MINUTE
            + self.second as i64 * conv::MILLIS_PER_SECOND
            + self.millis as i64
    }

    /// Decomposes naive milliseconds into calendar fields, the inverse of
    /// [`Parts::to_naive_millis`]. Total over all of [`i64`].
    pub(crate) fn from_naive_millis(millis: i64) -> Self {
        // estimate, then correct in both directions; the loops run at most a
        // couple of iterations
        let mut year = 1970 + (millis.div_euclid(conv::MILLIS_PER_DAY) / 365) as i32;

        while calendar::millis_before_year(year) > millis {
            year -= 1;
        }
        while calendar::millis_before_year(year + 1) <= millis {
            year += 1;
        }

        let mut rem = millis - calendar::millis_before_year(year);

        let mut month = Month::January;
        loop {
            let next = month.next();
            if matches!(month, Month::December) || calendar::millis_before_month(year, next) > rem {
                break;
            }
            month = next;
        }
        rem -= calendar::millis_before_month(year, month);

        let day = (rem / conv::MILLIS_PER_DAY) as u8 + 1;
        rem %= conv::MILLIS_PER_DAY;

        let hour = (rem / conv::MILLIS_PER_HOUR) as u8;
        rem %= conv::MILLIS_PER_HOUR;

        let minute = (rem / conv::MILLIS_PER_MINUTE) as u8;
        rem %= conv::MILLIS_PER_MINUTE;

        let second = (rem / conv::MILLIS_PER_SECOND) as u8;
        let millis = (rem % conv::MILLIS_PER_SECOND) as u16;

        Self {
            year,
            month,
            // SAFETY: 'rem' is non-negative, so the day index is at least 1.
            day: unsafe { NonZeroU8::new_unchecked(day) },
            hour,
            minute,
            second,
            millis,
        }
    }

    /// Writes 'self' into an existing [`fmt::Write`] type, as
    /// 'YYYY-MM-DDTHH:MM:SS.mmm'.
    pub fn format_into<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        let mut buf = itoa::Buffer::new();

        macro_rules! ensure_2_digits {
            ($field:expr) => {{
                let s = buf.format($field);
                if s.len() == 1 {
                    w.write_str("0")?;
                }
                w.write_str(s)?;
            }};
        }

        if self.year < 0 {
            w.write_str("-")?;
        }

        let year = buf.format(self.year.abs());
        let prepended_zeros = 4_usize.saturating_sub(year.len());

        for _ in 0..prepended_zeros {
            w.write_str("0")?;
        }
        w.write_str(year)?;

        w.write_str("-")?;
        ensure_2_digits!(self.month as u8);
        w.write_str("-")?;
        ensure_2_digits!(self.day.get());
        w.write_str("T")?;
        ensure_2_digits!(self.hour);
        w.write_str(":")?;
        ensure_2_digits!(self.minute);
        w.write_str(":")?;
        ensure_2_digits!(self.second);
        w.write_str(".")?;

        let millis = buf.format(self.millis);
        for _ in millis.len()..3 {
            w.write_str("0")?;
        }
        w.write_str(millis)
    }
}

/// Clamps a day of the month down to fit the given month + year, keeping it
/// untouched when it already fits.
const fn clamp_day(day: NonZeroU8, month: Month, year: i32) -> NonZeroU8 {
    let max_day = month.days_in(year);

    if day.get() > max_day {
        // SAFETY: days_in never returns less than 28.
        unsafe { NonZeroU8::new_unchecked(max_day) }
    } else {
        day
    }
}

#[test]
fn test_display() {
    let small_digits = crate::parts!(2022 - 1 - 1);
    assert_eq!(small_digits.to_string().as_str(), "2022-01-01T00:00:00.000");

    let mixed_digits = crate::parts!(2022 - 1 - 15 9:5:59);
    assert_eq!(mixed_digits.to_string().as_str(), "2022-01-15T09:05:59.000");

    let full_digits = crate::parts!(2022 - 10 - 15 23:59:59).with_millis(87);
    assert_eq!(full_digits.to_string().as_str(), "2022-10-15T23:59:59.087");
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    #[test]
    fn test_setters_clamp() {
        let parts = crate::parts!(2024 - 1 - 31);

        // day clamps down when the month gets shorter
        assert_eq!(parts.with_month(Month::April).day(), 30);
        assert_eq!(parts.with_month(Month::February).day(), 29);

        // Feb 29 clamps to Feb 28 moving off a leap year
        let leap_day = crate::parts!(2024 - 2 - 29);
        assert_eq!(leap_day.with_year(2023).day(), 28);
        assert_eq!(leap_day.with_year(2024).day(), 29);

        assert_eq!(parts.with_day(0).day(), 1);
        assert_eq!(parts.with_day(200).day(), 31);

        assert_eq!(parts.with_hour(75).hour(), 23);
        assert_eq!(parts.with_minute(75).minute(), 59);
        assert_eq!(parts.with_second(75).second(), 59);
        assert_eq!(parts.with_millis(5000).millis(), 999);
    }

    #[test]
    fn test_setters_idempotent() {
        let parts = crate::parts!(2022 - 3 - 13 2:30:0);

        for day in [0, 1, 15, 31, 200] {
            assert_eq!(parts.with_day(day), parts.with_day(day).with_day(day));
        }

        for hour in [0, 12, 23, 100] {
            assert_eq!(parts.with_hour(hour), parts.with_hour(hour).with_hour(hour));
        }
    }

    #[test]
    fn test_year_floor() {
        let parts = crate::parts!(2022 - 6 - 15);

        assert_eq!(parts.with_year(1969).year(), 1970);
        assert_eq!(parts.with_year(-5000).year(), 1970);
        assert_eq!(parts.with_year(1970).year(), 1970);

        // the floor also applies at construction
        assert_eq!(crate::parts!(1969 - 12 - 31).year(), 1970);
    }

    #[test]
    fn test_naive_round_trip() {
        let mut rng = rand::rng();

        for _ in 0..1000 {
            // anywhere between the epoch and 2100-01-01
            let millis: i64 = rng.random_range(0..4_102_444_800_000);
            let parts = Parts::from_naive_millis(millis);

            assert_eq!(parts.to_naive_millis(), millis, "{parts}");
        }
    }

    #[test]
    fn test_decompose_matches_oracle() {
        let mut rng = rand::rng();

        for _ in 0..1000 {
            let millis: i64 = rng.random_range(0..4_102_444_800_000);
            let parts = Parts::from_naive_millis(millis);

            let oracle =
                time::OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
                    .unwrap();

            assert_eq!(parts.year(), oracle.year());
            assert_eq!(parts.month() as u8, oracle.month() as u8);
            assert_eq!(parts.day(), oracle.day());
            assert_eq!(parts.hour(), oracle.hour());
            assert_eq!(parts.minute(), oracle.minute());
            assert_eq!(parts.second(), oracle.second());
            assert_eq!(parts.millis(), oracle.millisecond());
        }
    }

    #[test]
    fn test_decompose_pre_epoch() {
        // reachable via negative offsets near the epoch
        let parts = Parts::from_naive_millis(-1);

        assert_eq!(parts.year(), 1969);
        assert_eq!(parts.month(), Month::December);
        assert_eq!(parts.day(), 31);
        assert_eq!(parts.hour(), 23);
        assert_eq!(parts.minute(), 59);
        assert_eq!(parts.second(), 59);
        assert_eq!(parts.millis(), 999);

        assert_eq!(parts.to_naive_millis(), -1);
    }

    #[test]
    fn test_ordering() {
        let base = crate::parts!(2022 - 6 - 15 12:30:30);

        assert!(base < base.with_year(2023));
        assert!(base < base.with_month(Month::July));
        assert!(base < base.with_day(16));
        assert!(base < base.with_hour(13));
        assert!(base > base.with_minute(29));
        assert!(base > base.with_second(29));
        assert!(base < base.with_millis(1));
    }
}
