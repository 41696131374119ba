//! [`Zone`] definition and the instant <-> wall clock conversions.
use crate::{Era, Instant, Parts, conv};

/// A named civil time zone: a piecewise-constant UTC offset schedule.
///
/// The schedule is a list of [`Era`]s sorted by strictly descending start,
/// plus [`earliest_offset`], the offset for all time before the start of the
/// oldest recorded era. The fallback offset is a mandatory field rather than
/// a list element, so a zone with no eras is still total: it is simply a
/// constant offset zone, like [`Zone::utc`].
///
/// Zones are plain immutable values. Every transformation returns a new
/// value, so sharing one between threads read-only needs no locking.
///
/// [`earliest_offset`]: Zone::earliest_offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    name: String,
    eras: Vec<Era>,
    earliest_offset: i32,
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Zone {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let len = u.int_in_range(0_usize..=8)?;

        let mut starts = Vec::with_capacity(len);
        for _ in 0..len {
            starts.push(u.int_in_range(1..=60_000_000_i64)?);
        }

        // era starts must be strictly descending
        starts.sort_unstable();
        starts.dedup();

        let mut eras = Vec::with_capacity(starts.len());
        for start in starts.into_iter().rev() {
            eras.push(Era::new(start, u.int_in_range(-16 * 60..=16 * 60)?));
        }

        Ok(Self::custom(
            "arbitrary",
            eras,
            u.int_in_range(-16 * 60..=16 * 60)?,
        ))
    }
}

impl Zone {
    /// Builds a [`Zone`] from a name, a schedule of eras, and the offset for
    /// all time before the earliest era.
    ///
    /// The eras must be sorted by strictly descending [`Era::start`]. No
    /// validation is performed here; schedules normally arrive pre-sorted
    /// from [`Zone::decode`] or a trusted builder, and lookups on an
    /// unsorted schedule return unspecified (but not undefined) results.
    pub fn custom(name: impl Into<String>, eras: Vec<Era>, earliest_offset: i32) -> Self {
        Self {
            name: name.into(),
            eras,
            earliest_offset,
        }
    }

    /// The UTC zone: no eras, constant offset 0.
    pub fn utc() -> Self {
        Self::fixed("UTC", 0)
    }

    /// Builds a constant offset zone with no transitions.
    pub fn fixed(name: impl Into<String>, offset: i32) -> Self {
        Self::custom(name, Vec::new(), offset)
    }

    /// Returns the zone name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the era schedule, sorted by descending start.
    #[inline]
    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    /// Returns the offset (minutes ahead of UTC) applying to all time before
    /// the earliest recorded era.
    #[inline]
    pub const fn earliest_offset(&self) -> i32 {
        self.earliest_offset
    }

    /// Looks up the era covering the given instant, along with the
    /// chronologically next (newer) era, if one exists.
    ///
    /// An instant exactly at an era's start minute belongs to that era. For
    /// instants before the earliest recorded era, the covering era is a
    /// synthetic one starting at minute 0 with [`Zone::earliest_offset`],
    /// and "next" is the oldest real era.
    pub fn era_at(&self, instant: Instant) -> (Era, Option<Era>) {
        let minutes = instant.as_minutes();

        for (index, era) in self.eras.iter().enumerate() {
            if era.start() <= minutes {
                let next = if index == 0 {
                    None
                } else {
                    Some(self.eras[index - 1])
                };

                return (*era, next);
            }
        }

        (
            Era::new(0, self.earliest_offset),
            self.eras.last().copied(),
        )
    }

    /// Returns the UTC offset (in minutes) in effect at the given instant.
    #[inline]
    pub fn offset_at(&self, instant: Instant) -> i32 {
        self.era_at(instant).0.offset()
    }

    /// Converts an instant into the wall clock fields it reads as in this
    /// zone.
    ///
    /// Offset selection is a pure function of the instant, so this direction
    /// has no ambiguity.
    pub fn to_parts(&self, instant: Instant) -> Parts {
        let offset = self.offset_at(instant);

        Parts::from_naive_millis(instant.as_millis() + offset as i64 * conv::MILLIS_PER_MINUTE)
    }

    /// Resolves wall clock fields in this zone into an absolute instant.
    ///
    /// Near an offset transition a wall clock time can denote zero, one or
    /// two instants. A repeated hour (clocks turned back) resolves to its
    /// first occurrence, still under the old offset. A skipped hour (clocks
    /// turned forward) snaps forward past the gap, so requesting a
    /// nonexistent 02:30 yields the same instant as the 03:30 that actually
    /// occurred.
    pub fn from_parts(&self, parts: Parts) -> Instant {
        let my_time = parts.to_naive_millis();

        // probe a day early so the lookup reflects the era active in the
        // neighborhood of the wall clock time rather than exactly at a
        // boundary
        let probe = Instant::from_millis(my_time - conv::MILLIS_PER_DAY);
        let (current, next) = self.era_at(probe);

        let before = my_time - current.offset() as i64 * conv::MILLIS_PER_MINUTE;

        let Some(next) = next else {
            return Instant::from_millis(before);
        };

        let after = my_time - next.offset() as i64 * conv::MILLIS_PER_MINUTE;
        let boundary = next.start() * conv::MILLIS_PER_MINUTE;

        if before < boundary && after < boundary {
            // wholly before the transition, the current offset applies
            return Instant::from_millis(before);
        }

        if before >= boundary && after >= boundary {
            // wholly past the transition, the next offset applies
            return Instant::from_millis(after);
        }

        // the wall clock time falls inside the transition window. Both the
        // repeated-hour and skipped-hour resolutions land on the reading
        // under the pre-transition offset: the first occurrence of a
        // repeated hour, or the snap past a skipped one.
        if before > after {
            tracing::trace!(
                message = "wall clock time falls in a skipped hour, snapping forward",
                zone = %self.name,
                wall = %parts,
                resolved = before,
            );
        } else {
            tracing::trace!(
                message = "ambiguous wall clock time, using the first occurrence",
                zone = %self.name,
                wall = %parts,
                resolved = before,
            );
        }

        Instant::from_millis(before)
    }
}
