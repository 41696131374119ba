//! [`Month`] defintion + impls.
use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::calendar;

/// A month in the year.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
#[allow(missing_docs)] // Dont think we __need__ to document each month.
pub enum Month {
    January = 1,
    February = 2,
    March = 3,
    April = 4,
    May = 5,
    June = 6,
    July = 7,
    August = 8,
    September = 9,
    October = 10,
    November = 11,
    December = 12,
}

impl PartialEq for Month {
    fn eq(&self, other: &Self) -> bool {
        *self as u8 == *other as u8
    }
}

/// Error for a digit outside the '1..=12' month range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth(pub u8);

impl fmt::Display for InvalidMonth {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} is not a valid month, expected a value 1..=12",
            self.0
        )
    }
}

impl std::error::Error for InvalidMonth {}

impl TryFrom<u8> for Month {
    type Error = InvalidMonth;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match Self::from_number(value) {
            Some(month) => Ok(month),
            None => Err(InvalidMonth(value)),
        }
    }
}

impl Eq for Month {}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> Ordering {
        self.const_cmp(other)
    }
}

impl Hash for Month {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u8(*self as u8)
    }
}

impl Month {
    /// All 12 months, in order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Builds a [`Month`] from the corresponding digit, starting at '[`Month::January`] = 1'
    #[inline]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::January),
            2 => Some(Self::February),
            3 => Some(Self::March),
            4 => Some(Self::April),
            5 => Some(Self::May),
            6 => Some(Self::June),
            7 => Some(Self::July),
            8 => Some(Self::August),
            9 => Some(Self::September),
            10 => Some(Self::October),
            11 => Some(Self::November),
            12 => Some(Self::December),
            _ => None,
        }
    }

    /// Const-able [`Ord::cmp`]. Used internally by the [`Ord`]/[`PartialOrd`] impls.
    #[inline]
    pub const fn const_cmp(&self, other: &Self) -> Ordering {
        let a = *self as u8;
        let b = *other as u8;

        if a > b {
            Ordering::Greater
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Returns the previous month, wrapping to [`December`] if 'self == [`January`]'
    ///
    /// [`December`]: [`Month::December`]
    /// [`January`]: [`Month::January`]
    #[inline]
    pub const fn previous(self) -> Self {
        match self {
            Self::January => Self::December,
            Self::February => Self::January,
            Self::March => Self::February,
            Self::April => Self::March,
            Self::May => Self::April,
            Self::June => Self::May,
            Self::July => Self::June,
            Self::August => Self::July,
            Self::September => Self::August,
            Self::October => Self::September,
            Self::November => Self::October,
            Self::December => Self::November,
        }
    }

    /// Returns the number of days in this [`Month`], given the year.
    pub const fn days_in(&self, year: i32) -> u8 {
        match self {
            Self::February if calendar::is_leap_year(year) => 29,
            Self::February => 28,
            Self::April | Self::June | Self::September | Self::November => 30,
            _ => 31,
        }
    }

    /// Returns the next month, wrapping to [`January`] if 'self == [`December`]'
    ///
    /// [`December`]: [`Month::December`]
    /// [`January`]: [`Month::January`]
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::January => Self::February,
            Self::February => Self::March,
            Self::March => Self::April,
            Self::April => Self::May,
            Self::May => Self::June,
            Self::June => Self::July,
            Self::July => Self::August,
            Self::August => Self::September,
            Self::September => Self::October,
            Self::October => Self::November,
            Self::November => Self::December,
            Self::December => Self::January,
        }
    }
}
