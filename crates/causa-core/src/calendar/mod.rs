//! Forensic holiday calendar.
//!
//! Court-specific non-working days, distinct from generic public holidays.
//! The calendar is immutable reference data: the caller loads it once per
//! query from the external holiday source and this crate only reads it.

pub mod business_days;

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single forensic holiday as supplied by the external calendar source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub description: String,
    /// Court or jurisdiction this holiday applies to (e.g. "TJSP").
    pub tribunal: String,
}

/// An immutable set of forensic non-working dates, keyed by date.
///
/// Lookup structure consumed by [`business_days`]. Duplicate dates across
/// tribunals collapse into one entry; a day is non-working regardless of
/// how many courts observe it.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Empty calendar (every weekday is a business day).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from full holiday records.
    pub fn from_holidays<'a, I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = &'a Holiday>,
    {
        holidays.into_iter().map(|h| h.date).collect()
    }

    /// Whether `date` is a forensic holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for HolidayCalendar {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}
