use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// In-game calendar date at whole-day granularity.
///
/// Wraps a Gregorian calendar date; the derived ordering is calendar
/// ordering, so `a < b` means `a` falls strictly before `b`. Serializes as
/// an ISO-8601 date (`"2001-06-15"`).
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CityDate(NaiveDate);

impl CityDate {
    /// Build from calendar fields (month and day-of-month are 1-based).
    /// Returns `None` for dates that do not exist, such as month 13 or
    /// February 29 outside a leap year.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month of year (1-12).
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day within the month (1-31).
    pub fn day_of_month(self) -> u32 {
        self.0.day()
    }

    /// The preceding calendar day, crossing month and year boundaries.
    /// `None` only at the representable minimum.
    pub fn previous_day(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The following calendar day. `None` only at the representable
    /// maximum.
    pub fn next_day(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The date `days` whole days later.
    pub fn plus_days(self, days: u64) -> Option<Self> {
        self.0.checked_add_days(Days::new(days)).map(Self)
    }
}

impl fmt::Display for CityDate {
    /// `<month> <day> <year>` with the year padded to four digits, the
    /// format the host's date cheat expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:04}",
            self.month(),
            self.day_of_month(),
            self.year()
        )
    }
}
