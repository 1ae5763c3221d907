//! Requested instants and the local day around them
//!
//! A booking names a calendar day and a time of day; both are read in the
//! business timezone and turned into one Unix-millis instant.

use crate::utils::time::{
    TimeError, day_end_millis, day_start_millis, local_to_millis, millis_to_local, parse_date,
    parse_time,
};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// `date` + `time` in `tz` → Unix millis
pub fn requested_instant(date: &str, time: &str, tz: Tz) -> Result<i64, TimeError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    Ok(local_to_millis(date.and_time(time), tz))
}

/// Replace the calendar day and/or the time of day of an existing instant
///
/// Fields left as `None` keep their current local value.
pub fn reschedule(current: i64, date: Option<&str>, time: Option<&str>, tz: Tz) -> Result<i64, TimeError> {
    if date.is_none() && time.is_none() {
        return Ok(current);
    }
    let Some(local) = millis_to_local(current, tz) else {
        return Err(TimeError::InvalidDate(current.to_string()));
    };
    let new_date = match date {
        Some(d) => parse_date(d)?,
        None => local.date(),
    };
    let new_time = match time {
        Some(t) => parse_time(t)?,
        None => local.time(),
    };
    Ok(local_to_millis(new_date.and_time(new_time), tz))
}

/// Half-open `[start, end)` window covering one local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: i64,
    pub end: i64,
}

impl DayWindow {
    pub fn of_date(date: NaiveDate, tz: Tz) -> Self {
        Self {
            start: day_start_millis(date, tz),
            end: day_end_millis(date, tz),
        }
    }

    pub fn contains(&self, instant: i64) -> bool {
        self.start <= instant && instant < self.end
    }
}
