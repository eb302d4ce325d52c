use crate::error::{TimetableError, TimetableResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const EVERYDAY: &str = "Everyday";

/// Weekday implied by a calendar date (proleptic Gregorian, ISO weekdays).
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Full English name, the form stored in the `Day_of_Week` column.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_weekday(input: &str) -> Option<Weekday> {
    Weekday::from_str(input.trim()).ok()
}

pub fn parse_date(field: &'static str, input: &str) -> TimetableResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        TimetableError::MalformedDate {
            field,
            value: input.to_string(),
            expected: "YYYY-MM-DD",
        }
    })
}

pub fn parse_time(field: &'static str, input: &str) -> TimetableResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_| {
        TimetableError::MalformedDate {
            field,
            value: input.to_string(),
            expected: "HH:MM (24-hour)",
        }
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Combine a date and a time-of-day into one absolute instant.
pub fn instant(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// The seven consecutive dates starting at `start`.
pub fn week_from(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take(7)
}

/// Day on which a routine recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineDay {
    On(Weekday),
    Everyday,
}

impl RoutineDay {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            RoutineDay::Everyday => true,
            RoutineDay::On(weekday) => *weekday == weekday_of(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutineDay::Everyday => EVERYDAY,
            RoutineDay::On(weekday) => weekday_name(*weekday),
        }
    }
}

impl fmt::Display for RoutineDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineDay {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(EVERYDAY) {
            return Ok(RoutineDay::Everyday);
        }
        parse_weekday(trimmed)
            .map(RoutineDay::On)
            .ok_or_else(|| TimetableError::validation(format!("unknown day of week '{s}'")))
    }
}

impl Serialize for RoutineDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RoutineDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter writing a `Weekday` as its full English name.
pub(crate) mod weekday_serde {
    use super::{parse_weekday, weekday_name};
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(weekday_name(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_weekday(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday '{raw}'")))
    }
}
