use crate::calendar::{self, weekday_serde};
use crate::error::{TimetableError, TimetableResult};
use crate::table::{ID_COLUMN, RowUpdate, Table, TableRow};
use crate::validation;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const EVENT_COLUMNS: &[&str] = &[
    "Type",
    "Name",
    "Date",
    "Start_Time",
    "End_Time",
    "Day_of_Week",
    "Location",
    "Notes",
    ID_COLUMN,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Lesson,
    Exam,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Lesson => "Lesson",
            EventKind::Exam => "Exam",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lesson" => Ok(EventKind::Lesson),
            "exam" => Ok(EventKind::Exam),
            _ => Err(TimetableError::validation(format!(
                "invalid event type '{s}' (expected Lesson or Exam)"
            ))),
        }
    }
}

/// One row of the events table, exactly as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    #[serde(rename = "End_Time")]
    pub end_time: String,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
    #[serde(rename = "Id", default)]
    pub id: String,
}

impl TableRow for EventRow {
    const TABLE: Table = Table::Events;
    const COLUMNS: &'static [&'static str] = EVENT_COLUMNS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.kind.as_str(),
            self.name.as_str(),
            self.date.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.day_of_week.as_str(),
            self.location.as_str(),
            self.notes.as_str(),
            self.id.as_str(),
        ]
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut cells = values.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            kind: next(),
            name: next(),
            date: next(),
            start_time: next(),
            end_time: next(),
            day_of_week: next(),
            location: next(),
            notes: next(),
            id: next(),
        }
    }
}

/// A lesson or exam parsed from its stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub kind: EventKind,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Always derived from `date`.
    #[serde(with = "weekday_serde")]
    pub day_of_week: Weekday,
    pub location: String,
    pub notes: String,
}

impl Event {
    pub fn starts_at(&self) -> NaiveDateTime {
        calendar::instant(self.date, self.start_time)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        calendar::instant(self.date, self.end_time)
    }

    pub fn to_row(&self) -> EventRow {
        EventRow {
            kind: self.kind.as_str().to_string(),
            name: self.name.clone(),
            date: calendar::format_date(self.date),
            start_time: calendar::format_time(self.start_time),
            end_time: calendar::format_time(self.end_time),
            day_of_week: calendar::weekday_name(self.day_of_week).to_string(),
            location: self.location.clone(),
            notes: self.notes.clone(),
            id: self.id.clone(),
        }
    }
}

impl TryFrom<&EventRow> for Event {
    type Error = TimetableError;

    fn try_from(row: &EventRow) -> Result<Self, Self::Error> {
        let date = calendar::parse_date("Date", &row.date)?;
        Ok(Self {
            id: row.id.clone(),
            kind: row.kind.parse()?,
            name: row.name.clone(),
            date,
            start_time: calendar::parse_time("Start_Time", &row.start_time)?,
            end_time: calendar::parse_time("End_Time", &row.end_time)?,
            day_of_week: calendar::weekday_of(date),
            location: row.location.clone(),
            notes: row.notes.clone(),
        })
    }
}

/// Raw input for a new lesson or exam.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    pub kind: String,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

impl NewEvent {
    pub fn new(
        kind: impl Into<String>,
        name: impl Into<String>,
        date: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            date: date.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            location: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Field-level edit of an event; `None` leaves the stored value alone.
///
/// Day of week is not editable; it follows `date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EventUpdate {
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl RowUpdate for EventUpdate {
    type Row = EventRow;

    fn apply(&self, row: &mut EventRow) -> TimetableResult<()> {
        let kind = self.kind.as_deref().map(validation::event_kind).transpose()?;
        let name = self
            .name
            .as_deref()
            .map(|name| validation::required("name", name))
            .transpose()?;
        let date = self
            .date
            .as_deref()
            .map(|date| validation::date("Date", date))
            .transpose()?;
        let start_time = self
            .start_time
            .as_deref()
            .map(|time| validation::time("Start_Time", time))
            .transpose()?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|time| validation::time("End_Time", time))
            .transpose()?;

        if let Some(kind) = kind {
            row.kind = kind.as_str().to_string();
        }
        if let Some(name) = name {
            row.name = name.to_string();
        }
        if let Some(date) = date {
            row.date = calendar::format_date(date);
            row.day_of_week = calendar::weekday_name(calendar::weekday_of(date)).to_string();
        }
        if let Some(start_time) = start_time {
            row.start_time = calendar::format_time(start_time);
        }
        if let Some(end_time) = end_time {
            row.end_time = calendar::format_time(end_time);
        }
        if let Some(location) = &self.location {
            row.location = location.trim().to_string();
        }
        if let Some(notes) = &self.notes {
            row.notes = notes.trim().to_string();
        }
        Ok(())
    }
}
