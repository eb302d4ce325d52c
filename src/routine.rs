use crate::calendar::{self, RoutineDay};
use crate::error::{TimetableError, TimetableResult};
use crate::table::{ID_COLUMN, RowUpdate, Table, TableRow};
use crate::validation;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const ROUTINE_COLUMNS: &[&str] = &[
    "Name",
    "Start_Time",
    "End_Time",
    "Day_of_Week",
    "Notes",
    ID_COLUMN,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Start_Time")]
    pub start_time: String,
    #[serde(rename = "End_Time")]
    pub end_time: String,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
    #[serde(rename = "Id", default)]
    pub id: String,
}

impl TableRow for RoutineRow {
    const TABLE: Table = Table::Routines;
    const COLUMNS: &'static [&'static str] = ROUTINE_COLUMNS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.day_of_week.as_str(),
            self.notes.as_str(),
            self.id.as_str(),
        ]
    }

    fn from_values(values: Vec<String>) -> Self {
        let mut cells = values.into_iter();
        let mut next = || cells.next().unwrap_or_default();
        Self {
            name: next(),
            start_time: next(),
            end_time: next(),
            day_of_week: next(),
            notes: next(),
            id: next(),
        }
    }
}

/// A weekly (or daily) routine parsed from its stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub day_of_week: RoutineDay,
    pub notes: String,
}

impl Routine {
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.day_of_week.matches(date)
    }

    pub fn to_row(&self) -> RoutineRow {
        RoutineRow {
            name: self.name.clone(),
            start_time: calendar::format_time(self.start_time),
            end_time: calendar::format_time(self.end_time),
            day_of_week: self.day_of_week.to_string(),
            notes: self.notes.clone(),
            id: self.id.clone(),
        }
    }
}

impl TryFrom<&RoutineRow> for Routine {
    type Error = TimetableError;

    fn try_from(row: &RoutineRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.clone(),
            name: row.name.clone(),
            start_time: calendar::parse_time("Start_Time", &row.start_time)?,
            end_time: calendar::parse_time("End_Time", &row.end_time)?,
            day_of_week: row.day_of_week.parse()?,
            notes: row.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRoutine {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub day_of_week: String,
    #[serde(default)]
    pub notes: String,
}

impl NewRoutine {
    pub fn new(
        name: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        day_of_week: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            day_of_week: day_of_week.into(),
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RoutineUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

    pub fn day_of_week(mut self, day_of_week: impl Into<String>) -> Self {
        self.day_of_week = Some(day_of_week.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl RowUpdate for RoutineUpdate {
    type Row = RoutineRow;

    fn apply(&self, row: &mut RoutineRow) -> TimetableResult<()> {
        let name = self
            .name
            .as_deref()
            .map(|name| validation::required("name", name))
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
        let day = self
            .day_of_week
            .as_deref()
            .map(validation::routine_day)
            .transpose()?;

        if let Some(name) = name {
            row.name = name.to_string();
        }
        if let Some(start_time) = start_time {
            row.start_time = calendar::format_time(start_time);
        }
        if let Some(end_time) = end_time {
            row.end_time = calendar::format_time(end_time);
        }
        if let Some(day) = day {
            row.day_of_week = day.to_string();
        }
        if let Some(notes) = &self.notes {
            row.notes = notes.trim().to_string();
        }
        Ok(())
    }
}
