use crate::calendar::{self, RoutineDay};
use crate::error::{TimetableError, TimetableResult};
use crate::event::{EventKind, EventRow, NewEvent};
use crate::routine::{NewRoutine, RoutineRow};
use chrono::{NaiveDate, NaiveTime};

pub(crate) fn required<'a>(field: &str, value: &'a str) -> TimetableResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TimetableError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

pub(crate) fn event_kind(value: &str) -> TimetableResult<EventKind> {
    required("type", value)?.parse()
}

pub(crate) fn date(field: &'static str, value: &str) -> TimetableResult<NaiveDate> {
    calendar::parse_date(field, required(field, value)?)
}

pub(crate) fn time(field: &'static str, value: &str) -> TimetableResult<NaiveTime> {
    calendar::parse_time(field, required(field, value)?)
}

pub(crate) fn routine_day(value: &str) -> TimetableResult<RoutineDay> {
    required("day of week", value)?.parse()
}

fn require_times(start_time: &str, end_time: &str) -> TimetableResult<()> {
    if start_time.trim().is_empty() || end_time.trim().is_empty() {
        return Err(TimetableError::validation(
            "start and end times are required",
        ));
    }
    Ok(())
}

/// Checks raw event input and builds the canonical row (without an id).
pub(crate) fn validate_new_event(input: &NewEvent) -> TimetableResult<EventRow> {
    let name = required("name", &input.name)?;
    require_times(&input.start_time, &input.end_time)?;
    let kind = event_kind(&input.kind)?;
    let date = date("Date", &input.date)?;
    let start_time = time("Start_Time", &input.start_time)?;
    let end_time = time("End_Time", &input.end_time)?;

    Ok(EventRow {
        kind: kind.as_str().to_string(),
        name: name.to_string(),
        date: calendar::format_date(date),
        start_time: calendar::format_time(start_time),
        end_time: calendar::format_time(end_time),
        day_of_week: calendar::weekday_name(calendar::weekday_of(date)).to_string(),
        location: input.location.trim().to_string(),
        notes: input.notes.trim().to_string(),
        id: String::new(),
    })
}

pub(crate) fn validate_new_routine(input: &NewRoutine) -> TimetableResult<RoutineRow> {
    let name = required("name", &input.name)?;
    require_times(&input.start_time, &input.end_time)?;
    let day = routine_day(&input.day_of_week)?;
    let start_time = time("Start_Time", &input.start_time)?;
    let end_time = time("End_Time", &input.end_time)?;

    Ok(RoutineRow {
        name: name.to_string(),
        start_time: calendar::format_time(start_time),
        end_time: calendar::format_time(end_time),
        day_of_week: day.to_string(),
        notes: input.notes.trim().to_string(),
        id: String::new(),
    })
}
