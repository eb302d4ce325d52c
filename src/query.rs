//! Schedule queries: day, week, whole-store and upcoming views.
//!
//! The free functions are pure filters over already-loaded records; the
//! `Timetable` methods re-read both tables and delegate to them.

use crate::calendar;
use crate::error::TimetableResult;
use crate::event::Event;
use crate::persistence::TableStore;
use crate::routine::Routine;
use crate::timetable::Timetable;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How many events `upcoming_events` returns at most.
pub const UPCOMING_LIMIT: usize = 5;

/// Everything that happens on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub routines: Vec<Routine>,
}

impl DailySchedule {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.routines.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterSchedule {
    /// Ascending by date; same-date events keep store order.
    pub events: Vec<Event>,
    /// Store order.
    pub routines: Vec<Routine>,
}

/// Events dated exactly `date` and routines recurring on its weekday (or every day).
pub fn daily_schedule(events: &[Event], routines: &[Routine], date: NaiveDate) -> DailySchedule {
    DailySchedule {
        date,
        events: events
            .iter()
            .filter(|event| event.date == date)
            .cloned()
            .collect(),
        routines: routines
            .iter()
            .filter(|routine| routine.occurs_on(date))
            .cloned()
            .collect(),
    }
}

/// Seven daily schedules for `start` and the six following dates, in calendar order.
pub fn weekly_schedule(
    events: &[Event],
    routines: &[Routine],
    start: NaiveDate,
) -> Vec<DailySchedule> {
    calendar::week_from(start)
        .map(|date| daily_schedule(events, routines, date))
        .collect()
}

pub fn semester_schedule(mut events: Vec<Event>, routines: Vec<Routine>) -> SemesterSchedule {
    events.sort_by_key(|event| event.date);
    SemesterSchedule { events, routines }
}

/// Up to [`UPCOMING_LIMIT`] events dated today or later, relative to `now`.
///
/// Ordered by date only; start times do not break ties.
pub fn upcoming_events(mut events: Vec<Event>, now: NaiveDateTime) -> Vec<Event> {
    let today = now.date();
    events.retain(|event| event.date >= today);
    events.sort_by_key(|event| event.date);
    events.truncate(UPCOMING_LIMIT);
    events
}

impl<S: TableStore> Timetable<S> {
    pub fn daily_schedule(&self, date: NaiveDate) -> TimetableResult<DailySchedule> {
        Ok(daily_schedule(&self.events()?, &self.routines()?, date))
    }

    pub fn weekly_schedule(&self, start: NaiveDate) -> TimetableResult<Vec<DailySchedule>> {
        Ok(weekly_schedule(&self.events()?, &self.routines()?, start))
    }

    pub fn semester_schedule(&self) -> TimetableResult<SemesterSchedule> {
        Ok(semester_schedule(self.events()?, self.routines()?))
    }

    /// `now` is supplied by the caller; the engine never reads the clock.
    pub fn upcoming_events(&self, now: NaiveDateTime) -> TimetableResult<Vec<Event>> {
        Ok(upcoming_events(self.events()?, now))
    }
}
