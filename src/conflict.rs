use crate::error::TimetableResult;
use crate::event::Event;
use crate::persistence::TableStore;
use crate::timetable::Timetable;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two same-day events whose intervals overlap, in start order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub date: NaiveDate,
    pub first: String,
    pub second: String,
    pub first_id: String,
    pub second_id: String,
    /// When `second` starts, strictly before `first_ends`.
    pub second_starts: NaiveDateTime,
    pub first_ends: NaiveDateTime,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conflict between {} and {}", self.first, self.second)
    }
}

/// Overlaps among the events dated `date`.
///
/// Events are ordered by start instant (stable) and only neighbours in that
/// order are compared: a pair is reported when the later one starts strictly
/// before the earlier one ends. An overlap between two events that have a third
/// sorted between them is not reported on its own.
pub fn conflicts_on(events: &[Event], date: NaiveDate) -> Vec<Conflict> {
    let mut day: Vec<&Event> = events.iter().filter(|event| event.date == date).collect();
    day.sort_by_key(|event| event.starts_at());

    day.windows(2)
        .filter_map(|pair| {
            let (previous, next) = (pair[0], pair[1]);
            (next.starts_at() < previous.ends_at()).then(|| Conflict {
                date,
                first: previous.name.clone(),
                second: next.name.clone(),
                first_id: previous.id.clone(),
                second_id: next.id.clone(),
                second_starts: next.starts_at(),
                first_ends: previous.ends_at(),
            })
        })
        .collect()
}

impl<S: TableStore> Timetable<S> {
    pub fn conflicts_on(&self, date: NaiveDate) -> TimetableResult<Vec<Conflict>> {
        Ok(conflicts_on(&self.events()?, date))
    }
}
