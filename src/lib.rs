pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod event;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod query;
pub mod reminder;
pub mod routine;
pub mod table;
pub mod timetable;
pub(crate) mod validation;

pub use calendar::{RoutineDay, weekday_name, weekday_of};
pub use config::TimetableConfig;
pub use conflict::Conflict;
pub use error::{TimetableError, TimetableResult};
pub use event::{Event, EventKind, EventRow, EventUpdate, NewEvent};
pub use persistence::{CsvTableStore, TableStore};
pub use query::{DailySchedule, SemesterSchedule, UPCOMING_LIMIT};
pub use reminder::{LogNotifier, Notifier, Reminder, ReminderPoller};
pub use routine::{NewRoutine, Routine, RoutineRow, RoutineUpdate};
pub use table::{RecordTable, RowUpdate, Table, TableRow};
pub use timetable::Timetable;
