use crate::error::TimetableResult;
use crate::event::EventRow;
use crate::routine::RoutineRow;
use crate::table::{RecordTable, TableRow};

/// Persisted home of the two row tables.
///
/// Every call reads or writes the whole table; nothing is cached between calls.
pub trait TableStore {
    /// Make sure both tables exist with their full column sets. Never clobbers existing rows.
    fn initialize(&self) -> TimetableResult<()>;

    /// A missing or empty table loads as zero rows.
    fn load<R: TableRow>(&self) -> TimetableResult<RecordTable<R>>;

    /// Full-table overwrite.
    fn save<R: TableRow>(&self, table: &RecordTable<R>) -> TimetableResult<()>;

    fn load_events(&self) -> TimetableResult<RecordTable<EventRow>> {
        self.load()
    }

    fn load_routines(&self) -> TimetableResult<RecordTable<RoutineRow>> {
        self.load()
    }

    fn save_events(&self, table: &RecordTable<EventRow>) -> TimetableResult<()> {
        self.save(table)
    }

    fn save_routines(&self, table: &RecordTable<RoutineRow>) -> TimetableResult<()> {
        self.save(table)
    }
}

pub mod file;

pub use file::CsvTableStore;
