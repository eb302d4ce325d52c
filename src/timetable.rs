use crate::config::TimetableConfig;
use crate::error::{TimetableError, TimetableResult};
use crate::event::{Event, EventRow, NewEvent};
use crate::persistence::{CsvTableStore, TableStore};
use crate::routine::{NewRoutine, Routine, RoutineRow};
use crate::table::{RecordTable, RowUpdate, Table, TableRow, new_record_id};
use crate::validation;
use std::path::Path;
use tracing::info;

/// How a mutation names its target row.
#[derive(Debug, Clone, Copy)]
enum RowRef<'a> {
    Index(usize),
    Key(&'a str),
}

/// Record store plus the mutation protocol over it.
///
/// Tables are re-read on every call and written back in full after each mutation.
/// A `Timetable` assumes it is the only writer of its tables.
#[derive(Debug, Clone)]
pub struct Timetable<S = CsvTableStore> {
    store: S,
}

impl Timetable<CsvTableStore> {
    /// Open (and create if missing) the CSV tables named by `config`.
    pub fn open(config: &TimetableConfig) -> TimetableResult<Self> {
        Self::with_store(CsvTableStore::from_config(config))
    }

    /// Open the default-named CSV tables inside `dir`.
    pub fn open_dir(dir: impl AsRef<Path>) -> TimetableResult<Self> {
        Self::with_store(CsvTableStore::in_dir(dir))
    }
}

impl<S: TableStore> Timetable<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Wrap `store` and initialize it.
    pub fn with_store(store: S) -> TimetableResult<Self> {
        let timetable = Self::new(store);
        timetable.initialize()?;
        Ok(timetable)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn initialize(&self) -> TimetableResult<()> {
        self.store.initialize()
    }

    pub fn load_events(&self) -> TimetableResult<RecordTable<EventRow>> {
        self.store.load_events()
    }

    pub fn load_routines(&self) -> TimetableResult<RecordTable<RoutineRow>> {
        self.store.load_routines()
    }

    pub fn save_events(&self, table: &RecordTable<EventRow>) -> TimetableResult<()> {
        self.store.save_events(table)
    }

    pub fn save_routines(&self, table: &RecordTable<RoutineRow>) -> TimetableResult<()> {
        self.store.save_routines(table)
    }

    /// Every event, parsed. A malformed stored row fails the whole read.
    pub fn events(&self) -> TimetableResult<Vec<Event>> {
        self.load_events()?.rows()?.iter().map(Event::try_from).collect()
    }

    pub fn routines(&self) -> TimetableResult<Vec<Routine>> {
        self.load_routines()?
            .rows()?
            .iter()
            .map(Routine::try_from)
            .collect()
    }

    /// Current positions and raw rows, for list/selection views.
    pub fn list_events(&self) -> TimetableResult<Vec<(usize, EventRow)>> {
        Ok(self.load_events()?.rows()?.into_iter().enumerate().collect())
    }

    pub fn list_routines(&self) -> TimetableResult<Vec<(usize, RoutineRow)>> {
        Ok(self.load_routines()?.rows()?.into_iter().enumerate().collect())
    }

    /// Validate, derive the day of week, append and persist. Returns the new record's key.
    pub fn append_event(&self, fields: NewEvent) -> TimetableResult<String> {
        let row = validation::validate_new_event(&fields)?;
        self.append_row(row)
    }

    pub fn append_routine(&self, fields: NewRoutine) -> TimetableResult<String> {
        let row = validation::validate_new_routine(&fields)?;
        self.append_row(row)
    }

    /// Apply a partial update to the row currently at `index`.
    pub fn update_by_index<U: RowUpdate>(&self, index: usize, update: U) -> TimetableResult<()> {
        self.update_row(RowRef::Index(index), &update)
    }

    /// Apply a partial update to the row carrying key `id`, wherever it sits now.
    pub fn update_by_key<U: RowUpdate>(&self, id: &str, update: U) -> TimetableResult<()> {
        self.update_row(RowRef::Key(id), &update)
    }

    /// Remove the row at `index`; later rows move up by one.
    pub fn delete_by_index(&self, table: Table, index: usize) -> TimetableResult<()> {
        match table {
            Table::Events => self.delete_row::<EventRow>(RowRef::Index(index)),
            Table::Routines => self.delete_row::<RoutineRow>(RowRef::Index(index)),
        }
    }

    pub fn delete_by_key(&self, table: Table, id: &str) -> TimetableResult<()> {
        match table {
            Table::Events => self.delete_row::<EventRow>(RowRef::Key(id)),
            Table::Routines => self.delete_row::<RoutineRow>(RowRef::Key(id)),
        }
    }

    fn append_row<R: TableRow>(&self, mut row: R) -> TimetableResult<String> {
        let id = new_record_id();
        row.set_id(id.clone());
        let mut table = self.store.load::<R>()?;
        table.push(&row)?;
        self.store.save(&table)?;
        info!(table = %R::TABLE, id = %id, rows = table.len(), "appended record");
        Ok(id)
    }

    fn update_row<U: RowUpdate>(&self, target: RowRef<'_>, update: &U) -> TimetableResult<()> {
        let mut table = self.store.load::<U::Row>()?;
        let index = resolve(&table, target)?;
        let mut row = table.row(index)?;
        update.apply(&mut row)?;
        table.replace(index, &row)?;
        self.store.save(&table)?;
        let table_name = <U::Row as TableRow>::TABLE;
        info!(table = %table_name, index, id = %row.id(), "updated record");
        Ok(())
    }

    fn delete_row<R: TableRow>(&self, target: RowRef<'_>) -> TimetableResult<()> {
        let mut table = self.store.load::<R>()?;
        let index = resolve(&table, target)?;
        table.remove(index)?;
        self.store.save(&table)?;
        info!(table = %R::TABLE, index, rows = table.len(), "deleted record");
        Ok(())
    }
}

fn resolve<R: TableRow>(table: &RecordTable<R>, target: RowRef<'_>) -> TimetableResult<usize> {
    match target {
        RowRef::Index(index) if index < table.len() => Ok(index),
        RowRef::Index(index) => Err(TimetableError::IndexOutOfRange {
            table: R::TABLE,
            index,
            len: table.len(),
        }),
        RowRef::Key(id) => table
            .position(id)?
            .ok_or_else(|| TimetableError::RecordNotFound {
                table: R::TABLE,
                id: id.to_string(),
            }),
    }
}
