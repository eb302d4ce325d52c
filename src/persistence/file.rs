use super::TableStore;
use crate::config::{DEFAULT_EVENTS_FILE, DEFAULT_ROUTINES_FILE, TimetableConfig};
use crate::error::TimetableResult;
use crate::event::EventRow;
use crate::routine::RoutineRow;
use crate::table::{RecordTable, Table, TableRow};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Two CSV files, one per table, header row always present.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    events_path: PathBuf,
    routines_path: PathBuf,
}

impl CsvTableStore {
    pub fn new(events_path: impl Into<PathBuf>, routines_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
            routines_path: routines_path.into(),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_EVENTS_FILE), dir.join(DEFAULT_ROUTINES_FILE))
    }

    pub fn from_config(config: &TimetableConfig) -> Self {
        Self::new(config.events_path(), config.routines_path())
    }

    pub fn path_for(&self, table: Table) -> &Path {
        match table {
            Table::Events => &self.events_path,
            Table::Routines => &self.routines_path,
        }
    }

    fn ensure_table<R: TableRow>(&self) -> TimetableResult<()> {
        let path = self.path_for(R::TABLE);
        let is_blank = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => return Err(err.into()),
        };
        if is_blank {
            info!(table = %R::TABLE, path = %path.display(), "creating empty table");
            write_csv(path, &RecordTable::<R>::empty())?;
        }
        Ok(())
    }

    /// Persist keys for rows written without one (older files have no `Id` column).
    fn migrate_keys<R: TableRow>(&self) -> TimetableResult<()> {
        let path = self.path_for(R::TABLE);
        let mut table = read_csv::<R>(path)?;
        let assigned = table.assign_missing_ids()?;
        if assigned > 0 {
            info!(table = %R::TABLE, assigned, "assigned record ids to legacy rows");
            write_csv(path, &table)?;
        }
        Ok(())
    }
}

impl TableStore for CsvTableStore {
    fn initialize(&self) -> TimetableResult<()> {
        self.ensure_table::<EventRow>()?;
        self.ensure_table::<RoutineRow>()?;
        self.migrate_keys::<EventRow>()?;
        self.migrate_keys::<RoutineRow>()?;
        Ok(())
    }

    /// Never writes. Rows still missing a key get a temporary one in memory;
    /// it is persisted only if the table is saved.
    fn load<R: TableRow>(&self) -> TimetableResult<RecordTable<R>> {
        let mut table = read_csv::<R>(self.path_for(R::TABLE))?;
        let assigned = table.assign_missing_ids()?;
        if assigned > 0 {
            debug!(table = %R::TABLE, assigned, "keyless rows given temporary ids");
        }
        debug!(table = %R::TABLE, rows = table.len(), "loaded table");
        Ok(table)
    }

    fn save<R: TableRow>(&self, table: &RecordTable<R>) -> TimetableResult<()> {
        write_csv(self.path_for(R::TABLE), table)?;
        debug!(table = %R::TABLE, rows = table.len(), "saved table");
        Ok(())
    }
}

fn read_csv<R: TableRow>(path: &Path) -> TimetableResult<RecordTable<R>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(RecordTable::empty()),
        Err(err) => return Err(err.into()),
    };
    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for record in reader.deserialize::<R>() {
        rows.push(record?);
    }
    Ok(RecordTable::from_rows(&rows)?)
}

/// Writes next to the target and renames over it, so readers never see half a table.
fn write_csv<R: TableRow>(path: &Path, table: &RecordTable<R>) -> TimetableResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    let written = write_staging(&staging, table)
        .and_then(|()| fs::rename(&staging, path).map_err(Into::into));
    if written.is_err() {
        let _ = fs::remove_file(&staging);
    }
    written
}

fn write_staging<R: TableRow>(staging: &Path, table: &RecordTable<R>) -> TimetableResult<()> {
    let file = File::create(staging)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(R::COLUMNS)?;
    for row in table.rows()? {
        writer.write_record(row.values())?;
    }
    writer.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
