use crate::error::{TimetableError, TimetableResult};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Name of the surrogate key column, persisted after the display columns.
pub const ID_COLUMN: &str = "Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Events,
    Routines,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Events => "events",
            Table::Routines => "routines",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted row: every column is text, in a fixed order.
pub trait TableRow: fmt::Debug + Clone + Serialize + DeserializeOwned {
    const TABLE: Table;
    /// Column names in persisted order. The last one is always [`ID_COLUMN`].
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    /// Cell values in [`TableRow::COLUMNS`] order.
    fn values(&self) -> Vec<&str>;
    fn from_values(values: Vec<String>) -> Self;
}

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Row table backed by a string-typed `DataFrame`.
///
/// Positions are contiguous from 0; removing a row shifts every later row down by one.
#[derive(Debug, Clone)]
pub struct RecordTable<R: TableRow> {
    df: DataFrame,
    _row: PhantomData<R>,
}

impl<R: TableRow> Default for RecordTable<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: TableRow> RecordTable<R> {
    /// Zero rows, full column set.
    pub fn empty() -> Self {
        Self {
            df: DataFrame::empty_with_schema(&Self::schema()),
            _row: PhantomData,
        }
    }

    pub fn from_rows(rows: &[R]) -> PolarsResult<Self> {
        let cells: Vec<Vec<&str>> = rows.iter().map(TableRow::values).collect();
        let mut columns: Vec<Column> = Vec::with_capacity(R::COLUMNS.len());
        for (col_idx, name) in R::COLUMNS.iter().enumerate() {
            let values: Vec<&str> = cells.iter().map(|row| row[col_idx]).collect();
            columns.push(Series::new(PlSmallStr::from_static(*name), values).into_column());
        }
        Ok(Self {
            df: DataFrame::new(columns)?,
            _row: PhantomData,
        })
    }

    fn schema() -> Schema {
        Schema::from_iter(
            R::COLUMNS
                .iter()
                .map(|name| Field::new(PlSmallStr::from_static(*name), DataType::String)),
        )
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> TimetableResult<R> {
        self.check_index(index)?;
        let mut values = Vec::with_capacity(R::COLUMNS.len());
        for name in R::COLUMNS {
            let value = self.df.column(name)?.str()?.get(index).unwrap_or("");
            values.push(value.to_string());
        }
        Ok(R::from_values(values))
    }

    pub fn rows(&self) -> TimetableResult<Vec<R>> {
        (0..self.len()).map(|idx| self.row(idx)).collect()
    }

    pub fn push(&mut self, row: &R) -> TimetableResult<()> {
        let single = Self::from_rows(std::slice::from_ref(row))?;
        self.df = self.df.vstack(&single.df)?;
        Ok(())
    }

    pub fn replace(&mut self, index: usize, row: &R) -> TimetableResult<()> {
        self.check_index(index)?;
        let single = Self::from_rows(std::slice::from_ref(row))?;
        let head = self.df.slice(0, index);
        let tail = self.df.slice((index + 1) as i64, self.len());
        self.df = head.vstack(&single.df)?.vstack(&tail)?;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> TimetableResult<()> {
        self.check_index(index)?;
        let head = self.df.slice(0, index);
        let tail = self.df.slice((index + 1) as i64, self.len());
        self.df = head.vstack(&tail)?;
        Ok(())
    }

    /// Current position of the row carrying `id`.
    pub fn position(&self, id: &str) -> TimetableResult<Option<usize>> {
        let ids = self.df.column(ID_COLUMN)?.str()?;
        Ok(ids.into_iter().position(|value| value == Some(id)))
    }

    /// Gives every row with a blank key a fresh one; returns how many were assigned.
    pub(crate) fn assign_missing_ids(&mut self) -> TimetableResult<usize> {
        let mut rows = self.rows()?;
        let mut assigned = 0;
        for row in rows.iter_mut().filter(|row| row.id().trim().is_empty()) {
            row.set_id(new_record_id());
            assigned += 1;
        }
        if assigned > 0 {
            *self = Self::from_rows(&rows)?;
        }
        Ok(assigned)
    }

    fn check_index(&self, index: usize) -> TimetableResult<()> {
        if index >= self.len() {
            return Err(TimetableError::IndexOutOfRange {
                table: R::TABLE,
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

/// A partial, field-level edit for one kind of row.
///
/// `apply` validates every supplied field before writing any of them, and is
/// always run against a copy of the stored row.
pub trait RowUpdate {
    type Row: TableRow;

    fn apply(&self, row: &mut Self::Row) -> TimetableResult<()>;
}
