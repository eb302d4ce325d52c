use crate::table::Table;
use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{table} index {index} is out of range (table has {len} rows)")]
    IndexOutOfRange {
        table: Table,
        index: usize,
        len: usize,
    },

    #[error("{table} record '{id}' not found")]
    RecordNotFound { table: Table, id: String },

    #[error("malformed {field} '{value}': expected {expected}")]
    MalformedDate {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
}

impl TimetableError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type TimetableResult<T> = Result<T, TimetableError>;
