use crate::Value;
use std::sync::Arc;

/// Outcome of a statement that does not return rows.
///
/// Drivers never raise on a failed statement: they log the error and return
/// `success == false` with zeroed counters, so callers that care have to look.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    pub success: bool,
    /// Number of rows inserted, updated or deleted.
    pub rows_affected: u64,
    /// Rowid of the row inserted by this statement, `None` when it inserted nothing.
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn succeeded(rows_affected: u64, last_insert_id: Option<i64>) -> Self {
        Self {
            success: true,
            rows_affected,
            last_insert_id,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    /// Successful result of a call that did not need to reach the driver.
    pub fn skipped() -> Self {
        Self::succeeded(0, None)
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
    /// Move the value of `name` out of the row, leaving `Value::Null` behind.
    pub fn take_column(&mut self, name: &str) -> Option<Value> {
        let i = self.labels.iter().position(|v| v == name)?;
        Some(std::mem::take(&mut self.values[i]))
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}
