use crate::{CBox, error_message_from_ptr, extract::extract_value};
use anyhow::{Error, Result};
use libsqlite3_sys::*;
use microrm_core::{Row, Value};
use std::{
    ffi::c_int,
    os::raw::{c_char, c_void},
    ptr,
};

/// One compiled statement, finalized on drop.
pub(crate) struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    columns: c_int,
}

impl SqlitePrepared {
    /// Compile `sql`, `None` when it holds no statement (only blanks or
    /// comments). Trailing statements are rejected.
    pub(crate) fn new(connection: *mut sqlite3, sql: &str) -> Result<Option<Self>> {
        let len = c_int::try_from(sql.len())
            .map_err(|_| Error::msg("The query is too long to be prepared"))?;
        let mut statement = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        let mut tail: *const c_char = ptr::null();
        unsafe {
            let rc = sqlite3_prepare_v2(
                connection,
                sql.as_ptr() as *const c_char,
                len,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                return Err(Error::msg(
                    error_message_from_ptr(sqlite3_errmsg(connection)).to_string(),
                ));
            }
        }
        if !tail.is_null() {
            let consumed = (tail as usize).saturating_sub(sql.as_ptr() as usize);
            let remaining = sql.get(consumed..).unwrap_or_default();
            if !remaining
                .trim_matches(|c: char| c.is_whitespace() || c == ';')
                .is_empty()
            {
                return Err(Error::msg("Cannot prepare more than one statement at a time"));
            }
        }
        if statement.is_null() {
            return Ok(None);
        }
        let columns = unsafe { sqlite3_column_count(*statement) };
        Ok(Some(Self { statement, columns }))
    }

    /// Bind every parameter, positionally.
    pub(crate) fn bind_all(&mut self, params: &[Value]) -> Result<()> {
        let expected = unsafe { sqlite3_bind_parameter_count(*self.statement) } as usize;
        if expected != params.len() {
            return Err(Error::msg(format!(
                "The query expects {} parameters but {} were provided",
                expected,
                params.len()
            )));
        }
        for (i, value) in params.iter().enumerate() {
            self.bind_index(value, i as c_int + 1)?;
        }
        Ok(())
    }

    pub(crate) fn bind_index(&mut self, value: &Value, index: c_int) -> Result<()> {
        let statement = *self.statement;
        unsafe {
            let rc = match value {
                v if v.is_null() => sqlite3_bind_null(statement, index),
                Value::Boolean(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int8(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int16(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int32(Some(v)) => sqlite3_bind_int(statement, index, *v),
                Value::Int64(Some(v)) => sqlite3_bind_int64(statement, index, *v),
                Value::UInt8(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::UInt16(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::UInt32(Some(v)) => sqlite3_bind_int64(statement, index, *v as sqlite3_int64),
                Value::Float32(Some(v)) => sqlite3_bind_double(statement, index, *v as f64),
                Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, *v),
                Value::Varchar(Some(v)) => sqlite3_bind_text64(
                    statement,
                    index,
                    v.as_ptr() as *const c_char,
                    v.len() as sqlite3_uint64,
                    SQLITE_TRANSIENT(),
                    SQLITE_UTF8 as u8,
                ),
                Value::Blob(Some(v)) => sqlite3_bind_blob64(
                    statement,
                    index,
                    v.as_ptr() as *const c_void,
                    v.len() as sqlite3_uint64,
                    SQLITE_TRANSIENT(),
                ),
                _ => sqlite3_bind_null(statement, index),
            };
            if rc != SQLITE_OK {
                let db = sqlite3_db_handle(statement);
                return Err(Error::msg(
                    error_message_from_ptr(sqlite3_errmsg(db)).to_string(),
                )
                .context(format!("Cannot bind parameter {} ({:?})", index, value)));
            }
        }
        Ok(())
    }

    /// Advance to the next row, `None` once the statement is done.
    pub(crate) fn step(&mut self) -> Result<Option<Row>> {
        let statement = *self.statement;
        unsafe {
            match sqlite3_step(statement) {
                SQLITE_DONE => Ok(None),
                SQLITE_ROW => (0..self.columns)
                    .map(|i| extract_value(statement, i))
                    .collect::<Result<Row>>()
                    .map(Some),
                _ => {
                    let db = sqlite3_db_handle(statement);
                    Err(Error::msg(
                        error_message_from_ptr(sqlite3_errmsg(db)).to_string(),
                    ))
                }
            }
        }
    }
}
