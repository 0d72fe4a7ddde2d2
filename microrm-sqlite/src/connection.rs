use crate::{
    CBox, SqliteDriver, SqlitePrepared, error_message_from_ptr, path::resolve_database_path,
};
use anyhow::Context;
use libsqlite3_sys::{
    SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_FULLMUTEX, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
    sqlite3, sqlite3_close, sqlite3_errmsg, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_set_last_insert_rowid, sqlite3_total_changes64,
};
use microrm_core::{
    Connection, Driver, Error, ExecResult, Executor, Registry, Result, Row, Value, truncate_long,
};
use std::{
    ffi::{CString, c_int},
    fmt::{self, Debug, Formatter},
    path::Path,
    ptr,
    sync::{Mutex, PoisonError},
};

// libsqlite3-sys omits this binding; the symbol is provided by the linked SQLite.
unsafe extern "C" {
    fn sqlite3_close_v2(db: *mut sqlite3) -> c_int;
}

/// One open SQLite database: the handle models are saved and loaded through.
///
/// Opened in serialized mode, so it can be shared between threads. Each
/// statement runs in its own implicit transaction. Tables are created lazily
/// the first time a model is used with this handle, see [`Registry`].
pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
    driver: SqliteDriver,
    registry: Registry,
    /// Keeps a statement and the reading of its counters together.
    statement: Mutex<()>,
}

impl SqliteConnection {
    /// Open (or create) the database file `db_name`.
    ///
    /// Without `db_path` the file sits next to the running executable. A path
    /// naming a directory (existing, or ending with a separator) receives
    /// `db_name`; any other path is the database file itself. Missing parent
    /// directories are created.
    pub fn open<P: AsRef<Path>>(db_name: &str, db_path: Option<P>) -> Result<Self> {
        let path = resolve_database_path(db_name, db_path.as_ref().map(AsRef::as_ref))
            .map_err(Error::Open)?;
        let filename = path
            .to_str()
            .with_context(|| format!("The path `{}` is not valid UTF-8", path.display()))
            .map_err(Error::Open)?;
        Self::open_v2(
            filename,
            SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_FULLMUTEX,
        )
    }

    /// Private in-memory database, gone once the handle is closed.
    pub fn memory() -> Result<Self> {
        Self::open_v2(
            ":memory:",
            SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_FULLMUTEX,
        )
    }

    fn open_v2(filename: &str, flags: c_int) -> Result<Self> {
        let context = || format!("While opening the database `{}`", filename);
        let name = CString::new(filename)
            .with_context(context)
            .map_err(Error::Open)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close_v2(p);
        });
        unsafe {
            let rc = sqlite3_open_v2(name.as_ptr(), &mut *connection, flags, ptr::null());
            if rc != SQLITE_OK {
                let error = anyhow::Error::msg(
                    error_message_from_ptr(sqlite3_errmsg(*connection)).to_string(),
                )
                .context(context());
                log::error!("{:#}", error);
                return Err(Error::Open(error));
            }
        }
        let result = Self {
            connection,
            driver: SqliteDriver::new(),
            registry: Registry::new(),
            statement: Mutex::new(()),
        };
        if !result.execute("PRAGMA foreign_keys = ON", &[]).success {
            log::warn!("Could not enable foreign keys on `{}`", filename);
        }
        log::debug!("Opened the database `{}`", filename);
        Ok(result)
    }

    /// Prepare, bind and step `sql`, handing every row to `on_row`.
    fn run(
        &self,
        sql: &str,
        params: &[Value],
        mut on_row: impl FnMut(Row),
    ) -> anyhow::Result<ExecResult> {
        let _guard = self
            .statement
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let context = || format!("While executing the query:\n{}", truncate_long(sql));
        let connection = *self.connection;
        // Rowids are per table: reset so a non zero value afterwards belongs to this statement
        let changes = unsafe {
            sqlite3_set_last_insert_rowid(connection, 0);
            sqlite3_total_changes64(connection)
        };
        let Some(mut prepared) = SqlitePrepared::new(connection, sql).with_context(context)?
        else {
            return Ok(ExecResult::succeeded(0, None));
        };
        prepared.bind_all(params).with_context(context)?;
        while let Some(row) = prepared.step().with_context(context)? {
            on_row(row);
        }
        let (rows_affected, last_insert_id) = unsafe {
            (
                sqlite3_total_changes64(connection) - changes,
                sqlite3_last_insert_rowid(connection),
            )
        };
        Ok(ExecResult::succeeded(
            rows_affected.max(0) as u64,
            (rows_affected > 0 && last_insert_id != 0).then_some(last_insert_id),
        ))
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &Self::Driver {
        &self.driver
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult {
        log::trace!("Executing: {}", truncate_long(sql));
        self.run(sql, params, |_| {}).unwrap_or_else(|e| {
            log::error!("{:#}", e);
            ExecResult::failed()
        })
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Vec<Row> {
        log::trace!("Fetching: {}", truncate_long(sql));
        let mut rows = Vec::new();
        match self.run(sql, params, |row| rows.push(row)) {
            Ok(..) => rows,
            Err(e) => {
                log::error!("{:#}", e);
                Vec::new()
            }
        }
    }
}

impl Connection for SqliteConnection {
    /// Open `sqlite://<path>[?<query>]` as an SQLite URI filename, so the
    /// query accepts the SQLite URI parameters (`mode=ro|rw|rwc|memory`, ..).
    fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        let Some(location) = url.strip_prefix(&prefix) else {
            let error = anyhow::Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ));
            log::error!("{:#}", error);
            return Err(Error::Open(error));
        };
        Self::open_v2(
            &format!("file:{}", location),
            SQLITE_OPEN_URI | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_FULLMUTEX,
        )
    }

    /// Close the handle. On failure (statements still alive) the handle stays
    /// owned and is released by `sqlite3_close_v2` on drop.
    fn close(mut self) -> Result<()> {
        let connection = *self.connection;
        let rc = unsafe { sqlite3_close(connection) };
        if rc != SQLITE_OK {
            let error = anyhow::Error::msg(
                error_message_from_ptr(unsafe { sqlite3_errmsg(connection) }).to_string(),
            );
            log::error!("{:#}", error);
            return Err(Error::Close(error));
        }
        *self.connection = ptr::null_mut();
        Ok(())
    }
}

impl Debug for SqliteConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("connection", &*self.connection)
            .field("registered", &self.registry.len())
            .finish()
    }
}
