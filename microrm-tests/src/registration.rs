use crate::{Recorder, reset};
use microrm::{Criteria, Error, Executor, Model};
use std::sync::{Mutex, PoisonError};

static MUTEX: Mutex<()> = Mutex::new(());

#[derive(Model, Debug, Clone, PartialEq)]
pub struct User {
    #[microrm(surrogate)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[table_name("library_books")]
#[microrm(pk = "isbn", unique("title", "edition"))]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub edition: u16,
    pub rating: Option<f64>,
    pub cover: Option<Vec<u8>>,
    pub available: bool,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[table_name("ignored")]
#[microrm(table = "log_lines", pk = none)]
pub struct LogLine {
    pub line: String,
}

pub fn registration<E: Executor>(executor: &E) {
    let _lock = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    // Cleanup
    reset::<User, _>(executor);
    reset::<Book, _>(executor);
    reset::<LogLine, _>(executor);

    let recorder = Recorder::new(executor);

    // The DDL is issued once per handle
    let result = User::register(&recorder).expect("Failed to register User");
    assert!(result.success, "The CREATE TABLE of User failed");
    let result = User::register(&recorder).expect("Failed to register User twice");
    assert!(result.success);
    User::all(&recorder).expect("Failed to query User");
    assert_eq!(
        recorder.statements(),
        [
            "CREATE TABLE IF NOT EXISTS user (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, email TEXT)",
            "SELECT id, name, email FROM user",
        ]
    );
    assert!(executor.registry().is_registered::<User>());

    // Declared key, type level table name, composite unique
    recorder.clear();
    Book::register(&recorder).expect("Failed to register Book");
    assert_eq!(
        recorder.statements(),
        [
            "CREATE TABLE IF NOT EXISTS library_books (isbn TEXT PRIMARY KEY, title TEXT, edition INTEGER, rating REAL, cover BLOB, available INTEGER, UNIQUE (title, edition))"
        ]
    );

    // The table directive wins over the type attribute, no key at all
    recorder.clear();
    LogLine::register(&recorder).expect("Failed to register LogLine");
    assert_eq!(
        recorder.statements(),
        ["CREATE TABLE IF NOT EXISTS log_lines (line TEXT)"]
    );

    // Lookups validate before reaching the driver
    recorder.clear();
    let result = User::filter(&recorder, &Criteria::new().eq("age", 30));
    assert!(
        matches!(result, Err(Error::UnknownField { ref field, .. }) if field == "age"),
        "Unknown filter keys must be rejected: {:?}",
        result
    );
    let result = User::get(&recorder, &Criteria::new());
    assert!(matches!(result, Err(Error::MissingCriteria { .. })));
    let result = User::filter(&recorder, &Criteria::new().eq(User::id, 1));
    assert!(result.is_ok());
    assert_eq!(
        recorder.statements(),
        ["SELECT id, name, email FROM user WHERE id = ?"]
    );

    // A forgotten model is registered again
    recorder.clear();
    executor.registry().forget::<LogLine>();
    LogLine::all(&recorder).expect("Failed to query LogLine");
    assert_eq!(
        recorder.statements(),
        [
            "CREATE TABLE IF NOT EXISTS log_lines (line TEXT)",
            "SELECT line FROM log_lines",
        ]
    );
}
