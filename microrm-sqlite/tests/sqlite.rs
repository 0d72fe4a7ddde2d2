#[cfg(test)]
mod tests {
    use microrm::{Connection, Executor};
    use microrm_sqlite::SqliteConnection;
    use microrm_tests::{execute_tests, init_logs};
    use std::sync::{Mutex, PoisonError};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn sqlite() {
        init_logs();
        let _guard = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let connection = SqliteConnection::open("tests.sqlite", Some(dir.path()))
            .expect("Could not open the database");
        assert!(
            dir.path().join("tests.sqlite").exists(),
            "Database file should be created after opening"
        );
        execute_tests(&connection);
        assert!(connection.registry().len() > 0);
        connection.close().expect("Could not close the database");
    }

    #[test]
    fn sqlite_memory() {
        init_logs();
        let connection = SqliteConnection::memory().expect("Could not open the database");
        execute_tests(&connection);
        // Running twice on the same handle starts from dropped tables again
        execute_tests(&connection);
    }
}
