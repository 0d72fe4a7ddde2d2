#[cfg(test)]
mod tests {
    use microrm::{Connection, Criteria, Executor, Model, Value};
    use microrm_sqlite::SqliteConnection;
    use microrm_tests::{init_logs, silent_logs};
    use std::{
        sync::{Mutex, PoisonError},
        thread,
    };

    static MUTEX: Mutex<()> = Mutex::new(());

    #[derive(Model, Debug, Clone, PartialEq)]
    struct Visit {
        #[microrm(surrogate)]
        id: Option<i64>,
        page: String,
        worker: u32,
    }

    #[test]
    fn create_database() {
        init_logs();
        let _guard = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let dir = tempfile::tempdir().expect("Failed to create a temporary directory");
        let path = dir.path().join("creation.sqlite");
        assert!(!path.exists(), "Database file should not exist before test");
        SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", path.display()))
            .expect("Could not open the database")
            .close()
            .expect("Could not close the database");
        assert!(path.exists(), "Database file should be created after connection");
        SqliteConnection::connect(&format!("sqlite://{}?mode=ro", path.display()))
            .expect("Could not open the database in read only mode");
        std::fs::remove_file(&path).expect("Failed to remove the test database file");
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", path.display())).is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            let result = SqliteConnection::connect("duckdb://some_value");
            assert!(matches!(result, Err(microrm::Error::Open(..))));
        }
    }

    #[test]
    fn open_locations() {
        init_logs();
        let dir = tempfile::tempdir().expect("Failed to create a temporary directory");

        // Directory: the name is appended
        let nested = dir.path().join("nested").join("deeper");
        std::fs::create_dir_all(&nested).expect("Failed to create the directory");
        SqliteConnection::open("app.db", Some(&nested)).expect("Could not open in a directory");
        assert!(nested.join("app.db").exists());

        // File: used as is, missing parents are created
        let file = dir.path().join("missing").join("custom.sqlite");
        SqliteConnection::open("ignored.db", Some(&file)).expect("Could not open a file path");
        assert!(file.exists());
        assert!(!dir.path().join("missing").join("ignored.db").exists());
    }

    #[test]
    fn pragmas_and_raw_statements() {
        init_logs();
        let connection = SqliteConnection::memory().expect("Could not open the database");
        let rows = connection.fetch_all("PRAGMA foreign_keys", &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], Value::Int64(Some(1)));

        let result = connection.execute("CREATE TABLE numbers (n INTEGER, label TEXT)", &[]);
        assert!(result.success);
        let result = connection.execute(
            "INSERT INTO numbers (n, label) VALUES (?, ?)",
            &[Value::from(7i64), Value::Varchar(None)],
        );
        assert!(result.success);
        assert_eq!(result.rows_affected, 1);
        assert_eq!(result.last_insert_id, Some(1));
        let result = connection.execute("UPDATE numbers SET n = n + 1", &[]);
        assert_eq!(result.rows_affected, 1);
        assert_eq!(result.last_insert_id, None);

        // Rowids are per table, the first row of another table is 1 again
        assert!(connection.execute("CREATE TABLE words (w TEXT)", &[]).success);
        let result = connection.execute("INSERT INTO words (w) VALUES ('one')", &[]);
        assert_eq!(result.rows_affected, 1);
        assert_eq!(result.last_insert_id, Some(1));
        let result = connection.execute("INSERT INTO words (w) VALUES ('two')", &[]);
        assert_eq!(result.last_insert_id, Some(2));
        let result = connection.execute("DELETE FROM words WHERE w = 'two'", &[]);
        assert_eq!(result.rows_affected, 1);
        assert_eq!(result.last_insert_id, None);
        let row = connection
            .fetch_one("SELECT n, label FROM numbers", &[])
            .expect("Expected one row");
        assert_eq!(row.len(), 2);
        assert_eq!(row[0], Value::Int64(Some(8)));
        assert_eq!(row[1], Value::Null);

        // Failures are reported, not raised
        silent_logs! {
            let result = connection.execute("INSERT INTO nowhere VALUES (1)", &[]);
            assert!(!result.success);
            assert!(connection.fetch_all("SELECT * FROM nowhere", &[]).is_empty());
            let result = connection.execute("SELECT ?", &[Value::from(1i64), Value::from(2i64)]);
            assert!(!result.success, "Too many parameters must fail");
            let result = connection.execute("SELECT 1; SELECT 2", &[]);
            assert!(!result.success, "Trailing statements must fail");
        }
        connection.close().expect("Could not close the database");
    }

    #[test]
    fn shared_between_threads() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<SqliteConnection>();

        init_logs();
        let connection = SqliteConnection::memory().expect("Could not open the database");
        thread::scope(|scope| {
            for worker in 0..4u32 {
                let connection = &connection;
                scope.spawn(move || {
                    for n in 0..10 {
                        let mut visit = Visit {
                            id: None,
                            page: format!("/page/{}", n),
                            worker,
                        };
                        visit.save(connection).expect("Failed to save a visit");
                        assert!(visit.id.is_some());
                    }
                });
            }
        });
        let visits = Visit::all(&connection).expect("Failed to query visits");
        assert_eq!(visits.len(), 40);
        let mut ids = visits.iter().filter_map(|v| v.id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40, "Every insert must report its own key");
        let by_worker = Visit::filter(&connection, &Criteria::new().eq(Visit::worker, 2u32))
            .expect("Failed to filter visits");
        assert_eq!(by_worker.len(), 10);
    }
}
