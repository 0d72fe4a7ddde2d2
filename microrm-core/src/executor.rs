use crate::{Driver, ExecResult, Registry, Row, Value};

/// Synchronous statement execution, the surface the gateway drives.
///
/// Implementations catch every driver level error, log it, and degrade:
/// `execute` reports `success == false`, `fetch_all` returns no rows and
/// `fetch_one` returns `None`. Parameters are bound positionally to `?`
/// placeholders.
pub trait Executor {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Models already registered through this executor's connection.
    fn registry(&self) -> &Registry;

    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult;

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Vec<Row>;

    fn fetch_one(&self, sql: &str, params: &[Value]) -> Option<Row> {
        self.fetch_all(sql, params).into_iter().next()
    }
}

impl<E: Executor> Executor for &E {
    type Driver = E::Driver;

    fn driver(&self) -> &Self::Driver {
        (**self).driver()
    }

    fn registry(&self) -> &Registry {
        (**self).registry()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult {
        (**self).execute(sql, params)
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Vec<Row> {
        (**self).fetch_all(sql, params)
    }

    fn fetch_one(&self, sql: &str, params: &[Value]) -> Option<Row> {
        (**self).fetch_one(sql, params)
    }
}
