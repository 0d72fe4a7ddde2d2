use microrm::{ExecResult, Executor, Registry, Row, Value};
use std::sync::{Mutex, PoisonError};

/// Executor wrapper recording every statement that reaches the driver.
///
/// Shares the registry of the wrapped executor, so registration state is the
/// one of the underlying handle.
pub struct Recorder<E: Executor> {
    inner: E,
    statements: Mutex<Vec<String>>,
}

impl<E: Executor> Recorder<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Statements issued so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn record(&self, sql: &str) {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_string());
    }
}

impl<E: Executor> Executor for Recorder<E> {
    type Driver = E::Driver;

    fn driver(&self) -> &Self::Driver {
        self.inner.driver()
    }

    fn registry(&self) -> &Registry {
        self.inner.registry()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> ExecResult {
        self.record(sql);
        self.inner.execute(sql, params)
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Vec<Row> {
        self.record(sql);
        self.inner.fetch_all(sql, params)
    }
}
