use crate::SqlWriter;

/// A database backend: names itself and provides its SQL dialect.
pub trait Driver {
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
