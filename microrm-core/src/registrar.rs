use crate::{Driver, ExecResult, Executor, Model, Result, SqlWriter, truncate_long};

/// Create the table of `M` unless this handle already did.
///
/// Configuration errors are returned before any statement is issued. A failed
/// `CREATE TABLE` is returned as an unsuccessful [`ExecResult`] and leaves the
/// model unregistered, so the next call tries again.
pub fn ensure_registered<M: Model, E: Executor>(executor: &E) -> Result<ExecResult> {
    let registry = executor.registry();
    if registry.is_registered::<M>() {
        return Ok(ExecResult::skipped());
    }
    let descriptor = M::descriptor();
    descriptor.validate()?;
    let mut sql = String::new();
    executor
        .driver()
        .sql_writer()
        .write_create_table(&mut sql, descriptor, true);
    log::debug!(
        "Registering `{}`: {}",
        descriptor.type_name(),
        truncate_long(&sql)
    );
    let result = executor.execute(&sql, &[]);
    if result.success {
        registry.mark_registered::<M>();
    } else {
        log::warn!(
            "Could not create table `{}` for `{}`, it will be retried on next use",
            descriptor.table_name(),
            descriptor.type_name()
        );
    }
    Ok(result)
}
