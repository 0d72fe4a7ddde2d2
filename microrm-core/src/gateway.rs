use crate::{
    AsColumnName, Criteria, Driver, Error, ExecResult, Executor, Model, Result, Row, RowLabeled,
    RowNames, SURROGATE_KEY, SqlWriter, Value, registrar::ensure_registered, truncate_long,
};

/// Persist `model`.
///
/// 1. Key set: `UPDATE` of `update_fields` (all non key fields when empty).
/// 2. Unique columns declared: `INSERT .. ON CONFLICT DO NOTHING`, the
///    instance key is left untouched even when a row is inserted.
/// 3. Otherwise a plain `INSERT`, after which the key is set to the id of the
///    inserted row.
///
/// The outcome of the storage engine is returned as is, a failed statement
/// is not an error.
pub fn write<M: Model, E: Executor, C: AsColumnName>(
    executor: &E,
    model: &mut M,
    update_fields: &[C],
) -> Result<ExecResult> {
    let descriptor = M::descriptor();
    if let Some(field) = update_fields
        .iter()
        .map(AsColumnName::column_name)
        .find(|f| !descriptor.is_field(f))
    {
        return Err(Error::UnknownField {
            model: descriptor.type_name(),
            field: field.to_string(),
        });
    }
    ensure_registered::<M, _>(executor)?;
    let writer = executor.driver().sql_writer();
    let mut sql = String::new();
    let row = model.row();
    let value_of = |name: &str| {
        descriptor
            .fields()
            .iter()
            .position(|f| f.name == name)
            .and_then(|i| row.get(i).cloned())
            .unwrap_or_default()
    };

    let key = model.primary_key();
    if let Some(pk) = descriptor.primary_key()
        && !key.is_null()
    {
        let columns = if update_fields.is_empty() {
            descriptor.non_key_fields().map(|f| f.name).collect::<Vec<_>>()
        } else {
            update_fields
                .iter()
                .map(AsColumnName::column_name)
                .collect::<Vec<_>>()
        };
        if columns.is_empty() {
            log::debug!(
                "Nothing to update on `{}`, no statement issued",
                descriptor.type_name()
            );
            return Ok(ExecResult::skipped());
        }
        writer.write_update(&mut sql, descriptor, &columns, pk);
        let mut params = columns.iter().map(|c| value_of(c)).collect::<Vec<_>>();
        params.push(key);
        log::debug!("{}", truncate_long(&sql));
        return Ok(executor.execute(&sql, &params));
    }

    if !descriptor.unique().is_empty() {
        let mut columns = descriptor.fields().iter().map(|f| f.name).collect::<Vec<_>>();
        let mut params = row.clone();
        if descriptor.has_surrogate_key() {
            columns.push(SURROGATE_KEY);
            params.push(Value::Int64(None));
        }
        writer.write_insert(&mut sql, descriptor, &columns, descriptor.unique());
        log::debug!("{}", truncate_long(&sql));
        return Ok(executor.execute(&sql, &params));
    }

    let columns = descriptor
        .fields()
        .iter()
        .map(|f| f.name)
        .filter(|f| Some(*f) != descriptor.primary_key())
        .collect::<Vec<_>>();
    writer.write_insert(&mut sql, descriptor, &columns, &[]);
    let params = columns.iter().map(|c| value_of(c)).collect::<Vec<_>>();
    log::debug!("{}", truncate_long(&sql));
    let result = executor.execute(&sql, &params);
    if result.success
        && descriptor.primary_key().is_some()
        && let Some(id) = result.last_insert_id
        && let Err(e) = model.set_primary_key(Value::Int64(Some(id)))
    {
        log::warn!(
            "Could not set the key of `{}` to {}: {:#}",
            descriptor.type_name(),
            id,
            e
        );
    }
    Ok(result)
}

/// Every instance matching all `criteria` (every instance when empty).
pub fn filter<M: Model, E: Executor>(executor: &E, criteria: &Criteria) -> Result<Vec<M>> {
    let descriptor = M::descriptor();
    criteria.validate(descriptor)?;
    ensure_registered::<M, _>(executor)?;
    let (labels, rows) = select::<M, _>(executor, criteria, None);
    rows.into_iter()
        .map(|row| hydrate::<M>(labels.clone(), row))
        .collect()
}

/// The single instance matching `criteria`.
///
/// No match is `Ok(None)`, or [`Error::NotFound`] when `raise_if_not_found`.
/// More than one match is [`Error::MultipleResults`].
pub fn lookup<M: Model, E: Executor>(
    executor: &E,
    criteria: &Criteria,
    raise_if_not_found: bool,
) -> Result<Option<M>> {
    let descriptor = M::descriptor();
    if criteria.is_empty() {
        return Err(Error::MissingCriteria {
            model: descriptor.type_name(),
            operation: "get",
        });
    }
    criteria.validate(descriptor)?;
    ensure_registered::<M, _>(executor)?;
    let (labels, mut rows) = select::<M, _>(executor, criteria, Some(2));
    if rows.len() > 1 {
        return Err(Error::MultipleResults {
            model: descriptor.type_name(),
        });
    }
    match rows.pop() {
        Some(row) => hydrate::<M>(labels, row).map(Some),
        None if raise_if_not_found => Err(Error::NotFound {
            model: descriptor.type_name(),
        }),
        None => Ok(None),
    }
}

fn select<M: Model, E: Executor>(
    executor: &E,
    criteria: &Criteria,
    limit: Option<u32>,
) -> (RowNames, Vec<Row>) {
    let descriptor = M::descriptor();
    let mut sql = String::new();
    executor
        .driver()
        .sql_writer()
        .write_select(&mut sql, descriptor, criteria, limit);
    log::debug!("{}", truncate_long(&sql));
    let params = criteria.bindings().cloned().collect::<Vec<_>>();
    let labels = descriptor
        .select_columns()
        .into_iter()
        .map(String::from)
        .collect::<RowNames>();
    (labels, executor.fetch_all(&sql, &params))
}

fn hydrate<M: Model>(labels: RowNames, row: Row) -> Result<M> {
    let mut row = RowLabeled::new(labels, row);
    let key = if M::descriptor().has_surrogate_key() {
        row.take_column(SURROGATE_KEY)
    } else {
        None
    };
    let mut model = M::from_row(row)?;
    if let Some(key) = key {
        model.set_primary_key(key)?;
    }
    Ok(model)
}
