use crate::{
    AsColumnName, Criteria, ExecResult, Executor, ModelDescriptor, Result, RowLabeled, Value,
    gateway, registrar,
};

/// A record type persisted in one table.
///
/// Usually implemented through `#[derive(Model)]`, which also generates typed
/// column references (`User::email`) for criteria. The provided methods are
/// the record gateway: every call registers the table on first use for the
/// executor's database handle.
///
/// ```ignore
/// #[derive(Model)]
/// #[microrm(unique = "email")]
/// struct User {
///     #[microrm(surrogate)]
///     id: Option<i64>,
///     name: String,
///     email: String,
/// }
/// ```
pub trait Model: Sized + 'static {
    /// Schema description, built once per type.
    fn descriptor() -> &'static ModelDescriptor;

    /// Values of the declared fields, in declaration order.
    fn row(&self) -> Vec<Value>;

    /// Build an instance from the declared fields found in `row`.
    ///
    /// The surrogate key (if any) is not read here, it is set afterwards
    /// through [`Model::set_primary_key`].
    fn from_row(row: RowLabeled) -> Result<Self>;

    /// Current primary key value, null when unset or when the model has no key
    /// it can track.
    fn primary_key(&self) -> Value;

    /// Store a primary key value, a no-op for models that cannot hold one.
    fn set_primary_key(&mut self, value: Value) -> Result<()>;

    /// Create the table for this model through `executor`, once per handle.
    fn register(executor: &impl Executor) -> Result<ExecResult> {
        registrar::ensure_registered::<Self, _>(executor)
    }

    /// Persist the instance: update by key, upsert by uniqueness or insert.
    fn save(&mut self, executor: &impl Executor) -> Result<&mut Self> {
        gateway::write(executor, self, &[] as &[&str])?;
        Ok(self)
    }

    /// Like [`Model::save`], restricting an update to `fields`.
    fn save_fields<C: AsColumnName>(
        &mut self,
        executor: &impl Executor,
        fields: &[C],
    ) -> Result<&mut Self> {
        gateway::write(executor, self, fields)?;
        Ok(self)
    }

    /// Persist the instance and return the driver outcome.
    fn write<C: AsColumnName>(
        &mut self,
        executor: &impl Executor,
        update_fields: &[C],
    ) -> Result<ExecResult> {
        gateway::write(executor, self, update_fields)
    }

    /// Every stored instance, in database order.
    fn all(executor: &impl Executor) -> Result<Vec<Self>> {
        gateway::filter(executor, &Criteria::new())
    }

    fn filter(executor: &impl Executor, criteria: &Criteria) -> Result<Vec<Self>> {
        gateway::filter(executor, criteria)
    }

    /// The single instance matching `criteria`, `None` when there is none.
    fn get(executor: &impl Executor, criteria: &Criteria) -> Result<Option<Self>> {
        gateway::lookup(executor, criteria, false)
    }

    /// The single instance matching `criteria`, [`Error::NotFound`](crate::Error::NotFound) when there is none.
    fn get_required(executor: &impl Executor, criteria: &Criteria) -> Result<Self> {
        gateway::lookup(executor, criteria, true)?.ok_or_else(|| crate::Error::NotFound {
            model: Self::descriptor().type_name(),
        })
    }

    fn lookup(
        executor: &impl Executor,
        criteria: &Criteria,
        raise_if_not_found: bool,
    ) -> Result<Option<Self>> {
        gateway::lookup(executor, criteria, raise_if_not_found)
    }
}
