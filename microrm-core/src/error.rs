/// Errors raised by the registrar and the gateway.
///
/// Failures of the storage engine are not represented here: the driver logs
/// them and reports an unsuccessful [`ExecResult`](crate::ExecResult) or an
/// empty row set instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model description breaks an invariant (detected before any SQL).
    #[error("invalid configuration for model `{model}`: {reason}")]
    Configuration { model: &'static str, reason: String },
    /// A criterion or update field names a column the model does not have.
    #[error("`{field}` is not a field of model `{model}`")]
    UnknownField { model: &'static str, field: String },
    /// A lookup was attempted without criteria.
    #[error("`{operation}` on model `{model}` requires at least one criterion")]
    MissingCriteria {
        model: &'static str,
        operation: &'static str,
    },
    #[error("no `{model}` matches the given criteria")]
    NotFound { model: &'static str },
    #[error("more than one `{model}` matches the given criteria")]
    MultipleResults { model: &'static str },
    /// A value could not be converted into the Rust type of a field.
    #[error("{0:#}")]
    Conversion(#[from] anyhow::Error),
    /// The database could not be opened.
    #[error("cannot open the database: {0:#}")]
    Open(#[source] anyhow::Error),
    /// The database could not be closed cleanly.
    #[error("cannot close the database: {0:#}")]
    Close(#[source] anyhow::Error),
}

impl Error {
    /// Programming errors: raised immediately, never retried.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. } | Error::UnknownField { .. } | Error::MissingCriteria { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_multiple_results(&self) -> bool {
        matches!(self, Error::MultipleResults { .. })
    }
}
