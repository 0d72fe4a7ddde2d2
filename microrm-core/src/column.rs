/// Typed reference to a column of a model.
///
/// `#[derive(Model)]` generates one constant per column (`User::email`), so
/// criteria can name fields without string literals.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    /// Column name.
    pub name: &'static str,
    /// Rust type the column belongs to.
    pub model: &'static str,
}

impl ColumnRef {
    pub const fn new(name: &'static str, model: &'static str) -> Self {
        Self { name, model }
    }
}

/// Anything that names a column in criteria and `update_fields` lists.
pub trait AsColumnName {
    fn column_name(&self) -> &str;
}

impl AsColumnName for ColumnRef {
    fn column_name(&self) -> &str {
        self.name
    }
}

impl AsColumnName for &str {
    fn column_name(&self) -> &str {
        self
    }
}

impl AsColumnName for String {
    fn column_name(&self) -> &str {
        self.as_str()
    }
}
