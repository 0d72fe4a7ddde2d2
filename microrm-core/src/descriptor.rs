use crate::{Error, FieldDef, Result, StorageType};
use std::collections::HashSet;

/// Name of the implicit surrogate key.
pub const SURROGATE_KEY: &str = "id";

/// Declarative schema description of a record type.
///
/// Built once per type (the derive stores it in a `LazyLock`) and never
/// mutated afterwards. Whether the table exists is tracked per database handle
/// by the [`Registry`](crate::Registry), not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    type_name: &'static str,
    table_name: String,
    fields: Box<[FieldDef]>,
    primary_key: Option<&'static str>,
    unique: Box<[&'static str]>,
}

impl ModelDescriptor {
    /// Descriptor with the defaults: table named after the lower-cased type
    /// name, primary key `id`, no unique constraint.
    pub fn new(type_name: &'static str, fields: impl Into<Box<[FieldDef]>>) -> Self {
        Self {
            type_name,
            table_name: type_name.to_lowercase(),
            fields: fields.into(),
            primary_key: Some(SURROGATE_KEY),
            unique: Box::new([]),
        }
    }

    /// Resolve the table name: the explicit directive wins over the type level
    /// attribute, which wins over the lower-cased type name.
    pub fn with_table(mut self, directive: Option<&str>, attribute: Option<&str>) -> Self {
        if let Some(table) = directive.or(attribute) {
            self.table_name = table.to_string();
        }
        self
    }

    /// `None` opts out of any primary key.
    pub fn with_primary_key(mut self, primary_key: Option<&'static str>) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_unique(mut self, columns: impl IntoIterator<Item = &'static str>) -> Self {
        self.unique = columns.into_iter().collect();
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn primary_key(&self) -> Option<&'static str> {
        self.primary_key
    }

    pub fn unique(&self) -> &[&'static str] {
        &self.unique
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// True when the key is the implicit `id` column, absent from the fields.
    pub fn has_surrogate_key(&self) -> bool {
        self.primary_key == Some(SURROGATE_KEY) && !self.is_field(SURROGATE_KEY)
    }

    /// Declared fields other than the primary key.
    pub fn non_key_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(move |f| Some(f.name) != self.primary_key)
    }

    /// Columns a `SELECT` reads, in hydration order: surrogate key first.
    pub fn select_columns(&self) -> Vec<&'static str> {
        let surrogate = self.has_surrogate_key().then_some(SURROGATE_KEY);
        surrogate
            .into_iter()
            .chain(self.fields.iter().map(|f| f.name))
            .collect()
    }

    /// Whether a criterion may name this column.
    pub fn is_filterable(&self, name: &str) -> bool {
        self.is_field(name) || self.primary_key == Some(name)
    }

    /// Storage type of the primary key column, if any.
    pub fn primary_key_storage(&self) -> Option<StorageType> {
        let pk = self.primary_key?;
        Some(
            self.field(pk)
                .map(FieldDef::storage_type)
                .unwrap_or(StorageType::Integer),
        )
    }

    /// Check the invariants a registration relies on.
    pub fn validate(&self) -> Result<()> {
        let error = |reason: String| Error::Configuration {
            model: self.type_name,
            reason,
        };
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in self.fields.iter() {
            if !seen.insert(field.name) {
                return Err(error(format!("field `{}` is declared twice", field.name)));
            }
        }
        let surrogate = self.has_surrogate_key();
        if let Some(pk) = self.primary_key {
            if !surrogate && !self.is_field(pk) {
                return Err(error(format!("primary key `{}` is not a model field", pk)));
            }
        }
        let missing = self
            .unique
            .iter()
            .filter(|c| !self.is_field(c) && !(surrogate && **c == SURROGATE_KEY))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(error(format!(
                "unique columns not found on model: {}",
                missing.join(", ")
            )));
        }
        if self.fields.is_empty() && !surrogate {
            return Err(error("a model needs at least one column".into()));
        }
        if self.table_name.is_empty() {
            return Err(error("the table name is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldType, Primitive};

    fn user_fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("name", FieldType::Value(Primitive::Text)),
            FieldDef::new("email", FieldType::Nullable(Primitive::Text)),
        ]
    }

    #[test]
    fn table_name_precedence() {
        let d = ModelDescriptor::new("UserProfile", user_fields());
        assert_eq!(d.table_name(), "userprofile");
        let d = ModelDescriptor::new("User", user_fields()).with_table(None, Some("people"));
        assert_eq!(d.table_name(), "people");
        let d = ModelDescriptor::new("User", user_fields())
            .with_table(Some("users"), Some("people"));
        assert_eq!(d.table_name(), "users");
    }

    #[test]
    fn implicit_surrogate_key() {
        let d = ModelDescriptor::new("User", user_fields());
        assert!(d.has_surrogate_key());
        assert_eq!(d.select_columns(), ["id", "name", "email"]);
        assert!(d.is_filterable("id"));
        assert!(!d.is_filterable("age"));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn declared_key_is_not_surrogate() {
        let d = ModelDescriptor::new("User", user_fields()).with_primary_key(Some("email"));
        assert!(!d.has_surrogate_key());
        assert_eq!(d.select_columns(), ["name", "email"]);
        assert_eq!(d.non_key_fields().map(|f| f.name).collect::<Vec<_>>(), ["name"]);
        assert_eq!(d.primary_key_storage(), Some(StorageType::Text));
    }

    #[test]
    fn primary_key_must_be_declared() {
        let d = ModelDescriptor::new("User", user_fields()).with_primary_key(Some("uuid"));
        let error = d.validate().unwrap_err();
        assert!(error.is_precondition());
        assert!(error.to_string().contains("uuid"));
    }

    #[test]
    fn unique_columns_must_be_declared() {
        let d = ModelDescriptor::new("User", user_fields()).with_unique(["email", "phone"]);
        let error = d.validate().unwrap_err();
        assert!(error.to_string().contains("phone"));
        let d = ModelDescriptor::new("User", user_fields()).with_unique(["id", "name"]);
        assert!(d.validate().is_ok());
        let d = ModelDescriptor::new("User", user_fields())
            .with_primary_key(None)
            .with_unique(["id"]);
        assert!(d.validate().is_err());
    }

    #[test]
    fn duplicated_fields() {
        let mut fields = user_fields();
        fields.push(FieldDef::new("name", FieldType::Value(Primitive::Text)));
        assert!(ModelDescriptor::new("User", fields).validate().is_err());
    }
}
