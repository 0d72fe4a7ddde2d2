use crate::{AsColumnName, AsValue, Error, ModelDescriptor, Result, Value};

/// Exact-match filter criteria, combined with `AND`.
///
/// Insertion order is kept so the generated SQL (and its parameter order) is
/// deterministic. Naming a column twice replaces the earlier value.
///
/// ```rust
/// use microrm_core::Criteria;
/// let criteria = Criteria::new().eq("name", "Alice").eq("active", true);
/// assert_eq!(criteria.len(), 2);
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Criteria {
    conditions: Vec<(String, Value)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl AsColumnName, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl AsColumnName, value: impl Into<Value>) -> &mut Self {
        let name = column.column_name();
        let value = value.into();
        match self.conditions.iter_mut().find(|(c, _)| c == name) {
            Some(existing) => existing.1 = value,
            None => self.conditions.push((name.to_string(), value)),
        }
        self
    }

    /// Shorthand for a typed value, useful when `Into<Value>` is ambiguous.
    pub fn eq_value<V: AsValue>(self, column: impl AsColumnName, value: V) -> Self {
        self.eq(column, value.as_value())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Values bound to placeholders. Null conditions render as `IS NULL` and
    /// take no parameter.
    pub fn bindings(&self) -> impl Iterator<Item = &Value> {
        self.conditions
            .iter()
            .map(|(_, v)| v)
            .filter(|v| !v.is_null())
    }

    /// Reject columns that are neither declared fields nor the primary key.
    pub fn validate(&self, descriptor: &ModelDescriptor) -> Result<()> {
        match self
            .conditions
            .iter()
            .find(|(c, _)| !descriptor.is_filterable(c))
        {
            Some((column, _)) => Err(Error::UnknownField {
                model: descriptor.type_name(),
                field: column.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl<C: AsColumnName, V: Into<Value>> FromIterator<(C, V)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        let mut result = Criteria::new();
        for (c, v) in iter {
            result.push(c, v);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::Criteria;
    use crate::{ColumnRef, FieldDef, FieldType, ModelDescriptor, Primitive, Value};

    #[test]
    fn later_values_replace_earlier_ones() {
        let criteria = Criteria::new()
            .eq("name", "Alice")
            .eq("email", Option::<String>::None)
            .eq(ColumnRef::new("name", "User"), "Bob");
        let conditions = criteria.iter().collect::<Vec<_>>();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0], ("name", &Value::Varchar(Some("Bob".into()))));
        assert_eq!(criteria.bindings().count(), 1);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let descriptor = ModelDescriptor::new(
            "User",
            [FieldDef::new("name", FieldType::Value(Primitive::Text))],
        );
        assert!(Criteria::new().eq("id", 1i64).validate(&descriptor).is_ok());
        let error = Criteria::new()
            .eq("name", "x")
            .eq("nickname", "y")
            .validate(&descriptor)
            .unwrap_err();
        assert!(error.is_precondition());
        assert!(error.to_string().contains("nickname"));
    }

    #[test]
    fn typed_values() {
        let criteria = Criteria::new()
            .eq_value("count", 3u8)
            .eq_value("note", Option::<String>::None);
        let conditions = criteria.iter().collect::<Vec<_>>();
        assert_eq!(conditions[0], ("count", &Value::UInt8(Some(3))));
        assert!(matches!(conditions[1].1, Value::Varchar(None)));
        assert_eq!(criteria.bindings().collect::<Vec<_>>(), [&Value::UInt8(Some(3))]);
    }
}
