use crate::{Criteria, ModelDescriptor, SURROGATE_KEY, StorageType, separated_by};
use std::fmt::Write;

/// Dialect printer turning a model description into SQL text.
///
/// Only identifiers coming from the [`ModelDescriptor`] are ever written into
/// the statement, every value is a `?` placeholder bound by the driver.
/// Statements are written on a single line without a trailing semicolon.
pub trait SqlWriter {
    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', "\"\"");
        out.push('"');
    }

    /// Whether `value` can be written without quotes.
    fn is_plain_identifier(&self, value: &str) -> bool {
        is_identifier_shaped(value)
    }

    fn write_identifier(&self, out: &mut String, value: &str) {
        if self.is_plain_identifier(value) {
            out.push_str(value);
        } else {
            self.write_identifier_quoted(out, value);
        }
    }

    fn write_placeholder(&self, out: &mut String) {
        out.push('?');
    }

    fn write_column_type(&self, out: &mut String, value: StorageType) {
        out.push_str(value.as_str());
    }

    /// Primary key qualifier, auto incrementing for integer keys.
    fn write_primary_key_qualifier(&self, out: &mut String, value: StorageType) {
        out.push_str(match value {
            StorageType::Integer => " PRIMARY KEY AUTOINCREMENT",
            _ => " PRIMARY KEY",
        });
    }

    fn write_create_table_column(
        &self,
        out: &mut String,
        name: &str,
        storage: StorageType,
        primary_key: bool,
    ) {
        self.write_identifier(out, name);
        out.push(' ');
        self.write_column_type(out, storage);
        if primary_key {
            self.write_primary_key_qualifier(out, storage);
        }
    }

    /// Emit CREATE TABLE statement.
    ///
    /// Columns: the surrogate key (if any), then every declared field in
    /// declaration order, then the composite `UNIQUE` clause.
    fn write_create_table(&self, out: &mut String, model: &ModelDescriptor, if_not_exists: bool) {
        out.reserve(64 + model.fields().len() * 32 + model.unique().len() * 16);
        out.push_str("CREATE TABLE ");
        if if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_identifier(out, model.table_name());
        out.push_str(" (");
        let mut len = out.len();
        if model.has_surrogate_key() {
            self.write_create_table_column(out, SURROGATE_KEY, StorageType::Integer, true);
        }
        for field in model.fields() {
            if out.len() > len {
                out.push_str(", ");
            }
            len = out.len();
            self.write_create_table_column(
                out,
                field.name,
                field.storage_type(),
                model.primary_key() == Some(field.name),
            );
        }
        if !model.unique().is_empty() {
            out.push_str(", UNIQUE (");
            separated_by(
                out,
                model.unique(),
                |out, v| self.write_identifier(out, v),
                ", ",
            );
            out.push(')');
        }
        out.push(')');
    }

    /// Emit INSERT statement, with `ON CONFLICT (..) DO NOTHING` when
    /// `on_conflict` lists columns.
    fn write_insert(
        &self,
        out: &mut String,
        model: &ModelDescriptor,
        columns: &[&str],
        on_conflict: &[&str],
    ) {
        out.reserve(64 + columns.len() * 24 + on_conflict.len() * 16);
        out.push_str("INSERT INTO ");
        self.write_identifier(out, model.table_name());
        if columns.is_empty() {
            out.push_str(" DEFAULT VALUES");
        } else {
            out.push_str(" (");
            separated_by(out, columns, |out, v| self.write_identifier(out, v), ", ");
            out.push_str(") VALUES (");
            separated_by(out, columns, |out, _| self.write_placeholder(out), ", ");
            out.push(')');
        }
        if !on_conflict.is_empty() {
            out.push_str(" ON CONFLICT (");
            separated_by(
                out,
                on_conflict,
                |out, v| self.write_identifier(out, v),
                ", ",
            );
            out.push_str(") DO NOTHING");
        }
    }

    /// Emit UPDATE statement keyed on `key`.
    fn write_update(&self, out: &mut String, model: &ModelDescriptor, columns: &[&str], key: &str) {
        out.reserve(64 + columns.len() * 24);
        out.push_str("UPDATE ");
        self.write_identifier(out, model.table_name());
        out.push_str(" SET ");
        separated_by(
            out,
            columns,
            |out, v| {
                self.write_identifier(out, v);
                out.push_str(" = ");
                self.write_placeholder(out);
            },
            ", ",
        );
        out.push_str(" WHERE ");
        self.write_identifier(out, key);
        out.push_str(" = ");
        self.write_placeholder(out);
    }

    /// Emit SELECT statement reading [`ModelDescriptor::select_columns`].
    fn write_select(
        &self,
        out: &mut String,
        model: &ModelDescriptor,
        criteria: &Criteria,
        limit: Option<u32>,
    ) {
        let columns = model.select_columns();
        out.reserve(64 + columns.len() * 16 + criteria.len() * 24);
        out.push_str("SELECT ");
        separated_by(
            out,
            columns.iter(),
            |out, v| self.write_identifier(out, v),
            ", ",
        );
        out.push_str(" FROM ");
        self.write_identifier(out, model.table_name());
        if !criteria.is_empty() {
            out.push_str(" WHERE ");
            separated_by(
                out,
                criteria.iter(),
                |out, (column, value)| {
                    self.write_identifier(out, column);
                    if value.is_null() {
                        out.push_str(" IS NULL");
                    } else {
                        out.push_str(" = ");
                        self.write_placeholder(out);
                    }
                },
                " AND ",
            );
        }
        if let Some(limit) = limit {
            let _ = write!(out, " LIMIT {}", limit);
        }
    }
}

/// ASCII letter or `_`, followed by ASCII alphanumerics or `_`.
pub fn is_identifier_shaped(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fallback writer using the default dialect.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}

#[cfg(test)]
mod tests {
    use super::{GenericSqlWriter, SqlWriter, is_identifier_shaped};
    use crate::{Criteria, FieldDef, FieldType, ModelDescriptor, Primitive};

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn user() -> ModelDescriptor {
        ModelDescriptor::new(
            "User",
            [
                FieldDef::new("name", FieldType::Value(Primitive::Text)),
                FieldDef::new("email", FieldType::Nullable(Primitive::Text)),
            ],
        )
    }

    #[test]
    fn create_table_with_surrogate_key() {
        let mut query = String::new();
        WRITER.write_create_table(&mut query, &user(), true);
        assert_eq!(
            query,
            "CREATE TABLE IF NOT EXISTS user (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, email TEXT)"
        );
    }

    #[test]
    fn create_table_with_declared_text_key_and_unique() {
        let model = ModelDescriptor::new(
            "Account",
            [
                FieldDef::new("handle", FieldType::Value(Primitive::Text)),
                FieldDef::new("score", FieldType::Nullable(Primitive::Float)),
                FieldDef::new("avatar", FieldType::Nullable(Primitive::Bytes)),
                FieldDef::new("active", FieldType::Value(Primitive::Boolean)),
            ],
        )
        .with_table(Some("accounts"), None)
        .with_primary_key(Some("handle"))
        .with_unique(["score", "active"]);
        let mut query = String::new();
        WRITER.write_create_table(&mut query, &model, false);
        assert_eq!(
            query,
            "CREATE TABLE accounts (handle TEXT PRIMARY KEY, score REAL, avatar BLOB, active INTEGER, UNIQUE (score, active))"
        );
    }

    #[test]
    fn create_table_without_key() {
        let model = ModelDescriptor::new(
            "Event",
            [FieldDef::new("kind", FieldType::Value(Primitive::Enum))],
        )
        .with_primary_key(None);
        let mut query = String::new();
        WRITER.write_create_table(&mut query, &model, true);
        assert_eq!(query, "CREATE TABLE IF NOT EXISTS event (kind TEXT)");
    }

    #[test]
    fn identifiers_are_quoted_when_needed() {
        let model = ModelDescriptor::new(
            "Odd",
            [FieldDef::new("my \"col\"", FieldType::Value(Primitive::Integer))],
        )
        .with_table(Some("odd table"), None)
        .with_primary_key(None);
        let mut query = String::new();
        WRITER.write_create_table(&mut query, &model, false);
        assert_eq!(query, r#"CREATE TABLE "odd table" ("my ""col""" INTEGER)"#);
    }

    #[test]
    fn insert_update_select() {
        let model = user();
        let mut query = String::new();
        WRITER.write_insert(&mut query, &model, &["name", "email"], &[]);
        assert_eq!(query, "INSERT INTO user (name, email) VALUES (?, ?)");

        query.clear();
        WRITER.write_insert(&mut query, &model, &["name", "email", "id"], &["email"]);
        assert_eq!(
            query,
            "INSERT INTO user (name, email, id) VALUES (?, ?, ?) ON CONFLICT (email) DO NOTHING"
        );

        query.clear();
        WRITER.write_insert(&mut query, &model, &[], &[]);
        assert_eq!(query, "INSERT INTO user DEFAULT VALUES");

        query.clear();
        WRITER.write_update(&mut query, &model, &["name", "email"], "id");
        assert_eq!(query, "UPDATE user SET name = ?, email = ? WHERE id = ?");

        query.clear();
        let criteria = Criteria::new()
            .eq("name", "Alice")
            .eq("email", Option::<String>::None);
        WRITER.write_select(&mut query, &model, &criteria, Some(2));
        assert_eq!(
            query,
            "SELECT id, name, email FROM user WHERE name = ? AND email IS NULL LIMIT 2"
        );

        query.clear();
        WRITER.write_select(&mut query, &model, &Criteria::new(), None);
        assert_eq!(query, "SELECT id, name, email FROM user");
    }

    #[test]
    fn identifier_shape() {
        assert!(is_identifier_shaped("_user_2"));
        assert!(!is_identifier_shaped("2user"));
        assert!(!is_identifier_shaped("first name"));
        assert!(!is_identifier_shaped(""));
        let mut out = String::new();
        WRITER.write_identifier(&mut out, "order");
        out.push(' ');
        WRITER.write_identifier(&mut out, "se\"lect");
        assert_eq!(out, r#"order "se""lect""#);
    }
}
