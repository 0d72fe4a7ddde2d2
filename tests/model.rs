#[cfg(test)]
mod tests {
    use microrm::{
        AsValue, ColumnRef, Criteria, FieldDef, FieldType, GenericSqlWriter, Model, Primitive,
        RowLabeled, SqlWriter, Value,
    };
    use std::sync::Arc;

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn create_table<M: Model>() -> String {
        let mut out = String::new();
        WRITER.write_create_table(&mut out, M::descriptor(), true);
        out
    }

    fn labeled(names: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            names.iter().map(|v| v.to_string()).collect::<Arc<[String]>>(),
            values.into(),
        )
    }

    #[test]
    fn surrogate_key() {
        #[derive(Model, Debug, PartialEq)]
        struct User {
            #[microrm(surrogate)]
            id: Option<i64>,
            name: String,
            email: String,
        }
        let descriptor = User::descriptor();
        assert_eq!(descriptor.type_name(), "User");
        assert_eq!(descriptor.table_name(), "user");
        assert_eq!(descriptor.primary_key(), Some("id"));
        assert!(descriptor.has_surrogate_key());
        assert_eq!(
            descriptor.fields(),
            [
                FieldDef::new("name", FieldType::Value(Primitive::Text)),
                FieldDef::new("email", FieldType::Value(Primitive::Text)),
            ]
        );
        assert_eq!(User::id, ColumnRef::new("id", "User"));
        assert_eq!(User::email.name, "email");
        assert_eq!(
            create_table::<User>(),
            "CREATE TABLE IF NOT EXISTS user (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, email TEXT)"
        );

        let mut user = User {
            id: None,
            name: "alice".into(),
            email: "alice@example.com".into(),
        };
        assert_eq!(
            user.row(),
            [
                Value::Varchar(Some("alice".into())),
                Value::Varchar(Some("alice@example.com".into())),
            ]
        );
        assert!(user.primary_key().is_null());
        user.set_primary_key(Value::Int64(Some(7))).unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.primary_key(), Value::Int64(Some(7)));
        assert!(user.set_primary_key("seven".into()).is_err());

        let loaded = User::from_row(labeled(
            &["email", "name"],
            vec!["bob@example.com".into(), "bob".into()],
        ))
        .unwrap();
        assert_eq!(
            loaded,
            User {
                id: None,
                name: "bob".into(),
                email: "bob@example.com".into(),
            }
        );
        assert!(User::from_row(labeled(&["name"], vec!["carol".into()])).is_err());
    }

    #[test]
    fn declared_key_and_unique() {
        #[derive(Model)]
        #[table_name("library_books")]
        #[microrm(pk = "isbn", unique("title", "edition"))]
        #[allow(dead_code)]
        struct Book {
            isbn: String,
            title: String,
            edition: u16,
            rating: Option<f64>,
            cover: Option<Vec<u8>>,
            available: Box<bool>,
        }
        let descriptor = Book::descriptor();
        assert_eq!(descriptor.table_name(), "library_books");
        assert_eq!(descriptor.primary_key(), Some("isbn"));
        assert_eq!(descriptor.unique(), ["title", "edition"]);
        assert!(!descriptor.has_surrogate_key());
        assert_eq!(
            descriptor.field("rating").map(|f| f.field_type),
            Some(FieldType::Nullable(Primitive::Float))
        );
        assert_eq!(
            create_table::<Book>(),
            "CREATE TABLE IF NOT EXISTS library_books (isbn TEXT PRIMARY KEY, title TEXT, edition INTEGER, rating REAL, cover BLOB, available INTEGER, UNIQUE (title, edition))"
        );
    }

    #[test]
    fn table_directive_and_no_key() {
        #[derive(Model)]
        #[table_name("ignored")]
        #[microrm(table = "log lines", pk = none, unique = "line")]
        #[allow(dead_code)]
        struct LogLine {
            line: String,
            r#type: Option<i32>,
        }
        let descriptor = LogLine::descriptor();
        assert_eq!(descriptor.table_name(), "log lines");
        assert_eq!(descriptor.primary_key(), None);
        assert_eq!(LogLine::r#type.name, "type");
        assert_eq!(
            create_table::<LogLine>(),
            "CREATE TABLE IF NOT EXISTS \"log lines\" (line TEXT, type INTEGER, UNIQUE (line))"
        );
        let line = LogLine {
            line: "started".into(),
            r#type: None,
        };
        assert_eq!(line.primary_key(), Value::Null);
    }

    #[test]
    fn implicit_key_without_field() {
        #[derive(Model, Debug)]
        struct Note {
            text: String,
        }
        let descriptor = Note::descriptor();
        assert_eq!(descriptor.primary_key(), Some("id"));
        assert_eq!(descriptor.select_columns(), ["id", "text"]);
        assert_eq!(
            create_table::<Note>(),
            "CREATE TABLE IF NOT EXISTS note (id INTEGER PRIMARY KEY AUTOINCREMENT, text TEXT)"
        );
        let mut note = Note {
            text: "hello".into(),
        };
        note.set_primary_key(Value::Int64(Some(1))).unwrap();
        assert!(note.primary_key().is_null());
    }

    #[test]
    fn text_enum() {
        #[derive(microrm::TextEnum, Debug, Clone, Copy, PartialEq)]
        enum Shade {
            Light,
            #[microrm(value = "dark-mode")]
            Dark,
        }
        assert_eq!(Shade::FIELD_TYPE, FieldType::Value(Primitive::Enum));
        assert_eq!(Shade::Light.as_value(), Value::Varchar(Some("Light".into())));
        assert_eq!(Shade::Dark.as_value(), Value::Varchar(Some("dark-mode".into())));
        assert_eq!(
            Shade::try_from_value(Value::Varchar(Some("dark-mode".into()))).unwrap(),
            Shade::Dark
        );
        assert!(Shade::try_from_value(Value::Varchar(Some("Dark".into()))).is_err());
        assert!(Shade::try_from_value(Value::Int64(Some(0))).is_err());
        assert_eq!(
            Option::<Shade>::FIELD_TYPE,
            FieldType::Nullable(Primitive::Enum)
        );
    }

    #[test]
    fn select_statement() {
        #[derive(Model)]
        #[allow(dead_code)]
        struct Purchase {
            #[microrm(surrogate)]
            id: Option<i64>,
            customer: String,
            note: Option<String>,
        }
        let mut out = String::new();
        WRITER.write_select(
            &mut out,
            Purchase::descriptor(),
            &Criteria::new()
                .eq(Purchase::customer, "alice")
                .eq(Purchase::note, Option::<String>::None),
            Some(2),
        );
        assert_eq!(
            out,
            "SELECT id, customer, note FROM purchase WHERE customer = ? AND note IS NULL LIMIT 2"
        );
    }
}
