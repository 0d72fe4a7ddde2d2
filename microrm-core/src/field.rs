/// Primitive kinds a record field can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Boolean,
    Float,
    Bytes,
    Text,
    /// Enumerated value stored through its textual representation.
    Enum,
    /// Anything the mapping does not know, stored as text.
    Other,
}

/// Declared type of a field: a primitive, possibly wrapped as nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Value(Primitive),
    Nullable(Primitive),
}

impl FieldType {
    pub const fn nullable(self) -> Self {
        FieldType::Nullable(self.unwrap_nullable())
    }

    pub const fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Nullable(..))
    }

    /// Strip the nullable wrapper ("T or null" becomes T).
    pub const fn unwrap_nullable(self) -> Primitive {
        match self {
            FieldType::Value(v) | FieldType::Nullable(v) => v,
        }
    }

    pub const fn storage_type(self) -> StorageType {
        StorageType::from_primitive(self.unwrap_nullable())
    }
}

/// Column affinity used in the generated DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Integer,
    Real,
    Blob,
    Text,
}

impl StorageType {
    pub const fn from_primitive(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Integer | Primitive::Boolean => StorageType::Integer,
            Primitive::Float => StorageType::Real,
            Primitive::Bytes => StorageType::Blob,
            Primitive::Text | Primitive::Enum | Primitive::Other => StorageType::Text,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageType::Integer => "INTEGER",
            StorageType::Real => "REAL",
            StorageType::Blob => "BLOB",
            StorageType::Text => "TEXT",
        }
    }
}

/// One declared field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
}

impl FieldDef {
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self { name, field_type }
    }

    pub const fn storage_type(&self) -> StorageType {
        self.field_type.storage_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_is_unwrapped_before_mapping() {
        let email = FieldType::Nullable(Primitive::Text);
        assert_eq!(email.unwrap_nullable(), Primitive::Text);
        assert_eq!(email.storage_type(), StorageType::Text);
        assert_eq!(
            FieldType::Nullable(Primitive::Boolean).storage_type(),
            StorageType::Integer
        );
    }

    #[test]
    fn primitive_mapping() {
        use StorageType::*;
        let expected = [
            (Primitive::Integer, Integer),
            (Primitive::Boolean, Integer),
            (Primitive::Float, Real),
            (Primitive::Bytes, Blob),
            (Primitive::Text, Text),
            (Primitive::Enum, Text),
            (Primitive::Other, Text),
        ];
        for (primitive, storage) in expected {
            assert_eq!(StorageType::from_primitive(primitive), storage);
        }
    }

    #[test]
    fn nested_nullable_collapses() {
        let t = FieldType::Value(Primitive::Float).nullable().nullable();
        assert_eq!(t, FieldType::Nullable(Primitive::Float));
    }
}
