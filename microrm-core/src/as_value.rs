use crate::{FieldType, Primitive, Value};
use anyhow::{Error, Result};
use std::{any, fmt::Display};

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// used for statement parameters and row decoding.
///
/// `FIELD_TYPE` is the declared type the schema inference works from, so every
/// type usable as a record field must implement this trait. Custom types pick
/// the primitive they are stored as; `Primitive::Other` falls back to text.
///
/// # Conversion contract
/// - `try_from_value` accepts the canonical variant for the type.
/// - Integers also accept any other integer variant, range checked: the
///   storage engine hands back every integer as `Int64`.
/// - `bool` accepts the integers `0` and `1`, floats accept integers.
/// - Errors name both the offending value and the target type.
///
/// ```rust
/// use microrm_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i32 = AsValue::try_from_value(Value::Int64(Some(42))).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Declared type used by the schema inference.
    const FIELD_TYPE: FieldType;
    /// Typed null for this type.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} to {}",
        value,
        any::type_name::<T>()
    ))
}

fn integer_in_range<S, T>(v: T) -> Result<S>
where
    S: TryFrom<T>,
    T: Display + Copy,
{
    S::try_from(v).map_err(|_| {
        Error::msg(format!(
            "Value {} is out of range for {}",
            v,
            any::type_name::<S>()
        ))
    })
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $primitive:expr $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            const FIELD_TYPE: FieldType = FieldType::Value($primitive);
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    $(
                        #[allow(unreachable_patterns)]
                        $pat_rest => $expr_rest,
                    )*
                    _ => Err(conversion_error::<Self>(&value)),
                }
            }
        }
    };
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl_as_value!(
            $source,
            $destination,
            Primitive::Integer,
            Value::Int8(Some(v)) => integer_in_range(v),
            Value::Int16(Some(v)) => integer_in_range(v),
            Value::Int32(Some(v)) => integer_in_range(v),
            Value::Int64(Some(v)) => integer_in_range(v),
            Value::UInt8(Some(v)) => integer_in_range(v),
            Value::UInt16(Some(v)) => integer_in_range(v),
            Value::UInt32(Some(v)) => integer_in_range(v),
        );
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value!(
    bool,
    Value::Boolean,
    Primitive::Boolean,
    Value::Int64(Some(0)) | Value::Int32(Some(0)) => Ok(false),
    Value::Int64(Some(1)) | Value::Int32(Some(1)) => Ok(true),
);
impl_as_value!(
    f32,
    Value::Float32,
    Primitive::Float,
    Value::Float64(Some(v)) => Ok(v as f32),
    Value::Int64(Some(v)) => Ok(v as f32),
);
impl_as_value!(
    f64,
    Value::Float64,
    Primitive::Float,
    Value::Float32(Some(v)) => Ok(v as f64),
    Value::Int64(Some(v)) => Ok(v as f64),
);
impl_as_value!(String, Value::Varchar, Primitive::Text);
impl_as_value!(Box<[u8]>, Value::Blob, Primitive::Bytes);

impl AsValue for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Value(Primitive::Bytes);
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            _ => Err(conversion_error::<Self>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE.nullable();
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
}
