//! Coerced field values handed back to target types

use std::any::{type_name, Any};
use std::fmt;

use time::PrimitiveDateTime;

use crate::error::{Error, ErrorKind, Result, Span};

/// A coerced value, or the explicit absence of one
#[derive(Default)]
pub enum FieldValue {
    /// Source not present in the document
    #[default]
    Absent,
    Text(String),
    Integer(i64),
    Double(f64),
    Bool(bool),
    DateTime(PrimitiveDateTime),
    Object(Box<dyn Any>),
    List(Vec<Box<dyn Any>>),
}

impl FieldValue {
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    const fn variant(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::DateTime(_) => "date-time",
            Self::Object(_) => "object",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Self::Double(n) => f.debug_tuple("Double").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::DateTime(dt) => f.debug_tuple("DateTime").field(dt).finish(),
            Self::List(items) => write!(f, "List(len={})", items.len()),
            other => f.write_str(other.variant()),
        }
    }
}

/// One bound field's name together with its coerced value
///
/// Target types match on [`Field::name`] and pick the accessor that fits the
/// Rust type of the field. Absent values turn into `None`, an empty `Vec`, or
/// the type's default depending on the accessor.
#[derive(Debug)]
pub struct Field {
    name: &'static str,
    value: FieldValue,
}

impl Field {
    pub const fn new(name: &'static str, value: FieldValue) -> Self {
        Self { name, value }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn into_value(self) -> FieldValue {
        self.value
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::with_message(
            ErrorKind::FieldTypeMismatch {
                field: self.name,
                expected,
            },
            Span::empty(),
            format!(
                "field `{}` is not bound as {expected} (got {})",
                self.name,
                self.value.variant()
            ),
        )
    }

    /// Error for a field name the target type does not declare
    pub fn undeclared<T: 'static>(&self) -> Error {
        Error::mapping(ErrorKind::UndeclaredField {
            type_name: type_name::<T>(),
            field: self.name,
        })
    }

    pub fn into_optional_string(self) -> Result<Option<String>> {
        match self.value {
            FieldValue::Absent => Ok(None),
            FieldValue::Text(text) => Ok(Some(text)),
            _ => Err(self.mismatch("string")),
        }
    }

    /// Text of a required binding; absent only if the binding is optional
    pub fn into_string(self) -> Result<String> {
        self.into_optional_string().map(Option::unwrap_or_default)
    }

    pub fn into_optional_int<N: TryFrom<i64>>(self) -> Result<Option<N>> {
        match self.value {
            FieldValue::Absent => Ok(None),
            FieldValue::Integer(n) => N::try_from(n).map(Some).map_err(|_| {
                Error::mapping(ErrorKind::TypeCoercion {
                    field: self.name,
                    raw: n.to_string(),
                    expected: type_name::<N>(),
                })
            }),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Integer for a primitive field, where absence and zero are the same
    pub fn into_int_or_default<N: TryFrom<i64> + Default>(self) -> Result<N> {
        self.into_optional_int().map(Option::unwrap_or_default)
    }

    pub fn into_optional_f64(self) -> Result<Option<f64>> {
        match self.value {
            FieldValue::Absent => Ok(None),
            FieldValue::Double(n) => Ok(Some(n)),
            _ => Err(self.mismatch("double")),
        }
    }

    pub fn into_f64_or_default(self) -> Result<f64> {
        self.into_optional_f64().map(Option::unwrap_or_default)
    }

    pub fn into_bool(self) -> Result<bool> {
        match self.value {
            FieldValue::Absent => Ok(false),
            FieldValue::Bool(b) => Ok(b),
            _ => Err(self.mismatch("flag")),
        }
    }

    pub fn into_optional_date_time(self) -> Result<Option<PrimitiveDateTime>> {
        match self.value {
            FieldValue::Absent => Ok(None),
            FieldValue::DateTime(dt) => Ok(Some(dt)),
            _ => Err(self.mismatch("date-time")),
        }
    }

    pub fn into_optional_object<T: 'static>(self) -> Result<Option<T>> {
        match self.value {
            FieldValue::Absent => Ok(None),
            FieldValue::Object(object) => object
                .downcast::<T>()
                .map(|object| Some(*object))
                .map_err(|_| Error::mapping(ErrorKind::FieldTypeMismatch {
                    field: self.name,
                    expected: type_name::<T>(),
                })),
            _ => Err(self.mismatch("nested object")),
        }
    }

    pub fn into_list<T: 'static>(self) -> Result<Vec<T>> {
        let name = self.name;
        match self.value {
            FieldValue::Absent => Ok(Vec::new()),
            FieldValue::List(items) => items
                .into_iter()
                .map(|item| {
                    item.downcast::<T>().map(|item| *item).map_err(|_| {
                        Error::mapping(ErrorKind::FieldTypeMismatch {
                            field: name,
                            expected: type_name::<T>(),
                        })
                    })
                })
                .collect(),
            _ => Err(self.mismatch("list")),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_absent_maps_to_empty_targets() {
        assert_eq!(Field::new("a", FieldValue::Absent).into_optional_string(), Ok(None));
        assert_eq!(Field::new("a", FieldValue::Absent).into_int_or_default::<i32>(), Ok(0));
        assert_eq!(Field::new("a", FieldValue::Absent).into_optional_int::<i64>(), Ok(None));
        assert_eq!(Field::new("a", FieldValue::Absent).into_bool(), Ok(false));
        assert_eq!(Field::new("a", FieldValue::Absent).into_list::<u8>(), Ok(Vec::new()));
    }

    #[test]
    fn test_present_zero_differs_from_absent() {
        let zero = Field::new("subscription", FieldValue::Integer(0));
        assert_eq!(zero.into_optional_int::<i64>(), Ok(Some(0)));
    }

    #[test]
    fn test_integer_out_of_range_is_coercion_error() {
        let field = Field::new("estimate", FieldValue::Integer(i64::MAX));
        let err = field.into_int_or_default::<i32>().unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeCoercion { field: "estimate", .. }
        ));
    }

    #[test]
    fn test_wrong_accessor_is_mismatch() {
        let field = Field::new("url", FieldValue::Text("x".to_string()));
        let err = field.into_optional_f64().unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::FieldTypeMismatch {
                field: "url",
                expected: "double"
            }
        );
        assert!(err.message().contains("got text"));
    }

    #[test]
    fn test_date_time_accessor() {
        let dt = datetime!(2008-02-27 16:49:48);
        let field = Field::new("time", FieldValue::DateTime(dt));
        assert_eq!(field.into_optional_date_time(), Ok(Some(dt)));
    }

    #[test]
    fn test_object_and_list_downcast() {
        let object = Field::new("credits", FieldValue::Object(Box::new(7_u8)));
        assert_eq!(object.into_optional_object::<u8>(), Ok(Some(7)));

        let items: Vec<Box<dyn Any>> = vec![Box::new(1_u8), Box::new(2_u8)];
        let list = Field::new("jobs", FieldValue::List(items));
        assert_eq!(list.into_list::<u8>(), Ok(vec![1, 2]));

        let wrong = Field::new("credits", FieldValue::Object(Box::new(7_u8)));
        assert!(wrong.into_optional_object::<String>().is_err());
    }
}
