//! Coercion of raw XML text into typed field values
//!
//! Every function takes the raw source as `Option<&str>`, where `None` means
//! the attribute or element is missing from the document.

use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::binding::ValueKind;
use crate::error::{Error, ErrorKind, Result};
use crate::value::FieldValue;

/// Coerce `raw` according to a scalar binding kind
///
/// Nested kinds are materialized by the caller, never coerced from text.
pub fn coerce(field: &'static str, kind: &ValueKind, raw: Option<&str>) -> Result<FieldValue> {
    match kind {
        ValueKind::String => Ok(string(raw)),
        ValueKind::Integer => integer(field, raw),
        ValueKind::Double => double(field, raw),
        ValueKind::Flag { sentinel } => Ok(flag(raw, sentinel)),
        ValueKind::DateTime => date_time(field, raw),
        ValueKind::Object(_) => Err(Error::mapping(ErrorKind::FieldTypeMismatch {
            field,
            expected: "scalar",
        })),
    }
}

pub fn string(raw: Option<&str>) -> FieldValue {
    raw.map_or(FieldValue::Absent, |text| FieldValue::Text(text.to_string()))
}

pub fn integer(field: &'static str, raw: Option<&str>) -> Result<FieldValue> {
    let Some(text) = present(raw) else {
        return Ok(FieldValue::Absent);
    };
    text.parse::<i64>()
        .map(FieldValue::Integer)
        .map_err(|_| coercion_error(field, text, "integer"))
}

pub fn double(field: &'static str, raw: Option<&str>) -> Result<FieldValue> {
    let Some(text) = present(raw) else {
        return Ok(FieldValue::Absent);
    };
    // f64::from_str also takes "inf" and "NaN"
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
    {
        return Err(coercion_error(field, text, "double"));
    }
    text.parse::<f64>()
        .map(FieldValue::Double)
        .map_err(|_| coercion_error(field, text, "double"))
}

pub fn flag(raw: Option<&str>, sentinel: &str) -> FieldValue {
    FieldValue::Bool(raw == Some(sentinel))
}

pub fn date_time(field: &'static str, raw: Option<&str>) -> Result<FieldValue> {
    let Some(text) = present(raw) else {
        return Ok(FieldValue::Absent);
    };
    parse_date_time(text)
        .map(FieldValue::DateTime)
        .ok_or_else(|| {
            Error::mapping(ErrorKind::DateFormat {
                field,
                raw: text.to_string(),
            })
        })
}

/// Parse `YYYY-MM-DD hh:mm:ss` (24-hour clock, no fraction, no offset)
pub fn parse_date_time(text: &str) -> Option<PrimitiveDateTime> {
    // `[year]` also takes a leading sign
    if !text.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let layout = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    PrimitiveDateTime::parse(text, &layout).ok()
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|text| !text.is_empty())
}

fn coercion_error(field: &'static str, raw: &str, expected: &'static str) -> Error {
    Error::mapping(ErrorKind::TypeCoercion {
        field,
        raw: raw.to_string(),
        expected,
    })
}
