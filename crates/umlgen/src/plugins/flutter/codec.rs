//! Reference codec for generated client models
//!
//! Encodes and decodes a [`ModelInstance`] the way the rendered Dart
//! `toJson`/`fromJson` pair does, field by field from the same
//! [`DartModel`]. Values the Dart side cannot represent (non-finite doubles,
//! years outside `0..=9999`, sub-microsecond timestamps) are rejected on
//! encode instead of being silently rounded.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::model::DartModel;
use crate::core::WireKind;

const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const ISO_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const ISO_PARSE: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    #[error("Field {field} is not declared on {model}")]
    UnknownField { model: String, field: String },

    #[error("Field {field} expects {expected:?}, got {found}")]
    TypeMismatch {
        field: String,
        expected: WireKind,
        found: String,
    },

    #[error("Field {field} is out of range: {reason}")]
    OutOfRange { field: String, reason: String },

    #[error("Expected a JSON object for {model}")]
    NotAnObject { model: String },
}

impl CodecError {
    fn mismatch(field: &str, expected: WireKind, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }

    fn out_of_range(field: &str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// A non-null model field value
///
/// `Raw` carries pass-through types; a `Raw(Value::Null)` decodes back as an
/// absent field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Double(f64),
    Bool(bool),
    String(String),
    DateTime(NaiveDateTime),
    Raw(Value),
}

impl FieldValue {
    pub fn wire(&self) -> WireKind {
        match self {
            FieldValue::Int(_) => WireKind::Int,
            FieldValue::Double(_) => WireKind::Double,
            FieldValue::Bool(_) => WireKind::Bool,
            FieldValue::String(_) => WireKind::String,
            FieldValue::DateTime(_) => WireKind::DateTime,
            FieldValue::Raw(_) => WireKind::Passthrough,
        }
    }
}

/// Field values of one model object; a missing entry is `null`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelInstance {
    pub values: BTreeMap<String, FieldValue>,
}

impl ModelInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Dart `DateTime.toIso8601String` for a local timestamp
pub fn format_datetime(field: &str, value: &NaiveDateTime) -> Result<String, CodecError> {
    let year = value.date().format("%Y").to_string();
    if year.len() != 4 || year.starts_with('-') || year.starts_with('+') {
        return Err(CodecError::out_of_range(field, format!("year {}", year)));
    }
    let nanos = value.nanosecond();
    if nanos % 1_000 != 0 {
        return Err(CodecError::out_of_range(field, "sub-microsecond precision"));
    }
    let pattern = if nanos % 1_000_000 == 0 { ISO_MILLIS } else { ISO_MICROS };
    Ok(value.format(pattern).to_string())
}

/// Dart `DateTime.parse` for the forms the server and client produce
pub fn parse_datetime(field: &str, text: &str) -> Result<NaiveDateTime, CodecError> {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, ISO_PARSE) {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed.naive_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CodecError::mismatch(field, WireKind::DateTime, format!("\"{}\"", text)))
}

fn encode_value(field: &str, expected: WireKind, value: &FieldValue) -> Result<Value, CodecError> {
    if value.wire() != expected {
        return Err(CodecError::mismatch(field, expected, format!("{:?}", value.wire())));
    }
    Ok(match value {
        FieldValue::Int(n) => Value::from(*n),
        FieldValue::Double(x) => Number::from_f64(*x)
            .map(Value::Number)
            .ok_or_else(|| CodecError::out_of_range(field, format!("{} is not finite", x)))?,
        FieldValue::Bool(b) => Value::Bool(*b),
        FieldValue::String(s) => Value::String(s.clone()),
        FieldValue::DateTime(dt) => Value::String(format_datetime(field, dt)?),
        FieldValue::Raw(raw) => raw.clone(),
    })
}

fn decode_value(field: &str, kind: WireKind, value: &Value) -> Result<FieldValue, CodecError> {
    let mismatch = || CodecError::mismatch(field, kind, json_kind(value));
    match kind {
        WireKind::Int => value.as_i64().map(FieldValue::Int).ok_or_else(mismatch),
        WireKind::Double => value.as_f64().map(FieldValue::Double).ok_or_else(mismatch),
        WireKind::Bool => value.as_bool().map(FieldValue::Bool).ok_or_else(mismatch),
        WireKind::String => value
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(mismatch),
        WireKind::DateTime => {
            let text = value.as_str().ok_or_else(mismatch)?;
            parse_datetime(field, text).map(FieldValue::DateTime)
        }
        WireKind::Passthrough => Ok(FieldValue::Raw(value.clone())),
    }
}

/// Wire object for `instance`, keys in model field order
pub fn encode(model: &DartModel, instance: &ModelInstance) -> Result<Map<String, Value>, CodecError> {
    if let Some(unknown) = instance
        .values
        .keys()
        .find(|name| !model.fields.iter().any(|f| &f.name == *name))
    {
        return Err(CodecError::UnknownField {
            model: model.class_name.clone(),
            field: unknown.clone(),
        });
    }

    let mut out = Map::new();
    for field in &model.fields {
        let value = match instance.get(&field.name) {
            Some(value) => encode_value(&field.name, field.wire(), value)?,
            None => Value::Null,
        };
        out.insert(field.name.clone(), value);
    }
    Ok(out)
}

/// Model object from its wire form; missing and `null` keys stay absent,
/// unknown keys are ignored
pub fn decode(model: &DartModel, json: &Value) -> Result<ModelInstance, CodecError> {
    let object = json.as_object().ok_or_else(|| CodecError::NotAnObject {
        model: model.class_name.clone(),
    })?;

    let mut instance = ModelInstance::new();
    for field in &model.fields {
        match object.get(&field.name) {
            None | Some(Value::Null) => {}
            Some(value) => {
                let decoded = decode_value(&field.name, field.wire(), value)?;
                instance.values.insert(field.name.clone(), decoded);
            }
        }
    }
    Ok(instance)
}
