//! Field-level checks for inbound trade payloads.
//!
//! A [`PayloadReader`] keeps reading after the first bad field so that the
//! caller gets every problem of a payload in one response.

use crate::error::{FieldError, ValidationErrors};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub struct PayloadReader<'a> {
    fields: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a Value) -> Result<Self, ValidationErrors> {
        match payload.as_object() {
            Some(fields) => Ok(Self {
                fields,
                errors: Vec::new(),
            }),
            None => Err(ValidationErrors::single("", "Expected a JSON object")),
        }
    }

    /// A required, non-blank string. Returned trimmed.
    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.fields.get(field) {
            None | Some(Value::Null) => self.reject(field, "Required"),
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.reject(field, "Must not be empty")
            }
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(_) => self.reject(field, "Expected string"),
        }
    }

    /// A required number strictly greater than zero.
    pub fn positive_number(&mut self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            None | Some(Value::Null) => self.reject(field, "Required"),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v > 0.0 => Some(v),
                Some(_) => self.reject(field, "Number must be greater than 0"),
                None => self.reject(field, "Expected number"),
            },
            Some(_) => self.reject(field, "Expected number"),
        }
    }

    /// A required price, rounded to cents. Values that round to zero are
    /// rejected.
    pub fn price(&mut self, field: &str) -> Option<f64> {
        let value = self.positive_number(field)?;
        match round2(value) {
            rounded if rounded > 0.0 => Some(rounded),
            _ => self.reject(field, "Number must be at least 0.01"),
        }
    }

    /// An optional RFC 3339 datetime, `now` when absent.
    pub fn datetime_or(&mut self, field: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Some(now),
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(_) => self.reject(field, "Invalid datetime"),
            },
            Some(_) => self.reject(field, "Expected datetime string"),
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }

    fn reject<T>(&mut self, field: &str, message: &str) -> Option<T> {
        self.errors.push(FieldError::new(field, message));
        None
    }
}

/// Rounds to cents, the precision prices are stored with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
