//! Per-field validation rules.
//!
//! Each rule turns a raw string into the JSON value sent to the API, or a
//! human-readable message naming the field by its label.

use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;
use serde_json::Value;

use super::schema::{FieldKind, FieldSpec};
use crate::types::EntityId;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for free-text fields (in characters).
pub const MAX_TEXT_LENGTH: usize = 500;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should be valid")
});

// ============================================================================
// Field checks
// ============================================================================

/// Check one field and convert it to its payload value.
///
/// Input is trimmed first. An empty optional field becomes `null`.
pub fn check_field(spec: &FieldSpec, raw: &str) -> Result<Value, String> {
    let value = raw.trim();
    if value.is_empty() {
        return if spec.required {
            Err(format!("{} is required", spec.label))
        } else {
            Ok(Value::Null)
        };
    }

    match spec.kind {
        FieldKind::Text => check_text(spec, value),
        FieldKind::Email => check_email(spec, value),
        FieldKind::Integer => check_integer(spec, value),
        FieldKind::Number => check_number(spec, value),
        FieldKind::Boolean => check_boolean(spec, value),
        FieldKind::Choice(values) => check_choice(spec, values, value),
        FieldKind::Reference => value
            .parse::<EntityId>()
            .map(|id| Value::from(id.get()))
            .map_err(|_| format!("{} must be a valid id", spec.label)),
        FieldKind::Date => value
            .parse::<Date>()
            .map(|d| Value::String(d.to_string()))
            .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", spec.label)),
    }
}

fn check_text(spec: &FieldSpec, value: &str) -> Result<Value, String> {
    let len = value.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(format!(
            "{} must be at most {MAX_TEXT_LENGTH} characters (got {len})",
            spec.label
        ));
    }
    if value.chars().any(is_disallowed_control) {
        return Err(format!("{} must not contain control characters", spec.label));
    }
    Ok(Value::String(value.to_string()))
}

/// Control characters other than line breaks and tabs
fn is_disallowed_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\n' | '\r' | '\t')
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn check_email(spec: &FieldSpec, value: &str) -> Result<Value, String> {
    if is_valid_email(value) {
        Ok(Value::String(value.to_string()))
    } else {
        Err(format!("{} must be a valid email address", spec.label))
    }
}

fn check_range(spec: &FieldSpec, n: f64) -> Result<(), String> {
    match spec.range {
        Some((min, max)) if n < min || n > max => Err(format!(
            "{} must be between {min} and {max}",
            spec.label
        )),
        _ => Ok(()),
    }
}

fn check_integer(spec: &FieldSpec, value: &str) -> Result<Value, String> {
    let n = value
        .parse::<i64>()
        .map_err(|_| format!("{} must be a whole number", spec.label))?;
    check_range(spec, n as f64)?;
    Ok(Value::from(n))
}

fn check_number(spec: &FieldSpec, value: &str) -> Result<Value, String> {
    let n = value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("{} must be a number", spec.label))?;
    check_range(spec, n)?;
    Ok(Value::from(n))
}

fn check_boolean(spec: &FieldSpec, value: &str) -> Result<Value, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "0" => Ok(Value::Bool(false)),
        _ => Err(format!("{} must be true or false", spec.label)),
    }
}

fn check_choice(spec: &FieldSpec, values: &[&str], value: &str) -> Result<Value, String> {
    let lower = value.to_lowercase();
    values
        .iter()
        .find(|v| **v == lower)
        .map(|v| Value::String((*v).to_string()))
        .ok_or_else(|| format!("{} must be one of: {}", spec.label, values.join(", ")))
}
