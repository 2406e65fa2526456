//! Declarative form schemas
//!
//! A [`FormSchema`] is an ordered list of [`FieldSpec`]s. Values are edited as
//! raw strings and only converted into typed JSON when the whole form passes
//! validation.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::validation::check_field;
use crate::error::{FieldErrors, InterEdError, Result};

/// Raw, user-entered form values keyed by field name
pub type FormValues = BTreeMap<String, String>;

/// Value kind of a form field, deciding how raw input is parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Integer,
    Number,
    Boolean,
    /// One of a fixed set of canonical values
    Choice(&'static [&'static str]),
    /// Id of a record in a sibling collection
    Reference,
    /// ISO calendar date, `YYYY-MM-DD`
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<&'static str>,
    /// Inclusive bounds for numeric kinds
    pub range: Option<(f64, f64)>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: None,
            range: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn boolean(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub fn choice(
        name: &'static str,
        label: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice(values))
    }

    pub fn reference(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Reference)
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.range = Some((min.into(), max.into()));
        self
    }
}

/// Ordered field list for one entity's create/edit dialog
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    entity: &'static str,
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reject a field name the schema does not declare
    pub fn ensure_field(&self, name: &str) -> Result<&FieldSpec> {
        self.get(name).ok_or_else(|| InterEdError::UnknownField {
            entity: self.entity,
            field: name.to_string(),
        })
    }

    /// Initial values of a blank form
    pub fn defaults(&self) -> FormValues {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.unwrap_or_default().to_string()))
            .collect()
    }

    /// Validate one field's raw value, returning its message on failure
    pub fn validate_field(&self, name: &str, raw: &str) -> Result<Option<String>> {
        let spec = self.ensure_field(name)?;
        Ok(check_field(spec, raw).err())
    }

    /// Validate every field and build the request payload.
    ///
    /// Empty optional fields are sent as `null`. All failures are collected,
    /// not just the first.
    pub fn validate(&self, values: &FormValues) -> std::result::Result<Map<String, Value>, FieldErrors> {
        self.validate_retaining(values, &FormValues::new())
    }

    /// Like [`validate`], but a choice field still holding its `retained`
    /// value is sent as-is even when that value is outside the vocabulary.
    ///
    /// Edit forms pass the values they were prefilled with, so a record the
    /// server returned with an unrecognized stage or status can still be
    /// updated without touching that field.
    ///
    /// [`validate`]: FormSchema::validate
    pub fn validate_retaining(
        &self,
        values: &FormValues,
        retained: &FormValues,
    ) -> std::result::Result<Map<String, Value>, FieldErrors> {
        let mut payload = Map::new();
        let mut errors = FieldErrors::new();

        for spec in &self.fields {
            let raw = values.get(spec.name).map(String::as_str).unwrap_or_default();
            match check_field(spec, raw) {
                Ok(value) => {
                    payload.insert(spec.name.to_string(), value);
                }
                Err(_)
                    if matches!(spec.kind, FieldKind::Choice(_))
                        && !raw.trim().is_empty()
                        && retained.get(spec.name).map(String::as_str) == Some(raw) =>
                {
                    payload.insert(spec.name.to_string(), Value::String(raw.trim().to_string()));
                }
                Err(message) => {
                    errors.insert(spec.name.to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }

    /// Extract form values from a serialized record
    pub fn values_from(&self, record: &Value) -> FormValues {
        self.fields
            .iter()
            .map(|f| {
                let raw = match record.get(f.name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                (f.name.to_string(), raw)
            })
            .collect()
    }
}
