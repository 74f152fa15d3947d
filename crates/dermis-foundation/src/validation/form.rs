//! Whole-form validation
//!
//! Applies a [`FormSchema`] to a JSON record. Only fields named in the schema
//! are looked at; extra fields in the data are ignored.

use dermis_kernel::config::{FieldSpecConfig, FormSchemaSpec};
use dermis_kernel::error::SecurityResult;
use dermis_kernel::security::{FormValidationResult, NamedPattern, ValidationResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use super::patterns::validate_json;
use super::rules::{validate_with_rules, ValidationRules};

/// How one schema field is validated.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Pattern(NamedPattern),
    Rules(ValidationRules),
}

impl From<NamedPattern> for FieldSpec {
    fn from(pattern: NamedPattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<ValidationRules> for FieldSpec {
    fn from(rules: ValidationRules) -> Self {
        Self::Rules(rules)
    }
}

/// Field name -> validation spec.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: HashMap<String, FieldSpec>,
}

impl FormSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }

    /// Look up a field's spec.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a schema from its configuration form, compiling rule patterns.
    pub fn from_spec(spec: &FormSchemaSpec) -> SecurityResult<Self> {
        let mut fields = HashMap::with_capacity(spec.len());
        for (name, entry) in spec {
            let field = match entry {
                FieldSpecConfig::Pattern(pattern) => FieldSpec::Pattern(*pattern),
                FieldSpecConfig::Rules(rules) => {
                    FieldSpec::Rules(ValidationRules::from_spec(name, rules)?)
                }
            };
            fields.insert(name.clone(), field);
        }
        Ok(Self { fields })
    }
}

fn validate_field(value: Option<&Value>, spec: &FieldSpec) -> ValidationResult {
    match spec {
        FieldSpec::Pattern(pattern) => validate_json(value, *pattern),
        FieldSpec::Rules(rules) => match value {
            None | Some(Value::Null) => validate_with_rules(None, rules),
            Some(Value::String(s)) => validate_with_rules(Some(s), rules),
            Some(_) => ValidationResult::invalid("Invalid format"),
        },
    }
}

/// Validate every schema field of `data`, collecting the failures.
pub fn validate_form(data: &Map<String, Value>, schema: &FormSchema) -> FormValidationResult {
    let mut errors = HashMap::new();

    for (name, spec) in &schema.fields {
        let result = validate_field(data.get(name), spec);
        if let Some(message) = result.error {
            errors.insert(name.clone(), message);
        } else if !result.valid {
            errors.insert(name.clone(), "Invalid value".to_string());
        }
    }

    if !errors.is_empty() {
        debug!(failed = errors.len(), fields = schema.len(), "form validation failed");
    }

    FormValidationResult::from_errors(errors)
}

/// Like [`validate_form`] for an arbitrary JSON value. Anything other than an
/// object is validated as an empty record.
pub fn validate_form_value(data: &Value, schema: &FormSchema) -> FormValidationResult {
    match data.as_object() {
        Some(map) => validate_form(map, schema),
        None => validate_form(&Map::new(), schema),
    }
}

// =============================================================================
// Tests
// =============================================================================
