//! Plan-time configuration checks
//!
//! [`validate_config`] checks a configuration object against its schema and
//! then runs each attribute's [`Validator`]s. Validators only see known,
//! non-null values.

use crate::schema::{AttributeType, Schema};
use crate::types::{AttributePath, Diagnostic, Diagnostics, Dynamic, DynamicValue};

pub trait Validator: Send + Sync {
    /// `attribute_path` names the attribute in messages
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics);
}

/// Restricts a string to a closed set, e.g. roles or desired states
pub struct OneOfValidator {
    pub allowed: Vec<String>,
}

impl OneOfValidator {
    pub fn new(allowed: &[&str]) -> Self {
        Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Validator for OneOfValidator {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        let Some(s) = value.as_string() else {
            return;
        };
        if !self.allowed.iter().any(|allowed| allowed == s) {
            diagnostics.add_error(
                format!("{} must be one of: {}", attribute_path, self.allowed.join(", ")),
                Some(format!("Got '{}'", s)),
            );
        }
    }
}

/// Bounds the number of list elements, inclusive
pub struct ListLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ListLengthValidator {
    pub fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

impl Validator for ListLengthValidator {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        let Some(items) = value.as_list() else {
            return;
        };
        let len = items.len();
        if let Some(min) = self.min.filter(|min| len < *min) {
            diagnostics.add_error(
                format!("{} must have at least {} items", attribute_path, min),
                Some(format!("Got {} items", len)),
            );
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            diagnostics.add_error(
                format!("{} must have at most {} items", attribute_path, max),
                Some(format!("Got {} items", len)),
            );
        }
    }
}

/// Validates a configuration object against a schema: required attributes are
/// present, no undeclared attributes appear, value types match and every
/// attribute validator passes. Unknown values are skipped.
pub fn validate_config(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let values = match &config.value {
        Dynamic::Map(values) => values,
        Dynamic::Null | Dynamic::Unknown => return diagnostics,
        other => {
            diagnostics.push(Diagnostic::error(
                "Invalid configuration",
                format!("expected an object, got {}", dynamic_type_name(other)),
            ));
            return diagnostics;
        }
    };

    for attr in &schema.attributes {
        let path = AttributePath::new(&attr.name);
        let value = values.get(&attr.name).unwrap_or(&Dynamic::Null);

        if attr.required && value.is_null() {
            diagnostics.push(
                Diagnostic::error(
                    format!("Missing required field: {}", attr.name),
                    format!("The field '{}' is required but was not provided", attr.name),
                )
                .with_attribute(path),
            );
            continue;
        }

        if !attr.optional && !attr.required && !value.is_absent() {
            diagnostics.push(
                Diagnostic::error(
                    format!("Cannot set computed field: {}", attr.name),
                    format!("The field '{}' is set by the server", attr.name),
                )
                .with_attribute(path),
            );
            continue;
        }

        if value.is_absent() {
            continue;
        }

        if !validate_dynamic_type(value, &attr.r#type) {
            diagnostics.push(
                Diagnostic::error(
                    format!("Type mismatch for field: {}", attr.name),
                    format!(
                        "Field '{}' expects type {:?} but got {}",
                        attr.name,
                        attr.r#type,
                        dynamic_type_name(value)
                    ),
                )
                .with_attribute(path),
            );
            continue;
        }

        let mut attr_diags = Diagnostics::new();
        for validator in &attr.validators {
            validator.validate(value, &attr.name, &mut attr_diags);
        }
        diagnostics.extend(attr_diags.into_vec(&path));
    }

    for field_name in values.keys() {
        if schema.attribute(field_name).is_none() {
            diagnostics.push(
                Diagnostic::error(
                    format!("Unknown field: {}", field_name),
                    format!(
                        "The field '{}' is not defined in the schema",
                        field_name
                    ),
                )
                .with_attribute(AttributePath::new(field_name)),
            );
        }
    }

    diagnostics
}

fn validate_dynamic_type(value: &Dynamic, expected_type: &AttributeType) -> bool {
    match (value, expected_type) {
        (Dynamic::Null | Dynamic::Unknown, _) => true,
        (Dynamic::String(_), AttributeType::String) => true,
        (Dynamic::Number(_), AttributeType::Number) => true,
        (Dynamic::Bool(_), AttributeType::Bool) => true,
        (Dynamic::List(items), AttributeType::List(element)) => {
            items.iter().all(|item| validate_dynamic_type(item, element))
        }
        _ => false,
    }
}

fn dynamic_type_name(value: &Dynamic) -> &'static str {
    match value {
        Dynamic::Null => "null",
        Dynamic::Bool(_) => "bool",
        Dynamic::Number(_) => "number",
        Dynamic::String(_) => "string",
        Dynamic::List(_) => "list",
        Dynamic::Map(_) => "map",
        Dynamic::Unknown => "unknown",
    }
}
