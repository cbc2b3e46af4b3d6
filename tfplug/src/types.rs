//! Values exchanged with the host engine, and the diagnostics reported back

use std::collections::HashMap;
use std::fmt;

/// A configuration or state value. Numbers are f64 as on the wire; objects
/// are maps. `Unknown` only appears while planning.
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Dynamic>),
    Map(HashMap<String, Dynamic>),
    Unknown,
}

impl Dynamic {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Dynamic::Unknown)
    }

    /// Null or unknown: nothing to check yet
    pub fn is_absent(&self) -> bool {
        self.is_null() || self.is_unknown()
    }

    fn resolve_unknowns(&mut self) {
        match self {
            Dynamic::Unknown => *self = Dynamic::Null,
            Dynamic::List(items) => items.iter_mut().for_each(Dynamic::resolve_unknowns),
            Dynamic::Map(map) => map.values_mut().for_each(Dynamic::resolve_unknowns),
            _ => {}
        }
    }
}

impl From<serde_json::Value> for Dynamic {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Dynamic::Null,
            Value::Bool(b) => Dynamic::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Dynamic::Null, Dynamic::Number),
            Value::String(s) => Dynamic::String(s),
            Value::Array(items) => Dynamic::List(items.into_iter().map(Dynamic::from).collect()),
            Value::Object(map) => {
                Dynamic::Map(map.into_iter().map(|(k, v)| (k, Dynamic::from(v))).collect())
            }
        }
    }
}

/// A whole configuration, plan or state: an object of attributes, or null
/// when the resource does not exist
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicValue {
    pub value: Dynamic,
}

impl DynamicValue {
    pub fn new(value: Dynamic) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self::new(Dynamic::Null)
    }

    pub fn object() -> Self {
        Self::new(Dynamic::Map(HashMap::new()))
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// None when the attribute is missing or self is not an object
    pub fn attribute(&self, name: &str) -> Option<&Dynamic> {
        match &self.value {
            Dynamic::Map(attrs) => attrs.get(name),
            _ => None,
        }
    }

    /// Turns self into an object first when it is not one
    pub fn set_attribute(&mut self, name: &str, value: Dynamic) {
        match &mut self.value {
            Dynamic::Map(attrs) => {
                attrs.insert(name.to_string(), value);
            }
            other => *other = Dynamic::Map(HashMap::from([(name.to_string(), value)])),
        }
    }

    /// Nulls every unknown left after an apply: whatever the server did not
    /// report is empty
    pub fn resolve_unknowns(&mut self) {
        self.value.resolve_unknowns();
    }
}

impl From<serde_json::Value> for DynamicValue {
    fn from(value: serde_json::Value) -> Self {
        DynamicValue::new(value.into())
    }
}

/// Location of an attribute, outermost name first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    pub steps: Vec<String>,
}

impl AttributePath {
    pub fn new(name: &str) -> Self {
        Self {
            steps: vec![name.to_string()],
        }
    }

    pub fn child(mut self, name: &str) -> Self {
        self.steps.push(name.to_string());
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<AttributePath>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, path: AttributePath) -> Self {
        self.attribute = Some(path);
        self
    }
}

/// Errors collected by a validator or plan modifier before they are pinned
/// to an attribute
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error<S: Into<String>, D: Into<String>>(&mut self, summary: S, detail: Option<D>) {
        let detail = detail.map(Into::into).unwrap_or_default();
        self.errors.push(Diagnostic::error(summary, detail));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_vec(self, path: &AttributePath) -> Vec<Diagnostic> {
        self.errors
            .into_iter()
            .map(|d| d.with_attribute(path.clone()))
            .collect()
    }
}
