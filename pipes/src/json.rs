//! JSON-blob attributes
//!
//! The server canonicalizes stored JSON (sorted keys, pretty-printed), so
//! blob attributes are compared by value rather than by text.

use serde_json::Value;
use tfplug::plan_modifier::{PlanModifier, PlanModifyRequest, PlanModifyResponse};
use tfplug::types::{Diagnostics, Dynamic};
use tfplug::validator::Validator;

use crate::error::{PipesError, Result};

/// Parse a JSON attribute into a value tree. Total over valid JSON.
pub fn canonicalize(raw: &str) -> std::result::Result<Value, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Parse a JSON attribute, naming the attribute on failure
pub fn parse_attribute(attribute: &str, raw: &str) -> Result<Value> {
    canonicalize(raw).map_err(|e| PipesError::InvalidJson {
        attribute: attribute.to_string(),
        message: e.to_string(),
    })
}

/// The string form kept in state: keys sorted, two-space indent
pub fn to_state_string(value: &Value) -> String {
    // serde_json::Map is a BTreeMap here, so object keys serialize sorted
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Value equality after parsing both sides. Unparseable input is only equal
/// to identical text.
pub fn semantically_equal(a: &str, b: &str) -> bool {
    match (canonicalize(a), canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Keeps the prior state string when the configured JSON means the same
/// thing, so formatting differences never show up as a diff
pub struct SemanticJson;

impl PlanModifier for SemanticJson {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = match (&request.plan, &request.state) {
            (Dynamic::String(planned), Dynamic::String(prior))
                if planned != prior && semantically_equal(planned, prior) =>
            {
                request.state.clone()
            }
            _ => request.plan,
        };

        PlanModifyResponse::keep(plan_value)
    }
}

/// Rejects strings that are not valid JSON
pub struct ValidJson;

impl Validator for ValidJson {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        if let Some(raw) = value.as_string() {
            if let Err(e) = canonicalize(raw) {
                diagnostics.add_error(
                    format!("{} must be valid JSON", attribute_path),
                    Some(e.to_string()),
                );
            }
        }
    }
}
