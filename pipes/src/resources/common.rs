//! Schema pieces shared by most entity kinds

use tfplug::plan_modifier::{RequiresReplaceIfChanged, UseStateForUnknown};
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::OneOfValidator;

use super::attrs::Attrs;
use crate::api::common::Audit;
use crate::json::{SemanticJson, ValidJson};

pub const ENABLED_STATES: &[&str] = &["enabled", "disabled"];

/// Required string that forces replacement when changed
pub fn force_new(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .plan_modifier(RequiresReplaceIfChanged)
        .build()
}

pub fn required(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .required()
        .build()
}

pub fn optional(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .optional()
        .build()
}

/// Server-assigned identifier; never changes once known
pub fn server_id(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .computed()
        .plan_modifier(UseStateForUnknown)
        .build()
}

/// Server-reported value that may change on any update
pub fn computed(name: &str, description: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .computed()
        .build()
}

/// Optional string the server fills in when unset
pub fn optional_computed(name: &str, description: &str) -> AttributeBuilder {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .optional()
        .computed()
        .plan_modifier(UseStateForUnknown)
}

/// enabled/disabled switch with server default
pub fn desired_state(description: &str) -> Attribute {
    optional_computed("desired_state", description)
        .validator(OneOfValidator::new(ENABLED_STATES))
        .build()
}

/// JSON blob compared by value
pub fn json_blob(name: &str, description: &str) -> AttributeBuilder {
    AttributeBuilder::new(name, AttributeType::String)
        .description(description)
        .validator(ValidJson)
        .plan_modifier(SemanticJson)
}

/// `organization` handle; absent or empty means the calling user
pub fn organization() -> Attribute {
    AttributeBuilder::new("organization", AttributeType::String)
        .description("Handle of the owning organization. Leave unset for the calling user.")
        .optional()
        .plan_modifier(RequiresReplaceIfChanged)
        .build()
}

/// Parent workspace handle of workspace sub-resources
pub fn workspace() -> Attribute {
    force_new("workspace", "Handle of the parent workspace")
}

/// created_at, updated_at and version_id
pub fn with_audit(builder: SchemaBuilder) -> SchemaBuilder {
    builder
        .attribute(server_id("created_at", "Creation time"))
        .attribute(computed("updated_at", "Last update time"))
        .attribute(
            AttributeBuilder::new("version_id", AttributeType::Number)
                .description("Version number for optimistic concurrency")
                .computed()
                .build(),
        )
}

pub fn write_audit(state: &mut DynamicValue, audit: &Audit, version_id: i64) {
    state.put_opt_string("created_at", audit.created_at.as_deref());
    state.put_opt_string("updated_at", audit.updated_at.as_deref());
    state.put_int("version_id", version_id);
}
