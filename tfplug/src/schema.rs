//! Attribute schemas
//!
//! Providers, resources and data sources describe their attributes with a
//! flat [`Schema`]. Build one with [`SchemaBuilder`] and [`AttributeBuilder`].

use crate::defaults::AttributeDefault;
use crate::plan_modifier::PlanModifier;
use crate::validator::Validator;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    /// f64, like every number on the wire
    Number,
    Bool,
    List(Box<AttributeType>),
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Bumped when stored state needs migrating
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Exactly one of `required`, `optional` or computed-only holds; `optional`
/// and `computed` together mean the server fills in what is left unset.
#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub validators: Vec<Arc<dyn Validator>>,
    pub plan_modifiers: Vec<Arc<dyn PlanModifier>>,
    pub default: Option<Arc<dyn AttributeDefault>>,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("validators", &self.validators.len())
            .field("plan_modifiers", &self.plan_modifiers.len())
            .field("default", &self.default.is_some())
            .finish_non_exhaustive()
    }
}

pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    /// Starts a computed-only attribute; call `required` or `optional` to
    /// make it configurable
    pub fn new(name: &str, r#type: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                validators: Vec::new(),
                plan_modifiers: Vec::new(),
                default: None,
            },
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.attribute.description = description.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Redacted in host-engine output
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    /// Validators run in the order they are added
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.attribute.validators.push(Arc::new(validator));
        self
    }

    /// Plan modifiers run in the order they are added
    pub fn plan_modifier(mut self, modifier: impl PlanModifier + 'static) -> Self {
        self.attribute.plan_modifiers.push(Arc::new(modifier));
        self
    }

    pub fn default(mut self, default: impl AttributeDefault + 'static) -> Self {
        self.attribute.default = Some(Arc::new(default));
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.schema.description = description.to_string();
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.schema.attributes.push(attribute);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::StaticDefault;
    use crate::plan_modifier::UseStateForUnknown;
    use crate::validator::OneOfValidator;

    fn member_schema() -> Schema {
        SchemaBuilder::new()
            .version(1)
            .description("Organization member")
            .attribute(
                AttributeBuilder::new("role", AttributeType::String)
                    .optional()
                    .required()
                    .validator(OneOfValidator::new(&["member", "owner"]))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("status", AttributeType::String)
                    .optional()
                    .computed()
                    .default(StaticDefault::string("invited"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("member_id", AttributeType::String)
                    .computed()
                    .plan_modifier(UseStateForUnknown)
                    .build(),
            )
            .build()
    }

    #[test]
    fn required_and_optional_are_exclusive() {
        let schema = member_schema();
        let role = schema.attribute("role").expect("role declared");
        assert!(role.required);
        assert!(!role.optional);
        assert_eq!(role.validators.len(), 1);

        let status = schema.attribute("status").expect("status declared");
        assert!(status.optional && status.computed);
        assert!(status.default.is_some());
    }

    #[test]
    fn attributes_keep_declaration_order() {
        let schema = member_schema();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.description, "Organization member");

        let names: Vec<_> = schema.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["role", "status", "member_id"]);
        assert!(schema.attribute("email").is_none());
    }

    #[test]
    fn cloned_attributes_share_hooks() {
        let schema = member_schema();
        let member_id = schema.attribute("member_id").expect("member_id declared").clone();
        assert_eq!(member_id.plan_modifiers.len(), 1);
        assert!(format!("{:?}", member_id).contains("member_id"));
    }
}
