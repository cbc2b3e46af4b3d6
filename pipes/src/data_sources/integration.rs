//! Integrations owned by an identity, a tenant or the calling user

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::lookup::LookupAdapter;
use crate::api::integration::Integration;
use crate::api::Scope;
use crate::error::Result;
use crate::provider_data::Session;
use crate::resources::attrs::Attrs;
use crate::resources::common::{computed, optional, required, with_audit, write_audit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationOwner {
    /// The calling user, or `organization` when set
    Identity,
    Tenant,
    /// Always the calling user
    User,
}

pub struct IntegrationLookup {
    owner: IntegrationOwner,
}

impl IntegrationLookup {
    pub fn new(owner: IntegrationOwner) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl LookupAdapter for IntegrationLookup {
    type Model = Integration;

    fn type_name(&self) -> &'static str {
        match self.owner {
            IntegrationOwner::Identity => "pipes_integration",
            IntegrationOwner::Tenant => "pipes_tenant_integration",
            IntegrationOwner::User => "pipes_user_integration",
        }
    }

    fn schema(&self) -> Schema {
        let builder = match self.owner {
            IntegrationOwner::Identity => SchemaBuilder::new().attribute(optional(
                "organization",
                "Handle of the owning organization. Leave unset for the calling user.",
            )),
            IntegrationOwner::Tenant => {
                SchemaBuilder::new().attribute(required("tenant", "Handle of the tenant"))
            }
            IntegrationOwner::User => SchemaBuilder::new(),
        };

        with_audit(
            builder
                .description("Looks up an integration by handle")
                .attribute(required("handle", "Handle of the integration"))
                .attribute(computed("integration_id", "Server ID of the integration"))
                .attribute(computed("type", "Integration type, e.g. slack"))
                .attribute(computed("state", "Integration state"))
                .attribute(
                    AttributeBuilder::new("config", AttributeType::String)
                        .description("Integration configuration as JSON")
                        .computed()
                        .sensitive()
                        .build(),
                )
                .attribute(computed("identity_id", "Server ID of the owning identity"))
                .attribute(computed("tenant_id", "Server ID of the owning tenant"))
                .attribute(computed("pipeline_id", "Pipeline handling the integration")),
        )
        .build()
    }

    async fn fetch(&self, cx: &Session<'_>, config: &DynamicValue) -> Result<Integration> {
        let handle = config.required_string("handle")?;
        let integrations = match self.owner {
            IntegrationOwner::Identity => {
                let scope = cx.scope(config).await?;
                cx.client.identity(&scope).integrations()
            }
            IntegrationOwner::Tenant => cx
                .client
                .tenant(&config.required_string("tenant")?)
                .integrations(),
            IntegrationOwner::User => {
                let actor = cx.scopes.actor_handle(cx.client).await?;
                cx.client
                    .identity(&Scope::User(actor.to_string()))
                    .integrations()
            }
        };
        Ok(integrations.get(&handle).await?)
    }

    fn write_state(&self, integration: &Integration, state: &mut DynamicValue) {
        state.put_string("integration_id", &integration.id);
        state.put_string("handle", &integration.handle);
        state.put_opt_string("type", integration.integration_type.as_deref());
        state.put_opt_string("state", integration.state.as_deref());
        state.put_json("config", integration.config.as_ref());
        state.put_opt_string("identity_id", integration.identity_id.as_deref());
        state.put_opt_string("tenant_id", integration.tenant_id.as_deref());
        state.put_opt_string("pipeline_id", integration.pipeline_id.as_deref());
        write_audit(state, &integration.audit, integration.version_id);
    }
}
