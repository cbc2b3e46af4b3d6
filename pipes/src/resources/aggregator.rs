//! pipes_workspace_aggregator

use async_trait::async_trait;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::ListLengthValidator;

use super::attrs::{changed_string, changed_string_list, Attrs};
use super::common::{
    computed, force_new, organization, required, server_id, with_audit, workspace, write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::aggregator::{Aggregator, CreateAggregatorRequest, UpdateAggregatorRequest};
use crate::error::{PipesError, Result};
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct AggregatorAdapter;

#[async_trait]
impl ResourceAdapter for AggregatorAdapter {
    type Model = Aggregator;

    fn type_name(&self) -> &'static str {
        "pipes_workspace_aggregator"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("Aggregates every workspace connection matching a set of globs")
                .attribute(organization())
                .attribute(workspace())
                .attribute(required("handle", "Handle of the aggregator"))
                .attribute(force_new("plugin", "Plugin of the aggregated connections"))
                .attribute(
                    AttributeBuilder::new(
                        "connections",
                        AttributeType::List(Box::new(AttributeType::String)),
                    )
                    .description("Connection handles or globs such as aws_*")
                    .required()
                    .validator(ListLengthValidator::at_least(1))
                    .build(),
                )
                .attribute(server_id("aggregator_id", "Server ID of the aggregator"))
                .attribute(computed("type", "Connection type"))
                .attribute(server_id("workspace_id", "Server ID of the workspace"))
                .attribute(server_id("identity_id", "Server ID of the owning identity")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "handle"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Aggregator> {
        let request = CreateAggregatorRequest {
            handle: plan.required_string("handle")?,
            plugin: plan.required_string("plugin")?,
            connections: plan
                .string_list("connections")
                .ok_or_else(|| PipesError::MissingAttribute("connections".to_string()))?,
        };
        Ok(cx.workspace(plan).await?.aggregators().create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Aggregator>> {
        let handle = state.required_string("handle")?;
        Ok(Some(cx.workspace(state).await?.aggregators().get(&handle).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Aggregator> {
        let request = UpdateAggregatorRequest {
            handle: changed_string(prior, plan, "handle"),
            connections: changed_string_list(prior, plan, "connections"),
        };
        let handle = prior.required_string("handle")?;
        Ok(cx
            .workspace(prior)
            .await?
            .aggregators()
            .update(&handle, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let handle = state.required_string("handle")?;
        Ok(cx.workspace(state).await?.aggregators().delete(&handle).await?)
    }

    fn write_state(&self, aggregator: &Aggregator, state: &mut DynamicValue) {
        state.put_string("aggregator_id", &aggregator.id);
        state.put_string("handle", &aggregator.handle);
        state.put_string("plugin", &aggregator.plugin);
        state.put_string_list("connections", &aggregator.connections);
        state.put_opt_string("type", aggregator.aggregator_type.as_deref());
        state.put_opt_string("workspace_id", aggregator.workspace_id.as_deref());
        state.put_opt_string("identity_id", aggregator.identity_id.as_deref());
        write_audit(state, &aggregator.audit, aggregator.version_id);
    }
}
