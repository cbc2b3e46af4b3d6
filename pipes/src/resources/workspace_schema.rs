//! pipes_workspace_schema
//!
//! Attaches a connection or aggregator to a workspace as a database schema.
//! Schemas cannot be changed, only replaced.

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::Attrs;
use super::common::{
    computed, force_new, organization, server_id, with_audit, workspace, write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::workspace::{CreateWorkspaceSchemaRequest, WorkspaceSchema};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct WorkspaceSchemaAdapter;

#[async_trait]
impl ResourceAdapter for WorkspaceSchemaAdapter {
    type Model = WorkspaceSchema;

    fn type_name(&self) -> &'static str {
        "pipes_workspace_schema"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("A connection or aggregator attached to a workspace")
                .attribute(organization())
                .attribute(workspace())
                .attribute(force_new("name", "Handle of the connection or aggregator"))
                .attribute(computed("type", "Schema type"))
                .attribute(server_id("connection_id", "Server ID of the attached connection"))
                .attribute(server_id("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "name"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<WorkspaceSchema> {
        let request = CreateWorkspaceSchemaRequest {
            schema: plan.required_string("name")?,
        };
        Ok(cx.workspace(plan).await?.schemas().create(&request).await?)
    }

    async fn read(
        &self,
        cx: &Session<'_>,
        state: &DynamicValue,
    ) -> Result<Option<WorkspaceSchema>> {
        let name = state.required_string("name")?;
        Ok(Some(cx.workspace(state).await?.schemas().get(&name).await?))
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let name = state.required_string("name")?;
        Ok(cx.workspace(state).await?.schemas().delete(&name).await?)
    }

    fn write_state(&self, schema: &WorkspaceSchema, state: &mut DynamicValue) {
        state.put_string("name", &schema.name);
        state.put_opt_string("type", schema.schema_type.as_deref());
        state.put_opt_string("connection_id", schema.connection_id.as_deref());
        state.put_opt_string("workspace_id", schema.workspace_id.as_deref());
        write_audit(state, &schema.audit, schema.version_id);
    }
}
