//! pipes_workspace

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, Attrs};
use super::common::{
    computed, desired_state, optional_computed, organization, required, server_id, with_audit,
    write_audit,
};
use super::lifecycle::ResourceAdapter;
use crate::api::workspace::{CreateWorkspaceRequest, UpdateWorkspaceRequest, Workspace};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct WorkspaceAdapter;

/// State attributes of a workspace, shared with the data source
pub fn write_workspace(workspace: &Workspace, state: &mut DynamicValue) {
    state.put_string("workspace_id", &workspace.id);
    state.put_string("handle", &workspace.handle);
    state.put_opt_string("identity_id", workspace.identity_id.as_deref());
    state.put_opt_string("instance_type", workspace.instance_type.as_deref());
    state.put_opt_string("desired_state", workspace.desired_state.as_deref());
    state.put_opt_string("workspace_state", workspace.state.as_deref());
    state.put_opt_string("host", workspace.host.as_deref());
    state.put_opt_string("database_name", workspace.database_name.as_deref());
    state.put_opt_string("hive", workspace.hive.as_deref());
    write_audit(state, &workspace.audit, workspace.version_id);
}

/// Computed attributes of a workspace, shared with the data source
pub fn workspace_attributes(builder: SchemaBuilder) -> SchemaBuilder {
    with_audit(
        builder
            .attribute(server_id("workspace_id", "Server ID of the workspace"))
            .attribute(server_id("identity_id", "Server ID of the owning identity"))
            .attribute(computed("workspace_state", "Provisioning state"))
            .attribute(computed("host", "Database host of the workspace"))
            .attribute(computed("database_name", "Database name of the workspace"))
            .attribute(computed("hive", "Hive the workspace runs in")),
    )
}

#[async_trait]
impl ResourceAdapter for WorkspaceAdapter {
    type Model = Workspace;

    fn type_name(&self) -> &'static str {
        "pipes_workspace"
    }

    fn schema(&self) -> Schema {
        workspace_attributes(
            SchemaBuilder::new()
                .description("A workspace owned by the calling user or an organization")
                .attribute(organization())
                .attribute(required("handle", "Handle of the workspace"))
                .attribute(
                    optional_computed("instance_type", "Database instance type")
                        .build(),
                )
                .attribute(desired_state("Whether the workspace database should run")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["handle"])
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Workspace> {
        let scope = cx.scope(plan).await?;
        let request = CreateWorkspaceRequest {
            handle: plan.required_string("handle")?,
            instance_type: plan.string("instance_type"),
            desired_state: plan.string("desired_state"),
        };
        Ok(cx.client.identity(&scope).workspaces().create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Workspace>> {
        let scope = cx.scope(state).await?;
        let handle = state.required_string("handle")?;
        Ok(Some(cx.client.identity(&scope).workspaces().get(&handle).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Workspace> {
        let scope = cx.scope(prior).await?;
        let request = UpdateWorkspaceRequest {
            handle: changed_string(prior, plan, "handle"),
            instance_type: changed_string(prior, plan, "instance_type"),
            desired_state: changed_string(prior, plan, "desired_state"),
        };
        let handle = prior.required_string("handle")?;
        Ok(cx
            .client
            .identity(&scope)
            .workspaces()
            .update(&handle, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let scope = cx.scope(state).await?;
        let handle = state.required_string("handle")?;
        Ok(cx.client.identity(&scope).workspaces().delete(&handle).await?)
    }

    fn write_state(&self, workspace: &Workspace, state: &mut DynamicValue) {
        write_workspace(workspace, state);
    }
}
