//! pipes_workspace

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::lookup::LookupAdapter;
use crate::api::workspace::Workspace;
use crate::error::Result;
use crate::provider_data::Session;
use crate::resources::attrs::Attrs;
use crate::resources::common::{computed, optional, required};
use crate::resources::workspace::{workspace_attributes, write_workspace};

pub struct WorkspaceLookup;

#[async_trait]
impl LookupAdapter for WorkspaceLookup {
    type Model = Workspace;

    fn type_name(&self) -> &'static str {
        "pipes_workspace"
    }

    fn schema(&self) -> Schema {
        workspace_attributes(
            SchemaBuilder::new()
                .description("Looks up a workspace of the calling user or an organization")
                .attribute(optional(
                    "organization",
                    "Handle of the owning organization. Leave unset for the calling user.",
                ))
                .attribute(required("handle", "Handle of the workspace"))
                .attribute(computed("instance_type", "Database instance type"))
                .attribute(computed("desired_state", "Requested database state")),
        )
        .build()
    }

    async fn fetch(&self, cx: &Session<'_>, config: &DynamicValue) -> Result<Workspace> {
        let scope = cx.scope(config).await?;
        let handle = config.required_string("handle")?;
        Ok(cx.client.identity(&scope).workspaces().get(&handle).await?)
    }

    fn write_state(&self, workspace: &Workspace, state: &mut DynamicValue) {
        write_workspace(workspace, state);
    }
}
