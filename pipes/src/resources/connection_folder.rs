//! Connection folders of tenants, organizations and workspaces
//!
//! Folders have no handle; the server ID is the key.

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, patch_string, Attrs};
use super::common::{optional, required, server_id, with_audit, write_audit};
use super::connection::ConnectionFamily;
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::connection::{
    ConnectionFolder, CreateConnectionFolderRequest, UpdateConnectionFolderRequest,
};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderParent {
    Tenant,
    Organization,
    Workspace,
}

impl FolderParent {
    fn family(self) -> ConnectionFamily {
        match self {
            FolderParent::Tenant => ConnectionFamily::Tenant,
            FolderParent::Organization => ConnectionFamily::Organization,
            FolderParent::Workspace => ConnectionFamily::Workspace,
        }
    }
}

pub struct ConnectionFolderAdapter {
    parent: FolderParent,
}

impl ConnectionFolderAdapter {
    pub fn new(parent: FolderParent) -> Self {
        Self { parent }
    }
}

#[async_trait]
impl ResourceAdapter for ConnectionFolderAdapter {
    type Model = ConnectionFolder;

    fn type_name(&self) -> &'static str {
        match self.parent {
            FolderParent::Tenant => "pipes_tenant_connection_folder",
            FolderParent::Organization => "pipes_organization_connection_folder",
            FolderParent::Workspace => "pipes_workspace_connection_folder",
        }
    }

    fn schema(&self) -> Schema {
        let builder = self
            .parent
            .family()
            .parent(SchemaBuilder::new().description("A folder grouping connections"))
            .attribute(required("title", "Title of the folder"))
            .attribute(optional("parent_id", "ID of the enclosing folder"))
            .attribute(server_id(
                "connection_folder_id",
                "Server ID of the folder",
            ))
            .attribute(server_id("identity_id", "Server ID of the owning identity"))
            .attribute(server_id("tenant_id", "Server ID of the owning tenant"))
            .attribute(server_id("workspace_id", "Server ID of the owning workspace"));
        with_audit(builder).build()
    }

    fn id_layout(&self) -> IdLayout {
        match self.parent {
            FolderParent::Tenant => IdLayout::Fixed(&["tenant", "connection_folder_id"]),
            FolderParent::Organization => {
                IdLayout::Fixed(&["organization", "connection_folder_id"])
            }
            FolderParent::Workspace => IdLayout::Scoped(&["workspace", "connection_folder_id"]),
        }
    }

    fn gone(&self) -> Gone {
        match self.parent {
            FolderParent::Workspace => Gone::NotFoundOrOrgForbidden,
            _ => Gone::NotFound,
        }
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<ConnectionFolder> {
        let request = CreateConnectionFolderRequest {
            title: plan.required_string("title")?,
            parent_id: plan.string("parent_id"),
        };
        let folders = self.parent.family().folders(cx, plan).await?;
        Ok(folders.create(&request).await?)
    }

    async fn read(
        &self,
        cx: &Session<'_>,
        state: &DynamicValue,
    ) -> Result<Option<ConnectionFolder>> {
        let folders = self.parent.family().folders(cx, state).await?;
        let id = state.required_string("connection_folder_id")?;
        Ok(Some(folders.get(&id).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<ConnectionFolder> {
        let request = UpdateConnectionFolderRequest {
            title: changed_string(prior, plan, "title"),
            parent_id: patch_string(prior, plan, "parent_id"),
        };
        let folders = self.parent.family().folders(cx, prior).await?;
        let id = prior.required_string("connection_folder_id")?;
        Ok(folders.update(&id, &request, Some(version)).await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let folders = self.parent.family().folders(cx, state).await?;
        Ok(folders
            .delete(&state.required_string("connection_folder_id")?)
            .await?)
    }

    fn write_state(&self, folder: &ConnectionFolder, state: &mut DynamicValue) {
        state.put_string("connection_folder_id", &folder.id);
        state.put_string("title", &folder.title);
        state.put_opt_string("parent_id", folder.parent_id.as_deref());
        state.put_opt_string("identity_id", folder.identity_id.as_deref());
        state.put_opt_string("tenant_id", folder.tenant_id.as_deref());
        state.put_opt_string("workspace_id", folder.workspace_id.as_deref());
        write_audit(state, &folder.audit, folder.version_id);
    }
}
