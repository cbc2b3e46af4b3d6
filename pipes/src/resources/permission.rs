//! Permissions granting a connection or folder to a workspace
//!
//! Tenant permissions name the identity owning the target workspace;
//! organization permissions always grant to the organization's own
//! workspaces. Only the workspace can be re-targeted in place.

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, Attrs};
use super::common::{force_new, required, server_id, with_audit, write_audit};
use super::lifecycle::ResourceAdapter;
use crate::api::connection::{Permission, PermissionRequest};
use crate::api::{Collection, Scope};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOwner {
    Tenant,
    Organization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget {
    Connection,
    Folder,
}

impl PermissionOwner {
    fn attribute(self) -> &'static str {
        match self {
            PermissionOwner::Tenant => "tenant",
            PermissionOwner::Organization => "organization",
        }
    }
}

impl PermissionTarget {
    fn attribute(self) -> &'static str {
        match self {
            PermissionTarget::Connection => "connection_handle",
            PermissionTarget::Folder => "connection_folder_id",
        }
    }
}

pub struct PermissionAdapter {
    owner: PermissionOwner,
    target: PermissionTarget,
}

impl PermissionAdapter {
    pub fn new(owner: PermissionOwner, target: PermissionTarget) -> Self {
        Self { owner, target }
    }

    fn permissions<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<Collection<'a, Permission>> {
        let owner = attrs.required_string(self.owner.attribute())?;
        let target = attrs.required_string(self.target.attribute())?;
        Ok(match (self.owner, self.target) {
            (PermissionOwner::Tenant, PermissionTarget::Connection) => {
                cx.client.tenant(&owner).connection_permissions(&target)
            }
            (PermissionOwner::Tenant, PermissionTarget::Folder) => {
                cx.client.tenant(&owner).folder_permissions(&target)
            }
            (PermissionOwner::Organization, PermissionTarget::Connection) => cx
                .client
                .identity(&Scope::Org(owner))
                .connection_permissions(&target),
            (PermissionOwner::Organization, PermissionTarget::Folder) => cx
                .client
                .identity(&Scope::Org(owner))
                .folder_permissions(&target),
        })
    }
}

#[async_trait]
impl ResourceAdapter for PermissionAdapter {
    type Model = Permission;

    fn type_name(&self) -> &'static str {
        match (self.owner, self.target) {
            (PermissionOwner::Tenant, PermissionTarget::Connection) => {
                "pipes_tenant_connection_permission"
            }
            (PermissionOwner::Tenant, PermissionTarget::Folder) => {
                "pipes_tenant_connection_folder_permission"
            }
            (PermissionOwner::Organization, PermissionTarget::Connection) => {
                "pipes_organization_connection_permission"
            }
            (PermissionOwner::Organization, PermissionTarget::Folder) => {
                "pipes_organization_connection_folder_permission"
            }
        }
    }

    fn schema(&self) -> Schema {
        let mut builder = SchemaBuilder::new()
            .description("Grants a connection or connection folder to a workspace")
            .attribute(force_new(self.owner.attribute(), "Handle of the owner"))
            .attribute(match self.target {
                PermissionTarget::Connection => {
                    force_new("connection_handle", "Handle of the granted connection")
                }
                PermissionTarget::Folder => {
                    force_new("connection_folder_id", "ID of the granted folder")
                }
            });

        if self.owner == PermissionOwner::Tenant {
            builder = builder.attribute(force_new(
                "identity_handle",
                "Handle of the user or organization owning the workspace",
            ));
        }
        if self.target == PermissionTarget::Connection {
            builder = builder.attribute(server_id("connection_id", "Server ID of the connection"));
        }

        with_audit(
            builder
                .attribute(required("workspace_handle", "Handle of the workspace granted access"))
                .attribute(server_id("permission_id", "Server ID of the permission"))
                .attribute(server_id("identity_id", "Server ID of the identity"))
                .attribute(server_id("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        match (self.owner, self.target) {
            (PermissionOwner::Tenant, PermissionTarget::Connection) => {
                IdLayout::Fixed(&["tenant", "connection_handle", "permission_id"])
            }
            (PermissionOwner::Tenant, PermissionTarget::Folder) => {
                IdLayout::Fixed(&["tenant", "connection_folder_id", "permission_id"])
            }
            (PermissionOwner::Organization, PermissionTarget::Connection) => {
                IdLayout::Fixed(&["organization", "connection_handle", "permission_id"])
            }
            (PermissionOwner::Organization, PermissionTarget::Folder) => {
                IdLayout::Fixed(&["organization", "connection_folder_id", "permission_id"])
            }
        }
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Permission> {
        let request = PermissionRequest {
            identity_handle: match self.owner {
                PermissionOwner::Tenant => Some(plan.required_string("identity_handle")?),
                PermissionOwner::Organization => None,
            },
            workspace_handle: Some(plan.required_string("workspace_handle")?),
        };
        Ok(self.permissions(cx, plan)?.create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Permission>> {
        let id = state.required_string("permission_id")?;
        Ok(Some(self.permissions(cx, state)?.get(&id).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Permission> {
        let request = PermissionRequest {
            identity_handle: None,
            workspace_handle: changed_string(prior, plan, "workspace_handle"),
        };
        let id = prior.required_string("permission_id")?;
        Ok(self
            .permissions(cx, prior)?
            .update(&id, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let id = state.required_string("permission_id")?;
        Ok(self.permissions(cx, state)?.delete(&id).await?)
    }

    fn write_state(&self, permission: &Permission, state: &mut DynamicValue) {
        state.put_string("permission_id", &permission.id);
        if self.target == PermissionTarget::Connection {
            state.put_opt_string("connection_id", permission.connection_id.as_deref());
        }
        if self.owner == PermissionOwner::Tenant {
            if let Some(handle) = &permission.identity_handle {
                state.put_string("identity_handle", handle);
            }
        }
        if let Some(handle) = &permission.workspace_handle {
            state.put_string("workspace_handle", handle);
        }
        state.put_opt_string("identity_id", permission.identity_id.as_deref());
        state.put_opt_string("workspace_id", permission.workspace_id.as_deref());
        write_audit(state, &permission.audit, permission.version_id);
    }
}
