//! Connections at identity, tenant, organization and workspace level

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, patch_json, Attrs};
use super::common::{
    computed, force_new, json_blob, optional_computed, organization, required, server_id,
    with_audit, workspace, write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::connection::{
    Connection, ConnectionFolder, CreateConnectionRequest, UpdateConnectionRequest,
};
use crate::api::{Collection, Scope};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

/// Where a connection lives; decides endpoint, import key and parent attrs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFamily {
    /// Owned by the calling user or by `organization`
    Identity,
    Tenant,
    Organization,
    Workspace,
}

impl ConnectionFamily {
    pub(crate) async fn connections<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<Collection<'a, Connection>> {
        Ok(match self {
            ConnectionFamily::Identity => {
                let scope = cx.scope(attrs).await?;
                cx.client.identity(&scope).connections()
            }
            ConnectionFamily::Tenant => cx
                .client
                .tenant(&attrs.required_string("tenant")?)
                .connections(),
            ConnectionFamily::Organization => {
                let scope = Scope::Org(attrs.required_string("organization")?);
                cx.client.identity(&scope).connections()
            }
            ConnectionFamily::Workspace => cx.workspace(attrs).await?.connections(),
        })
    }

    pub(crate) async fn folders<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<Collection<'a, ConnectionFolder>> {
        Ok(match self {
            ConnectionFamily::Identity => {
                let scope = cx.scope(attrs).await?;
                cx.client.identity(&scope).connection_folders()
            }
            ConnectionFamily::Tenant => cx
                .client
                .tenant(&attrs.required_string("tenant")?)
                .connection_folders(),
            ConnectionFamily::Organization => {
                let scope = Scope::Org(attrs.required_string("organization")?);
                cx.client.identity(&scope).connection_folders()
            }
            ConnectionFamily::Workspace => cx.workspace(attrs).await?.connection_folders(),
        })
    }

    /// Parent attributes leading the schema
    pub(crate) fn parent(&self, builder: SchemaBuilder) -> SchemaBuilder {
        match self {
            ConnectionFamily::Identity => builder.attribute(organization()),
            ConnectionFamily::Tenant => {
                builder.attribute(force_new("tenant", "Handle of the tenant"))
            }
            ConnectionFamily::Organization => {
                builder.attribute(force_new("organization", "Handle of the organization"))
            }
            ConnectionFamily::Workspace => builder
                .attribute(organization())
                .attribute(workspace()),
        }
    }
}

pub struct ConnectionAdapter {
    family: ConnectionFamily,
}

impl ConnectionAdapter {
    pub fn new(family: ConnectionFamily) -> Self {
        Self { family }
    }
}

#[async_trait]
impl ResourceAdapter for ConnectionAdapter {
    type Model = Connection;

    fn type_name(&self) -> &'static str {
        match self.family {
            ConnectionFamily::Identity => "pipes_connection",
            ConnectionFamily::Tenant => "pipes_tenant_connection",
            ConnectionFamily::Organization => "pipes_organization_connection",
            ConnectionFamily::Workspace => "pipes_workspace_connection",
        }
    }

    fn schema(&self) -> Schema {
        let mut builder = self
            .family
            .parent(SchemaBuilder::new().description("A plugin connection"))
            .attribute(required("handle", "Handle of the connection"))
            .attribute(force_new("plugin", "Plugin the connection uses, e.g. aws"))
            .attribute(
                json_blob("config", "Plugin configuration as a JSON object")
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(server_id("connection_id", "Server ID of the connection"))
            .attribute(computed("type", "Connection type"))
            .attribute(server_id("identity_id", "Server ID of the owning identity"))
            .attribute(server_id("tenant_id", "Server ID of the owning tenant"))
            .attribute(server_id("workspace_id", "Server ID of the owning workspace"));

        if self.family != ConnectionFamily::Identity {
            builder = builder.attribute(
                optional_computed("parent_id", "ID of the folder holding the connection").build(),
            );
        }
        with_audit(builder).build()
    }

    fn id_layout(&self) -> IdLayout {
        match self.family {
            ConnectionFamily::Identity => IdLayout::Scoped(&["handle"]),
            ConnectionFamily::Tenant => IdLayout::Fixed(&["tenant", "handle"]),
            ConnectionFamily::Organization => IdLayout::Fixed(&["organization", "handle"]),
            ConnectionFamily::Workspace => IdLayout::Scoped(&["workspace", "handle"]),
        }
    }

    fn gone(&self) -> Gone {
        match self.family {
            ConnectionFamily::Workspace => Gone::NotFoundOrOrgForbidden,
            _ => Gone::NotFound,
        }
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Connection> {
        let request = CreateConnectionRequest {
            handle: plan.required_string("handle")?,
            plugin: plan.required_string("plugin")?,
            config: plan.json("config")?,
            parent_id: plan.string("parent_id"),
        };
        let connections = self.family.connections(cx, plan).await?;
        Ok(connections.create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Connection>> {
        let connections = self.family.connections(cx, state).await?;
        Ok(Some(connections.get(&state.required_string("handle")?).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Connection> {
        let request = UpdateConnectionRequest {
            handle: changed_string(prior, plan, "handle"),
            config: patch_json(prior, plan, "config")?,
            parent_id: changed_string(prior, plan, "parent_id"),
        };
        let connections = self.family.connections(cx, prior).await?;
        Ok(connections
            .update(&prior.required_string("handle")?, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let connections = self.family.connections(cx, state).await?;
        Ok(connections.delete(&state.required_string("handle")?).await?)
    }

    fn write_state(&self, connection: &Connection, state: &mut DynamicValue) {
        state.put_string("connection_id", &connection.id);
        state.put_string("handle", &connection.handle);
        state.put_string("plugin", &connection.plugin);
        // Some plugins redact config on read; keep what was sent
        if connection.config.is_some() {
            state.put_json("config", connection.config.as_ref());
        }
        state.put_opt_string("type", connection.connection_type.as_deref());
        state.put_opt_string("identity_id", connection.identity_id.as_deref());
        state.put_opt_string("tenant_id", connection.tenant_id.as_deref());
        state.put_opt_string("workspace_id", connection.workspace_id.as_deref());
        if self.family != ConnectionFamily::Identity {
            state.put_opt_string("parent_id", connection.parent_id.as_deref());
        }
        write_audit(state, &connection.audit, connection.version_id);
    }
}
