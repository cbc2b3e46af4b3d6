//! Notifiers of tenants and workspaces

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::OneOfValidator;

use super::attrs::{changed_json, changed_string, Attrs};
use super::common::{
    force_new, json_blob, optional_computed, organization, required, server_id, with_audit,
    workspace, write_audit, ENABLED_STATES,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::notifier::{CreateNotifierRequest, Notifier, UpdateNotifierRequest};
use crate::api::Collection;
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierParent {
    Tenant,
    Workspace,
}

pub struct NotifierAdapter {
    parent: NotifierParent,
}

impl NotifierAdapter {
    pub fn new(parent: NotifierParent) -> Self {
        Self { parent }
    }

    async fn notifiers<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<Collection<'a, Notifier>> {
        Ok(match self.parent {
            NotifierParent::Tenant => cx
                .client
                .tenant(&attrs.required_string("tenant")?)
                .notifiers(),
            NotifierParent::Workspace => cx.workspace(attrs).await?.notifiers(),
        })
    }
}

#[async_trait]
impl ResourceAdapter for NotifierAdapter {
    type Model = Notifier;

    fn type_name(&self) -> &'static str {
        match self.parent {
            NotifierParent::Tenant => "pipes_tenant_notifier",
            NotifierParent::Workspace => "pipes_workspace_notifier",
        }
    }

    fn schema(&self) -> Schema {
        let builder = match self.parent {
            NotifierParent::Tenant => SchemaBuilder::new()
                .attribute(force_new("tenant", "Handle of the tenant")),
            NotifierParent::Workspace => SchemaBuilder::new()
                .attribute(organization())
                .attribute(workspace()),
        };

        with_audit(
            builder
                .description("Routes notifications to integrations")
                .attribute(required("name", "Name of the notifier"))
                .attribute(
                    json_blob("notifies", "Notification targets as a JSON array")
                        .required()
                        .build(),
                )
                .attribute(
                    optional_computed("state", "enabled or disabled")
                        .validator(OneOfValidator::new(ENABLED_STATES))
                        .build(),
                )
                .attribute(server_id("notifier_id", "Server ID of the notifier")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        match self.parent {
            NotifierParent::Tenant => IdLayout::Fixed(&["tenant", "name"]),
            NotifierParent::Workspace => IdLayout::Scoped(&["workspace", "name"]),
        }
    }

    fn gone(&self) -> Gone {
        match self.parent {
            NotifierParent::Tenant => Gone::NotFound,
            NotifierParent::Workspace => Gone::NotFoundOrOrgForbidden,
        }
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Notifier> {
        let request = CreateNotifierRequest {
            name: plan.required_string("name")?,
            notifies: plan.required_json("notifies")?,
            state: plan.string("state"),
        };
        Ok(self.notifiers(cx, plan).await?.create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Notifier>> {
        let name = state.required_string("name")?;
        Ok(Some(self.notifiers(cx, state).await?.get(&name).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Notifier> {
        let request = UpdateNotifierRequest {
            name: changed_string(prior, plan, "name"),
            notifies: changed_json(prior, plan, "notifies")?,
            state: changed_string(prior, plan, "state"),
        };
        let name = prior.required_string("name")?;
        Ok(self
            .notifiers(cx, prior)
            .await?
            .update(&name, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let name = state.required_string("name")?;
        Ok(self.notifiers(cx, state).await?.delete(&name).await?)
    }

    fn write_state(&self, notifier: &Notifier, state: &mut DynamicValue) {
        state.put_string("notifier_id", &notifier.id);
        state.put_string("name", &notifier.name);
        state.put_json("notifies", notifier.notifies.as_ref());
        state.put_opt_string("state", notifier.state.as_deref());
        write_audit(state, &notifier.audit, notifier.version_id);
    }
}
