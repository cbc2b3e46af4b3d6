//! pipes_organization

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, patch_string, Attrs};
use super::common::{computed, optional, required, server_id, with_audit, write_audit};
use super::lifecycle::ResourceAdapter;
use crate::api::org::{CreateOrgRequest, Org, UpdateOrgRequest};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct OrganizationAdapter;

#[async_trait]
impl ResourceAdapter for OrganizationAdapter {
    type Model = Org;

    fn type_name(&self) -> &'static str {
        "pipes_organization"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("An organization that owns workspaces and connections")
                .attribute(required("handle", "Unique handle of the organization"))
                .attribute(optional("display_name", "Display name"))
                .attribute(optional("url", "Website of the organization"))
                .attribute(computed("avatar_url", "Avatar image URL"))
                .attribute(server_id("organization_id", "Server ID of the organization")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Fixed(&["handle"])
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Org> {
        let request = CreateOrgRequest {
            handle: plan.required_string("handle")?,
            display_name: plan.string("display_name"),
            url: plan.string("url"),
        };
        Ok(cx.client.orgs().all().create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Org>> {
        let handle = state.required_string("handle")?;
        Ok(Some(cx.client.orgs().all().get(&handle).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Org> {
        let request = UpdateOrgRequest {
            handle: changed_string(prior, plan, "handle"),
            display_name: patch_string(prior, plan, "display_name"),
            url: patch_string(prior, plan, "url"),
        };
        let handle = prior.required_string("handle")?;
        Ok(cx
            .client
            .orgs()
            .all()
            .update(&handle, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let handle = state.required_string("handle")?;
        Ok(cx.client.orgs().all().delete(&handle).await?)
    }

    fn write_state(&self, org: &Org, state: &mut DynamicValue) {
        state.put_string("organization_id", &org.id);
        state.put_string("handle", &org.handle);
        state.put_opt_string("display_name", org.display_name.as_deref());
        state.put_opt_string("url", org.url.as_deref());
        state.put_opt_string("avatar_url", org.avatar_url.as_deref());
        write_audit(state, &org.audit, org.version_id);
    }
}
