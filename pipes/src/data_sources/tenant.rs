//! pipes_tenant

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::lookup::LookupAdapter;
use crate::api::tenant::Tenant;
use crate::error::Result;
use crate::provider_data::Session;
use crate::resources::attrs::Attrs;
use crate::resources::common::{computed, required, with_audit, write_audit};

pub struct TenantLookup;

#[async_trait]
impl LookupAdapter for TenantLookup {
    type Model = Tenant;

    fn type_name(&self) -> &'static str {
        "pipes_tenant"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("Looks up a tenant by handle")
                .attribute(required("handle", "Handle of the tenant"))
                .attribute(computed("tenant_id", "Server ID of the tenant"))
                .attribute(computed("display_name", "Display name"))
                .attribute(computed("state", "Tenant state"))
                .attribute(computed("avatar_url", "Avatar image URL")),
        )
        .build()
    }

    async fn fetch(&self, cx: &Session<'_>, config: &DynamicValue) -> Result<Tenant> {
        let handle = config.required_string("handle")?;
        Ok(cx.client.tenant(&handle).get().await?)
    }

    fn write_state(&self, tenant: &Tenant, state: &mut DynamicValue) {
        state.put_string("tenant_id", &tenant.id);
        state.put_string("handle", &tenant.handle);
        state.put_opt_string("display_name", tenant.display_name.as_deref());
        state.put_opt_string("state", tenant.state.as_deref());
        state.put_opt_string("avatar_url", tenant.avatar_url.as_deref());
        write_audit(state, &tenant.audit, tenant.version_id);
    }
}
