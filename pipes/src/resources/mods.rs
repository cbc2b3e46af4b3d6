//! Steampipe and flowpipe mods installed into a workspace
//!
//! The server derives the alias from the mod path; the alias addresses the
//! mod afterwards.

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_string, Attrs};
use super::common::{
    computed, force_new, optional_computed, organization, server_id, with_audit, workspace,
    write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::mods::{CreateModRequest, Mod, ModFlavor, UpdateModRequest};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct ModAdapter {
    flavor: ModFlavor,
}

impl ModAdapter {
    pub fn new(flavor: ModFlavor) -> Self {
        Self { flavor }
    }
}

#[async_trait]
impl ResourceAdapter for ModAdapter {
    type Model = Mod;

    fn type_name(&self) -> &'static str {
        match self.flavor {
            ModFlavor::Steampipe => "pipes_workspace_mod",
            ModFlavor::Flowpipe => "pipes_workspace_flowpipe_mod",
        }
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("A mod installed into a workspace")
                .attribute(organization())
                .attribute(workspace())
                .attribute(force_new(
                    "path",
                    "Repository path, e.g. github.com/turbot/steampipe-mod-aws-compliance",
                ))
                .attribute(
                    optional_computed("constraint", "Version constraint; defaults to the latest")
                        .build(),
                )
                .attribute(server_id("alias", "Alias the mod is addressed by"))
                .attribute(computed("installed_version", "Version currently installed"))
                .attribute(computed("state", "Installation state"))
                .attribute(server_id("mod_id", "Server ID of the mod"))
                .attribute(server_id("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "alias"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Mod> {
        let request = CreateModRequest {
            path: plan.required_string("path")?,
            constraint: plan.string("constraint"),
        };
        Ok(cx
            .workspace(plan)
            .await?
            .mods(self.flavor)
            .create(&request)
            .await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Mod>> {
        let alias = state.required_string("alias")?;
        Ok(Some(cx.workspace(state).await?.mods(self.flavor).get(&alias).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Mod> {
        let mods = cx.workspace(prior).await?.mods(self.flavor);
        let alias = prior.required_string("alias")?;
        match changed_string(prior, plan, "constraint") {
            Some(constraint) => {
                let request = UpdateModRequest { constraint };
                Ok(mods.update(&alias, &request, Some(version)).await?)
            }
            None => Ok(mods.get(&alias).await?),
        }
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let alias = state.required_string("alias")?;
        Ok(cx.workspace(state).await?.mods(self.flavor).delete(&alias).await?)
    }

    fn write_state(&self, installed: &Mod, state: &mut DynamicValue) {
        state.put_string("mod_id", &installed.id);
        state.put_string("alias", &installed.alias);
        state.put_string("path", &installed.path);
        state.put_opt_string("constraint", installed.constraint.as_deref());
        state.put_opt_string("installed_version", installed.installed_version.as_deref());
        state.put_opt_string("state", installed.state.as_deref());
        state.put_opt_string("workspace_id", installed.workspace_id.as_deref());
        write_audit(state, &installed.audit, installed.version_id);
    }
}
