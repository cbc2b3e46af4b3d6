//! Settings of mod variables
//!
//! The variable itself belongs to the installed mod; this resource manages
//! only its setting. A variable without a setting counts as gone.

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::Attrs;
use super::common::{
    computed, force_new, json_blob, organization, with_audit, workspace, write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::mods::{
    CreateModVariableSettingRequest, ModFlavor, ModVariable, ModVariablesApi,
    UpdateModVariableSettingRequest,
};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

pub struct ModVariableAdapter {
    flavor: ModFlavor,
}

impl ModVariableAdapter {
    pub fn new(flavor: ModFlavor) -> Self {
        Self { flavor }
    }

    async fn variables<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<ModVariablesApi<'a>> {
        let alias = attrs.required_string("mod_alias")?;
        Ok(cx.workspace(attrs).await?.mod_variables(self.flavor, &alias))
    }
}

#[async_trait]
impl ResourceAdapter for ModVariableAdapter {
    type Model = ModVariable;

    fn type_name(&self) -> &'static str {
        match self.flavor {
            ModFlavor::Steampipe => "pipes_workspace_mod_variable",
            ModFlavor::Flowpipe => "pipes_workspace_flowpipe_mod_variable",
        }
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("The setting of one variable of an installed mod")
                .attribute(organization())
                .attribute(workspace())
                .attribute(force_new("mod_alias", "Alias of the installed mod"))
                .attribute(force_new("name", "Name of the variable"))
                .attribute(
                    json_blob("setting_value", "Value to set, as JSON")
                        .required()
                        .build(),
                )
                .attribute(computed("default_value", "Default declared by the mod, as JSON"))
                .attribute(computed("value", "Effective value, as JSON"))
                .attribute(computed("description", "Description declared by the mod"))
                .attribute(computed("type", "Type declared by the mod")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Identity(&["workspace", "mod_alias", "name"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<ModVariable> {
        let request = CreateModVariableSettingRequest {
            name: plan.required_string("name")?,
            setting: plan.required_json("setting_value")?,
        };
        Ok(self.variables(cx, plan).await?.create_setting(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<ModVariable>> {
        let name = state.required_string("name")?;
        let variable = self.variables(cx, state).await?.get(&name).await?;
        Ok(variable.setting_value.is_some().then_some(variable))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<ModVariable> {
        let request = UpdateModVariableSettingRequest {
            setting: plan.required_json("setting_value")?,
        };
        let name = prior.required_string("name")?;
        Ok(self
            .variables(cx, prior)
            .await?
            .update_setting(&name, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let name = state.required_string("name")?;
        Ok(self.variables(cx, state).await?.delete_setting(&name).await?)
    }

    fn write_state(&self, variable: &ModVariable, state: &mut DynamicValue) {
        state.put_string("name", &variable.name);
        state.put_json("setting_value", variable.setting_value.as_ref());
        state.put_json("default_value", variable.default_value.as_ref());
        state.put_json("value", variable.value.as_ref());
        state.put_opt_string("description", variable.description.as_deref());
        state.put_opt_string("type", variable.variable_type.as_deref());
        write_audit(state, &variable.audit, variable.version_id);
    }
}
