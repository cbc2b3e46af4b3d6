//! Datatanks and their tables

use async_trait::async_trait;
use tfplug::plan_modifier::RequiresReplaceIfChanged;
use tfplug::schema::{Attribute, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::OneOfValidator;

use super::attrs::{changed_json, changed_string, patch_string, Attrs};
use super::common::{
    computed, desired_state, force_new, json_blob, optional, optional_computed, organization,
    required, server_id, with_audit, workspace, write_audit,
};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::datatank::{
    CreateDatatankRequest, CreateDatatankTableRequest, Datatank, DatatankTable,
    UpdateDatatankRequest, UpdateDatatankTableRequest,
};
use crate::error::Result;
use crate::ids::IdLayout;
use crate::provider_data::Session;

const PART_PER: &[&str] = &["connection"];
const TABLE_TYPES: &[&str] = &["table"];

fn part_per() -> Attribute {
    optional_computed("part_per", "Partitioning of cached tables")
        .validator(OneOfValidator::new(PART_PER))
        .plan_modifier(RequiresReplaceIfChanged)
        .build()
}

pub struct DatatankAdapter;

#[async_trait]
impl ResourceAdapter for DatatankAdapter {
    type Model = Datatank;

    fn type_name(&self) -> &'static str {
        "pipes_workspace_datatank"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("A datatank caching query results inside a workspace")
                .attribute(organization())
                .attribute(workspace())
                .attribute(required("handle", "Handle of the datatank"))
                .attribute(optional("description", "Description of the datatank"))
                .attribute(part_per())
                .attribute(desired_state("Whether the datatank should refresh"))
                .attribute(computed("state", "Current state of the datatank"))
                .attribute(server_id("datatank_id", "Server ID of the datatank"))
                .attribute(server_id("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "handle"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    /// The create body has no desired_state; a differing one is applied with
    /// a follow-up PATCH. The datatank exists once the POST succeeds, so a
    /// failed PATCH still records it and the next plan shows the drift.
    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Datatank> {
        let request = CreateDatatankRequest {
            handle: plan.required_string("handle")?,
            description: plan.string("description"),
            part_per: plan.string("part_per"),
        };
        let datatanks = cx.workspace(plan).await?.datatanks();
        let created = datatanks.create(&request).await?;

        let wanted = match plan.string("desired_state") {
            Some(wanted) if created.desired_state.as_deref() != Some(wanted.as_str()) => wanted,
            _ => return Ok(created),
        };
        let update = UpdateDatatankRequest {
            desired_state: Some(wanted),
            ..Default::default()
        };
        match datatanks
            .update(&created.handle, &update, Some(created.version_id))
            .await
        {
            Ok(updated) => Ok(updated),
            Err(e) => {
                tracing::warn!(
                    resource = self.type_name(),
                    handle = %created.handle,
                    "datatank created but setting desired_state failed: {}",
                    e
                );
                Ok(created)
            }
        }
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Datatank>> {
        let handle = state.required_string("handle")?;
        Ok(Some(cx.workspace(state).await?.datatanks().get(&handle).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Datatank> {
        let request = UpdateDatatankRequest {
            handle: changed_string(prior, plan, "handle"),
            description: patch_string(prior, plan, "description"),
            desired_state: changed_string(prior, plan, "desired_state"),
        };
        let handle = prior.required_string("handle")?;
        Ok(cx
            .workspace(prior)
            .await?
            .datatanks()
            .update(&handle, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let handle = state.required_string("handle")?;
        Ok(cx.workspace(state).await?.datatanks().delete(&handle).await?)
    }

    fn write_state(&self, datatank: &Datatank, state: &mut DynamicValue) {
        state.put_string("datatank_id", &datatank.id);
        state.put_string("handle", &datatank.handle);
        state.put_opt_string("description", datatank.description.as_deref());
        state.put_opt_string("part_per", datatank.part_per.as_deref());
        state.put_opt_string("desired_state", datatank.desired_state.as_deref());
        state.put_opt_string("state", datatank.state.as_deref());
        state.put_opt_string("workspace_id", datatank.workspace_id.as_deref());
        write_audit(state, &datatank.audit, datatank.version_id);
    }
}

/// pipes_workspace_datatank_table
///
/// Creation fails when no aggregator or connection matches the source; the
/// server error is surfaced as is.
pub struct DatatankTableAdapter;

#[async_trait]
impl ResourceAdapter for DatatankTableAdapter {
    type Model = DatatankTable;

    fn type_name(&self) -> &'static str {
        "pipes_workspace_datatank_table"
    }

    fn schema(&self) -> Schema {
        let source = |name: &str, description: &str| {
            optional_computed(name, description)
                .plan_modifier(RequiresReplaceIfChanged)
                .build()
        };

        with_audit(
            SchemaBuilder::new()
                .description("A table cached in a datatank")
                .attribute(organization())
                .attribute(workspace())
                .attribute(force_new("datatank", "Handle of the parent datatank"))
                .attribute(force_new("name", "Name of the table"))
                .attribute(
                    optional_computed("type", "Kind of table")
                        .validator(OneOfValidator::new(TABLE_TYPES))
                        .plan_modifier(RequiresReplaceIfChanged)
                        .build(),
                )
                .attribute(optional("description", "Description of the table"))
                .attribute(part_per())
                .attribute(source("source_schema", "Schema the table is copied from"))
                .attribute(source("source_table", "Table the table is copied from"))
                .attribute(
                    json_blob("frequency", "Refresh schedule as JSON")
                        .optional()
                        .computed()
                        .build(),
                )
                .attribute(desired_state("Whether the table should refresh"))
                .attribute(computed("state", "Current state of the table"))
                .attribute(server_id("datatank_table_id", "Server ID of the table"))
                .attribute(server_id("datatank_id", "Server ID of the datatank")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "datatank", "name"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<DatatankTable> {
        let request = CreateDatatankTableRequest {
            name: plan.required_string("name")?,
            table_type: plan.string("type").unwrap_or_else(|| TABLE_TYPES[0].to_string()),
            description: plan.string("description"),
            part_per: plan.string("part_per"),
            source_schema: plan.string("source_schema"),
            source_table: plan.string("source_table"),
            frequency: plan.json("frequency")?,
        };
        let datatank = plan.required_string("datatank")?;
        Ok(cx
            .workspace(plan)
            .await?
            .datatank_tables(&datatank)
            .create(&request)
            .await?)
    }

    async fn read(
        &self,
        cx: &Session<'_>,
        state: &DynamicValue,
    ) -> Result<Option<DatatankTable>> {
        let datatank = state.required_string("datatank")?;
        let name = state.required_string("name")?;
        Ok(Some(
            cx.workspace(state)
                .await?
                .datatank_tables(&datatank)
                .get(&name)
                .await?,
        ))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<DatatankTable> {
        let request = UpdateDatatankTableRequest {
            description: patch_string(prior, plan, "description"),
            frequency: changed_json(prior, plan, "frequency")?,
            desired_state: changed_string(prior, plan, "desired_state"),
        };
        let datatank = prior.required_string("datatank")?;
        let name = prior.required_string("name")?;
        Ok(cx
            .workspace(prior)
            .await?
            .datatank_tables(&datatank)
            .update(&name, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let datatank = state.required_string("datatank")?;
        let name = state.required_string("name")?;
        Ok(cx
            .workspace(state)
            .await?
            .datatank_tables(&datatank)
            .delete(&name)
            .await?)
    }

    fn write_state(&self, table: &DatatankTable, state: &mut DynamicValue) {
        state.put_string("datatank_table_id", &table.id);
        state.put_string("name", &table.name);
        state.put_opt_string("type", table.table_type.as_deref());
        state.put_opt_string("description", table.description.as_deref());
        state.put_opt_string("part_per", table.part_per.as_deref());
        state.put_opt_string("source_schema", table.source_schema.as_deref());
        state.put_opt_string("source_table", table.source_table.as_deref());
        state.put_json("frequency", table.frequency.as_ref());
        state.put_opt_string("desired_state", table.desired_state.as_deref());
        state.put_opt_string("state", table.state.as_deref());
        state.put_opt_string("datatank_id", table.datatank_id.as_deref());
        write_audit(state, &table.audit, table.version_id);
    }
}
