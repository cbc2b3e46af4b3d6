//! pipes_workspace_pipeline
//!
//! Pipelines are keyed by their server ID. Running one is a command outside
//! the lifecycle; the next read picks up `last_process_id`.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::attrs::{changed_json, changed_string, patch_string, Attrs};
use super::common::{
    computed, desired_state, force_new, json_blob, optional, organization, required, server_id,
    with_audit, workspace, write_audit,
};
use super::lifecycle::{guard, Gone, ResourceAdapter};
use crate::api::pipeline::{
    CreatePipelineRequest, Pipeline, PipelineCommandResponse, UpdatePipelineRequest,
};
use crate::error::{PipesError, Result};
use crate::ids::IdLayout;
use crate::provider_data::{PipesProviderData, Session};

pub struct PipelineAdapter;

#[async_trait]
impl ResourceAdapter for PipelineAdapter {
    type Model = Pipeline;

    fn type_name(&self) -> &'static str {
        "pipes_workspace_pipeline"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("A scheduled pipeline in a workspace")
                .attribute(organization())
                .attribute(workspace())
                .attribute(required("title", "Title of the pipeline"))
                .attribute(force_new(
                    "pipeline",
                    "Pipeline to run, e.g. pipeline.snapshot_dashboard",
                ))
                .attribute(optional("description", "Description of the pipeline"))
                .attribute(
                    json_blob("frequency", "Schedule as JSON")
                        .required()
                        .build(),
                )
                .attribute(
                    json_blob("args", "Pipeline arguments as JSON")
                        .optional()
                        .computed()
                        .build(),
                )
                .attribute(
                    json_blob("tags", "Tags as a JSON object")
                        .optional()
                        .computed()
                        .default(StaticDefault::string("{}"))
                        .build(),
                )
                .attribute(desired_state("Whether the schedule is active"))
                .attribute(computed("state", "Current state of the pipeline"))
                .attribute(computed("last_process_id", "Process of the most recent run"))
                .attribute(server_id("pipeline_id", "Server ID of the pipeline"))
                .attribute(server_id("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        IdLayout::Scoped(&["workspace", "pipeline_id"])
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrOrgForbidden
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Pipeline> {
        let request = CreatePipelineRequest {
            title: plan.required_string("title")?,
            pipeline: plan.required_string("pipeline")?,
            frequency: plan.required_json("frequency")?,
            description: plan.string("description"),
            args: plan.json("args")?,
            tags: plan.json("tags")?,
            desired_state: plan.string("desired_state"),
        };
        Ok(cx.workspace(plan).await?.pipelines().create(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Pipeline>> {
        let id = state.required_string("pipeline_id")?;
        Ok(Some(cx.workspace(state).await?.pipelines().get(&id).await?))
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Pipeline> {
        let request = UpdatePipelineRequest {
            title: changed_string(prior, plan, "title"),
            description: patch_string(prior, plan, "description"),
            frequency: changed_json(prior, plan, "frequency")?,
            args: changed_json(prior, plan, "args")?,
            tags: changed_json(prior, plan, "tags")?,
            desired_state: changed_string(prior, plan, "desired_state"),
        };
        let id = prior.required_string("pipeline_id")?;
        Ok(cx
            .workspace(prior)
            .await?
            .pipelines()
            .update(&id, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let id = state.required_string("pipeline_id")?;
        Ok(cx.workspace(state).await?.pipelines().delete(&id).await?)
    }

    fn write_state(&self, pipeline: &Pipeline, state: &mut DynamicValue) {
        state.put_string("pipeline_id", &pipeline.id);
        state.put_string("title", &pipeline.title);
        state.put_string("pipeline", &pipeline.pipeline);
        state.put_opt_string("description", pipeline.description.as_deref());
        state.put_json("frequency", pipeline.frequency.as_ref());
        state.put_json("args", pipeline.args.as_ref());
        state.put_json("tags", pipeline.tags.as_ref());
        state.put_opt_string("desired_state", pipeline.desired_state.as_deref());
        state.put_opt_string("state", pipeline.state.as_deref());
        state.put_opt_string("last_process_id", pipeline.last_process_id.as_deref());
        state.put_opt_string("workspace_id", pipeline.workspace_id.as_deref());
        write_audit(state, &pipeline.audit, pipeline.version_id);
    }
}

/// Trigger an immediate run of the pipeline described by `state`.
///
/// Nothing is written to state; the returned process ID shows up as
/// `last_process_id` on the next read.
pub async fn run_pipeline(
    ctx: &Context,
    provider_data: &PipesProviderData,
    state: &DynamicValue,
) -> Result<PipelineCommandResponse> {
    let cx = provider_data.session();
    let id = state.required_string("pipeline_id")?;
    let work = async {
        let response = cx.workspace(state).await?.run_pipeline(&id).await?;
        tracing::info!(pipeline = %id, process = ?response.process_id, "pipeline run requested");
        Ok::<_, PipesError>(response)
    };
    guard(ctx, work).await
}
