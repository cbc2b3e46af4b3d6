//! pipes_process

use async_trait::async_trait;
use tfplug::schema::{Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::lookup::LookupAdapter;
use crate::api::pipeline::Process;
use crate::error::Result;
use crate::provider_data::Session;
use crate::resources::attrs::Attrs;
use crate::resources::common::{computed, optional, required, with_audit, write_audit};

pub struct ProcessLookup;

#[async_trait]
impl LookupAdapter for ProcessLookup {
    type Model = Process;

    fn type_name(&self) -> &'static str {
        "pipes_process"
    }

    fn schema(&self) -> Schema {
        with_audit(
            SchemaBuilder::new()
                .description("Looks up a process, such as a pipeline run, in a workspace")
                .attribute(optional(
                    "organization",
                    "Handle of the owning organization. Leave unset for the calling user.",
                ))
                .attribute(required("workspace", "Handle of the workspace"))
                .attribute(required("process_id", "ID of the process"))
                .attribute(computed("type", "Process type, e.g. pipeline.command.run"))
                .attribute(computed("state", "Process state"))
                .attribute(computed("pipeline_id", "Pipeline that started the process"))
                .attribute(computed("identity_id", "Server ID of the owning identity"))
                .attribute(computed("workspace_id", "Server ID of the workspace")),
        )
        .build()
    }

    async fn fetch(&self, cx: &Session<'_>, config: &DynamicValue) -> Result<Process> {
        let id = config.required_string("process_id")?;
        Ok(cx.workspace(config).await?.process(&id).await?)
    }

    fn write_state(&self, process: &Process, state: &mut DynamicValue) {
        state.put_string("process_id", &process.id);
        state.put_string("type", &process.process_type);
        state.put_opt_string("state", process.state.as_deref());
        state.put_opt_string("pipeline_id", process.pipeline_id.as_deref());
        state.put_opt_string("identity_id", process.identity_id.as_deref());
        state.put_opt_string("workspace_id", process.workspace_id.as_deref());
        write_audit(state, &process.audit, process.version_id);
    }
}
