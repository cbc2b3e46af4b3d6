use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Audit, Patch};

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub title: String,
    pub pipeline: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub args: Option<Value>,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub desired_state: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub last_process_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreatePipelineRequest {
    pub title: String,
    pub pipeline: String,
    pub frequency: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdatePipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}

/// Body of POST .../pipeline/{id}/command
#[derive(Debug, Serialize)]
pub struct PipelineCommand {
    pub command: String,
}

impl PipelineCommand {
    pub fn run() -> Self {
        Self {
            command: "run".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineCommandResponse {
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A unit of asynchronous server work, e.g. one pipeline run
#[derive(Debug, Clone, Deserialize)]
pub struct Process {
    pub id: String,
    #[serde(rename = "type")]
    pub process_type: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pipeline_id: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}
