use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Audit, Patch};

#[derive(Debug, Clone, Deserialize)]
pub struct Datatank {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub part_per: Option<String>,
    #[serde(default)]
    pub desired_state: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateDatatankRequest {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_per: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateDatatankRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}

/// One cached table of a datatank, refreshed on `frequency`
#[derive(Debug, Clone, Deserialize)]
pub struct DatatankTable {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub table_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub part_per: Option<String>,
    #[serde(default)]
    pub source_schema: Option<String>,
    #[serde(default)]
    pub source_table: Option<String>,
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub desired_state: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub datatank_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateDatatankTableRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub table_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_per: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Value>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateDatatankTableRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}
