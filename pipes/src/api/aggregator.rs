use serde::{Deserialize, Serialize};

use super::common::Audit;

/// Virtual connection fanning out over connections matched by glob
#[derive(Debug, Clone, Deserialize)]
pub struct Aggregator {
    pub id: String,
    pub handle: String,
    pub plugin: String,
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default, rename = "type")]
    pub aggregator_type: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateAggregatorRequest {
    pub handle: String,
    pub plugin: String,
    pub connections: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateAggregatorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<String>>,
}
