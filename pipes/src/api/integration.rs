use serde::Deserialize;
use serde_json::Value;

use super::common::Audit;

/// External endpoint registration (GitHub app, Slack, email, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct Integration {
    pub id: String,
    pub handle: String,
    #[serde(default, rename = "type")]
    pub integration_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub pipeline_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}
