use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::Audit;

/// Delivery channel binding, addressed by name
#[derive(Debug, Clone, Deserialize)]
pub struct Notifier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notifies: Option<Value>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateNotifierRequest {
    pub name: String,
    pub notifies: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateNotifierRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}
