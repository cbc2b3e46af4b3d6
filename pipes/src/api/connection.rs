//! Connections, connection folders and their workspace permissions
//!
//! The same shapes are served at identity, tenant and workspace level.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Audit, Patch};

#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub id: String,
    pub handle: String,
    pub plugin: String,
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default, rename = "type")]
    pub connection_type: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Request body for creating connections
#[derive(Debug, Serialize)]
pub struct CreateConnectionRequest {
    pub handle: String,
    pub plugin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateConnectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Patch<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionFolder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateConnectionFolderRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateConnectionFolderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Patch<String>,
}

/// Grant of a connection or folder to one workspace of an identity
#[derive(Debug, Clone, Deserialize)]
pub struct Permission {
    pub id: String,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub connection_folder_id: Option<String>,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub identity_handle: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_handle: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Create and update share one body: the grant target
#[derive(Debug, Default, Serialize)]
pub struct PermissionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_handle: Option<String>,
}
