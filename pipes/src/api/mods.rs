//! Mods installed into a workspace and their variable settings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{segment, Audit};
use super::{ApiError, Client};

/// Steampipe mods live under `mod`, flowpipe mods under `flowpipe/mod`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModFlavor {
    Steampipe,
    Flowpipe,
}

impl ModFlavor {
    pub fn collection(&self) -> &'static str {
        match self {
            ModFlavor::Steampipe => "mod",
            ModFlavor::Flowpipe => "flowpipe/mod",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mod {
    pub id: String,
    pub alias: String,
    pub path: String,
    #[serde(default)]
    pub constraint: Option<String>,
    #[serde(default)]
    pub installed_version: Option<String>,
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
pub struct CreateModRequest {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateModRequest {
    pub constraint: String,
}

/// A mod variable; `value` is the setting when present, else the default
#[derive(Debug, Clone, Deserialize)]
pub struct ModVariable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub variable_type: Option<String>,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub setting_value: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateModVariableSettingRequest {
    pub name: String,
    pub setting: Value,
}

#[derive(Debug, Serialize)]
pub struct UpdateModVariableSettingRequest {
    pub setting: Value,
}

/// {workspace}/{mod|flowpipe/mod}/{alias}/variable
pub struct ModVariablesApi<'a> {
    client: &'a Client,
    base: String,
}

impl<'a> ModVariablesApi<'a> {
    pub fn new(client: &'a Client, base: String) -> Self {
        Self { client, base }
    }

    pub fn path(&self) -> &str {
        &self.base
    }

    /// GET {base}/{name}
    pub async fn get(&self, name: &str) -> Result<ModVariable, ApiError> {
        self.client
            .get(&format!("{}/{}", self.base, segment(name)))
            .await
    }

    /// POST {base}/setting
    pub async fn create_setting(
        &self,
        request: &CreateModVariableSettingRequest,
    ) -> Result<ModVariable, ApiError> {
        self.client
            .post(&format!("{}/setting", self.base), request)
            .await
    }

    /// PATCH {base}/{name}/setting
    pub async fn update_setting(
        &self,
        name: &str,
        request: &UpdateModVariableSettingRequest,
        version: Option<i64>,
    ) -> Result<ModVariable, ApiError> {
        self.client
            .patch(&self.setting_path(name), request, version)
            .await
    }

    /// DELETE {base}/{name}/setting
    pub async fn delete_setting(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(&self.setting_path(name)).await
    }

    fn setting_path(&self, name: &str) -> String {
        format!("{}/{}/setting", self.base, segment(name))
    }
}
