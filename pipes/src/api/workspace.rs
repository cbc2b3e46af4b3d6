//! Identity- and workspace-level API
//!
//! Every endpoint here exists twice, under `/user/{handle}` and
//! `/org/{handle}`; the `Scope` picks the family.

use serde::{Deserialize, Serialize};

use super::aggregator::Aggregator;
use super::collection::Collection;
use super::common::{segment, Audit};
use super::connection::{Connection, ConnectionFolder, Permission};
use super::datatank::{Datatank, DatatankTable};
use super::integration::Integration;
use super::member::Member;
use super::mods::{Mod, ModFlavor, ModVariablesApi};
use super::notifier::Notifier;
use super::pipeline::{Pipeline, PipelineCommand, PipelineCommandResponse, Process};
use super::scope::Scope;
use super::{ApiError, Client};

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub identity_id: Option<String>,
    #[serde(default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub desired_state: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub hive: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkspaceRequest {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateWorkspaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_state: Option<String>,
}

/// A connection or aggregator mounted into a workspace as a schema
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSchema {
    pub name: String,
    #[serde(default, rename = "type")]
    pub schema_type: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Serialize)]
pub struct CreateWorkspaceSchemaRequest {
    pub schema: String,
}

/// Endpoints owned directly by a user or organization
pub struct IdentityApi<'a> {
    client: &'a Client,
    base: String,
}

impl<'a> IdentityApi<'a> {
    pub fn new(client: &'a Client, scope: &Scope) -> Self {
        Self {
            client,
            base: scope.base_path(),
        }
    }

    pub fn workspaces(&self) -> Collection<'a, Workspace> {
        self.collection("workspace")
    }

    pub fn connections(&self) -> Collection<'a, Connection> {
        self.collection("connection")
    }

    pub fn connection_folders(&self) -> Collection<'a, ConnectionFolder> {
        self.collection("connection_folder")
    }

    /// {identity}/connection/{connection}/permission
    pub fn connection_permissions(&self, connection: &str) -> Collection<'a, Permission> {
        self.connections().child(connection, "permission")
    }

    /// {identity}/connection_folder/{folder}/permission
    pub fn folder_permissions(&self, folder: &str) -> Collection<'a, Permission> {
        self.connection_folders().child(folder, "permission")
    }

    pub fn integrations(&self) -> Collection<'a, Integration> {
        self.collection("integration")
    }

    fn collection<T>(&self, name: &str) -> Collection<'a, T> {
        self.client.collection(format!("{}/{}", self.base, name))
    }
}

/// Endpoints inside one workspace
pub struct WorkspaceApi<'a> {
    client: &'a Client,
    base: String,
}

impl<'a> WorkspaceApi<'a> {
    pub fn new(client: &'a Client, scope: &Scope, workspace: &str) -> Self {
        Self {
            client,
            base: format!("{}/workspace/{}", scope.base_path(), segment(workspace)),
        }
    }

    pub fn path(&self) -> &str {
        &self.base
    }

    pub fn members(&self) -> Collection<'a, Member> {
        self.collection("member")
    }

    pub fn connections(&self) -> Collection<'a, Connection> {
        self.collection("connection")
    }

    /// Also lists every folder the workspace can reach through permissions
    pub fn connection_folders(&self) -> Collection<'a, ConnectionFolder> {
        self.collection("connection_folder")
    }

    pub fn aggregators(&self) -> Collection<'a, Aggregator> {
        self.collection("aggregator")
    }

    pub fn datatanks(&self) -> Collection<'a, Datatank> {
        self.collection("datatank")
    }

    /// {workspace}/datatank/{datatank}/table
    pub fn datatank_tables(&self, datatank: &str) -> Collection<'a, DatatankTable> {
        self.datatanks().child(datatank, "table")
    }

    pub fn mods(&self, flavor: ModFlavor) -> Collection<'a, Mod> {
        self.collection(flavor.collection())
    }

    pub fn mod_variables(&self, flavor: ModFlavor, alias: &str) -> ModVariablesApi<'a> {
        ModVariablesApi::new(
            self.client,
            format!(
                "{}/{}/{}/variable",
                self.base,
                flavor.collection(),
                segment(alias)
            ),
        )
    }

    pub fn pipelines(&self) -> Collection<'a, Pipeline> {
        self.collection("pipeline")
    }

    /// POST {workspace}/pipeline/{pipeline}/command
    pub async fn run_pipeline(
        &self,
        pipeline_id: &str,
    ) -> Result<PipelineCommandResponse, ApiError> {
        self.pipelines()
            .command(pipeline_id, "command", &PipelineCommand::run())
            .await
    }

    pub fn notifiers(&self) -> Collection<'a, Notifier> {
        self.collection("notifier")
    }

    pub fn schemas(&self) -> Collection<'a, WorkspaceSchema> {
        self.collection("schema")
    }

    /// GET {workspace}/process/{process}
    pub async fn process(&self, process_id: &str) -> Result<Process, ApiError> {
        self.collection::<Process>("process").get(process_id).await
    }

    fn collection<T>(&self, name: &str) -> Collection<'a, T> {
        self.client.collection(format!("{}/{}", self.base, name))
    }
}
