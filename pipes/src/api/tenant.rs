//! Tenant-level API: members, shared connections, folders and notifiers

use serde::Deserialize;

use super::collection::Collection;
use super::common::{segment, Audit};
use super::connection::{Connection, ConnectionFolder, Permission};
use super::integration::Integration;
use super::member::Member;
use super::notifier::Notifier;
use super::{ApiError, Client};

#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

pub struct TenantApi<'a> {
    client: &'a Client,
    base: String,
}

impl<'a> TenantApi<'a> {
    pub fn new(client: &'a Client, tenant: &str) -> Self {
        Self {
            client,
            base: format!("/tenant/{}", segment(tenant)),
        }
    }

    /// GET /tenant/{tenant}
    pub async fn get(&self) -> Result<Tenant, ApiError> {
        self.client.get(&self.base).await
    }

    pub fn members(&self) -> Collection<'a, Member> {
        self.collection("member")
    }

    pub fn connections(&self) -> Collection<'a, Connection> {
        self.collection("connection")
    }

    pub fn connection_folders(&self) -> Collection<'a, ConnectionFolder> {
        self.collection("connection_folder")
    }

    /// /tenant/{tenant}/connection/{connection}/permission
    pub fn connection_permissions(&self, connection: &str) -> Collection<'a, Permission> {
        self.connections().child(connection, "permission")
    }

    /// /tenant/{tenant}/connection_folder/{folder}/permission
    pub fn folder_permissions(&self, folder: &str) -> Collection<'a, Permission> {
        self.connection_folders().child(folder, "permission")
    }

    pub fn notifiers(&self) -> Collection<'a, Notifier> {
        self.collection("notifier")
    }

    pub fn integrations(&self) -> Collection<'a, Integration> {
        self.collection("integration")
    }

    fn collection<T>(&self, name: &str) -> Collection<'a, T> {
        self.client.collection(format!("{}/{}", self.base, name))
    }
}
