//! Organization API implementation

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::common::{segment, Audit, Patch};
use super::member::Member;
use super::Client;

#[derive(Debug, Clone, Deserialize)]
pub struct Org {
    pub id: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Request body for creating organizations
#[derive(Debug, Serialize)]
pub struct CreateOrgRequest {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Request body for updating organizations; unset fields are left alone
#[derive(Debug, Default, Serialize)]
pub struct UpdateOrgRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Patch<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Patch<String>,
}

pub struct OrgsApi<'a> {
    client: &'a Client,
}

impl<'a> OrgsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// /org
    pub fn all(&self) -> Collection<'a, Org> {
        self.client.collection("/org".to_string())
    }

    /// /org/{org}/member
    pub fn members(&self, org: &str) -> Collection<'a, Member> {
        self.client.collection(format!("/org/{}/member", segment(org)))
    }

    /// /org/{org}/workspace/{workspace}/member
    pub fn workspace_members(&self, org: &str, workspace: &str) -> Collection<'a, Member> {
        self.client.collection(format!(
            "/org/{}/workspace/{}/member",
            segment(org),
            segment(workspace)
        ))
    }
}
