//! Members of organizations, workspaces and tenants
//!
//! All member collections share one shape and are keyed by user handle.

use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::common::Audit;
use super::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_handle: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version_id: i64,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Invite an existing user by handle, or anyone by email
#[derive(Debug, Serialize)]
pub struct InviteMemberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateMemberRequest {
    pub role: String,
}

impl<'a> Collection<'a, Member> {
    /// POST {path}/invite
    pub async fn invite(&self, request: &InviteMemberRequest) -> Result<Member, ApiError> {
        self.create_at("invite", request).await
    }
}
