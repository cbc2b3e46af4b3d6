//! Members of organizations, organization workspaces, workspaces and tenants
//!
//! pipes_organization_member, pipes_organization_workspace_member,
//! pipes_workspace_member and pipes_tenant_member share one adapter; the
//! parent decides the endpoint, the import key and the allowed roles.

use async_trait::async_trait;
use tfplug::plan_modifier::{RequiresReplaceIfChanged, UseStateForUnknown};
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::OneOfValidator;

use super::attrs::Attrs;
use super::common::{computed, force_new, organization, server_id, with_audit, write_audit};
use super::lifecycle::{Gone, ResourceAdapter};
use crate::api::member::{InviteMemberRequest, Member, UpdateMemberRequest};
use crate::api::Collection;
use crate::error::{PipesError, Result};
use crate::ids::IdLayout;
use crate::provider_data::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberParent {
    Organization,
    OrganizationWorkspace,
    Workspace,
    Tenant,
}

impl MemberParent {
    fn roles(&self) -> &'static [&'static str] {
        match self {
            MemberParent::Organization | MemberParent::Tenant => &["member", "owner"],
            MemberParent::OrganizationWorkspace | MemberParent::Workspace => {
                &["reader", "operator", "owner"]
            }
        }
    }

    async fn collection<'a>(
        &self,
        cx: &Session<'a>,
        attrs: &DynamicValue,
    ) -> Result<Collection<'a, Member>> {
        Ok(match self {
            MemberParent::Organization => cx
                .client
                .orgs()
                .members(&attrs.required_string("organization")?),
            MemberParent::OrganizationWorkspace => cx.client.orgs().workspace_members(
                &attrs.required_string("organization")?,
                &attrs.required_string("workspace_handle")?,
            ),
            MemberParent::Workspace => {
                let scope = cx.scope(attrs).await?;
                cx.client
                    .workspace(&scope, &attrs.required_string("workspace_handle")?)
                    .members()
            }
            MemberParent::Tenant => cx
                .client
                .tenant(&attrs.required_string("tenant")?)
                .members(),
        })
    }
}

pub struct MemberAdapter {
    pub parent: MemberParent,
}

impl MemberAdapter {
    pub fn new(parent: MemberParent) -> Self {
        Self { parent }
    }

    /// Members invited by email have no handle until they accept; those are
    /// found by listing the parent's members
    async fn find(
        &self,
        members: &Collection<'_, Member>,
        state: &DynamicValue,
    ) -> Result<Option<Member>> {
        if let Some(handle) = state.string("user_handle").filter(|h| !h.is_empty()) {
            return Ok(Some(members.get(&handle).await?));
        }

        let email = state.required_string("email")?;
        let found = members.list().await?.into_iter().find(|m| {
            m.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(&email))
        });
        Ok(found)
    }

    /// Key addressing an existing member: the handle, else the invite ID
    fn key(state: &DynamicValue) -> Result<String> {
        state
            .string("user_handle")
            .filter(|h| !h.is_empty())
            .or_else(|| state.string("member_id"))
            .ok_or_else(|| PipesError::MissingAttribute("user_handle".to_string()))
    }
}

#[async_trait]
impl ResourceAdapter for MemberAdapter {
    type Model = Member;

    fn type_name(&self) -> &'static str {
        match self.parent {
            MemberParent::Organization => "pipes_organization_member",
            MemberParent::OrganizationWorkspace => "pipes_organization_workspace_member",
            MemberParent::Workspace => "pipes_workspace_member",
            MemberParent::Tenant => "pipes_tenant_member",
        }
    }

    fn schema(&self) -> Schema {
        let mut builder = SchemaBuilder::new().description("A member and its role");
        builder = match self.parent {
            MemberParent::Organization => {
                builder.attribute(force_new("organization", "Handle of the organization"))
            }
            MemberParent::OrganizationWorkspace => builder
                .attribute(force_new("organization", "Handle of the organization"))
                .attribute(force_new("workspace_handle", "Handle of the workspace")),
            MemberParent::Workspace => builder
                .attribute(organization())
                .attribute(force_new("workspace_handle", "Handle of the workspace")),
            MemberParent::Tenant => {
                builder.attribute(force_new("tenant", "Handle of the tenant"))
            }
        };

        let invitee = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .description(description)
                .optional()
                .computed()
                .plan_modifier(UseStateForUnknown)
                .plan_modifier(RequiresReplaceIfChanged)
                .build()
        };

        with_audit(
            builder
                .attribute(invitee("user_handle", "Handle of an existing user to add"))
                .attribute(invitee("email", "Email address to invite"))
                .attribute(
                    AttributeBuilder::new("role", AttributeType::String)
                        .description("Role of the member")
                        .required()
                        .validator(OneOfValidator::new(self.parent.roles()))
                        .build(),
                )
                .attribute(server_id("member_id", "Server ID of the membership"))
                .attribute(server_id("user_id", "Server ID of the user"))
                .attribute(computed("status", "Invitation status")),
        )
        .build()
    }

    fn id_layout(&self) -> IdLayout {
        match self.parent {
            MemberParent::Organization => IdLayout::Fixed(&["organization", "user_handle"]),
            MemberParent::OrganizationWorkspace => {
                IdLayout::Fixed(&["organization", "workspace_handle", "user_handle"])
            }
            MemberParent::Workspace => IdLayout::Scoped(&["workspace_handle", "user_handle"]),
            MemberParent::Tenant => IdLayout::Fixed(&["tenant", "user_handle"]),
        }
    }

    fn gone(&self) -> Gone {
        Gone::NotFoundOrForbidden
    }

    fn check(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        let handle = config.attribute("user_handle");
        let email = config.attribute("email");
        let is_set = |v: Option<&Dynamic>| v.is_some_and(|v| v.as_string().is_some());
        let is_absent = |v: Option<&Dynamic>| v.map_or(true, Dynamic::is_null);

        if is_set(handle) && is_set(email) {
            vec![Diagnostic::error(
                "Conflicting invitee",
                "Set only one of user_handle and email",
            )]
        } else if is_absent(handle) && is_absent(email) {
            vec![Diagnostic::error(
                "Missing invitee",
                "One of user_handle or email is required",
            )]
        } else {
            vec![]
        }
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Member> {
        let handle = plan.string("user_handle");
        let email = plan.string("email");
        if handle.is_none() && email.is_none() {
            return Err(PipesError::MissingAttribute("user_handle or email".to_string()));
        }

        let request = InviteMemberRequest {
            handle,
            email,
            role: plan.required_string("role")?,
        };
        let members = self.parent.collection(cx, plan).await?;
        Ok(members.invite(&request).await?)
    }

    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Member>> {
        let members = self.parent.collection(cx, state).await?;
        self.find(&members, state).await
    }

    async fn update(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
        version: i64,
    ) -> Result<Member> {
        let request = UpdateMemberRequest {
            role: plan.required_string("role")?,
        };
        let members = self.parent.collection(cx, prior).await?;
        Ok(members
            .update(&Self::key(prior)?, &request, Some(version))
            .await?)
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()> {
        let members = self.parent.collection(cx, state).await?;
        Ok(members.delete(&Self::key(state)?).await?)
    }

    fn write_state(&self, member: &Member, state: &mut DynamicValue) {
        state.put_string("member_id", &member.id);
        state.put_opt_string("user_id", member.user_id.as_deref());
        if let Some(handle) = &member.user_handle {
            state.put_string("user_handle", handle);
        }
        if let Some(email) = &member.email {
            state.put_string("email", email);
        }
        state.put_opt_string("role", member.role.as_deref());
        state.put_opt_string("status", member.status.as_deref());
        write_audit(state, &member.audit, member.version_id);
    }
}
