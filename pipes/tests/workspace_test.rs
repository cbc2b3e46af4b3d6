mod common;

use common::*;
use futures::future::join_all;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::resource::ValidateResourceConfigRequest;
use tfplug::Context;

fn workspace_body(handle: &str, version: i64) -> String {
    json!({
        "id": "w_cjg5dsr4bj1jo4ic3mq0",
        "handle": handle,
        "identity_id": "u_0000000000000000001",
        "instance_type": "db1.shared",
        "desired_state": "enabled",
        "state": "enabled",
        "host": "dev-jane.usea1.db.pipes.turbot.com",
        "database_name": "dx5h3c",
        "hive": "usea1",
        "version_id": version,
        "created_at": "2024-03-01T10:00:00Z"
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn organization_attribute_routes_between_user_and_org_endpoints() {
    let mut server = Server::new_async().await;
    let actor_mock = actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let workspace = resource(&provider, &data, "pipes_workspace").await;

    let user_mock = server
        .mock("POST", "/api/v0/user/jane/workspace")
        .match_body(Matcher::Json(json!({"handle": "dev"})))
        .with_status(201)
        .with_body(workspace_body("dev", 1))
        .create_async()
        .await;
    let org_mock = server
        .mock("POST", "/api/v0/org/acme/workspace")
        .match_body(Matcher::Json(json!({"handle": "prod", "instance_type": "db1.small"})))
        .with_status(201)
        .with_body(workspace_body("prod", 1))
        .create_async()
        .await;

    // An empty organization means the calling user, like an absent one
    let user = create(&*workspace, json!({"organization": "", "handle": "dev"})).await;
    assert!(user.diagnostics.is_empty(), "{:?}", user.diagnostics);
    assert_eq!(string(&user.new_state, "host").as_deref(), Some("dev-jane.usea1.db.pipes.turbot.com"));
    assert_eq!(string(&user.new_state, "workspace_state").as_deref(), Some("enabled"));

    let org = create(
        &*workspace,
        json!({"organization": "acme", "handle": "prod", "instance_type": "db1.small"}),
    )
    .await;
    assert!(org.diagnostics.is_empty(), "{:?}", org.diagnostics);

    user_mock.assert_async().await;
    org_mock.assert_async().await;

    // Every user-scoped call shares the cached actor handle
    server
        .mock("GET", "/api/v0/user/jane/workspace/dev")
        .with_body(workspace_body("dev", 1))
        .create_async()
        .await;
    let reads = join_all(
        (0..3).map(|_| read(&*workspace, json!({"handle": "dev"}).into())),
    )
    .await;
    for response in reads {
        assert!(response.new_state.is_some());
    }
    actor_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn workspace_handle_change_is_patched_in_place() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let workspace = resource(&provider, &data, "pipes_workspace").await;

    server
        .mock("POST", "/api/v0/org/acme/workspace")
        .with_status(201)
        .with_body(workspace_body("dev", 1))
        .create_async()
        .await;
    let state = create(&*workspace, json!({"organization": "acme", "handle": "dev"}))
        .await
        .new_state;

    let patch_mock = server
        .mock("PATCH", "/api/v0/org/acme/workspace/dev")
        .match_header("if-match", "1")
        .match_body(Matcher::Json(json!({"handle": "staging"})))
        .with_body(workspace_body("staging", 2))
        .create_async()
        .await;

    let updated = update(
        &*workspace,
        state,
        json!({"organization": "acme", "handle": "staging"}),
    )
    .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    patch_mock.assert_async().await;
    assert_eq!(string(&updated.new_state, "handle").as_deref(), Some("staging"));
    assert_eq!(
        string(&updated.new_state, "workspace_id").as_deref(),
        Some("w_cjg5dsr4bj1jo4ic3mq0")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn email_invite_is_found_by_listing_members() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let member = resource(&provider, &data, "pipes_organization_member").await;

    let invite_mock = server
        .mock("POST", "/api/v0/org/acme/member/invite")
        .match_body(Matcher::Json(json!({"email": "kai@example.com", "role": "member"})))
        .with_status(201)
        .with_body(
            json!({
                "id": "om_1",
                "email": "kai@example.com",
                "role": "member",
                "status": "invited",
                "version_id": 1
            })
            .to_string(),
        )
        .create_async()
        .await;

    let created = create(
        &*member,
        json!({"organization": "acme", "email": "kai@example.com", "role": "member"}),
    )
    .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    invite_mock.assert_async().await;
    assert_eq!(string(&created.new_state, "user_handle"), None);
    assert_eq!(string(&created.new_state, "status").as_deref(), Some("invited"));

    let list_mock = server
        .mock("GET", "/api/v0/org/acme/member")
        .match_query(Matcher::UrlEncoded("limit".into(), "100".into()))
        .with_body(
            json!({"items": [
                {"id": "om_0", "user_handle": "jane", "role": "owner", "status": "accepted"},
                {"id": "om_1", "email": "Kai@Example.com", "role": "member", "status": "invited", "version_id": 1}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let refreshed = read(&*member, created.new_state).await;
    list_mock.assert_async().await;
    let refreshed = refreshed.new_state.expect("invite still pending");
    assert_eq!(string(&refreshed, "member_id").as_deref(), Some("om_1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn member_needs_exactly_one_invitee() {
    let server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let member = resource(&provider, &data, "pipes_tenant_member").await;
    let member = &*member;

    let validate = move |config: serde_json::Value| {
        member.validate(
            Context::new(),
            ValidateResourceConfigRequest {
                type_name: "pipes_tenant_member".to_string(),
                config: config.into(),
            },
        )
    };

    let both = validate(json!({
        "tenant": "turbot",
        "user_handle": "jane",
        "email": "jane@example.com",
        "role": "member"
    }))
    .await;
    assert_eq!(both.diagnostics[0].summary, "Conflicting invitee");

    let neither = validate(json!({"tenant": "turbot", "role": "member"})).await;
    assert_eq!(neither.diagnostics[0].summary, "Missing invitee");

    let bad_role = validate(json!({"tenant": "turbot", "user_handle": "jane", "role": "reader"})).await;
    assert_eq!(bad_role.diagnostics.len(), 1);

    let ok = validate(json!({"tenant": "turbot", "user_handle": "jane", "role": "owner"})).await;
    assert!(ok.diagnostics.is_empty(), "{:?}", ok.diagnostics);
}

#[tokio::test(flavor = "multi_thread")]
async fn lookups_read_tenants_workspaces_and_integrations() {
    let mut server = Server::new_async().await;
    actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;

    server
        .mock("GET", "/api/v0/tenant/turbot")
        .with_body(
            json!({"id": "t_1", "handle": "turbot", "display_name": "Turbot", "state": "active"})
                .to_string(),
        )
        .create_async()
        .await;
    let tenants = data_source(&provider, &data, "pipes_tenant").await;
    let tenant = lookup(&*tenants, json!({"handle": "turbot"})).await;
    assert!(tenant.diagnostics.is_empty(), "{:?}", tenant.diagnostics);
    assert_eq!(string(&tenant.state, "tenant_id").as_deref(), Some("t_1"));
    assert_eq!(string(&tenant.state, "avatar_url"), None);

    server
        .mock("GET", "/api/v0/org/acme/workspace/prod")
        .with_body(workspace_body("prod", 4))
        .create_async()
        .await;
    let workspaces = data_source(&provider, &data, "pipes_workspace").await;
    let workspace = lookup(&*workspaces, json!({"organization": "acme", "handle": "prod"})).await;
    assert!(workspace.diagnostics.is_empty(), "{:?}", workspace.diagnostics);
    assert_eq!(string(&workspace.state, "database_name").as_deref(), Some("dx5h3c"));

    let integration = |handle: &str| {
        json!({
            "id": "i_1",
            "handle": handle,
            "type": "slack",
            "state": "enabled",
            "config": {"webhook_url": "https://hooks.slack.com/x", "channel": "#ops"}
        })
        .to_string()
    };
    server
        .mock("GET", "/api/v0/user/jane/integration/slack")
        .with_body(integration("slack"))
        .create_async()
        .await;
    server
        .mock("GET", "/api/v0/tenant/turbot/integration/email")
        .with_body(integration("email"))
        .create_async()
        .await;

    let user_integrations = data_source(&provider, &data, "pipes_user_integration").await;
    let slack = lookup(&*user_integrations, json!({"handle": "slack"})).await;
    assert!(slack.diagnostics.is_empty(), "{:?}", slack.diagnostics);
    assert_eq!(
        string(&slack.state, "config").as_deref(),
        Some("{\n  \"channel\": \"#ops\",\n  \"webhook_url\": \"https://hooks.slack.com/x\"\n}")
    );

    let tenant_integrations = data_source(&provider, &data, "pipes_tenant_integration").await;
    let email = lookup(&*tenant_integrations, json!({"tenant": "turbot", "handle": "email"})).await;
    assert!(email.diagnostics.is_empty(), "{:?}", email.diagnostics);
    assert_eq!(string(&email.state, "type").as_deref(), Some("slack"));
}

#[tokio::test(flavor = "multi_thread")]
async fn lookup_failures_other_than_not_found_are_read_errors() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;

    server
        .mock("GET", "/api/v0/org/acme/integration/slack")
        .with_status(403)
        .with_body(r#"{"status":403,"detail":"forbidden"}"#)
        .create_async()
        .await;

    let integrations = data_source(&provider, &data, "pipes_integration").await;
    let response = lookup(&*integrations, json!({"organization": "acme", "handle": "slack"})).await;
    assert_eq!(response.diagnostics[0].summary, "Failed to read pipes_integration");
}
