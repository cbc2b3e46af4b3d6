mod common;

use common::*;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::PlanAction;

fn connection_body(config: serde_json::Value, version: i64) -> String {
    json!({
        "id": "c_cjg5e0j4bj1jo4ic3mr0",
        "handle": "aws",
        "plugin": "aws",
        "type": "connection",
        "config": config,
        "identity_id": "u_0000000000000000001",
        "workspace_id": "w_cjg5dsr4bj1jo4ic3mq0",
        "parent_id": null,
        "version_id": version,
        "created_at": "2024-03-01T10:00:00Z"
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn workspace_connection_config_is_canonical_and_drift_free() {
    let mut server = Server::new_async().await;
    let actor_mock = actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let connection = resource(&provider, &data, "pipes_workspace_connection").await;

    let written =
        r#"{"regions": ["us-east-1"], "access_key": "redacted", "secret_key": "redacted"}"#;
    let canonical = json!({
        "access_key": "redacted",
        "regions": ["us-east-1"],
        "secret_key": "redacted"
    });
    let create_mock = server
        .mock("POST", "/api/v0/user/jane/workspace/workspaceXYZ/connection")
        .match_body(Matcher::Json(json!({
            "handle": "aws_abcd",
            "plugin": "aws",
            "config": canonical
        })))
        .with_status(201)
        .with_body(
            json!({
                "id": "c_cjg5e0j4bj1jo4ic3mr0",
                "handle": "aws_abcd",
                "plugin": "aws",
                "type": "connection",
                "config": canonical,
                "identity_id": "u_0000000000000000001",
                "workspace_id": "w_cjg5dsr4bj1jo4ic3mq0",
                "parent_id": null,
                "version_id": 1,
                "created_at": "2024-03-01T10:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let config = json!({
        "workspace": "workspaceXYZ",
        "handle": "aws_abcd",
        "plugin": "aws",
        "config": written
    });
    let created = create(&*connection, config.clone()).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    create_mock.assert_async().await;
    actor_mock.assert_async().await;

    let state = created.new_state;
    assert_eq!(
        string(&state, "config").as_deref(),
        Some(
            "{\n  \"access_key\": \"redacted\",\n  \"regions\": [\n    \"us-east-1\"\n  ],\n  \"secret_key\": \"redacted\"\n}"
        )
    );
    assert_eq!(string(&state, "connection_id").as_deref(), Some("c_cjg5e0j4bj1jo4ic3mr0"));
    assert_eq!(string(&state, "type").as_deref(), Some("connection"));
    assert_eq!(string(&state, "parent_id"), None);

    // Same JSON value written differently
    let reordered = json!({
        "workspace": "workspaceXYZ",
        "handle": "aws_abcd",
        "plugin": "aws",
        "config": r#"{"access_key":"redacted","regions":["us-east-1"],"secret_key":"redacted"}"#
    });
    let change = plan(&*connection, &state, &reordered.into()).await;
    assert_eq!(change.action, PlanAction::NoOp);
    assert_eq!(string(&change.planned_state, "config"), string(&state, "config"));

    let change = plan(&*connection, &state, &config.into()).await;
    assert_eq!(change.action, PlanAction::NoOp);
}

#[tokio::test(flavor = "multi_thread")]
async fn changed_config_is_patched_and_plugin_change_replaces() {
    let mut server = Server::new_async().await;
    actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let connection = resource(&provider, &data, "pipes_workspace_connection").await;

    let prior = tfplug::DynamicValue::from(json!({
        "organization": null,
        "workspace": "dev",
        "handle": "aws",
        "plugin": "aws",
        "config": "{\n  \"regions\": [\n    \"us-east-1\"\n  ]\n}",
        "connection_id": "c_1",
        "type": "connection",
        "identity_id": "u_1",
        "tenant_id": null,
        "workspace_id": "w_1",
        "parent_id": null,
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": null,
        "version_id": 3
    }));

    let replace = plan(
        &*connection,
        &prior,
        &json!({"workspace": "dev", "handle": "aws", "plugin": "gcp"}).into(),
    )
    .await;
    assert_eq!(replace.action, PlanAction::Replace);

    let patch_mock = server
        .mock("PATCH", "/api/v0/user/jane/workspace/dev/connection/aws")
        .match_header("if-match", "3")
        .match_body(Matcher::Json(json!({"config": {"regions": ["eu-west-1"]}})))
        .with_body(connection_body(json!({"regions": ["eu-west-1"]}), 4))
        .create_async()
        .await;

    let updated = update(
        &*connection,
        prior,
        json!({
            "workspace": "dev",
            "handle": "aws",
            "plugin": "aws",
            "config": r#"{"regions":["eu-west-1"]}"#
        }),
    )
    .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    patch_mock.assert_async().await;
    assert_eq!(int(&updated.new_state, "version_id"), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn redacted_config_keeps_the_configured_value() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let connection = resource(&provider, &data, "pipes_tenant_connection").await;

    server
        .mock("GET", "/api/v0/tenant/turbot/connection/aws")
        .with_body(
            json!({
                "id": "c_1",
                "handle": "aws",
                "plugin": "aws",
                "tenant_id": "t_1",
                "version_id": 2
            })
            .to_string(),
        )
        .create_async()
        .await;

    let stored = "{\n  \"secret_key\": \"s\"\n}";
    let state = json!({
        "tenant": "turbot",
        "handle": "aws",
        "plugin": "aws",
        "config": stored,
        "version_id": 1
    });
    let refreshed = read(&*connection, state.into()).await;
    let refreshed = refreshed.new_state.expect("still exists");
    assert_eq!(string(&refreshed, "config").as_deref(), Some(stored));
    assert_eq!(string(&refreshed, "tenant_id").as_deref(), Some("t_1"));
    assert_eq!(int(&refreshed, "version_id"), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_config_fails_validation() {
    let server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let connection = resource(&provider, &data, "pipes_connection").await;

    let response = connection
        .validate(
            tfplug::Context::new(),
            tfplug::resource::ValidateResourceConfigRequest {
                type_name: "pipes_connection".to_string(),
                config: json!({"handle": "aws", "plugin": "aws", "config": "{regions"}).into(),
            },
        )
        .await;
    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(response.diagnostics[0].summary, "config must be valid JSON");
}
