mod common;

use common::*;
use mockito::{Matcher, Server};
use serde_json::{json, Value};

fn variable_body(setting: Value, version: i64) -> String {
    let value = if setting.is_null() {
        json!(["us-east-1", "us-east-2"])
    } else {
        setting.clone()
    };
    json!({
        "name": "regions",
        "description": "Regions to check",
        "type": "list(string)",
        "default_value": ["us-east-1", "us-east-2"],
        "setting_value": setting,
        "value": value,
        "version_id": version,
        "created_at": "2024-03-01T10:00:00Z"
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn setting_overrides_the_default_until_removed() {
    let mut server = Server::new_async().await;
    actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let variable = resource(&provider, &data, "pipes_workspace_mod_variable").await;

    let create_mock = server
        .mock("POST", "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/setting")
        .match_body(Matcher::Json(json!({"name": "regions", "setting": ["eu-west-1"]})))
        .with_status(201)
        .with_body(variable_body(json!(["eu-west-1"]), 1))
        .create_async()
        .await;

    let created = create(
        &*variable,
        json!({
            "workspace": "dev",
            "mod_alias": "aws_compliance",
            "name": "regions",
            "setting_value": r#"["eu-west-1"]"#
        }),
    )
    .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    create_mock.assert_async().await;

    let state = created.new_state;
    assert_eq!(
        string(&state, "value").as_deref(),
        Some("[\n  \"eu-west-1\"\n]")
    );
    assert_eq!(
        string(&state, "default_value").as_deref(),
        Some("[\n  \"us-east-1\",\n  \"us-east-2\"\n]")
    );
    assert_eq!(string(&state, "type").as_deref(), Some("list(string)"));

    // Removed out of band: the variable now reports only its default
    let get_mock = server
        .mock("GET", "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/regions")
        .with_body(variable_body(Value::Null, 2))
        .create_async()
        .await;

    let refreshed = read(&*variable, state.clone()).await;
    get_mock.assert_async().await;
    assert!(refreshed.diagnostics.is_empty());
    assert!(refreshed.new_state.is_none());

    let delete_mock = server
        .mock(
            "DELETE",
            "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/regions/setting",
        )
        .with_status(204)
        .create_async()
        .await;

    let deleted = delete(&*variable, state).await;
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    delete_mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn changed_setting_is_patched_on_the_setting_path() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let variable = resource(&provider, &data, "pipes_workspace_flowpipe_mod_variable").await;

    let prior = tfplug::DynamicValue::from(json!({
        "organization": "acme",
        "workspace": "ops",
        "mod_alias": "aws_thrifty",
        "name": "regions",
        "setting_value": "[\n  \"eu-west-1\"\n]",
        "default_value": "[\n  \"us-east-1\",\n  \"us-east-2\"\n]",
        "value": "[\n  \"eu-west-1\"\n]",
        "description": "Regions to check",
        "type": "list(string)",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": null,
        "version_id": 6
    }));

    let patch_mock = server
        .mock(
            "PATCH",
            "/api/v0/org/acme/workspace/ops/flowpipe/mod/aws_thrifty/variable/regions/setting",
        )
        .match_header("if-match", "6")
        .match_body(Matcher::Json(json!({"setting": ["eu-west-1", "eu-west-2"]})))
        .with_body(variable_body(json!(["eu-west-1", "eu-west-2"]), 7))
        .create_async()
        .await;

    let updated = update(
        &*variable,
        prior,
        json!({
            "organization": "acme",
            "workspace": "ops",
            "mod_alias": "aws_thrifty",
            "name": "regions",
            "setting_value": r#"["eu-west-1","eu-west-2"]"#
        }),
    )
    .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    patch_mock.assert_async().await;
    assert_eq!(int(&updated.new_state, "version_id"), Some(7));
    assert_eq!(
        string(&updated.new_state, "value").as_deref(),
        Some("[\n  \"eu-west-1\",\n  \"eu-west-2\"\n]")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn import_resolves_the_leading_identity() {
    let mut server = Server::new_async().await;
    actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let variable = resource(&provider, &data, "pipes_workspace_mod_variable").await;

    server
        .mock("GET", "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/regions")
        .with_body(variable_body(json!(["eu-west-1"]), 1))
        .create_async()
        .await;
    server
        .mock("GET", "/api/v0/org/acme/workspace/ops/mod/aws_compliance/variable/regions")
        .with_body(variable_body(json!(["ap-south-1"]), 4))
        .create_async()
        .await;

    let user = import(&*variable, "jane/dev/aws_compliance/regions").await;
    assert!(user.diagnostics.is_empty(), "{:?}", user.diagnostics);
    let state = &user.imported_resources[0].state;
    assert_eq!(string(state, "organization"), None);
    assert_eq!(string(state, "workspace").as_deref(), Some("dev"));
    assert_eq!(string(state, "mod_alias").as_deref(), Some("aws_compliance"));

    let org = import(&*variable, "acme/ops/aws_compliance/regions").await;
    assert!(org.diagnostics.is_empty(), "{:?}", org.diagnostics);
    let state = &org.imported_resources[0].state;
    assert_eq!(string(state, "organization").as_deref(), Some("acme"));
    assert_eq!(int(state, "version_id"), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn setting_value_changes_leave_the_default_alone() {
    let mut server = Server::new_async().await;
    actor(&mut server, "jane").await;
    let (provider, data) = configure(&server).await;
    let variable = resource(&provider, &data, "pipes_workspace_mod_variable").await;

    let body = |setting: i64, version: i64| {
        json!({
            "name": "max_concurrency",
            "type": "number",
            "default_value": 1,
            "setting_value": setting,
            "value": setting,
            "version_id": version
        })
        .to_string()
    };

    server
        .mock("POST", "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/setting")
        .match_body(Matcher::Json(json!({"name": "max_concurrency", "setting": 5})))
        .with_status(201)
        .with_body(body(5, 1))
        .create_async()
        .await;

    let config = |setting: &str| {
        json!({
            "workspace": "dev",
            "mod_alias": "aws_compliance",
            "name": "max_concurrency",
            "setting_value": setting
        })
    };
    let created = create(&*variable, config("5")).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.new_state;
    assert_eq!(string(&state, "default_value").as_deref(), Some("1"));
    assert_eq!(string(&state, "setting_value").as_deref(), Some("5"));
    assert_eq!(string(&state, "value").as_deref(), Some("5"));

    let change = plan(&*variable, &state, &config("2").into()).await;
    assert_eq!(change.action, tfplug::PlanAction::Update);

    let patch_mock = server
        .mock(
            "PATCH",
            "/api/v0/user/jane/workspace/dev/mod/aws_compliance/variable/max_concurrency/setting",
        )
        .match_header("if-match", "1")
        .match_body(Matcher::Json(json!({"setting": 2})))
        .with_body(body(2, 2))
        .create_async()
        .await;
    let updated = update(&*variable, state, config("2")).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    patch_mock.assert_async().await;
    assert_eq!(string(&updated.new_state, "setting_value").as_deref(), Some("2"));
    assert_eq!(string(&updated.new_state, "value").as_deref(), Some("2"));
    assert_eq!(string(&updated.new_state, "default_value").as_deref(), Some("1"));
}
