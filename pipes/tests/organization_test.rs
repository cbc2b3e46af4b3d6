mod common;

use common::*;
use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::PlanAction;

fn org_body(handle: &str, display_name: &str, version: i64) -> String {
    json!({
        "id": "o_cjg5dkj4bj1jo4ic3mpg",
        "handle": handle,
        "display_name": display_name,
        "url": null,
        "avatar_url": "https://pipes.turbot.com/avatar/acme.png",
        "version_id": version,
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": null
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn organization_create_update_and_handle_change() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    let create_mock = server
        .mock("POST", "/api/v0/org")
        .match_header("authorization", "Bearer tpt_test")
        .match_body(Matcher::Json(json!({"handle": "acme", "display_name": "Acme"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(org_body("acme", "Acme", 1))
        .create_async()
        .await;

    let created = create(&*org, json!({"handle": "acme", "display_name": "Acme"})).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    create_mock.assert_async().await;

    let state = created.new_state;
    assert_eq!(string(&state, "organization_id").as_deref(), Some("o_cjg5dkj4bj1jo4ic3mpg"));
    assert_eq!(int(&state, "version_id"), Some(1));
    assert_eq!(string(&state, "url"), None);
    assert_eq!(
        string(&state, "avatar_url").as_deref(),
        Some("https://pipes.turbot.com/avatar/acme.png")
    );

    // Only the changed handle goes on the wire, addressed by the old handle
    let config = json!({"handle": "acme-corp", "display_name": "Acme"});
    let change = plan(&*org, &state, &config.clone().into()).await;
    assert_eq!(change.action, PlanAction::Update);

    let update_mock = server
        .mock("PATCH", "/api/v0/org/acme")
        .match_header("if-match", "1")
        .match_body(Matcher::Json(json!({"handle": "acme-corp"})))
        .with_header("content-type", "application/json")
        .with_body(org_body("acme-corp", "Acme", 2))
        .create_async()
        .await;

    let updated = update(&*org, state, config).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    update_mock.assert_async().await;
    assert_eq!(string(&updated.new_state, "handle").as_deref(), Some("acme-corp"));
    assert_eq!(int(&updated.new_state, "version_id"), Some(2));
    assert_eq!(
        string(&updated.new_state, "organization_id").as_deref(),
        Some("o_cjg5dkj4bj1jo4ic3mpg")
    );

    let read_mock = server
        .mock("GET", "/api/v0/org/acme-corp")
        .with_header("content-type", "application/json")
        .with_body(org_body("acme-corp", "Acme Corp", 3))
        .create_async()
        .await;

    let refreshed = read(&*org, updated.new_state).await;
    read_mock.assert_async().await;
    let refreshed = refreshed.new_state.expect("organization still exists");
    assert_eq!(string(&refreshed, "display_name").as_deref(), Some("Acme Corp"));
    assert_eq!(int(&refreshed, "version_id"), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn unchanged_configuration_plans_no_op() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    server
        .mock("POST", "/api/v0/org")
        .with_status(201)
        .with_body(org_body("acme", "Acme", 1))
        .create_async()
        .await;

    let config = json!({"handle": "acme", "display_name": "Acme"});
    let state = create(&*org, config.clone()).await.new_state;

    let change = plan(&*org, &state, &config.into()).await;
    assert_eq!(change.action, PlanAction::NoOp);
    assert!(change.diagnostics.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn removing_display_name_clears_it_on_the_server() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    server
        .mock("POST", "/api/v0/org")
        .with_status(201)
        .with_body(org_body("acme", "Acme", 1))
        .create_async()
        .await;
    let state = create(&*org, json!({"handle": "acme", "display_name": "Acme"}))
        .await
        .new_state;

    let config = json!({"handle": "acme"});
    let change = plan(&*org, &state, &config.clone().into()).await;
    assert_eq!(change.action, PlanAction::Update);

    let cleared = json!({
        "id": "o_cjg5dkj4bj1jo4ic3mpg",
        "handle": "acme",
        "display_name": null,
        "url": null,
        "avatar_url": "https://pipes.turbot.com/avatar/acme.png",
        "version_id": 2
    });
    let update_mock = server
        .mock("PATCH", "/api/v0/org/acme")
        .match_header("if-match", "1")
        .match_body(Matcher::Json(json!({"display_name": null})))
        .with_header("content-type", "application/json")
        .with_body(cleared.to_string())
        .create_async()
        .await;

    let updated = update(&*org, state, config.clone()).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    update_mock.assert_async().await;
    assert_eq!(string(&updated.new_state, "display_name"), None);

    let again = plan(&*org, &updated.new_state, &config.into()).await;
    assert_eq!(again.action, PlanAction::NoOp);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleted_organization_is_removed_from_state() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    server
        .mock("GET", "/api/v0/org/acme")
        .with_status(404)
        .with_body(r#"{"status":404,"detail":"org acme not found"}"#)
        .create_async()
        .await;

    let state = json!({"handle": "acme", "organization_id": "o_1", "version_id": 4}).into();
    let response = read(&*org, state).await;
    assert!(response.diagnostics.is_empty());
    assert!(response.new_state.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn organization_import_reads_by_handle() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    server
        .mock("GET", "/api/v0/org/acme")
        .with_body(org_body("acme", "Acme", 5))
        .create_async()
        .await;

    let response = import(&*org, "acme").await;
    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let imported = &response.imported_resources[0];
    assert_eq!(imported.type_name, "pipes_organization");
    assert_eq!(string(&imported.state, "handle").as_deref(), Some("acme"));
    assert_eq!(int(&imported.state, "version_id"), Some(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn display_name_and_handle_changes_update_in_place() {
    let mut server = Server::new_async().await;
    let (provider, data) = configure(&server).await;
    let org = resource(&provider, &data, "pipes_organization").await;

    server
        .mock("POST", "/api/v0/org")
        .match_body(Matcher::Json(
            json!({"handle": "terraformtest", "display_name": "Terraform Test"}),
        ))
        .with_status(201)
        .with_body(org_body("terraformtest", "Terraform Test", 1))
        .create_async()
        .await;
    let created = create(
        &*org,
        json!({"handle": "terraformtest", "display_name": "Terraform Test"}),
    )
    .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.new_state;
    assert_eq!(string(&state, "handle").as_deref(), Some("terraformtest"));

    let config = json!({"handle": "terraformtest", "display_name": "Terraform Test Org"});
    let change = plan(&*org, &state, &config.clone().into()).await;
    assert_eq!(change.action, PlanAction::Update);
    assert!(change.requires_replace.is_empty());

    let rename_mock = server
        .mock("PATCH", "/api/v0/org/terraformtest")
        .match_body(Matcher::Json(json!({"display_name": "Terraform Test Org"})))
        .with_body(org_body("terraformtest", "Terraform Test Org", 2))
        .create_async()
        .await;
    let state = update(&*org, state, config).await.new_state;
    rename_mock.assert_async().await;

    let config = json!({"handle": "terraformtestorg", "display_name": "Terraform Test Org"});
    let change = plan(&*org, &state, &config.clone().into()).await;
    assert_eq!(change.action, PlanAction::Update);
    assert!(change.requires_replace.is_empty());

    let handle_mock = server
        .mock("PATCH", "/api/v0/org/terraformtest")
        .match_body(Matcher::Json(json!({"handle": "terraformtestorg"})))
        .with_body(org_body("terraformtestorg", "Terraform Test Org", 3))
        .create_async()
        .await;
    let updated = update(&*org, state.clone(), config).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    handle_mock.assert_async().await;
    assert_eq!(
        string(&updated.new_state, "handle").as_deref(),
        Some("terraformtestorg")
    );
    assert_eq!(
        string(&updated.new_state, "organization_id"),
        string(&state, "organization_id")
    );
}
