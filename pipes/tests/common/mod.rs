#![allow(dead_code)]

use mockito::{Mock, ServerGuard};
use pipes::resources::attrs::Attrs;
use pipes::PipesProvider;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tfplug::data_source::{
    ConfigureDataSourceRequest, DataSourceWithConfigure, ReadDataSourceRequest,
    ReadDataSourceResponse,
};
use tfplug::provider::{ConfigureProviderRequest, Provider, ProviderResource};
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, CreateResourceResponse,
    DeleteResourceRequest, DeleteResourceResponse, ImportResourceStateRequest,
    ImportResourceStateResponse, ReadResourceRequest, ReadResourceResponse, ResourceSchemaRequest,
    UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::{plan_resource_change, Context, DynamicValue, PlannedChange};

pub const TOKEN: &str = "tpt_test";

pub type ProviderData = Arc<dyn Any + Send + Sync>;

pub async fn configure(server: &ServerGuard) -> (PipesProvider, ProviderData) {
    let mut provider = PipesProvider::new();
    let config = DynamicValue::from(json!({"token": TOKEN, "host": server.url()}));
    let response = provider
        .configure(Context::new(), ConfigureProviderRequest { config })
        .await;
    assert!(
        response.diagnostics.is_empty(),
        "configure failed: {:?}",
        response.diagnostics
    );
    let data = response.provider_data.expect("provider data");
    (provider, data)
}

pub async fn resource(
    provider: &PipesProvider,
    data: &ProviderData,
    type_name: &str,
) -> Box<dyn ProviderResource> {
    let mut resource = provider.new_resource(type_name).expect("resource registered");
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(data.clone()),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

pub async fn data_source(
    provider: &PipesProvider,
    data: &ProviderData,
    type_name: &str,
) -> Box<dyn DataSourceWithConfigure> {
    let mut data_source = provider
        .new_data_source(type_name)
        .expect("data source registered");
    let response = data_source
        .configure(
            Context::new(),
            ConfigureDataSourceRequest {
                provider_data: Some(data.clone()),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    data_source
}

/// Mock the `/actor` lookup that user-scoped calls resolve through
pub async fn actor(server: &mut ServerGuard, handle: &str) -> Mock {
    server
        .mock("GET", "/api/v0/actor")
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_header("content-type", "application/json")
        .with_body(json!({"id": "u_0000000000000000001", "handle": handle}).to_string())
        .create_async()
        .await
}

pub async fn plan(
    resource: &dyn ProviderResource,
    prior: &DynamicValue,
    config: &DynamicValue,
) -> PlannedChange {
    let schema = resource
        .schema(Context::new(), ResourceSchemaRequest)
        .await
        .schema;
    plan_resource_change(&schema, prior, config)
}

pub async fn create(resource: &dyn ProviderResource, config: Value) -> CreateResourceResponse {
    let config = DynamicValue::from(config);
    let planned = plan(resource, &DynamicValue::null(), &config).await;
    resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: resource.type_name().to_string(),
                planned_state: planned.planned_state,
                config,
            },
        )
        .await
}

pub async fn read(resource: &dyn ProviderResource, state: DynamicValue) -> ReadResourceResponse {
    resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: resource.type_name().to_string(),
                current_state: state,
            },
        )
        .await
}

pub async fn update(
    resource: &dyn ProviderResource,
    prior: DynamicValue,
    config: Value,
) -> UpdateResourceResponse {
    let config = DynamicValue::from(config);
    let planned = plan(resource, &prior, &config).await;
    resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: resource.type_name().to_string(),
                prior_state: prior,
                planned_state: planned.planned_state,
                config,
            },
        )
        .await
}

pub async fn delete(resource: &dyn ProviderResource, state: DynamicValue) -> DeleteResourceResponse {
    resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: resource.type_name().to_string(),
                prior_state: state,
            },
        )
        .await
}

pub async fn import(resource: &dyn ProviderResource, id: &str) -> ImportResourceStateResponse {
    resource
        .import_state(
            Context::new(),
            ImportResourceStateRequest {
                type_name: resource.type_name().to_string(),
                id: id.to_string(),
            },
        )
        .await
}

pub async fn lookup(
    data_source: &dyn DataSourceWithConfigure,
    config: Value,
) -> ReadDataSourceResponse {
    data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: data_source.type_name().to_string(),
                config: DynamicValue::from(config),
            },
        )
        .await
}

pub fn string(state: &DynamicValue, name: &str) -> Option<String> {
    state.string(name)
}

pub fn int(state: &DynamicValue, name: &str) -> Option<i64> {
    state.int(name)
}
