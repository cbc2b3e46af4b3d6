//! Provider plugin managing Pipes tenants, organizations, workspaces and
//! everything inside them through the Pipes REST API.

pub mod api;
pub mod data_sources;
pub mod error;
pub mod ids;
pub mod json;
pub mod logging;
pub mod provider_data;
pub mod resources;
pub mod scope;

pub use error::{PipesError, Result};
pub use provider_data::PipesProviderData;
pub use resources::run_pipeline;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, DataSourceFactory, Provider,
    ProviderMetadataRequest, ProviderMetadataResponse, ProviderSchemaRequest,
    ProviderSchemaResponse, ResourceFactory,
};
use tfplug::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
use tfplug::types::{Diagnostics, Dynamic, DynamicValue};

pub const TOKEN_ENV: &[&str] = &["PIPES_TOKEN", "STEAMPIPE_CLOUD_TOKEN"];
pub const HOST_ENV: &[&str] = &["PIPES_HOST", "STEAMPIPE_CLOUD_HOST"];

#[derive(Default)]
pub struct PipesProvider {
    provider_data: Option<PipesProviderData>,
}

impl PipesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider data built by the last successful configure
    pub fn provider_data(&self) -> Option<&PipesProviderData> {
        self.provider_data.as_ref()
    }
}

/// A non-empty config attribute, else the first non-empty variable of `env`
fn setting(config: &DynamicValue, name: &str, env: &[&str]) -> Option<String> {
    config
        .attribute(name)
        .and_then(Dynamic::as_string)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            env.iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|v| !v.is_empty())
        })
}

#[async_trait]
impl Provider for PipesProvider {
    fn type_name(&self) -> &str {
        "pipes"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "pipes".to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        let schema = SchemaBuilder::new()
            .description("Manage Pipes tenants, organizations and workspaces")
            .attribute(
                AttributeBuilder::new("token", AttributeType::String)
                    .description(
                        "API token. Falls back to PIPES_TOKEN, then STEAMPIPE_CLOUD_TOKEN.",
                    )
                    .optional()
                    .sensitive()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("host", AttributeType::String)
                    .description(
                        "Pipes host. Falls back to PIPES_HOST, then STEAMPIPE_CLOUD_HOST, \
                         then https://pipes.turbot.com.",
                    )
                    .optional()
                    .build(),
            )
            .build();

        ProviderSchemaResponse {
            schema,
            diagnostics: vec![],
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        logging::init_logging();
        let mut diags = Diagnostics::new();

        let token = setting(&request.config, "token", TOKEN_ENV);
        let host = setting(&request.config, "host", HOST_ENV)
            .unwrap_or_else(|| api::DEFAULT_HOST.to_string());

        let Some(token) = token else {
            diags.add_error(
                "token is required",
                Some("Set token in the provider config or the PIPES_TOKEN environment variable"),
            );
            return ConfigureProviderResponse {
                diagnostics: diags.errors,
                provider_data: None,
            };
        };

        match api::Client::new(&host, &token) {
            Ok(client) => {
                tracing::info!(base_url = client.base_url(), "configured Pipes client");
                let provider_data = PipesProviderData::new(client);
                self.provider_data = Some(provider_data.clone());
                ConfigureProviderResponse {
                    diagnostics: vec![],
                    provider_data: Some(Arc::new(provider_data)),
                }
            }
            Err(e) => {
                diags.add_error("Failed to create API client", Some(e.to_string()));
                ConfigureProviderResponse {
                    diagnostics: diags.errors,
                    provider_data: None,
                }
            }
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        resources::factories()
    }

    fn data_sources(&self) -> HashMap<String, DataSourceFactory> {
        data_sources::factories()
    }
}
