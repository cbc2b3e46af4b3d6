//! Generic read-only lookup
//!
//! A `LookupAdapter` fetches one entity from the configured key attributes;
//! `Lookup` turns it into a host-engine data source. Unlike resources, a
//! missing entity is an error.

use async_trait::async_trait;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, ConfigureDataSourceResponse, DataSource, DataSourceMetadataRequest,
    DataSourceMetadataResponse, DataSourceSchemaRequest, DataSourceSchemaResponse,
    DataSourceWithConfigure, ReadDataSourceRequest, ReadDataSourceResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};

use crate::error::{PipesError, Result};
use crate::provider_data::{PipesProviderData, Session};
use crate::resources::lifecycle::guard;

#[async_trait]
pub trait LookupAdapter: Send + Sync + 'static {
    type Model: Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn fetch(&self, cx: &Session<'_>, config: &DynamicValue) -> Result<Self::Model>;

    fn write_state(&self, model: &Self::Model, state: &mut DynamicValue);
}

pub struct Lookup<A> {
    adapter: A,
    provider_data: Option<PipesProviderData>,
}

impl<A: LookupAdapter> Lookup<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            provider_data: None,
        }
    }

    fn failure(&self, error: &PipesError) -> Diagnostic {
        let type_name = self.adapter.type_name();
        tracing::error!(
            data_source = type_name,
            status = ?error.status(),
            "read failed: {}",
            error
        );

        let api_not_found = matches!(error, PipesError::Api(e) if e.is_not_found());
        if api_not_found {
            Diagnostic::error(
                format!("{} not found", type_name),
                format!("No {} matches the configured attributes: {}", type_name, error),
            )
        } else {
            Diagnostic::error(format!("Failed to read {}", type_name), error.to_string())
        }
    }
}

#[async_trait]
impl<A: LookupAdapter> DataSource for Lookup<A> {
    fn type_name(&self) -> &str {
        self.adapter.type_name()
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse {
        DataSourceMetadataResponse {
            type_name: self.adapter.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse {
        DataSourceSchemaResponse {
            schema: self.adapter.schema(),
            diagnostics: vec![],
        }
    }

    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        let Some(provider_data) = &self.provider_data else {
            return ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![PipesProviderData::not_configured()],
            };
        };
        let cx = provider_data.session();

        match guard(&ctx, self.adapter.fetch(&cx, &request.config)).await {
            Ok(model) => {
                let mut state = request.config;
                self.adapter.write_state(&model, &mut state);
                for attr in &self.adapter.schema().attributes {
                    if state.attribute(&attr.name).is_none() {
                        state.set_attribute(&attr.name, Dynamic::Null);
                    }
                }
                ReadDataSourceResponse {
                    state,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadDataSourceResponse {
                state: DynamicValue::null(),
                diagnostics: vec![self.failure(&e)],
            },
        }
    }
}

#[async_trait]
impl<A: LookupAdapter> DataSourceWithConfigure for Lookup<A> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse {
        match PipesProviderData::from_any(request.provider_data, self.adapter.type_name()) {
            Ok(provider_data) => {
                self.provider_data = Some(provider_data);
                ConfigureDataSourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(diag) => ConfigureDataSourceResponse {
                diagnostics: vec![diag],
            },
        }
    }
}
