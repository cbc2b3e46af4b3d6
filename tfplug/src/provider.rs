//! Provider trait and related types
//!
//! A provider owns the configuration surface, builds the shared state handed
//! to every resource and data source, and registers factories by type name.

use crate::context::Context;
use crate::data_source::DataSourceWithConfigure;
use crate::error::{Result, TfplugError};
use crate::resource::{ResourceWithConfigure, ResourceWithImportState};
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A resource the provider can manage: configurable and importable
pub trait ProviderResource: ResourceWithConfigure + ResourceWithImportState {}

impl<T: ResourceWithConfigure + ResourceWithImportState> ProviderResource for T {}

/// Factories create a fresh, unconfigured instance per request
pub type ResourceFactory = Box<dyn Fn() -> Box<dyn ProviderResource> + Send + Sync>;
pub type DataSourceFactory = Box<dyn Fn() -> Box<dyn DataSourceWithConfigure> + Send + Sync>;

#[async_trait]
pub trait Provider: Send + Sync {
    /// Type name prefix shared by every resource (e.g., "pipes")
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse;

    async fn schema(&self, ctx: Context, request: ProviderSchemaRequest) -> ProviderSchemaResponse;

    /// Called once before any resource or data source is created.
    /// provider_data in the response is passed to every configure call.
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    /// Resource factories keyed by type name
    fn resources(&self) -> HashMap<String, ResourceFactory>;

    /// Data source factories keyed by type name
    fn data_sources(&self) -> HashMap<String, DataSourceFactory>;

    /// Builds a fresh, unconfigured instance of one resource type
    fn new_resource(&self, type_name: &str) -> Result<Box<dyn ProviderResource>> {
        self.resources()
            .get(type_name)
            .map(|factory| factory())
            .ok_or_else(|| TfplugError::UnknownResource(type_name.to_string()))
    }

    fn new_data_source(&self, type_name: &str) -> Result<Box<dyn DataSourceWithConfigure>> {
        self.data_sources()
            .get(type_name)
            .map(|factory| factory())
            .ok_or_else(|| TfplugError::UnknownDataSource(type_name.to_string()))
    }
}

pub struct ProviderMetadataRequest;

pub struct ProviderMetadataResponse {
    pub type_name: String,
}

pub struct ProviderSchemaRequest;

pub struct ProviderSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureProviderRequest {
    pub config: DynamicValue,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
    /// Shared data for resources and data sources, typically an API client
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}
