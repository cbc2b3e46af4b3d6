//! Read-only data sources
//!
//! A data source has no lifecycle: the host engine validates its
//! configuration, then asks for one read per plan.

use crate::context::Context;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use crate::validator::validate_config;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Stable type name, identical to its key in `Provider::data_sources`
    fn type_name(&self) -> &str;

    async fn metadata(
        &self,
        ctx: Context,
        request: DataSourceMetadataRequest,
    ) -> DataSourceMetadataResponse;

    async fn schema(
        &self,
        ctx: Context,
        request: DataSourceSchemaRequest,
    ) -> DataSourceSchemaResponse;

    /// Checks the configuration against the schema. Override to add checks
    /// that span attributes.
    async fn validate(
        &self,
        ctx: Context,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        let schema = self.schema(ctx, DataSourceSchemaRequest).await;
        let mut diagnostics = schema.diagnostics;
        diagnostics.extend(validate_config(&schema.schema, &request.config));
        ValidateDataSourceConfigResponse { diagnostics }
    }

    /// The returned state carries every schema attribute, computed ones
    /// included
    async fn read(&self, ctx: Context, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

pub struct DataSourceMetadataRequest;

pub struct DataSourceMetadataResponse {
    pub type_name: String,
}

pub struct DataSourceSchemaRequest;

pub struct DataSourceSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ValidateDataSourceConfigRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

pub struct ValidateDataSourceConfigResponse {
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ReadDataSourceRequest {
    pub type_name: String,
    pub config: DynamicValue,
}

pub struct ReadDataSourceResponse {
    pub state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

/// Receives the provider data right after the factory builds the instance
#[async_trait]
pub trait DataSourceWithConfigure: DataSource {
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureDataSourceRequest,
    ) -> ConfigureDataSourceResponse;
}

pub struct ConfigureDataSourceRequest {
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

pub struct ConfigureDataSourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeBuilder, AttributeType, SchemaBuilder};
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl DataSource for Echo {
        fn type_name(&self) -> &str {
            "test_echo"
        }

        async fn metadata(
            &self,
            _ctx: Context,
            _request: DataSourceMetadataRequest,
        ) -> DataSourceMetadataResponse {
            DataSourceMetadataResponse {
                type_name: "test_echo".to_string(),
            }
        }

        async fn schema(
            &self,
            _ctx: Context,
            _request: DataSourceSchemaRequest,
        ) -> DataSourceSchemaResponse {
            DataSourceSchemaResponse {
                schema: SchemaBuilder::new()
                    .attribute(
                        AttributeBuilder::new("handle", AttributeType::String)
                            .required()
                            .build(),
                    )
                    .build(),
                diagnostics: vec![],
            }
        }

        async fn read(
            &self,
            _ctx: Context,
            request: ReadDataSourceRequest,
        ) -> ReadDataSourceResponse {
            ReadDataSourceResponse {
                state: request.config,
                diagnostics: vec![],
            }
        }
    }

    #[tokio::test]
    async fn default_validation_uses_the_schema() {
        let validate = |config: serde_json::Value| {
            Echo.validate(
                Context::new(),
                ValidateDataSourceConfigRequest {
                    type_name: "test_echo".to_string(),
                    config: config.into(),
                },
            )
        };

        assert!(validate(json!({"handle": "dev"})).await.diagnostics.is_empty());

        let missing = validate(json!({})).await;
        assert_eq!(missing.diagnostics[0].summary, "Missing required field: handle");

        let unknown = validate(json!({"handle": "dev", "extra": 1})).await;
        assert_eq!(unknown.diagnostics[0].summary, "Unknown field: extra");
    }
}
