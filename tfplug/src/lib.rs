//! In-process seam between a host IaC engine and a provider plugin.
//!
//! A [`Provider`] is configured once and hands out resources and data
//! sources by type name. Each of those declares a [`Schema`]; the engine
//! validates configuration against it with [`validator::validate_config`]
//! and computes diffs with [`plan_resource_change`] before calling the
//! create, read, update and delete hooks.

pub mod context;
pub mod data_source;
pub mod defaults;
pub mod error;
pub mod plan;
pub mod plan_modifier;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod types;
pub mod validator;

pub use context::Context;
pub use data_source::{DataSource, DataSourceWithConfigure};
pub use error::{Result, TfplugError};
pub use plan::{plan_resource_change, PlanAction, PlannedChange};
pub use provider::{
    DataSourceFactory, Provider, ProviderMetadataRequest, ProviderMetadataResponse,
    ProviderResource, ResourceFactory,
};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Diagnostic, DiagnosticSeverity, Dynamic, DynamicValue};
