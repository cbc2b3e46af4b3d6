//! Generic resource lifecycle
//!
//! Each entity kind implements `ResourceAdapter`: how to build its schema,
//! which REST calls create, read, update and delete it, and how the server
//! representation maps onto state. `Managed` turns an adapter into a
//! host-engine resource and owns everything the kinds have in common:
//! cancellation, gone markers, version threading, import and diagnostics.

use async_trait::async_trait;
use std::future::Future;
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ImportedResource,
    ReadResourceRequest, ReadResourceResponse, Resource, ResourceMetadataRequest,
    ResourceMetadataResponse, ResourceSchemaRequest, ResourceSchemaResponse,
    ResourceWithConfigure, ResourceWithImportState, UpdateResourceRequest,
    UpdateResourceResponse, ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::validate_config;

use super::attrs::Attrs;
use crate::api::{ErrorKind, Scope};
use crate::error::{PipesError, Result};
use crate::ids::{CompositeId, IdLayout, ORGANIZATION};
use crate::provider_data::{PipesProviderData, Session};

/// Which API failures mean the entity no longer exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gone {
    /// 404
    NotFound,
    /// 404 or 403; members of a deleted parent are forbidden, not missing
    NotFoundOrForbidden,
    /// 404, or 403 in org scope once the owning organization is deleted
    NotFoundOrOrgForbidden,
}

impl Gone {
    pub fn matches(&self, error: &PipesError, org_scoped: bool) -> bool {
        let PipesError::Api(error) = error else {
            return false;
        };
        match self {
            Gone::NotFound => error.is_not_found(),
            Gone::NotFoundOrForbidden => error.is_not_found() || error.is_forbidden(),
            Gone::NotFoundOrOrgForbidden => {
                error.is_not_found() || (org_scoped && error.is_forbidden())
            }
        }
    }
}

#[async_trait]
pub trait ResourceAdapter: Send + Sync + 'static {
    type Model: Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn id_layout(&self) -> IdLayout;

    fn gone(&self) -> Gone {
        Gone::NotFound
    }

    /// Checks beyond the schema, run at plan time
    fn check(&self, _config: &DynamicValue) -> Vec<Diagnostic> {
        Vec::new()
    }

    async fn create(&self, cx: &Session<'_>, plan: &DynamicValue) -> Result<Self::Model>;

    /// Ok(None) when the entity is gone without the API saying so
    async fn read(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<Option<Self::Model>>;

    /// PATCH the changed attributes; `version` is the last observed version
    async fn update(
        &self,
        _cx: &Session<'_>,
        _prior: &DynamicValue,
        _plan: &DynamicValue,
        _version: i64,
    ) -> Result<Self::Model> {
        Err(PipesError::Immutable(self.type_name().to_string()))
    }

    async fn delete(&self, cx: &Session<'_>, state: &DynamicValue) -> Result<()>;

    /// Copy the server representation into state
    fn write_state(&self, model: &Self::Model, state: &mut DynamicValue);
}

/// Race `work` against the host engine's cancellation signal
pub async fn guard<T>(ctx: &Context, work: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::select! {
        biased;
        _ = ctx.cancelled() => Err(PipesError::Cancelled),
        result = work => result,
    }
}

/// True when `attrs` carry a non-empty organization handle
pub fn org_scoped(attrs: &DynamicValue) -> bool {
    attrs
        .string(ORGANIZATION)
        .is_some_and(|org| !org.is_empty())
}

/// A host-engine resource backed by a `ResourceAdapter`
pub struct Managed<A> {
    adapter: A,
    provider_data: Option<PipesProviderData>,
}

impl<A: ResourceAdapter> Managed<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            provider_data: None,
        }
    }

    fn session(&self) -> std::result::Result<Session<'_>, Diagnostic> {
        self.provider_data
            .as_ref()
            .map(PipesProviderData::session)
            .ok_or_else(PipesProviderData::not_configured)
    }

    /// The import ID addressing the instance described by `state`
    pub async fn import_id(&self, state: &DynamicValue) -> Result<String> {
        let cx = self
            .provider_data
            .as_ref()
            .map(PipesProviderData::session)
            .ok_or(PipesError::NotConfigured)?;
        let layout = self.adapter.id_layout();
        let scope = if layout.is_scoped() {
            Some(cx.scope(state).await?)
        } else {
            None
        };
        let id = CompositeId::from_state(self.adapter.type_name(), layout, state, scope.as_ref())?;
        Ok(id.encode()?)
    }

    /// Every schema attribute present, server values merged over `base`
    fn complete(&self, model: &A::Model, mut state: DynamicValue) -> DynamicValue {
        self.adapter.write_state(model, &mut state);
        for attr in &self.adapter.schema().attributes {
            if state.attribute(&attr.name).is_none() {
                state.set_attribute(&attr.name, Dynamic::Null);
            }
        }
        state.resolve_unknowns();
        state
    }

    fn key_tuple(&self, state: &DynamicValue) -> String {
        let layout = self.adapter.id_layout();
        let mut parts = Vec::new();
        if layout.is_scoped() {
            if let Some(org) = state.string(ORGANIZATION).filter(|o| !o.is_empty()) {
                parts.push(org);
            }
        }
        for field in layout.fields() {
            parts.push(state.string(field).unwrap_or_else(|| "?".to_string()));
        }
        parts.join("/")
    }

    fn failure(&self, operation: &str, state: &DynamicValue, error: &PipesError) -> Diagnostic {
        let type_name = self.adapter.type_name();
        let tuple = self.key_tuple(state);
        tracing::error!(
            resource = type_name,
            id = %tuple,
            status = ?error.status(),
            "{} failed: {}",
            operation,
            error
        );

        let mut detail = format!("{} {}: {}", type_name, tuple, error);
        if error.kind() == Some(ErrorKind::VersionConflict) {
            detail.push_str(". The entity changed since it was last read; refresh and plan again.");
        }
        Diagnostic::error(format!("Failed to {} {}", operation, type_name), detail)
    }

    async fn read_model(
        &self,
        cx: &Session<'_>,
        state: &DynamicValue,
    ) -> Result<Option<A::Model>> {
        match self.adapter.read(cx, state).await {
            Err(e) if self.adapter.gone().matches(&e, org_scoped(state)) => {
                tracing::debug!(resource = self.adapter.type_name(), "gone: {}", e);
                Ok(None)
            }
            other => other,
        }
    }

    async fn update_model(
        &self,
        cx: &Session<'_>,
        prior: &DynamicValue,
        plan: &DynamicValue,
    ) -> Result<A::Model> {
        let version = match prior.int("version_id") {
            Some(version) => version,
            None => {
                let current = self.adapter.read(cx, prior).await?;
                let mut refreshed = prior.clone();
                if let Some(model) = &current {
                    self.adapter.write_state(model, &mut refreshed);
                }
                refreshed
                    .int("version_id")
                    .ok_or_else(|| PipesError::MissingAttribute("version_id".to_string()))?
            }
        };
        self.adapter.update(cx, prior, plan, version).await
    }
}

#[async_trait]
impl<A: ResourceAdapter> Resource for Managed<A> {
    fn type_name(&self) -> &str {
        self.adapter.type_name()
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: self.adapter.type_name().to_string(),
        }
    }

    async fn schema(
        &self,
        _ctx: Context,
        _request: ResourceSchemaRequest,
    ) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: self.adapter.schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = validate_config(&self.adapter.schema(), &request.config);
        diagnostics.extend(self.adapter.check(&request.config));
        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let cx = match self.session() {
            Ok(cx) => cx,
            Err(diag) => {
                return CreateResourceResponse {
                    new_state: DynamicValue::null(),
                    diagnostics: vec![diag],
                }
            }
        };

        match guard(&ctx, self.adapter.create(&cx, &request.planned_state)).await {
            Ok(model) => {
                let new_state = self.complete(&model, request.planned_state);
                tracing::info!(
                    resource = self.adapter.type_name(),
                    id = %self.key_tuple(&new_state),
                    "created"
                );
                CreateResourceResponse {
                    new_state,
                    diagnostics: vec![],
                }
            }
            Err(e) => CreateResourceResponse {
                diagnostics: vec![self.failure("create", &request.planned_state, &e)],
                new_state: DynamicValue::null(),
            },
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let cx = match self.session() {
            Ok(cx) => cx,
            Err(diag) => {
                return ReadResourceResponse {
                    new_state: Some(request.current_state),
                    diagnostics: vec![diag],
                }
            }
        };

        match guard(&ctx, self.read_model(&cx, &request.current_state)).await {
            Ok(Some(model)) => ReadResourceResponse {
                new_state: Some(self.complete(&model, request.current_state)),
                diagnostics: vec![],
            },
            Ok(None) => {
                tracing::warn!(
                    resource = self.adapter.type_name(),
                    id = %self.key_tuple(&request.current_state),
                    "no longer exists, removing from state"
                );
                ReadResourceResponse {
                    new_state: None,
                    diagnostics: vec![],
                }
            }
            Err(e) => ReadResourceResponse {
                diagnostics: vec![self.failure("read", &request.current_state, &e)],
                new_state: Some(request.current_state),
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let cx = match self.session() {
            Ok(cx) => cx,
            Err(diag) => {
                return UpdateResourceResponse {
                    new_state: request.prior_state,
                    diagnostics: vec![diag],
                }
            }
        };

        let work = self.update_model(&cx, &request.prior_state, &request.planned_state);
        match guard(&ctx, work).await {
            Ok(model) => {
                let new_state = self.complete(&model, request.planned_state);
                tracing::info!(
                    resource = self.adapter.type_name(),
                    id = %self.key_tuple(&new_state),
                    "updated"
                );
                UpdateResourceResponse {
                    new_state,
                    diagnostics: vec![],
                }
            }
            Err(e) => UpdateResourceResponse {
                diagnostics: vec![self.failure("update", &request.prior_state, &e)],
                new_state: request.prior_state,
            },
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let cx = match self.session() {
            Ok(cx) => cx,
            Err(diag) => {
                return DeleteResourceResponse {
                    diagnostics: vec![diag],
                }
            }
        };

        let state = &request.prior_state;
        match guard(&ctx, self.adapter.delete(&cx, state)).await {
            Ok(()) => {
                tracing::info!(
                    resource = self.adapter.type_name(),
                    id = %self.key_tuple(state),
                    "deleted"
                );
                DeleteResourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(e) if self.adapter.gone().matches(&e, org_scoped(state)) => {
                tracing::debug!(
                    resource = self.adapter.type_name(),
                    "already gone: {}",
                    e
                );
                DeleteResourceResponse {
                    diagnostics: vec![],
                }
            }
            Err(e) => DeleteResourceResponse {
                diagnostics: vec![self.failure("delete", state, &e)],
            },
        }
    }
}

#[async_trait]
impl<A: ResourceAdapter> ResourceWithConfigure for Managed<A> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let diagnostics =
            match PipesProviderData::from_any(request.provider_data, self.adapter.type_name()) {
                Ok(provider_data) => {
                    self.provider_data = Some(provider_data);
                    vec![]
                }
                Err(diag) => vec![diag],
            };
        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl<A: ResourceAdapter> ResourceWithImportState for Managed<A> {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let type_name = self.adapter.type_name();
        let fail = |summary: &str, detail: String| ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![Diagnostic::error(summary, detail)],
        };

        let cx = match self.session() {
            Ok(cx) => cx,
            Err(diag) => {
                return ImportResourceStateResponse {
                    imported_resources: vec![],
                    diagnostics: vec![diag],
                }
            }
        };

        let id = match CompositeId::parse(type_name, self.adapter.id_layout(), &request.id) {
            Ok(id) => id,
            Err(e) => return fail("Invalid import ID", e.to_string()),
        };

        let mut seed = DynamicValue::object();
        id.seed(&mut seed);

        let work = async {
            if let Some(identity) = id.identity() {
                if let Scope::Org(org) = cx.scopes.identity(cx.client, identity).await? {
                    seed.put_string(ORGANIZATION, org);
                }
            }
            self.read_model(&cx, &seed).await
        };

        match guard(&ctx, work).await {
            Ok(Some(model)) => {
                let state = self.complete(&model, seed);
                tracing::info!(resource = type_name, id = %request.id, "imported");
                ImportResourceStateResponse {
                    imported_resources: vec![ImportedResource {
                        type_name: type_name.to_string(),
                        state,
                    }],
                    diagnostics: vec![],
                }
            }
            Ok(None) => fail(
                "Cannot import non-existent remote object",
                format!("{} {} does not exist", type_name, request.id),
            ),
            Err(e) => fail(
                &format!("Failed to import {}", type_name),
                format!("{} {}: {}", type_name, request.id, e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn status(code: u16) -> PipesError {
        PipesError::Api(ApiError::Status {
            status: code,
            kind: ErrorKind::from_status(code),
            message: String::new(),
            details: None,
        })
    }

    #[test]
    fn gone_markers_per_policy() {
        assert!(Gone::NotFound.matches(&status(404), false));
        assert!(!Gone::NotFound.matches(&status(403), true));

        assert!(Gone::NotFoundOrForbidden.matches(&status(403), false));
        assert!(!Gone::NotFoundOrForbidden.matches(&status(401), false));

        assert!(Gone::NotFoundOrOrgForbidden.matches(&status(403), true));
        assert!(!Gone::NotFoundOrOrgForbidden.matches(&status(403), false));
        assert!(Gone::NotFoundOrOrgForbidden.matches(&status(404), false));

        assert!(!Gone::NotFound.matches(&PipesError::Cancelled, false));
    }

    #[tokio::test]
    async fn guard_returns_cancelled_when_context_is_cancelled() {
        let ctx = Context::new();
        ctx.cancel();

        let result: Result<()> = guard(&ctx, std::future::pending()).await;
        assert!(matches!(result, Err(PipesError::Cancelled)));
    }

    #[tokio::test]
    async fn guard_passes_through_completed_work() {
        let ctx = Context::new();
        let result = guard(&ctx, async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
