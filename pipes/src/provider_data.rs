//! State shared by every resource and data source of one configured provider

use crate::api::workspace::WorkspaceApi;
use crate::api::{Client, Scope};
use crate::error::Result;
use crate::resources::attrs::Attrs;
use crate::scope::ScopeResolver;
use std::any::Any;
use std::sync::Arc;
use tfplug::types::{Diagnostic, DynamicValue};

#[derive(Clone)]
pub struct PipesProviderData {
    pub client: Arc<Client>,
    pub scopes: Arc<ScopeResolver>,
}

impl PipesProviderData {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
            scopes: Arc::new(ScopeResolver::new()),
        }
    }

    /// Recovers the data `PipesProvider::configure` handed to the host
    /// engine. `consumer` names the resource or data source in logs.
    pub fn from_any(
        data: Option<Arc<dyn Any + Send + Sync>>,
        consumer: &str,
    ) -> std::result::Result<Self, Diagnostic> {
        let Some(data) = data else {
            tracing::warn!(consumer, "configured without provider data");
            return Err(Diagnostic::error(
                "No provider data",
                format!("{} was configured before the provider", consumer),
            ));
        };
        data.downcast_ref::<Self>().cloned().ok_or_else(|| {
            tracing::error!(consumer, "provider data has an unexpected type");
            Diagnostic::error(
                "Invalid provider data",
                format!("{} received provider data of another plugin", consumer),
            )
        })
    }

    pub fn not_configured() -> Diagnostic {
        Diagnostic::error(
            "Provider not configured",
            "Configure the provider before using its resources and data sources",
        )
    }

    pub fn session(&self) -> Session<'_> {
        Session {
            client: &self.client,
            scopes: &self.scopes,
        }
    }
}

/// What an adapter needs for one call: the shared client and scope cache
#[derive(Clone, Copy)]
pub struct Session<'a> {
    pub client: &'a Client,
    pub scopes: &'a ScopeResolver,
}

impl<'a> Session<'a> {
    /// Owning identity of the entity described by `attrs`
    pub async fn scope(&self, attrs: &DynamicValue) -> Result<Scope> {
        Ok(self.scopes.resolve(self.client, attrs).await?)
    }

    /// Endpoints of the workspace named by the `workspace` attribute
    pub async fn workspace(&self, attrs: &DynamicValue) -> Result<WorkspaceApi<'a>> {
        let scope = self.scope(attrs).await?;
        let handle = attrs.required_string("workspace")?;
        Ok(self.client.workspace(&scope, &handle))
    }
}
