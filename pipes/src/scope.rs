//! Routing between the user and organization endpoint families

use tfplug::types::{Dynamic, DynamicValue};
use tokio::sync::OnceCell;

use crate::api::{ApiError, Client, Scope};
use crate::ids::ORGANIZATION;

/// Resolves the owning identity of an entity. The caller's own handle is
/// fetched from `/actor` on first use and cached for the provider's lifetime.
#[derive(Default)]
pub struct ScopeResolver {
    actor_handle: OnceCell<String>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A non-empty `organization` attribute selects org scope, anything else
    /// means the calling user
    pub async fn resolve(&self, client: &Client, attrs: &DynamicValue) -> Result<Scope, ApiError> {
        match organization(attrs) {
            Some(org) => Ok(Scope::Org(org.to_string())),
            None => Ok(Scope::User(self.actor_handle(client).await?.to_string())),
        }
    }

    /// Scope of an identity handle taken from an import ID
    pub async fn identity(&self, client: &Client, handle: &str) -> Result<Scope, ApiError> {
        if self.actor_handle(client).await? == handle {
            Ok(Scope::User(handle.to_string()))
        } else {
            Ok(Scope::Org(handle.to_string()))
        }
    }

    pub async fn actor_handle(&self, client: &Client) -> Result<&str, ApiError> {
        self.actor_handle
            .get_or_try_init(|| async {
                let actor = client.actors().get().await?;
                tracing::debug!(handle = %actor.handle, "resolved actor");
                Ok::<_, ApiError>(actor.handle)
            })
            .await
            .map(String::as_str)
    }
}

fn organization(attrs: &DynamicValue) -> Option<&str> {
    attrs
        .attribute(ORGANIZATION)
        .and_then(Dynamic::as_string)
        .filter(|org| !org.is_empty())
}
