use reqwest::header::IF_MATCH;
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::collection::Collection;
use super::common::{ApiErrorDetails, ApiErrorResponse, ApiQueryParams, ListResponse};
use super::error::{ApiError, ErrorKind};
use super::scope::Scope;
use super::{actor, org, tenant, workspace};

/// Path prefix of the REST API below the configured host
pub const API_PREFIX: &str = "/api/v0";

/// Production endpoint used when no host is configured
pub const DEFAULT_HOST: &str = "https://pipes.turbot.com";

/// Pipes API client
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    config: ClientConfig,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Retries apply to connection failures only; a request that reached the
    /// server is never replayed
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub request_timeout: Duration,
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_idle_connections: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            request_timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(90),
            max_idle_connections: 10,
        }
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(host: &str, token: &str) -> Result<Self, ApiError> {
        Self::with_config(host, token, ClientConfig::default())
    }

    /// Create a new API client with custom configuration
    pub fn with_config(host: &str, token: &str, config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connection_timeout)
            .pool_idle_timeout(config.idle_timeout)
            .pool_max_idle_per_host(config.max_idle_connections)
            .user_agent(concat!("pipes-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: api_base_url(host)?,
                token: token.to_string(),
                config,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// GET /actor and other actor-level operations
    pub fn actors(&self) -> actor::ActorsApi<'_> {
        actor::ActorsApi::new(self)
    }

    /// Organization operations under /org
    pub fn orgs(&self) -> org::OrgsApi<'_> {
        org::OrgsApi::new(self)
    }

    /// Operations under /tenant/{tenant}
    pub fn tenant(&self, tenant: &str) -> tenant::TenantApi<'_> {
        tenant::TenantApi::new(self, tenant)
    }

    /// Operations owned by an identity: /user/{handle} or /org/{handle}
    pub fn identity(&self, scope: &Scope) -> workspace::IdentityApi<'_> {
        workspace::IdentityApi::new(self, scope)
    }

    /// Operations inside one workspace of an identity
    pub fn workspace(&self, scope: &Scope, workspace: &str) -> workspace::WorkspaceApi<'_> {
        workspace::WorkspaceApi::new(self, scope, workspace)
    }

    pub(crate) fn collection<T>(&self, path: String) -> Collection<'_, T> {
        Collection::new(self, path)
    }

    /// Execute a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send::<T, ()>(Method::GET, path, None, None).await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.get(&full_path).await
    }

    /// GET every page of a list endpoint
    pub async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let params = ApiQueryParams::new()
                .add("limit", 100)
                .add_optional("next_token", next_token.as_deref());
            let page: ListResponse<T> = self.get_with_params(path, &params).await?;
            items.extend(page.items.unwrap_or_default());

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(items),
            }
        }
    }

    /// Execute a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(Method::POST, path, Some(body), None).await
    }

    /// Execute a PATCH request carrying the version the caller last observed
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        version: Option<i64>,
    ) -> Result<T, ApiError> {
        self.send(Method::PATCH, path, Some(body), version).await
    }

    /// Execute a DELETE request, discarding the response body
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<IgnoredAny, ()>(Method::DELETE, path, None, None)
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        version: Option<i64>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);

        self.execute_with_retry(
            || {
                tracing::debug!(%method, %path, "sending request");

                let mut request = self
                    .inner
                    .http_client
                    .request(method.clone(), &url)
                    .bearer_auth(&self.inner.token);
                if let Some(body) = body {
                    request = request.json(body);
                }
                if let Some(version) = version {
                    request = request.header(IF_MATCH, version.to_string());
                }
                request.send()
            },
            path,
        )
        .await
    }

    /// Execute request with retry logic
    async fn execute_with_retry<F, Fut, T>(&self, request_fn: F, path: &str) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
        T: DeserializeOwned,
    {
        let config = &self.inner.config;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let backoff = std::cmp::min(
                    config.initial_backoff_ms * (2_u64.pow(attempt - 1)),
                    config.max_backoff_ms,
                );
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            match request_fn().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!(%path, status = status.as_u16(), "received response");

                    if status.is_success() {
                        return self.parse_success_response(response).await;
                    }
                    return self.handle_error_response(response).await;
                }
                Err(e) if e.is_connect() && attempt < config.max_retries => {
                    tracing::debug!("Connection to {} failed: {}", path, e);
                }
                Err(e) => return Err(ApiError::Request(e)),
            }

            attempt += 1;
        }
    }

    /// Parse successful response
    async fn parse_success_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        let text = if text.trim().is_empty() { "null" } else { &text };

        serde_json::from_str::<T>(text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::Parse(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let (message, details) = match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(err_resp) => {
                let message = err_resp
                    .detail
                    .clone()
                    .or_else(|| err_resp.title.clone())
                    .unwrap_or_else(|| text.clone());
                let details = err_resp
                    .validation_errors
                    .filter(|errors| !errors.is_empty())
                    .map(|errors| Box::new(ApiErrorDetails { errors }));
                (message, details)
            }
            Err(_) => (text, None),
        };

        Err(ApiError::Status {
            status,
            kind: ErrorKind::from_status(status),
            message,
            details,
        })
    }
}

/// Normalize a configured host into the API base URL: a scheme is added
/// when missing and the /api/v0 prefix is appended once.
pub fn api_base_url(host: &str) -> Result<String, ApiError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(ApiError::InvalidUrl("host is empty".to_string()));
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };

    let parsed = url::Url::parse(&with_scheme)
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", with_scheme, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{}: unsupported scheme {}",
            with_scheme,
            parsed.scheme()
        )));
    }

    let base = parsed.as_str().trim_end_matches('/').to_string();
    if base.ends_with(API_PREFIX) {
        Ok(base)
    } else {
        Ok(format!("{}{}", base, API_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::{json, Value};

    fn test_client(url: &str) -> Client {
        Client::with_config(
            url,
            "tpt_test",
            ClientConfig {
                max_retries: 1,
                initial_backoff_ms: 1,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn base_url_defaults_scheme_and_prefix() {
        assert_eq!(
            api_base_url("pipes.turbot.com").unwrap(),
            "https://pipes.turbot.com/api/v0"
        );
        assert_eq!(
            api_base_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080/api/v0"
        );
        assert_eq!(
            api_base_url("https://pipes.turbot.com/api/v0").unwrap(),
            "https://pipes.turbot.com/api/v0"
        );
        assert!(api_base_url("").is_err());
        assert!(api_base_url("ftp://pipes.turbot.com").is_err());
    }

    #[tokio::test]
    async fn sends_bearer_token_and_parses_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v0/actor")
            .match_header("authorization", "Bearer tpt_test")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"u_1","handle":"jane"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let body: Value = client.get("/actor").await.unwrap();

        assert_eq!(body["handle"], "jane");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn patch_sends_version_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/v0/org/acme")
            .match_header("if-match", "7")
            .match_body(Matcher::Json(json!({"display_name": "Acme"})))
            .with_body(r#"{"handle":"acme"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let _: Value = client
            .patch("/org/acme", &json!({"display_name": "Acme"}), Some(7))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_body_detail_and_kind_are_kept() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v0/org")
            .with_status(409)
            .with_body(
                r#"{"status":409,"title":"Conflict","detail":"version mismatch","validation_errors":[{"location":"body.version_id","message":"stale"}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .post::<Value, _>("/org", &json!({"handle": "acme"}))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert_eq!(err.kind(), ErrorKind::VersionConflict);
        assert!(err.to_string().contains("version mismatch"));
        assert!(err.to_string().contains("409"));
        match err {
            ApiError::Status { details, .. } => {
                let details = details.expect("validation errors");
                assert_eq!(details.errors[0].message, "stale");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v0/actor")
            .with_status(503)
            .with_body("unavailable")
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.get::<Value>("/actor").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transient);
        assert!(err.to_string().contains("unavailable"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_accepts_empty_body() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/v0/org/acme")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.delete("/org/acme").await.unwrap();
    }

    #[tokio::test]
    async fn list_all_follows_next_token() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v0/org")
            .match_query(Matcher::Exact("limit=100".into()))
            .with_body(r#"{"items":[{"handle":"a"}],"next_token":"t1"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v0/org")
            .match_query(Matcher::UrlEncoded("next_token".into(), "t1".into()))
            .with_body(r#"{"items":[{"handle":"b"}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let items: Vec<Value> = client.list_all("/org").await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["handle"], "b");
    }
}
