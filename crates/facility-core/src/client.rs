//! HTTP client settings and the generic resource client.
//!
//! [`ResourceClient`] executes any [`Operation`] descriptor: it renders the URL,
//! sends the request through the injected [`HttpTransport`] and runs the response
//! through the status processor. Resource clients in the other crates are thin
//! typed wrappers around it.

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::operation::{Operation, OperationArgs};
use crate::processor::{process_file, process_json};
use crate::response::FileResponse;
use crate::transport::{HttpResponse, HttpTransport};

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent when none is configured.
pub const USER_AGENT: &str = concat!("facility-client/", env!("CARGO_PKG_VERSION"));

/// HTTP transport tuning.
///
/// Calls are never retried; a request that times out fails with
/// [`Error::Timeout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,

    /// User agent override
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
            user_agent: None,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes operation descriptors against one backend.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct ResourceClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    cancel: Option<CancellationToken>,
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl ResourceClient {
    /// Create a client for `base_url` using `transport`.
    ///
    /// A trailing `/` is stripped; an empty base URL yields relative URLs.
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            transport,
            cancel: None,
        }
    }

    /// Copy of this client whose calls abort when `token` fires.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attached cancellation token, if any.
    #[must_use]
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Shared transport.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    /// Execute a JSON operation and deserialize its payload.
    ///
    /// # Errors
    ///
    /// Parameter errors are raised before the transport is called. Transport,
    /// cancellation, parse and API errors are propagated unchanged.
    pub async fn execute<T>(&self, operation: &Operation, args: OperationArgs) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self.send(operation, args).await?;
        process_json(operation, &response)
    }

    /// Execute a file download.
    ///
    /// # Errors
    ///
    /// As for [`execute`](Self::execute).
    pub async fn execute_file(
        &self,
        operation: &Operation,
        args: OperationArgs,
    ) -> Result<Option<FileResponse>> {
        let response = self.send(operation, args).await?;
        process_file(operation, response)
    }

    /// Execute a JSON operation without a target type.
    ///
    /// # Errors
    ///
    /// As for [`execute`](Self::execute).
    pub async fn execute_value(
        &self,
        operation: &Operation,
        args: OperationArgs,
    ) -> Result<Option<serde_json::Value>> {
        self.execute(operation, args).await
    }

    async fn send(&self, operation: &Operation, args: OperationArgs) -> Result<HttpResponse> {
        let request = operation.build_request(&self.base_url, args)?;
        debug!(
            operation = operation.id,
            method = %request.method,
            url = %request.url,
            "sending request"
        );

        let response = match &self.cancel {
            None => self.transport.fetch(request).await?,
            Some(token) => {
                if token.is_cancelled() {
                    return Err(Error::Cancelled(operation.id.to_string()));
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(operation = operation.id, "request cancelled");
                        return Err(Error::Cancelled(operation.id.to_string()));
                    }
                    response = self.transport.fetch(request) => response?,
                }
            }
        };

        debug!(
            operation = operation.id,
            status = response.status,
            bytes = response.body.len(),
            "received response"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{ENTITY_ERRORS, SUCCESS_CREATED};
    use crate::query::ParamValue;
    use crate::response::ApiResponse;
    use crate::transport::{MockHttpTransport, ReqwestTransport};
    use crate::types::HttpMethod;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GET_BY_ID: Operation = Operation::get("Buildings_GetById", "/api/Buildings/{id}")
        .with_path_params(&["id"])
        .with_errors(ENTITY_ERRORS);

    const GET_ALL: Operation =
        Operation::get("Buildings_GetAll", "/api/Buildings").with_query(&["PageNumber", "PageSize"]);

    const CREATE: Operation = Operation::post("Buildings_Create", "/api/Buildings")
        .with_json_body()
        .with_success(SUCCESS_CREATED);

    #[derive(Debug, Deserialize, PartialEq)]
    struct Building {
        id: String,
        name: String,
    }

    fn untouched_transport() -> Arc<dyn HttpTransport> {
        let mut transport = MockHttpTransport::new();
        transport.expect_fetch().never();
        Arc::new(transport)
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT));
        assert_eq!(config.pool_max_idle_per_host, DEFAULT_POOL_MAX_IDLE_PER_HOST);
        assert!(config.enable_compression);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false)
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
        assert_eq!(config.user_agent.as_deref(), Some("test-agent"));
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let client = ResourceClient::new("http://h/", untouched_transport());
        assert_eq!(client.base_url(), "http://h");
        assert!(client.cancellation().is_none());
    }

    #[tokio::test]
    async fn test_missing_path_param_never_reaches_transport() {
        let client = ResourceClient::new("http://h", untouched_transport());
        let err = client
            .execute::<serde_json::Value>(&GET_BY_ID, OperationArgs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[tokio::test]
    async fn test_null_query_param_never_reaches_transport() {
        let client = ResourceClient::new("http://h", untouched_transport());
        let args = OperationArgs::new().query_param("PageSize", ParamValue::Null);
        let err = client.execute_value(&GET_ALL, args).await.unwrap_err();
        assert!(matches!(err, Error::NullParameter { .. }));
    }

    #[tokio::test]
    async fn test_request_is_built_from_descriptor() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_fetch()
            .withf(|request| {
                request.method == HttpMethod::Get
                    && request.url == "http://h/api/Buildings?PageNumber=2"
                    && request.header("accept") == Some("application/json")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200).with_body(r#"{"success":true}"#)));

        let client = ResourceClient::new("http://h", Arc::new(transport));
        let result = client
            .execute_value(&GET_ALL, OperationArgs::new().query_opt("PageNumber", Some(2)))
            .await
            .unwrap();
        assert_eq!(result, Some(json!({"success": true})));
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_fetch()
            .times(1)
            .returning(|_| Err(Error::Timeout("deadline".to_string())));

        let client = ResourceClient::new("http://h", Arc::new(transport));
        let err = client
            .execute_value(&GET_ALL, OperationArgs::new())
            .await
            .unwrap_err();
        assert_eq!(err, Error::Timeout("deadline".to_string()));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_transport() {
        let token = CancellationToken::new();
        token.cancel();
        let client = ResourceClient::new("http://h", untouched_transport()).with_cancellation(token);

        let err = client
            .execute_value(&GET_ALL, OperationArgs::new())
            .await
            .unwrap_err();
        assert_eq!(err, Error::Cancelled("Buildings_GetAll".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Buildings"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default()).unwrap());
        let client = ResourceClient::new(server.uri(), transport).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let err = client
            .execute_value(&GET_ALL, OperationArgs::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_by_id_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Buildings/b1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"id": "b1", "name": "Tower A"}
            })))
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default()).unwrap());
        let client = ResourceClient::new(server.uri(), transport);
        let response: ApiResponse<Building> = client
            .execute(&GET_BY_ID, OperationArgs::new().path("id", "b1"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            response.data,
            Some(Building {
                id: "b1".to_string(),
                name: "Tower A".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_create_accepts_201_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Buildings"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {"id": "b2", "name": "Annex"}
            })))
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default()).unwrap());
        let client = ResourceClient::new(server.uri(), transport);
        let args = OperationArgs::new().json(&json!({"name": "Annex"})).unwrap();
        let response: ApiResponse<Building> = client.execute(&CREATE, args).await.unwrap().unwrap();
        assert_eq!(response.data.map(|b| b.id), Some("b2".to_string()));
    }

    #[tokio::test]
    async fn test_not_found_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Buildings/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "title": "Not Found",
                "status": 404
            })))
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default()).unwrap());
        let client = ResourceClient::new(server.uri(), transport);
        let err = client
            .execute_value(&GET_BY_ID, OperationArgs::new().path("id", "missing"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.as_api_exception().unwrap().message, "Not Found");
    }

    #[tokio::test]
    async fn test_query_is_sent_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Buildings"))
            .and(query_param("PageNumber", "1"))
            .and(query_param("PageSize", "50"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = Arc::new(ReqwestTransport::new(&ClientConfig::default()).unwrap());
        let client = ResourceClient::new(server.uri(), transport);
        let args = OperationArgs::new()
            .query_opt("PageNumber", Some(1))
            .query_opt("PageSize", Some(50));
        let result = client.execute_value(&GET_ALL, args).await.unwrap();
        assert!(result.is_none());
    }
}
