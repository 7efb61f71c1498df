//! Transport seam between resource clients and the network.
//!
//! Clients never talk to reqwest directly; they hand an [`HttpRequest`] to an
//! [`HttpTransport`] and get an [`HttpResponse`] back. Production code uses
//! [`ReqwestTransport`]; tests substitute any other implementation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::ClientBuilder;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, USER_AGENT};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::HttpMethod;

/// Request body handed to the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON.
    Json(String),
    /// Multipart form with one file field.
    Multipart(FilePart),
}

/// A file sent as a multipart form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

impl FilePart {
    /// File in the `file` field.
    #[must_use]
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A fully built request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Absolute or base-relative URL.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
}

impl HttpRequest {
    /// First header value with the given (case-insensitive) name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Header pairs; `None` when the transport exposes no headers.
    pub headers: Option<Vec<(String, String)>>,
    /// Body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// Response with `status`, no headers and an empty body.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: None,
            body: Bytes::new(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Body decoded as UTF-8 (invalid sequences replaced).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Headers flattened into a map keyed by lowercase name.
    ///
    /// Repeated headers are joined with `", "`. A response without headers gives an
    /// empty map.
    #[must_use]
    pub fn header_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = HashMap::new();
        for (name, value) in self.headers.iter().flatten() {
            map.entry(name.to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }
        map
    }
}

/// Capability to send one request and return its response.
///
/// Implementations must be shareable across concurrent calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a transport-level error ([`Error::Timeout`],
    /// [`Error::ServiceUnavailable`], [`Error::HttpError`]) when no response was
    /// received. Non-success statuses are not errors at this layer.
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from HTTP tuning options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = client_builder(config).build().map_err(|err| {
            Error::ConfigError(format!("Failed to build HTTP client: {err}"))
        })?;
        Ok(Self { http })
    }

    /// Build a transport from an [`ApiConfig`], honouring its TLS settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or the
    /// client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = client_builder(&config.http_config());

        if !config.tls_verify {
            warn!("TLS verification disabled for facility API transport");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &config.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build HTTP client: {err}"))
        })?;
        Ok(Self { http })
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn client_builder(config: &ClientConfig) -> ClientBuilder {
    let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);
    let mut builder = ClientBuilder::new()
        .user_agent(user_agent)
        .timeout(config.timeout)
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

    if !config.enable_compression {
        builder = builder.no_gzip();
    }
    builder
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .http
            .request(request.method.to_reqwest(), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.body(json),
            RequestBody::Multipart(part) => {
                let mut file =
                    reqwest::multipart::Part::bytes(part.data.to_vec()).file_name(part.file_name);
                if let Some(content_type) = &part.content_type {
                    file = file.mime_str(content_type)?;
                }
                builder.multipart(reqwest::multipart::Form::new().part(part.field, file))
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(|err| {
            Error::HttpError(format!("Failed to read response body: {err}"))
        })?;

        Ok(HttpResponse {
            status,
            headers: Some(headers),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&ClientConfig::default()).unwrap()
    }

    #[test]
    fn header_map_handles_missing_headers() {
        let response = HttpResponse::new(204);
        assert!(response.header_map().is_empty());
    }

    #[test]
    fn header_map_lowercases_and_joins() {
        let response = HttpResponse::new(200)
            .with_header("Set-Cookie", "a=1")
            .with_header("set-cookie", "b=2")
            .with_header("Content-Type", "application/json");
        let map = response.header_map();
        assert_eq!(map["set-cookie"], "a=1, b=2");
        assert_eq!(map["content-type"], "application/json");
    }

    #[test]
    fn text_is_lossy() {
        let response = HttpResponse::new(200).with_body(vec![b'o', b'k', 0xff]);
        assert_eq!(response.text(), "ok\u{fffd}");
    }

    #[tokio::test]
    async fn reqwest_transport_sends_headers_and_json() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/Buildings/b1"))
            .and(query_param("PageSize", "5"))
            .and(header("Accept", "application/json"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"name":"Tower B"}"#))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Request-Id", "r-9")
                    .set_body_string(r#"{"success":true}"#),
            )
            .mount(&server)
            .await;

        let request = HttpRequest {
            method: HttpMethod::Put,
            url: format!("{}/api/Buildings/b1?PageSize=5", server.uri()),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: RequestBody::Json(r#"{"name":"Tower B"}"#.to_string()),
        };

        let response = transport().fetch(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text(), r#"{"success":true}"#);
        assert_eq!(response.header_map()["x-request-id"], "r-9");
    }

    #[tokio::test]
    async fn reqwest_transport_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Files/upload"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/api/Files/upload", server.uri()),
            headers: Vec::new(),
            body: RequestBody::Multipart(
                FilePart::new("plan.txt", Bytes::from_static(b"hello")).with_content_type("text/plain"),
            ),
        };
        let response = transport().fetch(request).await.unwrap();
        assert_eq!(response.status, 201);

        let received = server.received_requests().await.unwrap();
        let content_type = received[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains(r#"name="file"; filename="plan.txt""#));
        assert!(body.contains("hello"));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/api/Buildings".to_string(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        };
        let err = transport().fetch(request).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ServiceUnavailable(_) | Error::HttpError(_) | Error::Timeout(_)
        ));
    }
}
