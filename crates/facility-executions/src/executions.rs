//! Executions resource (`/api/Executions`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, SUCCESS_CREATED, WRITE_ERRORS,
};
use facility_core::response::{FileResponse, MessageResponse};
use facility_core::transport::HttpTransport;
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{
    ExecutionListParams, ExecutionLogsResponse, ExecutionPageResponse, ExecutionResponse,
    StartExecutionDto,
};
use crate::Result;

/// `GET /api/Executions`
pub const GET_ALL: Operation = Operation::get("Executions_GetAll", "/api/Executions")
    .with_query(page_query!["Status", "BuildingId"]);

/// `GET /api/Executions/{id}`
pub const GET_BY_ID: Operation = Operation::get("Executions_GetById", "/api/Executions/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `POST /api/Executions`
pub const START: Operation = Operation::post("Executions_Start", "/api/Executions")
    .with_json_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(WRITE_ERRORS);

/// `POST /api/Executions/{id}/cancel`
pub const CANCEL: Operation = Operation::post("Executions_Cancel", "/api/Executions/{id}/cancel")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `GET /api/Executions/{id}/logs`
pub const GET_LOGS: Operation = Operation::get("Executions_GetLogs", "/api/Executions/{id}/logs")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `GET /api/Executions/{id}/artifacts/{artifactId}`
pub const DOWNLOAD_ARTIFACT: Operation = Operation::get(
    "Executions_DownloadArtifact",
    "/api/Executions/{id}/artifacts/{artifactId}",
)
.with_path_params(&["id", "artifactId"])
.with_errors(ENTITY_ERRORS)
.returning_file();

/// `DELETE /api/Executions/{id}`
pub const DELETE: Operation = Operation::delete("Executions_Delete", "/api/Executions/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// Every executions operation.
pub const OPERATIONS: &[&Operation] = &[
    &GET_ALL,
    &GET_BY_ID,
    &START,
    &CANCEL,
    &GET_LOGS,
    &DOWNLOAD_ARTIFACT,
    &DELETE,
];

/// Execution operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionsApi: Send + Sync {
    /// List executions, optionally filtered by state and building.
    async fn get_all(&self, params: &ExecutionListParams) -> Result<Option<ExecutionPageResponse>>;

    /// Fetch one execution.
    async fn get_by_id(&self, id: &str) -> Result<Option<ExecutionResponse>>;

    /// Queue a new execution.
    async fn start(&self, body: &StartExecutionDto) -> Result<Option<ExecutionResponse>>;

    /// Ask the backend to stop a running execution.
    async fn cancel(&self, id: &str) -> Result<Option<MessageResponse>>;

    /// Fetch the log lines written so far.
    async fn get_logs(&self, id: &str) -> Result<Option<ExecutionLogsResponse>>;

    /// Download one artifact.
    async fn download_artifact(&self, id: &str, artifact_id: &str)
        -> Result<Option<FileResponse>>;

    /// Delete an execution and its artifacts.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for executions.
#[derive(Debug, Clone)]
pub struct ExecutionsClient {
    inner: ResourceClient,
}

impl ExecutionsClient {
    /// Create a client for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::from_resource(ResourceClient::new(base_url, transport))
    }

    /// Wrap an existing resource client.
    #[must_use]
    pub fn from_resource(inner: ResourceClient) -> Self {
        Self { inner }
    }

    /// Copy of this client whose calls abort when `token` fires.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self::from_resource(self.inner.with_cancellation(token))
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

#[async_trait]
impl ExecutionsApi for ExecutionsClient {
    async fn get_all(&self, params: &ExecutionListParams) -> Result<Option<ExecutionPageResponse>> {
        let args = OperationArgs::new().query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<ExecutionResponse>> {
        self.inner
            .execute(&GET_BY_ID, OperationArgs::new().path("id", id))
            .await
    }

    async fn start(&self, body: &StartExecutionDto) -> Result<Option<ExecutionResponse>> {
        let args = OperationArgs::new().json(body)?;
        self.inner.execute(&START, args).await
    }

    async fn cancel(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&CANCEL, OperationArgs::new().path("id", id))
            .await
    }

    async fn get_logs(&self, id: &str) -> Result<Option<ExecutionLogsResponse>> {
        self.inner
            .execute(&GET_LOGS, OperationArgs::new().path("id", id))
            .await
    }

    async fn download_artifact(
        &self,
        id: &str,
        artifact_id: &str,
    ) -> Result<Option<FileResponse>> {
        let args = OperationArgs::new()
            .path("id", id)
            .path("artifactId", artifact_id);
        self.inner.execute_file(&DOWNLOAD_ARTIFACT, args).await
    }

    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&DELETE, OperationArgs::new().path("id", id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus;
    use facility_core::types::PageRequest;
    use facility_core::{ClientConfig, Error, ReqwestTransport};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ExecutionsClient {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        ExecutionsClient::new(server.uri(), Arc::new(transport))
    }

    #[tokio::test]
    async fn get_all_filters_by_status_and_building() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Executions"))
            .and(query_param("Status", "Running"))
            .and(query_param("BuildingId", "b1"))
            .and(query_param("PageSize", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "items": [{"id": "e1", "buildingId": "b1", "status": "Running", "progress": 42.5}],
                    "totalCount": 1,
                    "pageNumber": 1,
                    "pageSize": 25
                }
            })))
            .mount(&server)
            .await;

        let params = ExecutionListParams {
            page: PageRequest::new().page(1, 25),
            status: Some(ExecutionStatus::Running),
            building_id: Some("b1".into()),
        };
        let page = test_client(&server)
            .get_all(&params)
            .await
            .unwrap()
            .and_then(|r| r.data)
            .unwrap();
        assert_eq!(page.items[0].status, ExecutionStatus::Running);
        assert_eq!(page.items[0].progress, Some(42.5));
    }

    #[tokio::test]
    async fn start_returns_created_execution() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Executions"))
            .and(body_json(json!({"buildingId": "b1", "alternativeTmId": "tm2"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {"id": "e7", "buildingId": "b1", "alternativeTmId": "tm2", "status": "Pending"}
            })))
            .mount(&server)
            .await;

        let body = StartExecutionDto {
            building_id: "b1".into(),
            alternative_tm_id: Some("tm2".into()),
            ..StartExecutionDto::default()
        };
        let execution = test_client(&server)
            .start(&body)
            .await
            .unwrap()
            .and_then(|r| r.data)
            .unwrap();
        assert_eq!(execution.id, "e7");
        assert_eq!(execution.status, ExecutionStatus::Pending);
    }

    #[tokio::test]
    async fn cancel_posts_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Executions/e1/cancel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Execution cancelled"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = test_client(&server).cancel("e1").await.unwrap().unwrap();
        assert_eq!(response.message.as_deref(), Some("Execution cancelled"));
        assert!(response.data.is_none());

        let received = server.received_requests().await.unwrap();
        assert!(received[0].body.is_empty());
    }

    #[tokio::test]
    async fn get_logs_returns_lines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Executions/e1/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"timestamp": "2024-06-01T10:00:00Z", "level": "Information", "message": "started"},
                    {"level": "Error", "message": "solver diverged"}
                ]
            })))
            .mount(&server)
            .await;

        let logs = test_client(&server)
            .get_logs("e1")
            .await
            .unwrap()
            .and_then(|r| r.data)
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].message, "solver diverged");
        assert!(logs[1].timestamp.is_none());
    }

    #[tokio::test]
    async fn download_artifact_returns_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Executions/e1/artifacts/a1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Disposition", "attachment; filename=\"result.csv\"")
                    .insert_header("Content-Type", "text/csv")
                    .set_body_bytes(b"zone,temp\nA,21.5\n".to_vec()),
            )
            .mount(&server)
            .await;

        let file = test_client(&server)
            .download_artifact("e1", "a1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.file_name.as_deref(), Some("result.csv"));
        assert_eq!(file.content_type(), Some("text/csv"));
        assert_eq!(&file.data[..], b"zone,temp\nA,21.5\n");
    }

    #[tokio::test]
    async fn unauthorized_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/Executions/e1"))
            .respond_with(ResponseTemplate::new(401).insert_header("WWW-Authenticate", "Bearer"))
            .mount(&server)
            .await;

        let err = test_client(&server).delete("e1").await.unwrap_err();
        let exception = err.as_api_exception().unwrap();
        assert_eq!(exception.message, "Unauthorized");
        assert_eq!(exception.header("www-authenticate"), Some("Bearer"));
    }

    #[tokio::test]
    async fn cancellation_token_aborts_slow_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Executions/e1"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let token = CancellationToken::new();
        let client = test_client(&server).with_cancellation(token.clone());
        let call = tokio::spawn(async move { client.get_by_id("e1").await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let err = call.await.unwrap().unwrap_err();
        assert_eq!(err, Error::Cancelled("Executions_GetById".to_string()));
    }

    #[test]
    fn catalog_descriptors_are_well_formed() {
        for op in OPERATIONS {
            assert_eq!(op.placeholders(), op.path_params.to_vec(), "{}", op.id);
        }
        assert!(DOWNLOAD_ARTIFACT.accepts(206));
        assert!(START.accepts(201));
        assert!(!CANCEL.accepts(201));
    }
}
