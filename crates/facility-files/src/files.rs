//! Files resource (`/api/Files`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, BAD_REQUEST, ENTITY_ERRORS, FORBIDDEN, SUCCESS_CREATED, UNAUTHORIZED,
};
use facility_core::response::{FileResponse, MessageResponse};
use facility_core::transport::{FilePart, HttpTransport};
use facility_core::types::ByteRange;
use facility_core::{page_query, CancellationToken, DeclaredError, ResourceClient};
use std::sync::Arc;

use crate::models::{FileListParams, FileMetadataResponse, FilePageResponse};
use crate::Result;

/// Errors documented by uploads; 413 is returned for oversized files.
pub const UPLOAD_ERRORS: &[DeclaredError] = &[
    BAD_REQUEST,
    UNAUTHORIZED,
    FORBIDDEN,
    DeclaredError::new(413, "Payload Too Large"),
];

/// `GET /api/Files`
pub const GET_ALL: Operation =
    Operation::get("Files_GetAll", "/api/Files").with_query(page_query!["Folder"]);

/// `GET /api/Files/{id}`
pub const GET_BY_ID: Operation = Operation::get("Files_GetById", "/api/Files/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `POST /api/Files/upload`
pub const UPLOAD: Operation = Operation::post("Files_Upload", "/api/Files/upload")
    .with_multipart_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(UPLOAD_ERRORS);

/// `GET /api/Files/{id}/download`
pub const DOWNLOAD: Operation = Operation::get("Files_Download", "/api/Files/{id}/download")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS)
    .returning_file();

/// `DELETE /api/Files/{id}`
pub const DELETE: Operation = Operation::delete("Files_Delete", "/api/Files/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// Every files operation.
pub const OPERATIONS: &[&Operation] = &[&GET_ALL, &GET_BY_ID, &UPLOAD, &DOWNLOAD, &DELETE];

/// File storage operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilesApi: Send + Sync {
    /// List stored files.
    async fn get_all(&self, params: &FileListParams) -> Result<Option<FilePageResponse>>;

    /// Fetch a file's metadata.
    async fn get_by_id(&self, id: &str) -> Result<Option<FileMetadataResponse>>;

    /// Upload a file.
    async fn upload(&self, file: FilePart) -> Result<Option<FileMetadataResponse>>;

    /// Download a file, or part of it when `range` is given.
    async fn download(&self, id: &str, range: Option<ByteRange>) -> Result<Option<FileResponse>>;

    /// Delete a file.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for file storage.
#[derive(Debug, Clone)]
pub struct FilesClient {
    inner: ResourceClient,
}

impl FilesClient {
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
impl FilesApi for FilesClient {
    async fn get_all(&self, params: &FileListParams) -> Result<Option<FilePageResponse>> {
        let args = OperationArgs::new().query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FileMetadataResponse>> {
        self.inner
            .execute(&GET_BY_ID, OperationArgs::new().path("id", id))
            .await
    }

    async fn upload(&self, file: FilePart) -> Result<Option<FileMetadataResponse>> {
        self.inner
            .execute(&UPLOAD, OperationArgs::new().file(file))
            .await
    }

    async fn download(&self, id: &str, range: Option<ByteRange>) -> Result<Option<FileResponse>> {
        let mut args = OperationArgs::new().path("id", id);
        if let Some(range) = range {
            args = args.header("Range", range.header_value());
        }
        self.inner.execute_file(&DOWNLOAD, args).await
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
    use bytes::Bytes;
    use facility_core::{ClientConfig, ReqwestTransport};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> FilesClient {
        let transport = ReqwestTransport::new(&ClientConfig::default()).unwrap();
        FilesClient::new(server.uri(), Arc::new(transport))
    }

    #[tokio::test]
    async fn get_all_filters_by_folder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Files"))
            .and(query_param("Folder", "plans/2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "items": [{"id": "f1", "fileName": "ground.dwg", "size": 1024, "folder": "plans/2024"}],
                    "totalCount": 1,
                    "pageNumber": 1,
                    "pageSize": 20
                }
            })))
            .mount(&server)
            .await;

        let params = FileListParams {
            folder: Some("plans/2024".into()),
            ..FileListParams::default()
        };
        let page = test_client(&server)
            .get_all(&params)
            .await
            .unwrap()
            .and_then(|r| r.data)
            .unwrap();
        assert_eq!(page.items[0].file_name, "ground.dwg");

        let received = server.received_requests().await.unwrap();
        assert_eq!(received[0].url.query(), Some("Folder=plans%2F2024"));
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Files/upload"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": {"id": "f9", "fileName": "notes.txt", "contentType": "text/plain", "size": 5}
            })))
            .mount(&server)
            .await;

        let part = FilePart::new("notes.txt", Bytes::from_static(b"hello")).with_content_type("text/plain");
        let metadata = test_client(&server)
            .upload(part)
            .await
            .unwrap()
            .and_then(|r| r.data)
            .unwrap();
        assert_eq!(metadata.id, "f9");

        let received = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&received[0].body);
        assert!(body.contains(r#"name="file"; filename="notes.txt""#));
        assert!(body.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn oversized_upload_is_declared_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Files/upload"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .upload(FilePart::new("huge.bin", vec![0_u8; 16]))
            .await
            .unwrap_err();
        assert_eq!(err.as_api_exception().unwrap().message, "Payload Too Large");
    }

    #[tokio::test]
    async fn download_with_range_returns_partial_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Files/f1/download"))
            .and(header("Range", "bytes=0-3"))
            .and(header("Accept", "application/octet-stream"))
            .respond_with(
                ResponseTemplate::new(206)
                    .insert_header(
                        "Content-Disposition",
                        "attachment; filename=\"plan.pdf\"; filename*=UTF-8''Grundriss%20EG.pdf",
                    )
                    .insert_header("Content-Range", "bytes 0-3/2048")
                    .set_body_bytes(b"%PDF".to_vec()),
            )
            .mount(&server)
            .await;

        let file = test_client(&server)
            .download("f1", Some(ByteRange::inclusive(0, 3)))
            .await
            .unwrap()
            .unwrap();
        assert!(file.is_partial());
        assert_eq!(file.file_name.as_deref(), Some("Grundriss EG.pdf"));
        assert_eq!(file.headers.get("content-range").map(String::as_str), Some("bytes 0-3/2048"));
        assert_eq!(&file.data[..], b"%PDF");
    }

    #[tokio::test]
    async fn download_missing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Files/gone/download"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"title": "Not Found", "status": 404})))
            .mount(&server)
            .await;

        let err = test_client(&server).download("gone", None).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn catalog_descriptors_are_well_formed() {
        for op in OPERATIONS {
            assert_eq!(op.placeholders(), op.path_params.to_vec(), "{}", op.id);
            assert!(op.id.starts_with("Files_"));
        }
    }
}
