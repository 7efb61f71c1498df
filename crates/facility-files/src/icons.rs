//! Icons resource (`/api/Icons`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, SUCCESS_CREATED, WRITE_ERRORS,
};
use facility_core::response::{FileResponse, MessageResponse};
use facility_core::transport::{FilePart, HttpTransport};
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{IconListParams, IconPageResponse, IconResponse};
use crate::Result;

/// `GET /api/Icons`
pub const GET_ALL: Operation =
    Operation::get("Icons_GetAll", "/api/Icons").with_query(page_query!["Category"]);

/// `GET /api/Icons/{id}`
pub const GET_BY_ID: Operation = Operation::get("Icons_GetById", "/api/Icons/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `POST /api/Icons/upload`
pub const UPLOAD: Operation = Operation::post("Icons_Upload", "/api/Icons/upload")
    .with_multipart_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(WRITE_ERRORS);

/// `GET /api/Icons/{id}/content`
pub const DOWNLOAD: Operation = Operation::get("Icons_Download", "/api/Icons/{id}/content")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS)
    .returning_file();

/// `DELETE /api/Icons/{id}`
pub const DELETE: Operation = Operation::delete("Icons_Delete", "/api/Icons/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// Every icons operation.
pub const OPERATIONS: &[&Operation] = &[&GET_ALL, &GET_BY_ID, &UPLOAD, &DOWNLOAD, &DELETE];

/// Icon library operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IconsApi: Send + Sync {
    /// List icons.
    async fn get_all(&self, params: &IconListParams) -> Result<Option<IconPageResponse>>;

    /// Fetch icon metadata.
    async fn get_by_id(&self, id: &str) -> Result<Option<IconResponse>>;

    /// Upload an image as a new icon.
    async fn upload(&self, file: FilePart) -> Result<Option<IconResponse>>;

    /// Download the image of an icon.
    async fn download(&self, id: &str) -> Result<Option<FileResponse>>;

    /// Delete an icon.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for the icon library.
#[derive(Debug, Clone)]
pub struct IconsClient {
    inner: ResourceClient,
}

impl IconsClient {
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
impl IconsApi for IconsClient {
    async fn get_all(&self, params: &IconListParams) -> Result<Option<IconPageResponse>> {
        let args = OperationArgs::new().query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<IconResponse>> {
        self.inner
            .execute(&GET_BY_ID, OperationArgs::new().path("id", id))
            .await
    }

    async fn upload(&self, file: FilePart) -> Result<Option<IconResponse>> {
        self.inner
            .execute(&UPLOAD, OperationArgs::new().file(file))
            .await
    }

    async fn download(&self, id: &str) -> Result<Option<FileResponse>> {
        self.inner
            .execute_file(&DOWNLOAD, OperationArgs::new().path("id", id))
            .await
    }

    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&DELETE, OperationArgs::new().path("id", id))
            .await
    }
}
