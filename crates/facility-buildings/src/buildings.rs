//! Buildings resource (`/api/Buildings`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, ENTITY_WRITE_ERRORS, SUCCESS_CREATED, WRITE_ERRORS,
};
use facility_core::response::MessageResponse;
use facility_core::transport::HttpTransport;
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{
    BuildingListParams, BuildingPageResponse, BuildingResponse, CreateBuildingDto,
    UpdateBuildingDto,
};
use crate::Result;

/// `GET /api/Buildings`
pub const GET_ALL: Operation =
    Operation::get("Buildings_GetAll", "/api/Buildings").with_query(page_query![]);

/// `GET /api/Buildings/{id}`
pub const GET_BY_ID: Operation = Operation::get("Buildings_GetById", "/api/Buildings/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `POST /api/Buildings`
pub const CREATE: Operation = Operation::post("Buildings_Create", "/api/Buildings")
    .with_json_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(WRITE_ERRORS);

/// `PUT /api/Buildings/{id}`
pub const UPDATE: Operation = Operation::put("Buildings_Update", "/api/Buildings/{id}")
    .with_path_params(&["id"])
    .with_json_body()
    .with_errors(ENTITY_WRITE_ERRORS);

/// `DELETE /api/Buildings/{id}`
pub const DELETE: Operation = Operation::delete("Buildings_Delete", "/api/Buildings/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// Every buildings operation.
pub const OPERATIONS: &[&Operation] = &[&GET_ALL, &GET_BY_ID, &CREATE, &UPDATE, &DELETE];

/// Buildings operations.
///
/// Every method resolves to `None` when the backend answers without a body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuildingsApi: Send + Sync {
    /// List buildings.
    async fn get_all(&self, params: &BuildingListParams) -> Result<Option<BuildingPageResponse>>;

    /// Fetch one building.
    async fn get_by_id(&self, id: &str) -> Result<Option<BuildingResponse>>;

    /// Create a building.
    async fn create(&self, body: &CreateBuildingDto) -> Result<Option<BuildingResponse>>;

    /// Replace a building's editable fields.
    async fn update(&self, id: &str, body: &UpdateBuildingDto) -> Result<Option<BuildingResponse>>;

    /// Delete a building and its blocks.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for the buildings resource.
#[derive(Debug, Clone)]
pub struct BuildingsClient {
    inner: ResourceClient,
}

impl BuildingsClient {
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
impl BuildingsApi for BuildingsClient {
    async fn get_all(&self, params: &BuildingListParams) -> Result<Option<BuildingPageResponse>> {
        let args = OperationArgs::new().query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<BuildingResponse>> {
        let args = OperationArgs::new().path("id", id);
        self.inner.execute(&GET_BY_ID, args).await
    }

    async fn create(&self, body: &CreateBuildingDto) -> Result<Option<BuildingResponse>> {
        let args = OperationArgs::new().json(body)?;
        self.inner.execute(&CREATE, args).await
    }

    async fn update(&self, id: &str, body: &UpdateBuildingDto) -> Result<Option<BuildingResponse>> {
        let args = OperationArgs::new().path("id", id).json(body)?;
        self.inner.execute(&UPDATE, args).await
    }

    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>> {
        let args = OperationArgs::new().path("id", id);
        self.inner.execute(&DELETE, args).await
    }
}
