//! Alternative TMs resource (`/api/AlternativeTMs`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, ENTITY_WRITE_ERRORS, SUCCESS_CREATED, WRITE_ERRORS,
};
use facility_core::query::QueryParams;
use facility_core::response::MessageResponse;
use facility_core::transport::HttpTransport;
use facility_core::types::PageRequest;
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{
    AlternativeTmListResponse, AlternativeTmPageResponse, AlternativeTmResponse,
    SaveAlternativeTmDto,
};
use crate::Result;

/// `GET /api/AlternativeTMs`
pub const GET_ALL: Operation =
    Operation::get("AlternativeTMs_GetAll", "/api/AlternativeTMs").with_query(page_query![]);

/// `GET /api/AlternativeTMs/{id}`
pub const GET_BY_ID: Operation =
    Operation::get("AlternativeTMs_GetById", "/api/AlternativeTMs/{id}")
        .with_path_params(&["id"])
        .with_errors(ENTITY_ERRORS);

/// `GET /api/AlternativeTMs/by-building/{buildingId}`
pub const GET_BY_BUILDING: Operation = Operation::get(
    "AlternativeTMs_GetByBuilding",
    "/api/AlternativeTMs/by-building/{buildingId}",
)
.with_path_params(&["buildingId"])
.with_errors(ENTITY_ERRORS);

/// `POST /api/AlternativeTMs`
pub const CREATE: Operation = Operation::post("AlternativeTMs_Create", "/api/AlternativeTMs")
    .with_json_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(WRITE_ERRORS);

/// `PUT /api/AlternativeTMs/{id}`
pub const UPDATE: Operation = Operation::put("AlternativeTMs_Update", "/api/AlternativeTMs/{id}")
    .with_path_params(&["id"])
    .with_json_body()
    .with_errors(ENTITY_WRITE_ERRORS);

/// `DELETE /api/AlternativeTMs/{id}`
pub const DELETE: Operation =
    Operation::delete("AlternativeTMs_Delete", "/api/AlternativeTMs/{id}")
        .with_path_params(&["id"])
        .with_errors(ENTITY_ERRORS);

/// Every alternative TM operation.
pub const OPERATIONS: &[&Operation] = &[
    &GET_ALL,
    &GET_BY_ID,
    &GET_BY_BUILDING,
    &CREATE,
    &UPDATE,
    &DELETE,
];

/// Alternative TM operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlternativeTmsApi: Send + Sync {
    /// List alternative TMs across all buildings.
    async fn get_all(&self, page: &PageRequest) -> Result<Option<AlternativeTmPageResponse>>;

    /// Fetch one alternative TM.
    async fn get_by_id(&self, id: &str) -> Result<Option<AlternativeTmResponse>>;

    /// All alternative TMs of one building, unpaged.
    async fn get_by_building(&self, building_id: &str) -> Result<Option<AlternativeTmListResponse>>;

    /// Create an alternative TM.
    async fn create(&self, body: &SaveAlternativeTmDto) -> Result<Option<AlternativeTmResponse>>;

    /// Update an alternative TM.
    async fn update(
        &self,
        id: &str,
        body: &SaveAlternativeTmDto,
    ) -> Result<Option<AlternativeTmResponse>>;

    /// Delete an alternative TM.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for alternative TMs.
#[derive(Debug, Clone)]
pub struct AlternativeTmsClient {
    inner: ResourceClient,
}

impl AlternativeTmsClient {
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
impl AlternativeTmsApi for AlternativeTmsClient {
    async fn get_all(&self, page: &PageRequest) -> Result<Option<AlternativeTmPageResponse>> {
        let mut query = QueryParams::new();
        page.push_into(&mut query);
        self.inner
            .execute(&GET_ALL, OperationArgs::new().query(query))
            .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<AlternativeTmResponse>> {
        self.inner
            .execute(&GET_BY_ID, OperationArgs::new().path("id", id))
            .await
    }

    async fn get_by_building(&self, building_id: &str) -> Result<Option<AlternativeTmListResponse>> {
        let args = OperationArgs::new().path("buildingId", building_id);
        self.inner.execute(&GET_BY_BUILDING, args).await
    }

    async fn create(&self, body: &SaveAlternativeTmDto) -> Result<Option<AlternativeTmResponse>> {
        let args = OperationArgs::new().json(body)?;
        self.inner.execute(&CREATE, args).await
    }

    async fn update(
        &self,
        id: &str,
        body: &SaveAlternativeTmDto,
    ) -> Result<Option<AlternativeTmResponse>> {
        let args = OperationArgs::new().path("id", id).json(body)?;
        self.inner.execute(&UPDATE, args).await
    }

    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&DELETE, OperationArgs::new().path("id", id))
            .await
    }
}
