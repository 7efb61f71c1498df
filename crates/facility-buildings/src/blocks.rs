//! Blocks nested under a building (`/api/Buildings/{id}/blocks`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, ENTITY_WRITE_ERRORS, SUCCESS_CREATED,
};
use facility_core::response::MessageResponse;
use facility_core::transport::HttpTransport;
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{BlockPageResponse, BlockResponse, BuildingListParams, SaveBlockDto};
use crate::Result;

/// `GET /api/Buildings/{id}/blocks`
pub const GET_ALL: Operation = Operation::get("Blocks_GetAll", "/api/Buildings/{id}/blocks")
    .with_path_params(&["id"])
    .with_query(page_query![])
    .with_errors(ENTITY_ERRORS);

/// `GET /api/Buildings/{id}/blocks/{blockId}`
pub const GET_BY_ID: Operation =
    Operation::get("Blocks_GetById", "/api/Buildings/{id}/blocks/{blockId}")
        .with_path_params(&["id", "blockId"])
        .with_errors(ENTITY_ERRORS);

/// `POST /api/Buildings/{id}/blocks`
pub const CREATE: Operation = Operation::post("Blocks_Create", "/api/Buildings/{id}/blocks")
    .with_path_params(&["id"])
    .with_json_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(ENTITY_WRITE_ERRORS);

/// `PUT /api/Buildings/{id}/blocks/{blockId}`
pub const UPDATE: Operation =
    Operation::put("Blocks_Update", "/api/Buildings/{id}/blocks/{blockId}")
        .with_path_params(&["id", "blockId"])
        .with_json_body()
        .with_errors(ENTITY_WRITE_ERRORS);

/// `DELETE /api/Buildings/{id}/blocks/{blockId}`
pub const DELETE: Operation =
    Operation::delete("Blocks_Delete", "/api/Buildings/{id}/blocks/{blockId}")
        .with_path_params(&["id", "blockId"])
        .with_errors(ENTITY_ERRORS);

/// Every blocks operation.
pub const OPERATIONS: &[&Operation] = &[&GET_ALL, &GET_BY_ID, &CREATE, &UPDATE, &DELETE];

/// Block operations, scoped to a building.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlocksApi: Send + Sync {
    /// List the blocks of a building.
    async fn get_all(
        &self,
        building_id: &str,
        params: &BuildingListParams,
    ) -> Result<Option<BlockPageResponse>>;

    /// Fetch one block.
    async fn get_by_id(&self, building_id: &str, block_id: &str) -> Result<Option<BlockResponse>>;

    /// Add a block to a building.
    async fn create(&self, building_id: &str, body: &SaveBlockDto) -> Result<Option<BlockResponse>>;

    /// Update a block.
    async fn update(
        &self,
        building_id: &str,
        block_id: &str,
        body: &SaveBlockDto,
    ) -> Result<Option<BlockResponse>>;

    /// Remove a block.
    async fn delete(&self, building_id: &str, block_id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for blocks.
#[derive(Debug, Clone)]
pub struct BlocksClient {
    inner: ResourceClient,
}

impl BlocksClient {
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
impl BlocksApi for BlocksClient {
    async fn get_all(
        &self,
        building_id: &str,
        params: &BuildingListParams,
    ) -> Result<Option<BlockPageResponse>> {
        let args = OperationArgs::new()
            .path("id", building_id)
            .query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, building_id: &str, block_id: &str) -> Result<Option<BlockResponse>> {
        let args = OperationArgs::new()
            .path("id", building_id)
            .path("blockId", block_id);
        self.inner.execute(&GET_BY_ID, args).await
    }

    async fn create(&self, building_id: &str, body: &SaveBlockDto) -> Result<Option<BlockResponse>> {
        let args = OperationArgs::new().path("id", building_id).json(body)?;
        self.inner.execute(&CREATE, args).await
    }

    async fn update(
        &self,
        building_id: &str,
        block_id: &str,
        body: &SaveBlockDto,
    ) -> Result<Option<BlockResponse>> {
        let args = OperationArgs::new()
            .path("id", building_id)
            .path("blockId", block_id)
            .json(body)?;
        self.inner.execute(&UPDATE, args).await
    }

    async fn delete(&self, building_id: &str, block_id: &str) -> Result<Option<MessageResponse>> {
        let args = OperationArgs::new()
            .path("id", building_id)
            .path("blockId", block_id);
        self.inner.execute(&DELETE, args).await
    }
}
