//! UI components resource (`/api/UiComponents`).

use async_trait::async_trait;
use facility_core::operation::{
    Operation, OperationArgs, ENTITY_ERRORS, ENTITY_WRITE_ERRORS, SUCCESS_CREATED, WRITE_ERRORS,
};
use facility_core::response::MessageResponse;
use facility_core::transport::HttpTransport;
use facility_core::{page_query, CancellationToken, ResourceClient};
use std::sync::Arc;

use crate::models::{
    SaveUiComponentDto, UiComponentListParams, UiComponentListResponse, UiComponentPageResponse,
    UiComponentResponse,
};
use crate::Result;

/// `GET /api/UiComponents`
pub const GET_ALL: Operation = Operation::get("UiComponents_GetAll", "/api/UiComponents")
    .with_query(page_query!["ComponentType"]);

/// `GET /api/UiComponents/{id}`
pub const GET_BY_ID: Operation = Operation::get("UiComponents_GetById", "/api/UiComponents/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// `GET /api/UiComponents/type/{componentType}`
pub const GET_BY_TYPE: Operation = Operation::get(
    "UiComponents_GetByType",
    "/api/UiComponents/type/{componentType}",
)
.with_path_params(&["componentType"])
.with_errors(ENTITY_ERRORS);

/// `POST /api/UiComponents`
pub const CREATE: Operation = Operation::post("UiComponents_Create", "/api/UiComponents")
    .with_json_body()
    .with_success(SUCCESS_CREATED)
    .with_errors(WRITE_ERRORS);

/// `PUT /api/UiComponents/{id}`
pub const UPDATE: Operation = Operation::put("UiComponents_Update", "/api/UiComponents/{id}")
    .with_path_params(&["id"])
    .with_json_body()
    .with_errors(ENTITY_WRITE_ERRORS);

/// `POST /api/UiComponents/{id}/publish`
pub const PUBLISH: Operation =
    Operation::post("UiComponents_Publish", "/api/UiComponents/{id}/publish")
        .with_path_params(&["id"])
        .with_errors(ENTITY_ERRORS);

/// `DELETE /api/UiComponents/{id}`
pub const DELETE: Operation = Operation::delete("UiComponents_Delete", "/api/UiComponents/{id}")
    .with_path_params(&["id"])
    .with_errors(ENTITY_ERRORS);

/// Every UI components operation.
pub const OPERATIONS: &[&Operation] = &[
    &GET_ALL,
    &GET_BY_ID,
    &GET_BY_TYPE,
    &CREATE,
    &UPDATE,
    &PUBLISH,
    &DELETE,
];

/// UI component catalog operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UiComponentsApi: Send + Sync {
    /// List components.
    async fn get_all(&self, params: &UiComponentListParams)
        -> Result<Option<UiComponentPageResponse>>;

    /// Fetch one component.
    async fn get_by_id(&self, id: &str) -> Result<Option<UiComponentResponse>>;

    /// All components of one kind, unpaged.
    async fn get_by_type(&self, component_type: &str) -> Result<Option<UiComponentListResponse>>;

    /// Create a draft component.
    async fn create(&self, body: &SaveUiComponentDto) -> Result<Option<UiComponentResponse>>;

    /// Update a component.
    async fn update(&self, id: &str, body: &SaveUiComponentDto)
        -> Result<Option<UiComponentResponse>>;

    /// Make a component visible to dashboards.
    async fn publish(&self, id: &str) -> Result<Option<MessageResponse>>;

    /// Delete a component.
    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>>;
}

/// Client for the UI component catalog.
#[derive(Debug, Clone)]
pub struct UiComponentsClient {
    inner: ResourceClient,
}

impl UiComponentsClient {
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
impl UiComponentsApi for UiComponentsClient {
    async fn get_all(
        &self,
        params: &UiComponentListParams,
    ) -> Result<Option<UiComponentPageResponse>> {
        let args = OperationArgs::new().query(params.to_query());
        self.inner.execute(&GET_ALL, args).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<UiComponentResponse>> {
        self.inner
            .execute(&GET_BY_ID, OperationArgs::new().path("id", id))
            .await
    }

    async fn get_by_type(&self, component_type: &str) -> Result<Option<UiComponentListResponse>> {
        let args = OperationArgs::new().path("componentType", component_type);
        self.inner.execute(&GET_BY_TYPE, args).await
    }

    async fn create(&self, body: &SaveUiComponentDto) -> Result<Option<UiComponentResponse>> {
        let args = OperationArgs::new().json(body)?;
        self.inner.execute(&CREATE, args).await
    }

    async fn update(
        &self,
        id: &str,
        body: &SaveUiComponentDto,
    ) -> Result<Option<UiComponentResponse>> {
        let args = OperationArgs::new().path("id", id).json(body)?;
        self.inner.execute(&UPDATE, args).await
    }

    async fn publish(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&PUBLISH, OperationArgs::new().path("id", id))
            .await
    }

    async fn delete(&self, id: &str) -> Result<Option<MessageResponse>> {
        self.inner
            .execute(&DELETE, OperationArgs::new().path("id", id))
            .await
    }
}
