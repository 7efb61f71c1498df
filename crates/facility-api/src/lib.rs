//! # facility-api
//!
//! Typed asynchronous client for the facility management REST API.
//!
//! [`Api`] bundles one client per resource behind its interface trait, so any of
//! them can be replaced with a test double. Every client and payload type is
//! re-exported here.
//!
//! ```no_run
//! use facility_api::{Api, ApiConfig, BuildingsApi};
//!
//! # async fn run() -> facility_api::Result<()> {
//! let api = Api::from_config(&ApiConfig::new("https://facility.example.com")?)?;
//! if let Some(building) = api.buildings().get_by_id("b1").await?.and_then(|r| r.data) {
//!     println!("{}", building.name);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod dynamic;

use std::fmt;
use std::sync::Arc;

use facility_core::operation::ResponseKind;
use tracing::{debug, info};

pub use catalog::{find_operation, operations};
pub use dynamic::{DynamicArgs, OperationOutput};

pub use facility_core::{
    ApiConfig, ApiException, ApiResponse, ByteRange, CancellationToken, ClientConfig, Error,
    FilePart, FileResponse, HttpTransport, MessageResponse, Operation, PageRequest, PagedResult,
    ProblemDetails, ReqwestTransport, ResourceClient, Result, SortDirection, Sorting,
};

pub use facility_buildings::{
    BlockDto, BlockPageResponse, BlockResponse, BlocksApi, BlocksClient, BuildingDto,
    BuildingListParams, BuildingPageResponse, BuildingResponse, BuildingsApi, BuildingsClient,
    CreateBuildingDto, SaveBlockDto, UpdateBuildingDto,
};
pub use facility_executions::{
    AlternativeTmDto, AlternativeTmListResponse, AlternativeTmPageResponse, AlternativeTmResponse,
    AlternativeTmsApi, AlternativeTmsClient, ArtifactDto, ExecutionDto, ExecutionListParams,
    ExecutionLogDto, ExecutionLogsResponse, ExecutionPageResponse, ExecutionResponse,
    ExecutionStatus, ExecutionsApi, ExecutionsClient, SaveAlternativeTmDto, StartExecutionDto,
};
pub use facility_files::{
    FileListParams, FileMetadataDto, FileMetadataResponse, FilePageResponse, FilesApi,
    FilesClient, IconDto, IconListParams, IconPageResponse, IconResponse, IconsApi, IconsClient,
};
pub use facility_ui::{
    SaveUiComponentDto, UiComponentDto, UiComponentListParams, UiComponentListResponse,
    UiComponentPageResponse, UiComponentResponse, UiComponentsApi, UiComponentsClient,
};

/// One client per resource, sharing a base URL and transport.
#[derive(Clone)]
pub struct Api {
    resource: ResourceClient,
    alternative_tms: Arc<dyn AlternativeTmsApi>,
    blocks: Arc<dyn BlocksApi>,
    buildings: Arc<dyn BuildingsApi>,
    executions: Arc<dyn ExecutionsApi>,
    files: Arc<dyn FilesApi>,
    icons: Arc<dyn IconsApi>,
    ui_components: Arc<dyn UiComponentsApi>,
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl Api {
    /// Clients for `base_url` sharing `transport`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        ApiBuilder::new(base_url, transport).build()
    }

    /// Clients for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP transport cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        ApiBuilder::from_config(config).map(ApiBuilder::build)
    }

    /// Start a builder for `base_url` and `transport`.
    #[must_use]
    pub fn builder(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> ApiBuilder {
        ApiBuilder::new(base_url, transport)
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.resource.base_url()
    }

    /// Alternative TMs.
    #[must_use]
    pub fn alternative_tms(&self) -> &dyn AlternativeTmsApi {
        self.alternative_tms.as_ref()
    }

    /// Blocks nested under buildings.
    #[must_use]
    pub fn blocks(&self) -> &dyn BlocksApi {
        self.blocks.as_ref()
    }

    /// Buildings.
    #[must_use]
    pub fn buildings(&self) -> &dyn BuildingsApi {
        self.buildings.as_ref()
    }

    /// Executions.
    #[must_use]
    pub fn executions(&self) -> &dyn ExecutionsApi {
        self.executions.as_ref()
    }

    /// Stored files.
    #[must_use]
    pub fn files(&self) -> &dyn FilesApi {
        self.files.as_ref()
    }

    /// Icon library.
    #[must_use]
    pub fn icons(&self) -> &dyn IconsApi {
        self.icons.as_ref()
    }

    /// UI component catalog.
    #[must_use]
    pub fn ui_components(&self) -> &dyn UiComponentsApi {
        self.ui_components.as_ref()
    }

    /// Call any catalogued operation by id with untyped arguments.
    ///
    /// JSON operations yield the raw envelope, downloads yield the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownOperation`] for an id not in [`operations`],
    /// argument binding errors from [`DynamicArgs::bind`], and otherwise the same
    /// errors as the typed clients.
    pub async fn call_operation(&self, id: &str, args: DynamicArgs) -> Result<OperationOutput> {
        let operation =
            find_operation(id).ok_or_else(|| Error::UnknownOperation(id.to_string()))?;
        debug!(operation = operation.id, "dispatching operation by id");

        let args = args.bind(operation)?;
        match operation.response {
            ResponseKind::Json => self
                .resource
                .execute_value(operation, args)
                .await
                .map(OperationOutput::Json),
            ResponseKind::File => self
                .resource
                .execute_file(operation, args)
                .await
                .map(OperationOutput::File),
        }
    }
}

/// Builder for [`Api`] that allows replacing individual resource clients.
pub struct ApiBuilder {
    resource: ResourceClient,
    alternative_tms: Option<Arc<dyn AlternativeTmsApi>>,
    blocks: Option<Arc<dyn BlocksApi>>,
    buildings: Option<Arc<dyn BuildingsApi>>,
    executions: Option<Arc<dyn ExecutionsApi>>,
    files: Option<Arc<dyn FilesApi>>,
    icons: Option<Arc<dyn IconsApi>>,
    ui_components: Option<Arc<dyn UiComponentsApi>>,
}

impl fmt::Debug for ApiBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiBuilder")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl ApiBuilder {
    /// Builder for `base_url` sharing `transport`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::from_resource(ResourceClient::new(base_url, transport))
    }

    /// Builder around an existing resource client.
    #[must_use]
    pub fn from_resource(resource: ResourceClient) -> Self {
        Self {
            resource,
            alternative_tms: None,
            blocks: None,
            buildings: None,
            executions: None,
            files: None,
            icons: None,
            ui_components: None,
        }
    }

    /// Builder with a reqwest transport configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL is not HTTP(S) or the
    /// transport cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        config.parse_base_url()?;
        let base_url = config.normalized_base_url();
        info!(
            base_url,
            timeout_secs = config.request_timeout_secs,
            tls_verify = config.tls_verify,
            "creating facility API transport"
        );
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(base_url, Arc::new(transport)))
    }

    /// Abort calls of the default clients when `token` fires.
    ///
    /// Clients supplied through the `with_*` methods are used as given.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.resource = self.resource.with_cancellation(token);
        self
    }

    /// Replace the alternative TMs client.
    #[must_use]
    pub fn with_alternative_tms(mut self, client: Arc<dyn AlternativeTmsApi>) -> Self {
        self.alternative_tms = Some(client);
        self
    }

    /// Replace the blocks client.
    #[must_use]
    pub fn with_blocks(mut self, client: Arc<dyn BlocksApi>) -> Self {
        self.blocks = Some(client);
        self
    }

    /// Replace the buildings client.
    #[must_use]
    pub fn with_buildings(mut self, client: Arc<dyn BuildingsApi>) -> Self {
        self.buildings = Some(client);
        self
    }

    /// Replace the executions client.
    #[must_use]
    pub fn with_executions(mut self, client: Arc<dyn ExecutionsApi>) -> Self {
        self.executions = Some(client);
        self
    }

    /// Replace the files client.
    #[must_use]
    pub fn with_files(mut self, client: Arc<dyn FilesApi>) -> Self {
        self.files = Some(client);
        self
    }

    /// Replace the icons client.
    #[must_use]
    pub fn with_icons(mut self, client: Arc<dyn IconsApi>) -> Self {
        self.icons = Some(client);
        self
    }

    /// Replace the UI components client.
    #[must_use]
    pub fn with_ui_components(mut self, client: Arc<dyn UiComponentsApi>) -> Self {
        self.ui_components = Some(client);
        self
    }

    /// Build the facade, creating default clients where none were supplied.
    #[must_use]
    pub fn build(self) -> Api {
        let resource = self.resource;
        Api {
            alternative_tms: self.alternative_tms.unwrap_or_else(|| {
                Arc::new(AlternativeTmsClient::from_resource(resource.clone()))
            }),
            blocks: self
                .blocks
                .unwrap_or_else(|| Arc::new(BlocksClient::from_resource(resource.clone()))),
            buildings: self
                .buildings
                .unwrap_or_else(|| Arc::new(BuildingsClient::from_resource(resource.clone()))),
            executions: self
                .executions
                .unwrap_or_else(|| Arc::new(ExecutionsClient::from_resource(resource.clone()))),
            files: self
                .files
                .unwrap_or_else(|| Arc::new(FilesClient::from_resource(resource.clone()))),
            icons: self
                .icons
                .unwrap_or_else(|| Arc::new(IconsClient::from_resource(resource.clone()))),
            ui_components: self.ui_components.unwrap_or_else(|| {
                Arc::new(UiComponentsClient::from_resource(resource.clone()))
            }),
            resource,
        }
    }
}
