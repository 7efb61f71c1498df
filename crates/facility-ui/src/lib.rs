//! UI component catalog client for the facility API.
//!
//! UI components are drafted with create/update and become visible to
//! dashboards once published.

#![deny(missing_docs)]

pub mod components;
pub mod models;

pub use components::{UiComponentsApi, UiComponentsClient};
pub use models::{
    SaveUiComponentDto, UiComponentDto, UiComponentListParams, UiComponentListResponse,
    UiComponentPageResponse, UiComponentResponse,
};

/// Convenient result alias that reuses the shared facility error type.
pub type Result<T> = facility_core::Result<T>;
