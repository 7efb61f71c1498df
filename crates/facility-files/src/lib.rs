//! File and icon storage clients for the facility API.
//!
//! Uploads are sent as `multipart/form-data` with a single `file` field.
//! Downloads return a [`facility_core::FileResponse`] carrying the raw bytes and
//! the server-supplied file name.

#![deny(missing_docs)]

pub mod files;
pub mod icons;
pub mod models;

pub use files::{FilesApi, FilesClient};
pub use icons::{IconsApi, IconsClient};
pub use models::{
    FileListParams, FileMetadataDto, FileMetadataResponse, FilePageResponse, IconDto,
    IconListParams, IconPageResponse, IconResponse,
};

/// Convenient result alias that reuses the shared facility error type.
pub type Result<T> = facility_core::Result<T>;
