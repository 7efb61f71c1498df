//! File and icon payloads.

use chrono::{DateTime, Utc};
use facility_core::query::QueryParams;
use facility_core::response::{null_as_default, ApiResponse, PagedResult};
use facility_core::types::PageRequest;
use serde::{Deserialize, Serialize};

/// Metadata of a stored file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Original file name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    /// Virtual folder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Public URL, when the file is exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Uploader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    /// Upload timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// An icon usable by UI components.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IconDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Grouping, e.g. `hvac`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// MIME type of the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    /// Upload timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Single file metadata envelope.
pub type FileMetadataResponse = ApiResponse<FileMetadataDto>;
/// File page envelope.
pub type FilePageResponse = ApiResponse<PagedResult<FileMetadataDto>>;
/// Single icon envelope.
pub type IconResponse = ApiResponse<IconDto>;
/// Icon page envelope.
pub type IconPageResponse = ApiResponse<PagedResult<IconDto>>;

/// Query parameters for listing files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileListParams {
    /// Paging, sorting and search.
    pub page: PageRequest,
    /// Restrict to one folder.
    pub folder: Option<String>,
}

impl FileListParams {
    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.page.push_into(&mut params);
        params.push_opt("Folder", self.folder.as_deref());
        params
    }
}

/// Query parameters for listing icons.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IconListParams {
    /// Paging, sorting and search.
    pub page: PageRequest,
    /// Restrict to one category.
    pub category: Option<String>,
}

impl IconListParams {
    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.page.push_into(&mut params);
        params.push_opt("Category", self.category.as_deref());
        params
    }
}
