//! Buildings and blocks payloads.

use chrono::{DateTime, Utc};
use facility_core::query::QueryParams;
use facility_core::response::{null_as_default, ApiResponse, PagedResult};
use facility_core::types::PageRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A building as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of floors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<i32>,
    /// Cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Number of blocks in the building.
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_count: u32,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating a building.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildingDto {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of floors.
    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<i32>,
    /// Cover image.
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request payload for updating a building.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildingDto {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Street address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of floors.
    #[validate(range(min = 0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<i32>,
    /// Cover image.
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A block (wing, section) inside a building.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Owning building.
    #[serde(default, deserialize_with = "null_as_default")]
    pub building_id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Floor the block starts on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    /// Floor area in square metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or updating a block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlockDto {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Floor the block starts on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    /// Floor area in square metres.
    #[validate(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
}

/// Single building envelope.
pub type BuildingResponse = ApiResponse<BuildingDto>;
/// Building page envelope.
pub type BuildingPageResponse = ApiResponse<PagedResult<BuildingDto>>;
/// Single block envelope.
pub type BlockResponse = ApiResponse<BlockDto>;
/// Block page envelope.
pub type BlockPageResponse = ApiResponse<PagedResult<BlockDto>>;

/// Query parameters for listing buildings or blocks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildingListParams {
    /// Paging, sorting and search.
    pub page: PageRequest,
}

impl BuildingListParams {
    /// Parameters for one page.
    #[must_use]
    pub fn new(page: PageRequest) -> Self {
        Self { page }
    }

    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.page.push_into(&mut params);
        params
    }
}
