//! UI component payloads.

use chrono::{DateTime, Utc};
use facility_core::query::QueryParams;
use facility_core::response::{null_as_default, ApiResponse, PagedResult};
use facility_core::types::PageRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A dashboard widget definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiComponentDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Widget kind, e.g. `gauge` or `floor-plan`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub component_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon shown in the palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Widget settings, opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
    /// Revision, bumped on every publish.
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u32,
    /// Visible to dashboards.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,
    /// Publish timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or updating a UI component.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveUiComponentDto {
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Widget kind.
    #[validate(length(min = 1, max = 100))]
    pub component_type: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon shown in the palette.
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Widget settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<serde_json::Value>,
}

/// Single UI component envelope.
pub type UiComponentResponse = ApiResponse<UiComponentDto>;
/// UI component page envelope.
pub type UiComponentPageResponse = ApiResponse<PagedResult<UiComponentDto>>;
/// Unpaged UI component list envelope.
pub type UiComponentListResponse = ApiResponse<Vec<UiComponentDto>>;

/// Query parameters for listing UI components.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UiComponentListParams {
    /// Paging, sorting and search.
    pub page: PageRequest,
    /// Restrict to one widget kind.
    pub component_type: Option<String>,
}

impl UiComponentListParams {
    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.page.push_into(&mut params);
        params.push_opt("ComponentType", self.component_type.as_deref());
        params
    }
}
