//! Executions and alternative TM payloads.

use chrono::{DateTime, Utc};
use facility_core::query::QueryParams;
use facility_core::response::{null_as_default, ApiResponse, PagedResult};
use facility_core::types::PageRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use validator::Validate;

/// Lifecycle state of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Queued, not yet started.
    #[default]
    Pending,
    /// Running.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Stopped on request.
    Cancelled,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// True once the execution can no longer change state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File produced by an execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// File name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
}

/// An execution as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDto {
    /// Identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Building the execution runs against.
    #[serde(default, deserialize_with = "null_as_default")]
    pub building_id: String,
    /// Alternative TM used, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_tm_id: Option<String>,
    /// Current state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ExecutionStatus,
    /// Progress in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// User that started the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Start timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Produced files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<ArtifactDto>,
}

/// Request payload for starting an execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartExecutionDto {
    /// Target building.
    #[validate(length(min = 1))]
    pub building_id: String,
    /// Alternative TM to use instead of the building default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_tm_id: Option<String>,
    /// Free-form run parameters.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, serde_json::Value>,
}

/// One log line of an execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogDto {
    /// When the line was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Severity, e.g. `Information`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
    /// Text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// An alternative TM configured for a building.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeTmDto {
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
    /// Location of the model definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    /// Whether executions may use it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating or updating an alternative TM.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveAlternativeTmDto {
    /// Owning building.
    #[validate(length(min = 1))]
    pub building_id: String,
    /// Display name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location of the model definition.
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    /// Whether executions may use it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Single execution envelope.
pub type ExecutionResponse = ApiResponse<ExecutionDto>;
/// Execution page envelope.
pub type ExecutionPageResponse = ApiResponse<PagedResult<ExecutionDto>>;
/// Execution log envelope.
pub type ExecutionLogsResponse = ApiResponse<Vec<ExecutionLogDto>>;
/// Single alternative TM envelope.
pub type AlternativeTmResponse = ApiResponse<AlternativeTmDto>;
/// Alternative TM page envelope.
pub type AlternativeTmPageResponse = ApiResponse<PagedResult<AlternativeTmDto>>;
/// Unpaged alternative TM list envelope.
pub type AlternativeTmListResponse = ApiResponse<Vec<AlternativeTmDto>>;

/// Query parameters for listing executions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExecutionListParams {
    /// Paging, sorting and search.
    pub page: PageRequest,
    /// Filter by state.
    pub status: Option<ExecutionStatus>,
    /// Filter by building.
    pub building_id: Option<String>,
}

impl ExecutionListParams {
    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.page.push_into(&mut params);
        params.push_opt("Status", self.status);
        params.push_opt("BuildingId", self.building_id.as_deref());
        params
    }
}
