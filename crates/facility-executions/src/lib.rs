//! Executions and alternative TM clients for the facility API.
//!
//! Executions are server-side runs against a building, optionally using one of
//! the building's alternative TMs. The clients here start, monitor and cancel
//! runs and fetch their logs and artifacts.

#![deny(missing_docs)]

pub mod alternative_tms;
pub mod executions;
pub mod models;

pub use alternative_tms::{AlternativeTmsApi, AlternativeTmsClient};
pub use executions::{ExecutionsApi, ExecutionsClient};
pub use models::{
    AlternativeTmDto, AlternativeTmListResponse, AlternativeTmPageResponse, AlternativeTmResponse,
    ArtifactDto, ExecutionDto, ExecutionListParams, ExecutionLogDto, ExecutionLogsResponse,
    ExecutionPageResponse, ExecutionResponse, ExecutionStatus, SaveAlternativeTmDto,
    StartExecutionDto,
};

/// Convenient result alias that reuses the shared facility error type.
pub type Result<T> = facility_core::Result<T>;
