//! Buildings and blocks clients for the facility API.
//!
//! Provides typed payloads and asynchronous clients for `/api/Buildings` and the
//! blocks nested under each building.

#![deny(missing_docs)]

pub mod blocks;
pub mod buildings;
pub mod models;

pub use blocks::{BlocksApi, BlocksClient};
pub use buildings::{BuildingsApi, BuildingsClient};
pub use models::{
    BlockDto, BlockPageResponse, BlockResponse, BuildingDto, BuildingListParams,
    BuildingPageResponse, BuildingResponse, CreateBuildingDto, SaveBlockDto, UpdateBuildingDto,
};

/// Convenient result alias that reuses the shared facility error type.
pub type Result<T> = facility_core::Result<T>;
