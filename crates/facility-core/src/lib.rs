//! # facility-core
//!
//! Shared machinery behind every facility API resource client.
//!
//! Each backend endpoint is described by a `const` [`Operation`]. A
//! [`ResourceClient`] turns an operation plus its [`OperationArgs`] into a request,
//! sends it through an injected [`HttpTransport`] and maps the response status to a
//! typed value or an [`Error`].
//!
//! ## Modules
//!
//! - [`error`] - Error type, typed API exception and the error-construction helper
//! - [`operation`] - Operation descriptors and URL rendering
//! - [`processor`] - Status dispatch for JSON and file responses
//! - [`response`] - Response envelope, paged payload and file responses
//! - [`transport`] - Transport seam and the reqwest implementation
//! - [`client`] - Generic resource client and HTTP tuning
//! - [`config`] - Validated connection settings
//! - [`cancel`] - Cancellation tokens
//! - [`query`] - Query parameter builder
//! - [`types`] - HTTP verbs, paging and byte ranges

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod processor;
pub mod query;
pub mod response;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use client::{ClientConfig, ResourceClient};
pub use config::ApiConfig;
pub use error::{api_error, ApiException, Error, ProblemDetails, Result};
pub use operation::{DeclaredError, Operation, OperationArgs};
pub use query::{ParamValue, QueryParams};
pub use response::{ApiResponse, FileResponse, MessageResponse, PagedResult};
pub use transport::{FilePart, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ByteRange, HttpMethod, PageRequest, SortDirection, Sorting};
