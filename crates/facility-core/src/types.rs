//! Core request-side types shared by all resource clients.
//!
//! HTTP verbs, paging/sorting arguments for list operations and byte ranges for
//! partial downloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::query::QueryParams;

/// HTTP verbs used by the backend's operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Reads
    Get,
    /// Creates and actions
    Post,
    /// Updates
    Put,
    /// Removals
    Delete,
}

impl HttpMethod {
    /// Returns the uppercase verb.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Convert to [`reqwest::Method`].
    #[must_use]
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::InvalidEndpoint(format!(
                "unsupported HTTP method `{other}`"
            ))),
        }
    }
}

/// Sort direction accepted by `Sorting.Direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending
    #[default]
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort field and direction for list operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    /// Field name as understood by the backend.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl Sorting {
    /// Ascending sort on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Query names of a paged list operation: the shared paging names followed
/// by any resource-specific filters.
///
/// ```
/// use facility_core::{page_query, Operation};
///
/// const GET_ALL: Operation =
///     Operation::get("Files_GetAll", "/api/Files").with_query(page_query!["Folder"]);
/// assert_eq!(GET_ALL.query_params.last(), Some(&"Folder"));
/// ```
#[macro_export]
macro_rules! page_query {
    ($($filter:literal),* $(,)?) => {
        &[
            "PageNumber",
            "PageSize",
            "Sorting.Field",
            "Sorting.Direction",
            "SearchTerm",
            $($filter,)*
        ]
    };
}

/// Query names shared by every paged list operation, in declaration order.
pub const PAGE_QUERY_PARAMS: &[&str] = page_query![];

/// Paging, sorting and search arguments for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page_number: Option<u32>,
    /// Items per page.
    pub page_size: Option<u32>,
    /// Optional sort.
    pub sorting: Option<Sorting>,
    /// Free-text search.
    pub search_term: Option<String>,
}

impl PageRequest {
    /// Create an empty request (server defaults apply).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a specific page.
    #[must_use]
    pub const fn page(mut self, number: u32, size: u32) -> Self {
        self.page_number = Some(number);
        self.page_size = Some(size);
        self
    }

    /// Set the sort.
    #[must_use]
    pub fn sorted_by(mut self, sorting: Sorting) -> Self {
        self.sorting = Some(sorting);
        self
    }

    /// Set the search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Append the paging query parameters.
    pub fn push_into(&self, params: &mut QueryParams) {
        params.push_opt("PageNumber", self.page_number);
        params.push_opt("PageSize", self.page_size);
        params.push_opt("Sorting.Field", self.sorting.as_ref().map(|s| s.field.as_str()));
        params.push_opt("Sorting.Direction", self.sorting.as_ref().map(|s| s.direction));
        params.push_opt("SearchTerm", self.search_term.as_deref());
    }
}

/// Byte range for partial-content downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte (inclusive).
    pub start: u64,
    /// Last byte (inclusive); open-ended when `None`.
    pub end: Option<u64>,
}

impl ByteRange {
    /// Range from `start` to the end of the resource.
    #[must_use]
    pub const fn starting_at(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Inclusive range `start..=end`.
    #[must_use]
    pub const fn inclusive(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Renders the `Range` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self.end {
            Some(end) => format!("bytes={}-{end}", self.start),
            None => format!("bytes={}-", self.start),
        }
    }
}
