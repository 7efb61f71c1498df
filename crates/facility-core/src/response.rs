//! Response payload shapes shared by every resource.
//!
//! The backend wraps every JSON payload in an [`ApiResponse`] envelope; list
//! operations put a [`PagedResult`] inside it. File downloads produce a
//! [`FileResponse`] instead.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Envelope returned by every JSON operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful.
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,

    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Payload.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Take the payload, if any.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Deserialize an explicit `null` as the type's default.
///
/// Pair with `#[serde(default)]` so a missing key and a `null` value read the
/// same way.
///
/// # Errors
///
/// Propagates errors for values that are neither `null` nor a valid `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope for actions that return no typed payload (delete, cancel, publish).
pub type MessageResponse = ApiResponse<serde_json::Value>;

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResult<T> {
    /// Items on this page.
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub items: Vec<T>,

    /// Total number of items across all pages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,

    /// 1-based page number.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_number: u32,

    /// Requested page size.
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    /// `items.len() <= page_size` and `total_count >= items.len()`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let len = self.items.len() as u64;
        len <= u64::from(self.page_size) && self.total_count >= len
    }

    /// Number of pages, zero when the page size is zero.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    /// True if a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) < self.total_pages()
    }

    /// True if an earlier page exists.
    #[must_use]
    pub const fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }
}

/// Downloaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    /// Name from `Content-Disposition`, if the server sent one.
    pub file_name: Option<String>,
    /// Raw content.
    pub data: Bytes,
    /// Status code (200 or 206).
    pub status: u16,
    /// Response headers keyed by lowercase name.
    pub headers: HashMap<String, String>,
}

impl FileResponse {
    /// `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    /// True for a 206 partial-content answer.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.status == 206
    }
}

/// Extract the file name from a `Content-Disposition` header value.
///
/// An RFC 5987 `filename*=` parameter wins over a plain `filename=`. Only the
/// `filename*=` value is percent-decoded, and an undecodable one is returned as
/// sent. The plain value is returned verbatim. Quoted values may contain `;`.
#[must_use]
pub fn content_disposition_file_name(value: &str) -> Option<String> {
    let mut plain = None;

    for param in split_params(value) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let raw = unquote(raw.trim());

        if key.eq_ignore_ascii_case("filename*") {
            // charset'language'value
            let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
            if !encoded.is_empty() {
                return Some(decode(encoded));
            }
        } else if key.eq_ignore_ascii_case("filename") && plain.is_none() && !raw.is_empty() {
            plain = Some(raw.to_string());
        }
    }

    plain
}

/// Split header parameters on `;`, ignoring separators inside a quoted value.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quote = None;
    let mut escaped = false;
    let mut at_value = false;

    for (index, c) in value.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '=' => at_value = true,
            '"' | '\'' if at_value => {
                quote = Some(c);
                at_value = false;
            }
            ';' => {
                params.push(&value[start..index]);
                start = index + 1;
                at_value = false;
            }
            c if c.is_whitespace() => {}
            _ => at_value = false,
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

fn decode(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned)
}
