//! Status dispatch: turns a raw [`HttpResponse`] into a typed result or an error.
//!
//! Decision order for every operation:
//!
//! 1. status in the operation's success set: empty body gives `None`, anything
//!    else is deserialized;
//! 2. status documented by the operation: [`Error::Api`] with the fixed label and
//!    the parsed [`ProblemDetails`];
//! 3. any other status except 200 and 204: [`Error::Api`] with the body's
//!    `message`, the raw body, or a generic message for an empty body;
//! 4. otherwise `None`.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::warn;

use crate::error::{api_error, Error, ProblemDetails, Result};
use crate::operation::Operation;
use crate::response::{content_disposition_file_name, FileResponse};
use crate::transport::HttpResponse;

/// Message used when an undocumented failure has an empty body.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected server error occurred.";

/// Process a JSON operation's response.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if a success body does not match `T`, and
/// [`Error::Api`] for failed statuses.
pub fn process_json<T>(operation: &Operation, response: &HttpResponse) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let text = response.text();

    if operation.accepts(response.status) {
        if text.is_empty() {
            return Ok(None);
        }
        return serde_json::from_str(&text).map(Some).map_err(|err| {
            Error::ParseError(format!(
                "{} returned an unexpected body (status {}): {err}",
                operation.id, response.status
            ))
        });
    }

    reject(operation, response.status, text, response.header_map())?;
    Ok(None)
}

/// Process a file download's response.
///
/// # Errors
///
/// Returns [`Error::Api`] for failed statuses.
pub fn process_file(operation: &Operation, response: HttpResponse) -> Result<Option<FileResponse>> {
    let headers = response.header_map();

    if operation.accepts(response.status) {
        let file_name = headers
            .get("content-disposition")
            .and_then(|value| content_disposition_file_name(value));
        return Ok(Some(FileResponse {
            file_name,
            data: response.body,
            status: response.status,
            headers,
        }));
    }

    reject(operation, response.status, response.text(), headers)?;
    Ok(None)
}

fn reject(
    operation: &Operation,
    status: u16,
    text: String,
    headers: HashMap<String, String>,
) -> Result<()> {
    if let Some(declared) = operation.declared_error(status) {
        let problem = serde_json::from_str::<ProblemDetails>(&text).ok();
        warn!(operation = operation.id, status, "{}", declared.label);
        return Err(api_error(declared.label, status, text, headers, problem));
    }

    if status != 200 && status != 204 {
        let message = unexpected_message(&text);
        warn!(operation = operation.id, status, "{message}");
        return Err(api_error(message, status, text, headers, None));
    }

    Ok(())
}

fn unexpected_message(text: &str) -> String {
    if text.is_empty() {
        return UNEXPECTED_ERROR_MESSAGE.to_string();
    }
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|body| body.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}
