//! Operation descriptors and URL rendering.
//!
//! Every backend endpoint is described once as a `const` [`Operation`]: verb, path
//! template, parameter names, accepted statuses and documented error statuses.
//! Resource clients keep a table of descriptors and hand them, together with the
//! call's [`OperationArgs`], to [`crate::client::ResourceClient`].
//!
//! ```rust
//! use facility_core::operation::{Operation, OperationArgs, ENTITY_ERRORS};
//!
//! const GET_BLOCK: Operation = Operation::get("Blocks_GetById", "/api/Buildings/{id}/blocks/{blockId}")
//!     .with_path_params(&["id", "blockId"])
//!     .with_errors(ENTITY_ERRORS);
//!
//! let args = OperationArgs::new().path("id", "b 1").path("blockId", "k2");
//! let url = GET_BLOCK.render_url("https://api.example.com", &args).unwrap();
//! assert_eq!(url, "https://api.example.com/api/Buildings/b%201/blocks/k2");
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::query::{ParamValue, QueryParams};
use crate::transport::{FilePart, HttpRequest, RequestBody};
use crate::types::HttpMethod;

/// A documented error status and the fixed label reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredError {
    /// HTTP status code.
    pub status: u16,
    /// Message used for the raised error.
    pub label: &'static str,
}

impl DeclaredError {
    /// Create a declared error.
    #[must_use]
    pub const fn new(status: u16, label: &'static str) -> Self {
        Self { status, label }
    }
}

/// 400 Bad Request
pub const BAD_REQUEST: DeclaredError = DeclaredError::new(400, "Bad Request");
/// 401 Unauthorized
pub const UNAUTHORIZED: DeclaredError = DeclaredError::new(401, "Unauthorized");
/// 403 Forbidden
pub const FORBIDDEN: DeclaredError = DeclaredError::new(403, "Forbidden");
/// 404 Not Found
pub const NOT_FOUND: DeclaredError = DeclaredError::new(404, "Not Found");

/// Errors documented by every operation.
pub const AUTH_ERRORS: &[DeclaredError] = &[UNAUTHORIZED, FORBIDDEN];
/// Errors documented by operations addressing one entity.
pub const ENTITY_ERRORS: &[DeclaredError] = &[UNAUTHORIZED, FORBIDDEN, NOT_FOUND];
/// Errors documented by operations that create from a JSON body.
pub const WRITE_ERRORS: &[DeclaredError] = &[BAD_REQUEST, UNAUTHORIZED, FORBIDDEN];
/// Errors documented by operations that change one entity from a JSON body.
pub const ENTITY_WRITE_ERRORS: &[DeclaredError] =
    &[BAD_REQUEST, UNAUTHORIZED, FORBIDDEN, NOT_FOUND];

/// Plain reads, updates and actions.
pub const SUCCESS_OK: &[u16] = &[200];
/// Create-type operations.
pub const SUCCESS_CREATED: &[u16] = &[200, 201];
/// File downloads that may answer with partial content.
pub const SUCCESS_PARTIAL: &[u16] = &[200, 206];

/// Shape of the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// No body.
    None,
    /// JSON-serialized DTO.
    Json,
    /// `multipart/form-data` with a single `file` field.
    Multipart,
}

/// Shape of the success payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// JSON envelope.
    Json,
    /// Binary file with `Content-Disposition`.
    File,
}

/// Descriptor of one backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Stable identifier, `Resource_Action`.
    pub id: &'static str,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    /// Required path parameter names.
    pub path_params: &'static [&'static str],
    /// Optional query parameter names, in declaration order.
    pub query_params: &'static [&'static str],
    /// Statuses treated as success.
    pub success: &'static [u16],
    /// Documented error statuses.
    pub errors: &'static [DeclaredError],
    /// Request body kind.
    pub body: BodyKind,
    /// Response kind.
    pub response: ResponseKind,
}

impl Operation {
    /// Create a descriptor with no parameters, 200-only success and the
    /// authentication errors declared.
    #[must_use]
    pub const fn new(id: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            id,
            method,
            path,
            path_params: &[],
            query_params: &[],
            success: SUCCESS_OK,
            errors: AUTH_ERRORS,
            body: BodyKind::None,
            response: ResponseKind::Json,
        }
    }

    /// GET descriptor.
    #[must_use]
    pub const fn get(id: &'static str, path: &'static str) -> Self {
        Self::new(id, HttpMethod::Get, path)
    }

    /// POST descriptor.
    #[must_use]
    pub const fn post(id: &'static str, path: &'static str) -> Self {
        Self::new(id, HttpMethod::Post, path)
    }

    /// PUT descriptor.
    #[must_use]
    pub const fn put(id: &'static str, path: &'static str) -> Self {
        Self::new(id, HttpMethod::Put, path)
    }

    /// DELETE descriptor.
    #[must_use]
    pub const fn delete(id: &'static str, path: &'static str) -> Self {
        Self::new(id, HttpMethod::Delete, path)
    }

    /// Set the required path parameters.
    #[must_use]
    pub const fn with_path_params(mut self, names: &'static [&'static str]) -> Self {
        self.path_params = names;
        self
    }

    /// Set the declared query parameters.
    #[must_use]
    pub const fn with_query(mut self, names: &'static [&'static str]) -> Self {
        self.query_params = names;
        self
    }

    /// Set the success statuses.
    #[must_use]
    pub const fn with_success(mut self, statuses: &'static [u16]) -> Self {
        self.success = statuses;
        self
    }

    /// Set the declared error statuses.
    #[must_use]
    pub const fn with_errors(mut self, errors: &'static [DeclaredError]) -> Self {
        self.errors = errors;
        self
    }

    /// Mark the operation as taking a JSON body.
    #[must_use]
    pub const fn with_json_body(mut self) -> Self {
        self.body = BodyKind::Json;
        self
    }

    /// Mark the operation as a multipart upload.
    #[must_use]
    pub const fn with_multipart_body(mut self) -> Self {
        self.body = BodyKind::Multipart;
        self
    }

    /// Mark the operation as a file download (accepts 200 and 206).
    #[must_use]
    pub const fn returning_file(mut self) -> Self {
        self.response = ResponseKind::File;
        self.success = SUCCESS_PARTIAL;
        self
    }

    /// True if `status` is a success status for this operation.
    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        self.success.contains(&status)
    }

    /// Declared error for `status`, if documented.
    #[must_use]
    pub fn declared_error(&self, status: u16) -> Option<&DeclaredError> {
        self.errors.iter().find(|error| error.status == status)
    }

    /// Placeholder names found in the path template.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            names.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        names
    }

    /// Build the request URL from `base_url`, the template and the arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] for an absent or null path parameter,
    /// [`Error::NullParameter`] for a null query parameter and
    /// [`Error::UndeclaredParameter`] for a query parameter the operation does not
    /// declare.
    pub fn render_url(&self, base_url: &str, args: &OperationArgs) -> Result<String> {
        let mut url = String::with_capacity(base_url.len() + self.path.len() + 32);
        url.push_str(base_url);
        url.push_str(self.path);

        for name in self.path_params {
            let value = args
                .path_value(name)
                .and_then(ParamValue::as_str)
                .ok_or_else(|| Error::MissingParameter {
                    operation: self.id.to_string(),
                    parameter: (*name).to_string(),
                })?;
            url = url.replace(&format!("{{{name}}}"), &encode_component(value));
        }

        if let Some(unknown) = args.query.keys().find(|key| !self.query_params.contains(key)) {
            return Err(Error::UndeclaredParameter {
                operation: self.id.to_string(),
                parameter: unknown.to_string(),
            });
        }

        url.push('?');
        for name in self.query_params {
            match args.query.get(name) {
                None => {}
                Some(ParamValue::Null) => {
                    return Err(Error::NullParameter {
                        operation: self.id.to_string(),
                        parameter: (*name).to_string(),
                    });
                }
                Some(ParamValue::Value(value)) => {
                    url.push_str(name);
                    url.push('=');
                    url.push_str(&encode_component(value));
                    url.push('&');
                }
            }
        }

        if url.ends_with('?') || url.ends_with('&') {
            url.pop();
        }

        Ok(url)
    }

    /// Build the transport request for this operation.
    ///
    /// # Errors
    ///
    /// Propagates URL rendering failures.
    pub fn build_request(&self, base_url: &str, args: OperationArgs) -> Result<HttpRequest> {
        let url = self.render_url(base_url, &args)?;

        let accept = match self.response {
            ResponseKind::Json => "application/json",
            ResponseKind::File => "application/octet-stream",
        };
        let mut headers = vec![("Accept".to_string(), accept.to_string())];
        if matches!(args.body, RequestBody::Json(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers.extend(args.headers);

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body: args.body,
        })
    }
}

/// Percent-encode a path segment or query value.
///
/// Uses the `encodeURIComponent` set: letters, digits and `-_.!~*'()` pass
/// through unchanged.
#[must_use]
pub fn encode_component(value: &str) -> String {
    let encoded = urlencoding::encode(value);
    if !value.contains(['!', '\'', '(', ')', '*']) {
        return encoded.into_owned();
    }
    encoded
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Arguments for one operation call.
#[derive(Debug, Clone, Default)]
pub struct OperationArgs {
    path: Vec<(&'static str, ParamValue)>,
    query: QueryParams,
    headers: Vec<(String, String)>,
    body: RequestBody,
}

impl OperationArgs {
    /// Empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a path parameter.
    #[must_use]
    pub fn path(self, name: &'static str, value: impl ToString) -> Self {
        self.path_param(name, ParamValue::Value(value.to_string()))
    }

    /// Supply a path parameter as a raw [`ParamValue`].
    #[must_use]
    pub fn path_param(mut self, name: &'static str, value: ParamValue) -> Self {
        self.path.push((name, value));
        self
    }

    /// Replace the query parameters.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Supply one optional query parameter; `None` leaves it out.
    #[must_use]
    pub fn query_opt<T: ToString>(mut self, name: &'static str, value: Option<T>) -> Self {
        self.query.push_opt(name, value);
        self
    }

    /// Supply one query parameter as a raw [`ParamValue`].
    #[must_use]
    pub fn query_param(mut self, name: &'static str, value: ParamValue) -> Self {
        self.query.push_value(name, value);
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the body cannot be serialized.
    pub fn json<B>(mut self, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        self.body = RequestBody::Json(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Attach a file as the multipart body.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    fn path_value(&self, name: &str) -> Option<&ParamValue> {
        self.path
            .iter()
            .rev()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    const GET_BY_ID: Operation = Operation::get("Buildings_GetById", "/api/Buildings/{id}")
        .with_path_params(&["id"])
        .with_errors(ENTITY_ERRORS);

    const GET_ALL: Operation = Operation::get("Buildings_GetAll", "/api/Buildings")
        .with_query(&["PageNumber", "PageSize", "Sorting.Field", "Sorting.Direction"]);

    const DELETE_BLOCK: Operation =
        Operation::delete("Blocks_Delete", "/api/Buildings/{id}/blocks/{blockId}")
            .with_path_params(&["id", "blockId"])
            .with_errors(ENTITY_ERRORS);

    #[test]
    fn component_encoding_keeps_unreserved_marks() {
        assert_eq!(encode_component("a!b'(c)*"), "a!b'(c)*");
        assert_eq!(encode_component("x/y z"), "x%2Fy%20z");
        assert_eq!(encode_component("50%"), "50%25");
        assert_eq!(encode_component("Grundriß (EG)"), "Grundri%C3%9F%20(EG)");
        assert_eq!(encode_component("a-b_c.d~e"), "a-b_c.d~e");
    }

    #[test]
    fn substitutes_and_encodes_path_params() {
        let args = OperationArgs::new().path("id", "a/b c");
        let url = GET_BY_ID.render_url("", &args).unwrap();
        assert_eq!(url, "/api/Buildings/a%2Fb%20c");
        assert!(!url.contains('{') && !url.contains('}'));
    }

    #[test]
    fn multiple_path_params() {
        let args = OperationArgs::new().path("blockId", "blk1").path("id", "bld1");
        let url = DELETE_BLOCK.render_url("http://h", &args).unwrap();
        assert_eq!(url, "http://h/api/Buildings/bld1/blocks/blk1");
    }

    #[test]
    fn missing_path_param_fails() {
        let err = GET_BY_ID.render_url("", &OperationArgs::new()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingParameter {
                operation: "Buildings_GetById".to_string(),
                parameter: "id".to_string(),
            }
        );
    }

    #[test]
    fn null_path_param_fails() {
        let args = OperationArgs::new().path_param("id", ParamValue::Null);
        let err = GET_BY_ID.render_url("", &args).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[test]
    fn undefined_query_params_leave_no_trailing_separator() {
        let url = GET_ALL.render_url("", &OperationArgs::new()).unwrap();
        assert_eq!(url, "/api/Buildings");

        let url = GET_ALL
            .render_url("", &OperationArgs::new().query_opt("PageSize", Some(10)))
            .unwrap();
        assert_eq!(url, "/api/Buildings?PageSize=10");
    }

    #[test]
    fn query_params_follow_declaration_order() {
        let args = OperationArgs::new()
            .query_opt("Sorting.Direction", Some("Desc"))
            .query_opt("PageNumber", Some(3))
            .query_opt("Sorting.Field", Some("created at"));
        let url = GET_ALL.render_url("", &args).unwrap();
        assert_eq!(
            url,
            "/api/Buildings?PageNumber=3&Sorting.Field=created%20at&Sorting.Direction=Desc"
        );
    }

    #[test]
    fn null_query_param_fails() {
        let args = OperationArgs::new().query_param("PageSize", ParamValue::Null);
        let err = GET_ALL.render_url("", &args).unwrap_err();
        assert!(matches!(err, Error::NullParameter { ref parameter, .. } if parameter == "PageSize"));
    }

    #[test]
    fn undeclared_query_param_fails() {
        let args = OperationArgs::new().query_opt("Bogus", Some(1));
        let err = GET_ALL.render_url("", &args).unwrap_err();
        assert!(matches!(err, Error::UndeclaredParameter { .. }));
    }

    #[test]
    fn placeholders_match_declared_path_params() {
        assert_eq!(DELETE_BLOCK.placeholders(), vec!["id", "blockId"]);
        assert!(GET_ALL.placeholders().is_empty());
    }

    #[test]
    fn status_tables() {
        assert!(GET_BY_ID.accepts(200));
        assert!(!GET_BY_ID.accepts(201));
        assert_eq!(GET_BY_ID.declared_error(404).map(|e| e.label), Some("Not Found"));
        assert!(GET_ALL.declared_error(404).is_none());

        let download = Operation::get("Files_Download", "/api/Files/{id}/download")
            .with_path_params(&["id"])
            .returning_file();
        assert!(download.accepts(206));
        assert_eq!(download.response, ResponseKind::File);
    }

    #[test]
    fn json_request_headers() {
        let create = Operation::post("Buildings_Create", "/api/Buildings")
            .with_json_body()
            .with_success(SUCCESS_CREATED);
        let args = OperationArgs::new()
            .json(&serde_json::json!({"name": "Tower A"}))
            .unwrap();
        let request = create.build_request("http://h", args).unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, RequestBody::Json(r#"{"name":"Tower A"}"#.to_string()));
    }

    #[test]
    fn multipart_request_has_no_content_type() {
        let upload = Operation::post("Files_Upload", "/api/Files/upload").with_multipart_body();
        let args = OperationArgs::new().file(FilePart::new("plan.pdf", Bytes::from_static(b"%PDF")));
        let request = upload.build_request("", args).unwrap();

        assert!(request.header("content-type").is_none());
        assert!(matches!(request.body, RequestBody::Multipart(_)));
    }

    #[test]
    fn file_download_accepts_octet_stream_and_extra_headers() {
        let download = Operation::get("Files_Download", "/api/Files/{id}/download")
            .with_path_params(&["id"])
            .returning_file();
        let args = OperationArgs::new().path("id", "f1").header("Range", "bytes=0-99");
        let request = download.build_request("", args).unwrap();

        assert_eq!(request.header("Accept"), Some("application/octet-stream"));
        assert_eq!(request.header("range"), Some("bytes=0-99"));
    }
}
