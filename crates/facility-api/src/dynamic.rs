//! Untyped arguments and results for dispatching operations by id.

use facility_core::operation::{BodyKind, ResponseKind};
use facility_core::{Error, FilePart, FileResponse, Operation, OperationArgs, ParamValue, Result};
use serde_json::Value;

/// Arguments keyed by the names used in the operation's path template and
/// query declaration.
///
/// A JSON `null` is kept as an explicit null, so it is rejected the same way a
/// typed call would reject it.
#[derive(Debug, Clone, Default)]
pub struct DynamicArgs {
    path: Vec<(String, Value)>,
    query: Vec<(String, Value)>,
    headers: Vec<(String, String)>,
    json: Option<Value>,
    file: Option<FilePart>,
}

impl DynamicArgs {
    /// Empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply a path parameter.
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path.push((name.into(), value.into()));
        self
    }

    /// Supply a query parameter.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON request body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Set the multipart file.
    #[must_use]
    pub fn file(mut self, part: FilePart) -> Self {
        self.file = Some(part);
        self
    }

    /// Bind the arguments to `operation`'s declared names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndeclaredParameter`] for a name the operation does not
    /// declare. Returns [`Error::ValidationError`] when the body is missing
    /// or does not match what the operation takes.
    pub fn bind(self, operation: &Operation) -> Result<OperationArgs> {
        let mut args = OperationArgs::new();

        for (name, value) in self.path {
            let declared = declared_name(operation, operation.path_params, &name)?;
            args = args.path_param(declared, ParamValue::from(value));
        }
        for (name, value) in self.query {
            let declared = declared_name(operation, operation.query_params, &name)?;
            args = args.query_param(declared, ParamValue::from(value));
        }
        for (name, value) in self.headers {
            args = args.header(name, value);
        }

        match (operation.body, self.json, self.file) {
            (BodyKind::Json, Some(body), None) => args = args.json(&body)?,
            (BodyKind::Multipart, None, Some(part)) => args = args.file(part),
            (BodyKind::Json | BodyKind::Multipart, None, None) => {
                return Err(Error::ValidationError(format!(
                    "Operation {} requires a request body",
                    operation.id
                )))
            }
            (BodyKind::None, None, None) => {}
            _ => {
                return Err(Error::ValidationError(format!(
                    "Operation {} does not take the supplied request body",
                    operation.id
                )))
            }
        }

        Ok(args)
    }
}

fn declared_name(
    operation: &Operation,
    names: &'static [&'static str],
    name: &str,
) -> Result<&'static str> {
    names
        .iter()
        .copied()
        .find(|declared| *declared == name)
        .ok_or_else(|| Error::UndeclaredParameter {
            operation: operation.id.to_string(),
            parameter: name.to_string(),
        })
}

/// Result of an operation dispatched by id.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutput {
    /// Raw JSON envelope; `None` for an empty body.
    Json(Option<Value>),
    /// Downloaded file.
    File(Option<FileResponse>),
}

impl OperationOutput {
    /// Response shape produced by operations of this kind.
    #[must_use]
    pub const fn kind(&self) -> ResponseKind {
        match self {
            Self::Json(_) => ResponseKind::Json,
            Self::File(_) => ResponseKind::File,
        }
    }

    /// The JSON payload, if this is a JSON result with a body.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => value,
            Self::File(_) => None,
        }
    }

    /// The file, if this is a download result.
    #[must_use]
    pub fn into_file(self) -> Option<FileResponse> {
        match self {
            Self::File(file) => file,
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_operation;
    use serde_json::json;

    #[test]
    fn binds_declared_names() {
        let op = find_operation("Blocks_GetById").unwrap();
        let args = DynamicArgs::new()
            .path("id", "bld1")
            .path("blockId", "blk1")
            .bind(op)
            .unwrap();
        let url = op.render_url("http://localhost:5000", &args).unwrap();
        assert_eq!(url, "http://localhost:5000/api/Buildings/bld1/blocks/blk1");
    }

    #[test]
    fn numbers_are_rendered_as_text() {
        let op = find_operation("Buildings_GetAll").unwrap();
        let args = DynamicArgs::new()
            .query("PageSize", 25)
            .query("PageNumber", 2)
            .bind(op)
            .unwrap();
        let url = op.render_url("", &args).unwrap();
        assert_eq!(url, "/api/Buildings?PageNumber=2&PageSize=25");
    }

    #[test]
    fn undeclared_names_are_rejected() {
        let op = find_operation("Executions_GetAll").unwrap();
        let err = DynamicArgs::new().query("status", "Running").bind(op).unwrap_err();
        assert_eq!(
            err,
            Error::UndeclaredParameter {
                operation: "Executions_GetAll".into(),
                parameter: "status".into(),
            }
        );

        let op = find_operation("Buildings_GetById").unwrap();
        let err = DynamicArgs::new().path("buildingId", "b1").bind(op).unwrap_err();
        assert_eq!(err.error_code(), "UNDECLARED_PARAMETER");
    }

    #[test]
    fn null_query_value_fails_at_render() {
        let op = find_operation("Files_GetAll").unwrap();
        let args = DynamicArgs::new().query("Folder", Value::Null).bind(op).unwrap();
        let err = op.render_url("", &args).unwrap_err();
        assert_eq!(err.error_code(), "NULL_PARAMETER");
    }

    #[test]
    fn body_must_match_operation() {
        let op = find_operation("Buildings_GetById").unwrap();
        let err = DynamicArgs::new()
            .path("id", "b1")
            .json(json!({"name": "x"}))
            .bind(op)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let op = find_operation("Icons_Upload").unwrap();
        let err = DynamicArgs::new().json(json!({})).bind(op).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn body_is_required_when_declared() {
        let op = find_operation("Buildings_Create").unwrap();
        let err = DynamicArgs::new().bind(op).unwrap_err();
        assert_eq!(
            err,
            Error::ValidationError("Operation Buildings_Create requires a request body".into())
        );

        let op = find_operation("Files_Upload").unwrap();
        let err = DynamicArgs::new().bind(op).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let op = find_operation("Buildings_Delete").unwrap();
        assert!(DynamicArgs::new().path("id", "b1").bind(op).is_ok());
    }

    #[test]
    fn output_accessors() {
        let output = OperationOutput::Json(Some(json!({"success": true})));
        assert_eq!(output.kind(), ResponseKind::Json);
        assert_eq!(output.clone().into_file(), None);
        assert_eq!(output.into_json(), Some(json!({"success": true})));
    }
}
