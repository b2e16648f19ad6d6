use crate::server::HandlerResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single input-path-scoped validation failure.
///
/// `field` is a dotted/bracketed path into the input (e.g. `items.[0].name`) and may be empty
/// when the failure applies to the input as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The six pre-configured error presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    InternalServer,
}

impl ErrorKind {
    /// Default HTTP status for this kind.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InternalServer => 500,
        }
    }

    /// Default message used when none is supplied.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation failed",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::InternalServer => "Internal server error",
        }
    }
}

/// Response-ready error value.
///
/// Created by the stage (or user logic) that raises it. Once attached to a request it is
/// terminal: later stages may append field errors through [`append_field_errors`] but never
/// replace or drop existing ones.
///
/// [`append_field_errors`]: ResponseError::append_field_errors
#[derive(Debug)]
pub struct ResponseError {
    kind: ErrorKind,
    message: String,
    status: u16,
    data: Option<Map<String, Value>>,
    field_errors: Vec<FieldError>,
    cause: Option<anyhow::Error>,
}

impl ResponseError {
    /// Create an error preset for `kind` with its default message and status.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            status: kind.status(),
            data: None,
            field_errors: Vec::new(),
            cause: None,
        }
    }

    #[must_use]
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    #[must_use]
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    #[must_use]
    pub fn internal_server() -> Self {
        Self::new(ErrorKind::InternalServer)
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach an opaque data object rendered (JSON-encoded) in the `data` property.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Record the underlying failure. It is kept for logging and `source()` only.
    #[must_use]
    pub fn with_cause(mut self, cause: anyhow::Error) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Append field errors after the ones already present.
    pub fn append_field_errors(&mut self, field_errors: impl IntoIterator<Item = FieldError>) {
        self.field_errors.extend(field_errors);
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    #[must_use]
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }

    /// JSON error body: `message`, plus JSON-encoded `data` and `fields` strings when present.
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(data) = &self.data {
            body.insert("data".to_string(), Value::String(Value::Object(data.clone()).to_string()));
        }
        if !self.field_errors.is_empty() {
            // Serializing plain string pairs cannot fail; fall back to an empty list regardless.
            let fields = serde_json::to_string(&self.field_errors).unwrap_or_else(|_| "[]".to_string());
            body.insert("fields".to_string(), Value::String(fields));
        }
        Value::Object(body)
    }

    /// Render as a JSON response with this error's status code.
    #[must_use]
    pub fn to_response(&self) -> HandlerResponse {
        HandlerResponse::json(self.status, self.body())
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)?;
        if !self.field_errors.is_empty() {
            write!(f, ": {} field error(s)", self.field_errors.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|c| &**c as &(dyn std::error::Error + 'static))
    }
}

impl From<ResponseError> for HandlerResponse {
    fn from(err: ResponseError) -> Self {
        err.to_response()
    }
}
