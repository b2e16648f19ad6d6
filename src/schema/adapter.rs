use crate::deferred::Deferred;
use crate::error::{FieldError, ResponseError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The only adapter contract version this crate understands.
pub const STANDARD_SCHEMA_VERSION: u32 = 1;

/// Message of the Validation error raised when a validator fails the capability probe.
pub const ADAPTER_CONTRACT_MESSAGE: &str = "Schema does not implement the expected adapter contract";

/// Message of the Validation error raised when a validator returns neither or both halves.
pub const NONCONFORMING_RESULT_MESSAGE: &str = "Schema returned a result that does not match the adapter contract";

/// Validation entry point exposed by an adapter.
pub type ValidateFn = dyn Fn(Value) -> Deferred<'static, ValidationResult> + Send + Sync;

/// Adapter capability published by a validator.
#[derive(Clone)]
pub struct StandardProps {
    pub version: u32,
    pub vendor: String,
    pub validate: Option<Arc<ValidateFn>>,
}

impl StandardProps {
    /// Capability at the current contract version.
    pub fn new(vendor: impl Into<String>, validate: Arc<ValidateFn>) -> Self {
        Self {
            version: STANDARD_SCHEMA_VERSION,
            vendor: vendor.into(),
            validate: Some(validate),
        }
    }
}

impl fmt::Debug for StandardProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardProps")
            .field("version", &self.version)
            .field("vendor", &self.vendor)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// A validator that may expose the adapter capability.
///
/// Returning `None` means the validator does not speak the contract at all; [`probe`] turns
/// that into [`ProbeFailure::Missing`].
pub trait StandardSchema: Send + Sync {
    fn standard(&self) -> Option<StandardProps>;
}

/// Why a validator failed the capability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// No adapter capability is exposed
    Missing,
    /// The capability reports a contract version other than [`STANDARD_SCHEMA_VERSION`]
    UnsupportedVersion(u32),
    /// The capability has no validate function
    NotInvocable,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::Missing => write!(f, "validator exposes no adapter capability"),
            ProbeFailure::UnsupportedVersion(v) => {
                write!(f, "validator adapter version {v} is not supported (expected {STANDARD_SCHEMA_VERSION})")
            }
            ProbeFailure::NotInvocable => write!(f, "validator adapter has no validate function"),
        }
    }
}

impl std::error::Error for ProbeFailure {}

/// Check that `schema` exposes a usable adapter capability and return its validate function.
pub fn probe(schema: &dyn StandardSchema) -> Result<Arc<ValidateFn>, ProbeFailure> {
    let props = schema.standard().ok_or(ProbeFailure::Missing)?;
    if props.version != STANDARD_SCHEMA_VERSION {
        return Err(ProbeFailure::UnsupportedVersion(props.version));
    }
    props.validate.ok_or(ProbeFailure::NotInvocable)
}

/// One segment of an issue path: an array index or an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u64),
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<u64> for PathSegment {
    fn from(index: u64) -> Self {
        PathSegment::Index(index)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index as u64)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

/// Join issue path segments into a field string: `.`-separated, numbers as `[n]`.
#[must_use]
pub fn field_path(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// A single problem reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
}

impl Issue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    #[must_use]
    pub fn at<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = Some(path.into_iter().map(Into::into).collect());
        self
    }

    /// Field string for this issue; empty when the issue has no path.
    #[must_use]
    pub fn field(&self) -> String {
        self.path.as_deref().map(field_path).unwrap_or_default()
    }
}

impl From<&Issue> for FieldError {
    fn from(issue: &Issue) -> Self {
        FieldError::new(issue.field(), issue.message.clone())
    }
}

// A present `"value": null` is still a value; only an absent key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Raw outcome returned by a validator's validate function.
///
/// A conforming validator sets exactly one of `value` and `issues`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
}

/// Conforming validation outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Issues(Vec<Issue>),
}

/// Shape violations of a [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonConforming {
    Neither,
    Both,
}

impl ValidationResult {
    #[must_use]
    pub fn success(value: Value) -> Self {
        Self {
            value: Some(value),
            issues: None,
        }
    }

    #[must_use]
    pub fn failure(issues: Vec<Issue>) -> Self {
        Self {
            value: None,
            issues: Some(issues),
        }
    }

    /// Split a raw result into a conforming outcome or the way it violates the contract.
    pub fn classify(self) -> Result<Outcome, NonConforming> {
        match (self.value, self.issues) {
            (Some(value), None) => Ok(Outcome::Value(value)),
            (None, Some(issues)) => Ok(Outcome::Issues(issues)),
            (None, None) => Err(NonConforming::Neither),
            (Some(_), Some(_)) => Err(NonConforming::Both),
        }
    }
}

/// Validate `input` with `schema` and return the validator's output value.
///
/// Fails with a Validation error when the validator does not pass [`probe`], returns a
/// nonconforming result, or reports issues. Every issue becomes one field error, in order.
pub async fn adapt(input: Value, schema: &dyn StandardSchema) -> Result<Value, ResponseError> {
    let validate = probe(schema).map_err(|failure| {
        debug!(reason = %failure, "schema adapter probe failed");
        ResponseError::validation().with_message(ADAPTER_CONTRACT_MESSAGE)
    })?;

    let result = validate(input).resolve().await;

    match result.classify() {
        Ok(Outcome::Value(value)) => Ok(value),
        Ok(Outcome::Issues(issues)) => {
            debug!(issue_count = issues.len(), "schema validation reported issues");
            let field_errors = issues.iter().map(FieldError::from).collect();
            Err(ResponseError::validation().with_field_errors(field_errors))
        }
        Err(shape) => {
            debug!(shape = ?shape, "schema returned a nonconforming result");
            Err(ResponseError::validation().with_message(NONCONFORMING_RESULT_MESSAGE))
        }
    }
}
