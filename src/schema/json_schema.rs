use super::adapter::{Issue, PathSegment, StandardProps, StandardSchema, ValidationResult};
use crate::deferred::Deferred;
use anyhow::anyhow;
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// JSON Schema validator exposed through the adapter contract.
///
/// The schema is compiled once at construction; validation reuses the compiled form and
/// never coerces, so a successful result returns the input unchanged.
///
/// Issue paths come from the error's instance location (a JSON pointer). For `required`
/// failures the missing property is appended, so `{}` checked against
/// `{"required": ["username"]}` reports the field `username` rather than the empty root.
#[derive(Clone)]
pub struct JsonSchemaValidator {
    props: StandardProps,
}

impl JsonSchemaValidator {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error when `schema` is not a valid JSON Schema document.
    pub fn new(schema: &Value) -> anyhow::Result<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| anyhow!("invalid JSON schema: {e}"))?;
        let validator = Arc::new(validator);
        debug!("compiled JSON schema for body validation");
        Ok(Self {
            props: StandardProps::new(
                "jsonschema",
                Arc::new(move |input: Value| Deferred::ready(run(&validator, input))),
            ),
        })
    }
}

impl StandardSchema for JsonSchemaValidator {
    fn standard(&self) -> Option<StandardProps> {
        Some(self.props.clone())
    }
}

fn run(validator: &Validator, input: Value) -> ValidationResult {
    let issues: Vec<Issue> = validator
        .iter_errors(&input)
        .map(|err| {
            let mut path = pointer_segments(&input, &err.instance_path.to_string());
            if let ValidationErrorKind::Required { property } = &err.kind {
                if let Some(name) = property.as_str() {
                    path.push(PathSegment::from(name));
                }
            }
            Issue::new(err.to_string()).at(path)
        })
        .collect();

    if issues.is_empty() {
        ValidationResult::success(input)
    } else {
        ValidationResult::failure(issues)
    }
}

/// Split a JSON pointer (`/items/0/name`) into path segments.
///
/// Tokens are resolved against `input`: a token is an index only when the node it is applied
/// to is an array, so object keys such as `"2024"` stay keys.
fn pointer_segments(input: &Value, pointer: &str) -> Vec<PathSegment> {
    let mut node = Some(input);
    let mut segments = Vec::new();
    for raw in pointer.split('/').skip(1).filter(|raw| !raw.is_empty()) {
        let key = raw.replace("~1", "/").replace("~0", "~");
        match node {
            Some(Value::Array(items)) => match key.parse::<usize>() {
                Ok(index) if !key.starts_with('+') => {
                    node = items.get(index);
                    segments.push(PathSegment::Index(index as u64));
                }
                _ => {
                    node = None;
                    segments.push(PathSegment::Key(key));
                }
            },
            Some(Value::Object(map)) => {
                node = map.get(&key);
                segments.push(PathSegment::Key(key));
            }
            _ => {
                node = None;
                segments.push(PathSegment::Key(key));
            }
        }
    }
    segments
}
