use super::adapter::{StandardProps, StandardSchema, ValidationResult};
use crate::deferred::Deferred;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// Validator backed by a closure.
///
/// Useful for hand-written rules and for bridging validation libraries that do not expose the
/// adapter capability themselves.
///
/// ```rust
/// use fsrouter::schema::{FnSchema, Issue, ValidationResult};
/// use serde_json::Value;
///
/// let username = FnSchema::new("inline", |input: Value| match input.get("username") {
///     Some(Value::String(_)) => ValidationResult::success(input),
///     _ => ValidationResult::failure(vec![Issue::new("Required").at(["username"])]),
/// });
/// # let _ = username;
/// ```
#[derive(Clone, Debug)]
pub struct FnSchema {
    props: StandardProps,
}

impl FnSchema {
    /// Wrap a synchronous validation closure.
    pub fn new<F>(vendor: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            props: StandardProps::new(vendor, Arc::new(move |input: Value| Deferred::ready(f(input)))),
        }
    }

    /// Wrap a closure whose result is produced by a future (e.g. a lookup over the network).
    pub fn new_async<F, Fut>(vendor: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidationResult> + Send + 'static,
    {
        Self {
            props: StandardProps::new(vendor, Arc::new(move |input: Value| Deferred::pending(f(input)))),
        }
    }
}

impl StandardSchema for FnSchema {
    fn standard(&self) -> Option<StandardProps> {
        Some(self.props.clone())
    }
}
