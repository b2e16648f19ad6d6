use crate::error::{FieldError, ResponseError};
use crate::security::Session;
use crate::server::HandlerRequest;
use serde_json::Value;
use std::collections::HashMap;

/// The single pending-error slot of one request.
///
/// The first error set wins. Field errors can be appended afterwards without discarding what is
/// already there, so structural issues always precede business-rule issues.
#[derive(Debug, Default)]
pub struct PendingError(Option<ResponseError>);

impl PendingError {
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&ResponseError> {
        self.0.as_ref()
    }

    /// Store `err` unless an error is already pending. Returns whether it was stored.
    pub fn set(&mut self, err: ResponseError) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(err);
        true
    }

    /// Append to the pending error, or open a Validation error to hold them. No-op when empty.
    pub fn append_field_errors(&mut self, field_errors: Vec<FieldError>) {
        if field_errors.is_empty() {
            return;
        }
        match self.0.as_mut() {
            Some(pending) => pending.append_field_errors(field_errors),
            None => self.0 = Some(ResponseError::validation().with_field_errors(field_errors)),
        }
    }

    pub fn take(&mut self) -> Option<ResponseError> {
        self.0.take()
    }
}

/// Everything the pipeline learned about one request.
///
/// Created when the request is dispatched and dropped with its response. User logic reads it
/// through [`Controller::handle`](super::Controller::handle).
#[derive(Debug)]
pub struct ControllerState<B> {
    pub(crate) request: HandlerRequest,
    /// Output of the schema, exactly as the validator returned it
    pub(crate) body_value: Option<Value>,
    pub(crate) body: Option<B>,
    /// Declared UUID parameters that passed validation
    pub(crate) params: HashMap<String, String>,
    pub(crate) session: Option<Session>,
    pub(crate) error: PendingError,
}

impl<B> ControllerState<B> {
    pub fn new(request: HandlerRequest) -> Self {
        Self {
            request,
            body_value: None,
            body: None,
            params: HashMap::new(),
            session: None,
            error: PendingError::default(),
        }
    }

    pub fn request(&self) -> &HandlerRequest {
        &self.request
    }

    /// Schema-validated body. `None` when the route declares no schema.
    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    /// The validator's output value the typed body was read from.
    pub fn body_value(&self) -> Option<&Value> {
        self.body_value.as_ref()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&Value> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn pending_error(&self) -> Option<&ResponseError> {
        self.error.get()
    }
}
