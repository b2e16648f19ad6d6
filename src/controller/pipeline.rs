use super::core::{Controller, ControllerOptions};
use super::state::ControllerState;
use super::uuid::is_uuid;
use crate::error::{ErrorKind, FieldError, ResponseError};
use crate::schema::adapt;
use crate::server::{HandlerRequest, HandlerResponse};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info_span, Instrument};

/// Message of the 401 raised when authentication is required but no provider is configured.
pub const AUTH_PROVIDER_MISSING_MESSAGE: &str = "Authentication provider not configured";

/// Message of the 400 raised when the body is not JSON.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body provided";

/// Run one request through the pipeline and produce its response.
///
/// Never fails: typed [`ResponseError`]s are rendered as-is, any other error or a panic in user
/// logic becomes a generic 500 and is logged with the request id, method and path.
pub async fn run<C: Controller>(controller: &C, options: &ControllerOptions, request: HandlerRequest) -> HandlerResponse {
    let span = info_span!(
        "controller",
        request_id = %request.request_id,
        method = %request.method,
        path = %request.path,
    );

    let outcome = AssertUnwindSafe(execute(controller, options, request))
        .catch_unwind()
        .instrument(span.clone())
        .await;

    span.in_scope(|| match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => render_failure(err),
        Err(panic) => {
            error!(panic = %panic_message(panic.as_ref()), "controller panicked");
            ResponseError::internal_server().to_response()
        }
    })
}

async fn execute<C: Controller>(
    controller: &C,
    options: &ControllerOptions,
    request: HandlerRequest,
) -> anyhow::Result<HandlerResponse> {
    let mut state = ControllerState::new(request);

    validate_params(&mut state, options);
    authenticate(&mut state, options).await;
    validate_body(&mut state, options).await;
    extra_validation(controller, &mut state);

    if let Some(err) = state.error.take() {
        debug!(status = err.status(), kind = ?err.kind(), "request rejected before dispatch");
        return Ok(err.to_response());
    }

    controller.handle(&state).await
}

/// Declared UUID parameters must all be present and canonical; otherwise 404.
fn validate_params<B>(state: &mut ControllerState<B>, options: &ControllerOptions) {
    if state.error.is_set() || options.validate_uuids.is_empty() {
        return;
    }

    let mut params = HashMap::with_capacity(options.validate_uuids.len());
    for name in &options.validate_uuids {
        match state.request.get_path_param(name) {
            Some(value) if is_uuid(value) => {
                params.insert(name.clone(), value.to_string());
            }
            Some(value) => {
                debug!(param = %name, value = %value, "path parameter is not a UUID");
                state.error.set(ResponseError::not_found());
                return;
            }
            None => {
                debug!(param = %name, "declared UUID path parameter is missing");
                state.error.set(ResponseError::not_found());
                return;
            }
        }
    }
    state.params = params;
}

async fn authenticate<B>(state: &mut ControllerState<B>, options: &ControllerOptions) {
    if state.error.is_set() {
        return;
    }

    let Some(provider) = options.auth.as_deref() else {
        if options.requires_auth {
            debug!("authentication required but no provider is configured");
            state
                .error
                .set(ResponseError::unauthorized().with_message(AUTH_PROVIDER_MISSING_MESSAGE));
        }
        return;
    };

    let session = provider.get_session(&state.request.headers).resolve().await;
    if session.is_none() && options.requires_auth {
        debug!("no session for authenticated route");
        state.error.set(ResponseError::unauthorized());
        return;
    }
    state.session = session;
}

async fn validate_body<B: serde::de::DeserializeOwned>(state: &mut ControllerState<B>, options: &ControllerOptions) {
    let Some(schema) = options.schema.as_deref() else {
        return;
    };
    if state.error.is_set() {
        return;
    }

    let input: Value = match state.request.body.as_deref().map(serde_json::from_slice::<Value>) {
        Some(Ok(value)) => value,
        Some(Err(err)) => {
            debug!(error = %err, "request body is not valid JSON");
            state.error.set(ResponseError::validation().with_message(INVALID_JSON_MESSAGE));
            return;
        }
        None => {
            debug!("schema declared but request has no body");
            state.error.set(ResponseError::validation().with_message(INVALID_JSON_MESSAGE));
            return;
        }
    };

    let value = match adapt(input, schema).await {
        Ok(value) => value,
        Err(err) => {
            state.error.set(err);
            return;
        }
    };

    match serde_json::from_value::<B>(value.clone()) {
        Ok(body) => {
            state.body = Some(body);
            state.body_value = Some(value);
        }
        Err(err) => {
            debug!(error = %err, "schema output does not fit the controller body type");
            state.error.set(
                ResponseError::validation().with_field_errors(vec![FieldError::new("", err.to_string())]),
            );
        }
    }
}

/// Only runs when the schema produced a body.
fn extra_validation<C: Controller>(controller: &C, state: &mut ControllerState<C::Body>) {
    let Some(body) = state.body.as_ref() else {
        return;
    };
    let field_errors = controller.validate(body);
    if !field_errors.is_empty() {
        debug!(count = field_errors.len(), "extra validation reported field errors");
        state.error.append_field_errors(field_errors);
    }
}

fn render_failure(err: anyhow::Error) -> HandlerResponse {
    match err.downcast::<ResponseError>() {
        Ok(typed) => {
            if typed.kind() == ErrorKind::InternalServer {
                match typed.cause() {
                    Some(cause) => error!(error = %format!("{cause:#}"), "controller raised an internal error"),
                    None => error!(message = %typed.message(), "controller raised an internal error"),
                }
            } else {
                debug!(status = typed.status(), kind = ?typed.kind(), "controller returned an error response");
            }
            typed.to_response()
        }
        Err(other) => {
            error!(error = %format!("{other:#}"), "unhandled controller error");
            ResponseError::internal_server().with_cause(other).to_response()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
