//! # Controller Module
//!
//! The per-request controller pipeline: parameter validation, authentication, body validation,
//! business-rule validation, then user logic.
//!
//! ## Overview
//!
//! Each route is registered as a [`ControllerRoute`]: a [`ControllerOptions`] value fixed at
//! startup plus a factory that builds a fresh [`Controller`] for every request. Nothing is shared
//! between requests except the options and the route table itself.
//!
//! ## Stages
//!
//! Stages run strictly in order. The first failure lands in the request's single pending-error
//! slot ([`PendingError`]) and the remaining checks are skipped.
//!
//! | # | Stage | Failure |
//! |---|-------|---------|
//! | 1 | UUID path parameters | 404, no field errors |
//! | 2 | Authentication | 401 |
//! | 3 | Body schema | 400 with one field error per issue |
//! | 4 | [`Controller::validate`] | field errors appended to the pending error |
//! | 5 | [`Controller::handle`] | typed errors as-is, anything else 500 |
//!
//! Stage 4 only runs when stage 3 produced a body. Stages 2 and 3 are the only suspension
//! points: the session provider and the validator may both answer through a deferred result.
//!
//! ## Example
//!
//! ```rust,ignore
//! struct CreateUser;
//!
//! impl Controller for CreateUser {
//!     type Body = NewUser;
//!
//!     fn validate(&self, body: &NewUser) -> Vec<FieldError> {
//!         if body.username == "admin" {
//!             vec![FieldError::new("username", "reserved")]
//!         } else {
//!             Vec::new()
//!         }
//!     }
//!
//!     fn handle<'a>(&'a self, state: &'a ControllerState<NewUser>) -> BoxFuture<'a, anyhow::Result<HandlerResponse>> {
//!         async move {
//!             let user = state.body().ok_or_else(|| ResponseError::validation())?;
//!             Ok(HandlerResponse::json(201, json!({ "username": user.username })))
//!         }
//!         .boxed()
//!     }
//! }
//!
//! let route = ControllerRoute::new(
//!     ControllerOptions::new().with_schema(Arc::new(JsonSchemaValidator::new(&schema)?)),
//!     || CreateUser,
//! );
//! ```
//!
//! ## Errors at the boundary
//!
//! [`run`] never fails. A [`ResponseError`](crate::error::ResponseError) returned through
//! `anyhow` is rendered unchanged; any other error, and any panic inside user logic, becomes a
//! generic 500 whose cause is logged but never sent to the client.

mod core;
mod pipeline;
mod state;
mod uuid;

pub use core::{Controller, ControllerOptions, ControllerRoute};
pub use pipeline::{run, AUTH_PROVIDER_MISSING_MESSAGE, INVALID_JSON_MESSAGE};
pub use state::{ControllerState, PendingError};
pub use uuid::is_uuid;
