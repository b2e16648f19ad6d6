//! # Error Module
//!
//! Typed, response-ready errors shared by every pipeline stage and by user logic.
//!
//! ## Taxonomy
//!
//! | Kind | Status | Raised by |
//! |------|--------|-----------|
//! | [`ErrorKind::Validation`] | 400 | body parsing, schema issues, extra validation |
//! | [`ErrorKind::Unauthorized`] | 401 | authentication stage |
//! | [`ErrorKind::Forbidden`] | 403 | user logic only |
//! | [`ErrorKind::NotFound`] | 404 | missing or malformed UUID path parameters |
//! | [`ErrorKind::Conflict`] | 409 | user logic only |
//! | [`ErrorKind::InternalServer`] | 500 | outer boundary, for anything untyped |
//!
//! Every kind is a preset over one [`ResponseError`] shape; message, status and data can be
//! overridden per instance.
//!
//! ## Wire Format
//!
//! [`ResponseError::to_response`] renders:
//!
//! ```json
//! { "message": "Validation failed", "fields": "[{\"field\":\"username\",\"message\":\"Required\"}]" }
//! ```
//!
//! `data` and `fields` are JSON-encoded *strings* and are omitted when absent. The internal
//! cause is never rendered.
//!
//! ## Using Errors From User Logic
//!
//! `ResponseError` implements [`std::error::Error`], so handlers returning
//! `anyhow::Result<HandlerResponse>` can bail with a typed error and the pipeline will render
//! it unchanged:
//!
//! ```rust
//! use fsrouter::error::ResponseError;
//!
//! fn find(id: &str) -> anyhow::Result<()> {
//!     Err(ResponseError::not_found().with_message(format!("no pet {id}")).into())
//! }
//! assert!(find("7").is_err());
//! ```

mod core;

pub use core::{ErrorKind, FieldError, ResponseError};
