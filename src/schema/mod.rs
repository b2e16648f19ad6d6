//! # Schema Adapter Module
//!
//! Normalizes third-party validators into one issue format so the controller pipeline can
//! validate request bodies without knowing which library produced the rules.
//!
//! ## Adapter Contract
//!
//! A validator is usable when it exposes, through [`StandardSchema::standard`], a
//! [`StandardProps`] capability with `version == 1` and an invocable `validate` function.
//! `validate` receives the parsed JSON input and returns a [`ValidationResult`] holding either
//! a `value` (the validated output) or `issues`, immediately or through a [`Deferred`]
//! future.
//!
//! [`probe`] checks the capability explicitly and reports *why* a validator is unusable
//! ([`ProbeFailure`]); [`ValidationResult::classify`] separates conforming outcomes from a
//! result that carries neither or both halves ([`NonConforming`]).
//!
//! ## Field Paths
//!
//! Issue paths become [`FieldError`](crate::error::FieldError) fields by joining segments with
//! `.`, rendering numeric segments as `[n]`:
//!
//! ```rust
//! use fsrouter::schema::{field_path, PathSegment};
//!
//! let path = vec![PathSegment::from("items"), PathSegment::from(0u64), PathSegment::from("name")];
//! assert_eq!(field_path(&path), "items.[0].name");
//! assert_eq!(field_path(&[]), "");
//! ```
//!
//! ## Provided Validators
//!
//! - [`JsonSchemaValidator`] - JSON Schema rules compiled once with the `jsonschema` crate
//! - [`FnSchema`] - wraps a closure (sync or async) returning a [`ValidationResult`]
//!
//! [`Deferred`]: crate::deferred::Deferred

mod adapter;
mod fn_schema;
mod json_schema;

pub use adapter::{
    adapt, field_path, probe, Issue, NonConforming, Outcome, PathSegment, ProbeFailure, StandardProps,
    StandardSchema, ValidateFn, ValidationResult, ADAPTER_CONTRACT_MESSAGE, NONCONFORMING_RESULT_MESSAGE,
    STANDARD_SCHEMA_VERSION,
};
pub use fn_schema::FnSchema;
pub use json_schema::JsonSchemaValidator;
