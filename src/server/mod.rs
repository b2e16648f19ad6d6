//! # Server Types Module
//!
//! Request and response values exchanged between the (external) HTTP transport and the
//! controller pipeline. The transport owns sockets, parsing and the server loop; this crate
//! only needs the pieces below at their interface.
//!
//! - [`HandlerRequest`] - method, concrete path, caller-populated path parameters, query
//!   parameters, headers and the raw body bytes
//! - [`HandlerResponse`] - status, headers and a JSON body
//!
//! Path parameters are expected to be filled in by whatever matched the request to a route
//! table entry; the pipeline never extracts dynamic segments itself.

pub mod request;
pub mod response;

pub use request::{parse_cookies, HandlerRequest, HeaderVec, ParamVec, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS};
pub use response::HandlerResponse;
