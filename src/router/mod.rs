//! # Router Module
//!
//! The route table: every discovered `(path, method)` bound to the handler that serves it.
//!
//! ## Overview
//!
//! The table is built once at startup, in two phases:
//!
//! 1. **Discovery**: [`discover_routes`](crate::discovery::discover_routes) walks the route
//!    directory and yields one entry per handler file.
//! 2. **Loading**: each entry's handler location is resolved through a
//!    [`ModuleLoader`](crate::registry::ModuleLoader). A location with no module is fatal.
//!
//! After construction the table is never mutated, so it can be shared (`Arc<RouteTable>`) and
//! read from any number of concurrent requests without locking.
//!
//! ## Lookup
//!
//! Lookups use the *route* path as discovered (e.g. `/users/[id]`). Matching a concrete
//! request path to a route path, and filling in `path_params`, is the caller's job.
//!
//! ```rust,ignore
//! let table = RouteTable::from_dir("routes", Some("/api"), &modules)?;
//! if let Some(handler) = table.get("/api/users/[id]", &Method::GET) {
//!     let response = handler.call(request).await;
//! }
//! ```

mod core;

pub use core::{RouteHandler, RouteTable, RouteTableError};
