//! # Route Discovery Module
//!
//! Builds the list of route entries from a directory layout.
//!
//! ## Layout Rules
//!
//! Every file whose base name (extension stripped) is one of the seven recognized methods,
//! compared case-insensitively, registers one route:
//!
//! ```text
//! routes/
//! ├── get.ts              → GET    /
//! ├── users/
//! │   ├── get.ts          → GET    /users
//! │   ├── POST.ts         → POST   /users
//! │   └── [id]/
//! │       ├── get.ts      → GET    /users/[id]
//! │       └── delete.ts   → DELETE /users/[id]
//! └── README.md           (ignored)
//! ```
//!
//! The route path is the file's containing directory relative to the root, joined with `/`,
//! lower-cased, prefixed, with repeated separators collapsed. Dynamic segments such as `[id]`
//! are kept verbatim; filling them in is the caller's job.
//!
//! ## Errors
//!
//! Two files resolving to the same `(path, method)` pair is a configuration error reported
//! before anything is served; [`DiscoveryError::DuplicateRoute`] names both files.
//!
//! Discovery reads the filesystem only. It does not inspect handler modules; that happens
//! when the route table loads them (see [`crate::router`]).

mod core;

pub use core::{derive_route_path, discover_routes, parse_method, DiscoveryError, RouteEntry, SUPPORTED_METHODS};
