//! # CLI Module
//!
//! Command-line access to route discovery, for checking a route tree before deploying it.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! ```bash
//! fsrouter routes --dir src/routes --prefix api
//! fsrouter routes --config fsrouter.yaml --json
//! ```
//!
//! Options:
//! - `--dir <DIR>` - Root of the route tree
//! - `--prefix <PREFIX>` - Prefix for every route path
//! - `--config <FILE>` - YAML/JSON config; falls back to `FSR_ROUTES_DIR` / `FSR_ROUTE_PREFIX`
//! - `--json` - Machine-readable output
//!
//! A duplicate `(path, method)` is reported naming both files and the process exits with a
//! non-zero status.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
