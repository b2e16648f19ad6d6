//! # fsrouter
//!
//! **fsrouter** discovers HTTP route handlers from a directory layout and wraps each one in a
//! controller pipeline that validates path parameters, authenticates, validates the request body
//! and turns every failure into a uniform JSON error response.
//!
//! It is the glue between a transport (any HTTP server) and typed endpoint logic. It does not
//! listen on sockets or match concrete request paths itself.
//!
//! ## Architecture
//!
//! - **[`discovery`]** - Walks the route directory; `users/[id]/get.ts` becomes `GET /users/[id]`
//! - **[`registry`]** - Resolves each discovered file location to a bound handler
//! - **[`router`]** - The immutable `(path, method) → handler` table
//! - **[`controller`]** - Per-request pipeline: UUID params, session, body schema, extra
//!   validation, user logic
//! - **[`schema`]** - Validator adapter contract, plus closure and JSON Schema validators
//! - **[`security`]** - Session provider contract and a bearer-token provider
//! - **[`error`]** - `ResponseError` presets and the JSON error body
//! - **[`server`]** - `HandlerRequest` / `HandlerResponse` transport types
//!
//! ### Startup
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Disc as discovery::discover_routes
//!     participant Reg as registry::ModuleRegistry
//!     participant Table as router::RouteTable
//!
//!     App->>Reg: register("users/post.ts", ControllerRoute)
//!     App->>Table: RouteTable::from_dir("routes", prefix, &registry)
//!     Table->>Disc: walk directory
//!     Disc-->>Table: Vec<RouteEntry>
//!     alt duplicate (path, method)
//!         Table-->>App: RouteTableError::DuplicateRoute
//!     end
//!     Table->>Reg: load(entry) for every entry
//!     alt location not registered
//!         Table-->>App: RouteTableError::MissingModule
//!     end
//!     Table-->>App: Arc<RouteTable>
//! ```
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as HTTP server
//!     participant Table as RouteTable
//!     participant Pipe as controller::run
//!     participant Auth as SessionProvider
//!     participant Schema as StandardSchema
//!     participant User as Controller::handle
//!
//!     Server->>Table: get("/users/[id]", GET)
//!     Server->>Pipe: HandlerRequest (path params filled in)
//!     Pipe->>Pipe: UUID path params
//!     alt missing or malformed
//!         Pipe-->>Server: 404
//!     end
//!     Pipe->>Auth: get_session(headers)
//!     alt required and no session
//!         Pipe-->>Server: 401
//!     end
//!     Pipe->>Schema: validate(body)
//!     alt issues
//!         Pipe-->>Server: 400 + fields
//!     end
//!     Pipe->>Pipe: Controller::validate(body)
//!     Pipe->>User: handle(state)
//!     alt ResponseError
//!         User-->>Pipe: typed error
//!         Pipe-->>Server: error status + JSON body
//!     else other error / panic
//!         Pipe-->>Server: 500, cause logged
//!     end
//!     User-->>Server: HandlerResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fsrouter::{ControllerOptions, ControllerRoute, ModuleRegistry, RouteTable};
//!
//! let mut modules = ModuleRegistry::new();
//! modules.register(
//!     "users/[id]/get.ts",
//!     ControllerRoute::new(ControllerOptions::new().validate_uuids(["id"]), || GetUser),
//! );
//!
//! let table = Arc::new(RouteTable::from_dir("routes", Some("api"), &modules)?);
//!
//! // per request, from the server:
//! let handler = table.get("/api/users/[id]", &Method::GET).ok_or(NotFound)?;
//! let response = handler.call(request).await;
//! ```
//!
//! ## Runtime Considerations
//!
//! The pipeline is runtime-agnostic: it only needs a future executor. Validators and session
//! providers may answer synchronously or through a boxed future, and the pipeline suspends only
//! at those two points. Logging goes through `tracing`; [`logging`] installs a subscriber for
//! binaries that want one.

pub mod cli;
pub mod controller;
pub mod deferred;
pub mod discovery;
pub mod error;
pub mod ids;
pub mod logging;
pub mod registry;
pub mod router;
pub mod runtime_config;
pub mod schema;
pub mod security;
pub mod server;

pub use controller::{Controller, ControllerOptions, ControllerRoute, ControllerState};
pub use discovery::{discover_routes, RouteEntry};
pub use error::{ErrorKind, FieldError, ResponseError};
pub use registry::{ModuleLoader, ModuleRegistry};
pub use router::{RouteHandler, RouteTable};
pub use schema::{FnSchema, JsonSchemaValidator, StandardSchema};
pub use security::{BearerJwtProvider, Session, SessionProvider};
