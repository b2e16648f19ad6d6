use crate::discovery::{discover_routes, DiscoveryError, RouteEntry};
use crate::registry::{LoadError, ModuleLoader};
use crate::server::{HandlerRequest, HandlerResponse};
use futures::future::BoxFuture;
use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A bound handler: takes one request, produces its response.
///
/// Implementations must not keep per-request state in `self`; one instance serves every
/// request for its route, concurrently.
pub trait RouteHandler: Send + Sync {
    fn call(&self, req: HandlerRequest) -> BoxFuture<'static, HandlerResponse>;
}

/// Fatal errors raised while building a [`RouteTable`].
#[derive(Debug)]
pub enum RouteTableError {
    /// Directory scan failed
    Discovery(DiscoveryError),
    /// Two entries share a `(path, method)` pair
    DuplicateRoute {
        path: String,
        method: Method,
        first: String,
        second: String,
    },
    /// An entry's handler location has no module
    MissingModule {
        path: String,
        method: Method,
        location: String,
    },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTableError::Discovery(e) => write!(f, "{e}"),
            RouteTableError::DuplicateRoute {
                path,
                method,
                first,
                second,
            } => write!(
                f,
                "duplicate route {method} {path}: defined by both '{first}' and '{second}'"
            ),
            RouteTableError::MissingModule { path, method, location } => write!(
                f,
                "route {method} {path}: no handler module registered for '{location}'"
            ),
        }
    }
}

impl std::error::Error for RouteTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteTableError::Discovery(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for RouteTableError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::DuplicateRoute {
                path,
                method,
                first,
                second,
            } => RouteTableError::DuplicateRoute {
                path,
                method,
                first,
                second,
            },
            other => RouteTableError::Discovery(other),
        }
    }
}

/// Immutable `(path, method) → handler` table.
pub struct RouteTable {
    routes: HashMap<String, HashMap<Method, Arc<dyn RouteHandler>>>,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Bind every entry to its handler module.
    ///
    /// # Errors
    ///
    /// [`RouteTableError::DuplicateRoute`] when two entries share a `(path, method)`,
    /// [`RouteTableError::MissingModule`] when the loader has nothing for an entry.
    pub fn build(entries: Vec<RouteEntry>, loader: &dyn ModuleLoader) -> Result<Self, RouteTableError> {
        let mut routes: HashMap<String, HashMap<Method, Arc<dyn RouteHandler>>> = HashMap::new();
        let mut locations: HashMap<(String, Method), String> = HashMap::new();

        for entry in &entries {
            let key = (entry.path.clone(), entry.method.clone());
            if let Some(first) = locations.get(&key) {
                return Err(RouteTableError::DuplicateRoute {
                    path: entry.path.clone(),
                    method: entry.method.clone(),
                    first: first.clone(),
                    second: entry.handler_location.clone(),
                });
            }
            let handler = loader.load(entry).map_err(|LoadError::MissingModule { location }| {
                RouteTableError::MissingModule {
                    path: entry.path.clone(),
                    method: entry.method.clone(),
                    location,
                }
            })?;
            locations.insert(key, entry.handler_location.clone());
            routes
                .entry(entry.path.clone())
                .or_default()
                .insert(entry.method.clone(), handler);
        }

        for location in loader.unused_locations(&entries) {
            warn!(location = %location, "handler module registered but no route file points at it");
        }

        info!(paths = routes.len(), routes = entries.len(), "route table built");
        Ok(Self { routes, entries })
    }

    /// Discover `root` and bind the result.
    ///
    /// # Errors
    ///
    /// Any discovery or loading error; see [`RouteTable::build`].
    pub fn from_dir(
        root: impl AsRef<Path>,
        prefix: Option<&str>,
        loader: &dyn ModuleLoader,
    ) -> Result<Self, RouteTableError> {
        let entries = discover_routes(root, prefix)?;
        Self::build(entries, loader)
    }

    /// Handler bound to `(path, method)`.
    #[must_use]
    pub fn get(&self, path: &str, method: &Method) -> Option<&Arc<dyn RouteHandler>> {
        self.routes.get(path).and_then(|methods| methods.get(method))
    }

    /// Methods registered for `path`, sorted by name.
    #[must_use]
    pub fn methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .get(path)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Route paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Entries the table was built from, in discovery order.
    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of `(path, method)` bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the handler bound to `(route_path, req.method)`. `None` when nothing is bound.
    pub async fn dispatch(&self, route_path: &str, req: HandlerRequest) -> Option<HandlerResponse> {
        let handler = Arc::clone(self.get(route_path, &req.method)?);
        Some(handler.call(req).await)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable").field("entries", &self.entries).finish()
    }
}
