use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Methods that may appear as handler file names.
pub const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// One discovered `(path, method)` → handler binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteEntry {
    /// Normalized route path (e.g. `/users/[id]`)
    pub path: String,
    /// HTTP method taken from the file name
    pub method: Method,
    /// Handler file path relative to the discovery root, `/`-separated (e.g. `users/[id]/get.ts`)
    pub handler_location: String,
}

/// Fatal configuration errors raised while scanning the route directory.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The directory tree could not be read
    Walk {
        /// Path being read when the error occurred, if known
        path: Option<PathBuf>,
        /// Underlying walk error
        source: walkdir::Error,
    },
    /// Two files resolve to the same `(path, method)` pair
    DuplicateRoute {
        path: String,
        method: Method,
        first: String,
        second: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Walk { path: Some(path), source } => {
                write!(f, "route discovery failed reading '{}': {}", path.display(), source)
            }
            DiscoveryError::Walk { path: None, source } => write!(f, "route discovery failed: {source}"),
            DiscoveryError::DuplicateRoute {
                path,
                method,
                first,
                second,
            } => write!(
                f,
                "duplicate route {method} {path}: defined by both '{first}' and '{second}'"
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Walk { source, .. } => Some(source),
            DiscoveryError::DuplicateRoute { .. } => None,
        }
    }
}

/// Map a file base name to a method, case-insensitively. Unknown names yield `None`.
#[must_use]
pub fn parse_method(stem: &str) -> Option<Method> {
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str().eq_ignore_ascii_case(stem))
        .cloned()
}

/// Build the route path for a directory given relative to the discovery root.
///
/// `""` (the root itself) maps to `/`, or to the prefix when one is given.
#[must_use]
pub fn derive_route_path(relative_dir: &Path, prefix: Option<&str>) -> String {
    let mut raw = String::from("/");
    if let Some(prefix) = prefix {
        raw.push_str(prefix);
        raw.push('/');
    }
    let segments: Vec<String> = relative_dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    raw.push_str(&segments.join("/"));
    collapse_separators(&raw.to_lowercase())
}

fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

fn location_of(relative_file: &Path) -> String {
    relative_file
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `root` and return one [`RouteEntry`] per handler file, in file-name order.
///
/// # Errors
///
/// [`DiscoveryError::Walk`] when the tree cannot be read, [`DiscoveryError::DuplicateRoute`]
/// when two files claim the same `(path, method)`.
pub fn discover_routes(root: impl AsRef<Path>, prefix: Option<&str>) -> Result<Vec<RouteEntry>, DiscoveryError> {
    let root = root.as_ref();
    let mut entries = Vec::new();
    let mut seen: HashMap<(String, Method), String> = HashMap::new();

    for item in WalkDir::new(root).sort_by_file_name() {
        let item = item.map_err(|source| DiscoveryError::Walk {
            path: source.path().map(Path::to_path_buf),
            source,
        })?;
        if !item.file_type().is_file() {
            continue;
        }
        let Some(method) = item.path().file_stem().and_then(|s| s.to_str()).and_then(parse_method) else {
            continue;
        };
        // Entries yielded by WalkDir::new(root) always live under root.
        let Ok(relative) = item.path().strip_prefix(root) else {
            continue;
        };
        let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));
        let path = derive_route_path(relative_dir, prefix);
        let handler_location = location_of(relative);

        if let Some(first) = seen.get(&(path.clone(), method.clone())) {
            return Err(DiscoveryError::DuplicateRoute {
                path,
                method,
                first: first.clone(),
                second: handler_location,
            });
        }
        seen.insert((path.clone(), method.clone()), handler_location.clone());

        debug!(path = %path, method = %method, location = %handler_location, "discovered route");
        entries.push(RouteEntry {
            path,
            method,
            handler_location,
        });
    }

    info!(root = %root.display(), routes = entries.len(), "route discovery complete");
    Ok(entries)
}
