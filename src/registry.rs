//! Handler module registry.
//!
//! Discovery only yields file locations. A [`ModuleLoader`] turns each location into the
//! bound handler that serves it; [`ModuleRegistry`] is the static loader where every handler
//! is registered up front under its location:
//!
//! ```rust,ignore
//! let mut modules = ModuleRegistry::new();
//! modules.register("users/post.ts", ControllerRoute::new(options, || CreateUser));
//! modules.register("users/[id]/get", ControllerRoute::new(options, || GetUser));
//! let table = RouteTable::from_dir("routes", None, &modules)?;
//! ```
//!
//! A location can be registered with or without its file extension; an exact match wins.

use crate::discovery::RouteEntry;
use crate::router::RouteHandler;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Why a handler module could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Nothing is registered for the location
    MissingModule { location: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::MissingModule { location } => {
                write!(f, "no handler module registered for '{location}'")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Resolves a discovered entry to the handler that serves it.
pub trait ModuleLoader {
    fn load(&self, entry: &RouteEntry) -> Result<Arc<dyn RouteHandler>, LoadError>;

    /// Modules no entry resolved to. Reported once the table is built.
    fn unused_locations(&self, _entries: &[RouteEntry]) -> Vec<String> {
        Vec::new()
    }
}

/// Static module loader keyed by handler location.
#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn RouteHandler>>,
}

fn without_extension(location: &str) -> &str {
    let name_start = location.rfind('/').map_or(0, |s| s + 1);
    match location[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &location[..name_start + dot],
        _ => location,
    }
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `location`. A later registration for the same location wins.
    pub fn register<H>(&mut self, location: impl Into<String>, handler: H) -> &mut Self
    where
        H: RouteHandler + 'static,
    {
        let location = location.into();
        if self.modules.insert(location.clone(), Arc::new(handler)).is_some() {
            warn!(location = %location, "handler module registered twice; keeping the latest");
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered locations, sorted.
    #[must_use]
    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        locations.sort_unstable();
        locations
    }
}

impl ModuleLoader for ModuleRegistry {
    fn load(&self, entry: &RouteEntry) -> Result<Arc<dyn RouteHandler>, LoadError> {
        let location = entry.handler_location.as_str();
        self.modules
            .get(location)
            .or_else(|| self.modules.get(without_extension(location)))
            .map(Arc::clone)
            .ok_or_else(|| LoadError::MissingModule {
                location: location.to_string(),
            })
    }

    fn unused_locations(&self, entries: &[RouteEntry]) -> Vec<String> {
        self.locations()
            .into_iter()
            .filter(|registered| {
                !entries.iter().any(|e| {
                    e.handler_location == *registered || without_extension(&e.handler_location) == *registered
                })
            })
            .map(str::to_string)
            .collect()
    }
}
