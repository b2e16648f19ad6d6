use super::pipeline::run;
use super::state::ControllerState;
use crate::error::FieldError;
use crate::router::RouteHandler;
use crate::schema::StandardSchema;
use crate::security::SessionProvider;
use crate::server::{HandlerRequest, HandlerResponse};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Per-route pipeline configuration, fixed at registration time.
#[derive(Clone, Default)]
pub struct ControllerOptions {
    /// Reject requests without a session
    pub requires_auth: bool,
    /// Body schema; when absent the body is never read
    pub schema: Option<Arc<dyn StandardSchema>>,
    /// Path parameters that must be canonical UUIDs
    pub validate_uuids: Vec<String>,
    /// Session lookup
    pub auth: Option<Arc<dyn SessionProvider>>,
}

impl ControllerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Arc<dyn StandardSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn validate_uuids<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validate_uuids = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_auth(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.auth = Some(provider);
        self
    }
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("requires_auth", &self.requires_auth)
            .field("schema", &self.schema.as_ref().map(|_| "<schema>"))
            .field("validate_uuids", &self.validate_uuids)
            .field("auth", &self.auth.as_ref().map(|_| "<provider>"))
            .finish()
    }
}

/// User logic behind one route.
///
/// A fresh value is built for every request, so implementations may hold request-scoped data
/// but must not rely on anything surviving between requests.
pub trait Controller: Send + Sync + 'static {
    /// Type the schema output is read into
    type Body: DeserializeOwned + Send + Sync + 'static;

    /// Business-rule checks run after the schema accepted the body.
    fn validate(&self, _body: &Self::Body) -> Vec<FieldError> {
        Vec::new()
    }

    /// Produce the response. Return a [`ResponseError`](crate::error::ResponseError) through
    /// `anyhow` to render it as-is; any other error becomes a 500.
    fn handle<'a>(&'a self, state: &'a ControllerState<Self::Body>) -> BoxFuture<'a, anyhow::Result<HandlerResponse>>;
}

/// [`RouteHandler`] that runs the controller pipeline with a new `C` per request.
pub struct ControllerRoute<C> {
    options: Arc<ControllerOptions>,
    make: Arc<dyn Fn() -> C + Send + Sync>,
}

impl<C: Controller> ControllerRoute<C> {
    pub fn new<F>(options: ControllerOptions, make: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self {
            options: Arc::new(options),
            make: Arc::new(make),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }
}

impl<C> Clone for ControllerRoute<C> {
    fn clone(&self) -> Self {
        Self {
            options: Arc::clone(&self.options),
            make: Arc::clone(&self.make),
        }
    }
}

impl<C: Controller> RouteHandler for ControllerRoute<C> {
    fn call(&self, req: HandlerRequest) -> BoxFuture<'static, HandlerResponse> {
        let options = Arc::clone(&self.options);
        let controller = (self.make)();
        async move { run(&controller, &options, req).await }.boxed()
    }
}
