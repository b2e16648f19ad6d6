//! Values produced either immediately or by a future.
//!
//! Validators and session providers may answer synchronously or perform I/O first. Both
//! return a [`Deferred`]; the pipeline calls [`Deferred::resolve`] at exactly those two
//! points and otherwise runs straight through.

use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// A value that is ready now or will be produced by a boxed future.
pub enum Deferred<'a, T> {
    Ready(T),
    Pending(BoxFuture<'a, T>),
}

impl<'a, T> Deferred<'a, T> {
    pub fn ready(value: T) -> Self {
        Deferred::Ready(value)
    }

    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'a,
    {
        Deferred::Pending(Box::pin(fut))
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Deferred::Ready(_))
    }

    /// Wait for the value. Ready values do not yield.
    pub async fn resolve(self) -> T {
        match self {
            Deferred::Ready(value) => value,
            Deferred::Pending(fut) => fut.await,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Deferred::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
