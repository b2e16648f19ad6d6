//! # Security Module
//!
//! Session resolution for controllers that require (or optionally use) authentication.
//!
//! ## Overview
//!
//! A [`SessionProvider`] receives the request headers and answers with a [`Session`] or
//! `None`, either immediately or through a future when the lookup needs I/O (a session
//! store, an identity service). The controller pipeline calls it once per request during
//! its authentication stage:
//!
//! 1. Route requires authentication and no provider is configured → 401
//!    (`Authentication provider not configured`)
//! 2. Provider configured, lookup yields no session, authentication required → 401
//! 3. Otherwise the resolved session (possibly none, when authentication is optional) is
//!    exposed to user logic as `session()` / `user()`
//!
//! ## Custom Providers
//!
//! ```rust
//! use fsrouter::deferred::Deferred;
//! use fsrouter::security::{Session, SessionProvider};
//! use fsrouter::server::HeaderVec;
//! use serde_json::json;
//!
//! struct StaticKey(String);
//!
//! impl SessionProvider for StaticKey {
//!     fn get_session<'a>(&'a self, headers: &'a HeaderVec) -> Deferred<'a, Option<Session>> {
//!         let ok = headers
//!             .iter()
//!             .any(|(k, v)| k.eq_ignore_ascii_case("x-api-key") && *v == self.0);
//!         Deferred::ready(ok.then(|| Session::new(json!({ "kind": "api-key" }), json!({ "id": "service" }))))
//!     }
//! }
//! ```
//!
//! ## Bearer JWT Provider
//!
//! [`BearerJwtProvider`] reads a `header.payload.signature` token from the `Authorization`
//! header (or a cookie), compares the signature segment with a shared secret and turns the
//! decoded payload into the session. It is meant for tests and internal services with
//! pre-shared secrets, not for tokens issued to external clients.

use crate::deferred::Deferred;
use crate::server::HeaderVec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authenticated session resolved for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Provider-specific session record (ids, expiry, claims)
    pub session: Value,
    /// The authenticated user
    pub user: Value,
}

impl Session {
    pub fn new(session: Value, user: Value) -> Self {
        Self { session, user }
    }
}

/// Authentication provider contract.
///
/// Implementations must be shareable across concurrent requests; per-request data only ever
/// arrives through `headers`.
pub trait SessionProvider: Send + Sync {
    /// Look up the session for a request. `None` is the explicit "no session" answer.
    fn get_session<'a>(&'a self, headers: &'a HeaderVec) -> Deferred<'a, Option<Session>>;
}

pub use bearer_jwt::BearerJwtProvider;

mod bearer_jwt;
