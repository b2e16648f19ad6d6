use crate::deferred::Deferred;
use crate::security::{Session, SessionProvider};
use crate::server::{parse_cookies, HeaderVec};
use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tracing::debug;

/// Simple Bearer/JWT session provider.
///
/// Tokens are expected to have the form `header.payload.signature` where the signature part
/// must match the configured `signature` string. The payload (standard or URL-safe base64,
/// padding optional) must be a JSON object; it becomes the session record, and its `user`
/// claim (or the whole payload when absent) becomes the session user.
pub struct BearerJwtProvider {
    pub(crate) signature: String,
    pub(crate) cookie_name: Option<String>,
}

impl BearerJwtProvider {
    /// Create a new provider accepting tokens whose third segment equals `signature`.
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            cookie_name: None,
        }
    }

    /// Configure the cookie name used to read the token.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    fn extract_token(&self, headers: &HeaderVec) -> Option<String> {
        if let Some(name) = &self.cookie_name {
            if let Some(t) = parse_cookies(headers).remove(name) {
                return Some(t);
            }
        }
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .and_then(|(_, h)| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
    }

    pub(crate) fn decode_token(&self, token: &str) -> Option<Session> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(sig), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            debug!("BearerJWT session lookup failed: malformed token");
            return None;
        };
        if sig != self.signature {
            debug!("BearerJWT session lookup failed: invalid signature");
            return None;
        }
        let payload_bytes = match decode_segment(payload) {
            Some(b) => b,
            None => {
                debug!("BearerJWT session lookup failed: invalid base64 payload");
                return None;
            }
        };
        let claims: Value = match serde_json::from_slice(&payload_bytes) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) => {
                debug!("BearerJWT session lookup failed: payload is not an object");
                return None;
            }
            Err(e) => {
                debug!("BearerJWT session lookup failed: invalid JSON payload - {:?}", e);
                return None;
            }
        };
        let user = claims.get("user").cloned().unwrap_or_else(|| claims.clone());
        Some(Session::new(claims, user))
    }
}

fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(trimmed))
        .ok()
}

impl SessionProvider for BearerJwtProvider {
    fn get_session<'a>(&'a self, headers: &'a HeaderVec) -> Deferred<'a, Option<Session>> {
        let session = match self.extract_token(headers) {
            Some(token) => self.decode_token(&token),
            None => {
                debug!("BearerJWT session lookup: no Authorization header or cookie");
                None
            }
        };
        if session.is_some() {
            debug!("BearerJWT session lookup succeeded");
        }
        Deferred::ready(session)
    }
}
