use crate::server::HeaderVec;
use std::fmt::{Display, Formatter};

/// Header carrying a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ULID identifying one request through discovery-routed dispatch.
///
/// Attached to every [`HandlerRequest`](crate::server::HandlerRequest) and recorded on the
/// controller span so log lines for one request can be correlated. A caller may supply its own
/// id through `x-request-id`; anything that is not a ULID is ignored.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RequestId(ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Parse a header value. Surrounding whitespace is allowed.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        ulid::Ulid::from_string(value.trim()).ok().map(Self)
    }

    /// Last valid `x-request-id` among `headers`, matched case-insensitively.
    #[must_use]
    pub fn from_headers(headers: &HeaderVec) -> Option<Self> {
        headers
            .iter()
            .rev()
            .filter(|(name, _)| name.eq_ignore_ascii_case(REQUEST_ID_HEADER))
            .find_map(|(_, value)| Self::parse(value))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
