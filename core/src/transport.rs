//! Transport adapters.
//!
//! Two entry points reach the same engine: the browser console (session
//! cookie) and API clients (bearer token). Each adapter only extracts a
//! credential, resolves it through the identity provider, and hands off
//! to `AlertEngine`. Neither contains alert logic.

use crate::{
    dismissal::DismissRequest,
    engine::AlertEngine,
    error::{AlertError, AlertResult},
    identity::{Identity, IdentityProvider},
    types::Timestamp,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Status code plus JSON body, as a transport would send them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(&AlertError::from(e)),
        }
    }

    fn error(err: &AlertError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

pub trait Transport {
    fn name(&self) -> &'static str;

    /// Pull the raw credential out of the transport's header value.
    fn credential<'h>(&self, header: &'h str) -> Option<&'h str>;

    fn authenticate(
        &self,
        header: Option<&str>,
        provider: &dyn IdentityProvider,
    ) -> AlertResult<Identity> {
        let identity = header
            .and_then(|h| self.credential(h))
            .and_then(|c| provider.resolve(c));
        match identity {
            Some(identity) => Ok(identity),
            None => {
                log::debug!("{}: credential missing or unresolved", self.name());
                Err(AlertError::Unauthenticated)
            }
        }
    }

    /// GET the alert feed.
    fn get_feed(
        &self,
        engine: &AlertEngine,
        provider: &dyn IdentityProvider,
        header: Option<&str>,
        now: Timestamp,
    ) -> TransportResponse {
        let result = self
            .authenticate(header, provider)
            .and_then(|caller| engine.feed(&caller, now));
        match result {
            Ok(feed) => TransportResponse::ok(&feed),
            Err(e) => TransportResponse::error(&e),
        }
    }

    /// POST a dismiss command with a JSON body.
    fn post_dismiss(
        &self,
        engine: &AlertEngine,
        provider: &dyn IdentityProvider,
        header: Option<&str>,
        body: &str,
        now: Timestamp,
    ) -> TransportResponse {
        let caller = match self.authenticate(header, provider) {
            Ok(caller) => caller,
            Err(e) => return TransportResponse::error(&e),
        };
        if let Err(e) = caller.require_admin() {
            return TransportResponse::error(&e);
        }
        let request: DismissRequest = match serde_json::from_str(body) {
            Ok(r) => r,
            Err(e) => {
                return TransportResponse {
                    status: 400,
                    body: json!({ "error": format!("Invalid request body: {e}") }),
                }
            }
        };
        match engine.dismiss(&caller, &request, now) {
            Ok(resp) => TransportResponse::ok(&resp),
            Err(e) => TransportResponse::error(&e),
        }
    }
}

/// Browser console: `Cookie: a=b; session=<id>`.
#[derive(Debug, Clone)]
pub struct CookieSessionTransport {
    cookie_name: String,
}

impl CookieSessionTransport {
    pub fn new(cookie_name: &str) -> Self {
        Self {
            cookie_name: cookie_name.to_string(),
        }
    }
}

impl Default for CookieSessionTransport {
    fn default() -> Self {
        Self::new("session")
    }
}

impl Transport for CookieSessionTransport {
    fn name(&self) -> &'static str {
        "cookie_session"
    }

    fn credential<'h>(&self, header: &'h str) -> Option<&'h str> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.trim())
            .filter(|v| !v.is_empty())
    }
}

/// API clients: `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerTokenTransport;

impl Transport for BearerTokenTransport {
    fn name(&self) -> &'static str {
        "bearer_token"
    }

    fn credential<'h>(&self, header: &'h str) -> Option<&'h str> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}
