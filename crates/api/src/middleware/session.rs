//! Cart owner resolution for HTTP requests.
//!
//! Guests carry their session token in the `x-cart-session` header. When the
//! header is missing or malformed a fresh token is generated, and every
//! guest response, error responses included, echoes the token back so the
//! client can persist it.

use std::sync::{Arc, Mutex};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName};
use axum::response::{AppendHeaders, IntoResponse, Response};
use chimaek_core::cart::CartStore;
use chimaek_core::identity::{resolve_owner_key, GuestTokenStore, OwnerKey};
use chimaek_core::notify::NoticeLog;

use super::auth::{AuthUser, MaybeAuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Request and response header carrying the guest session token.
pub const SESSION_HEADER: &str = "x-cart-session";

/// Token slot backed by one request: `load` reads the incoming header,
/// `save` records a newly issued token for the response.
#[derive(Debug, Default)]
pub struct RequestTokenStore {
    incoming: Option<String>,
    issued: Mutex<Option<String>>,
}

impl RequestTokenStore {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            incoming: session_token(headers),
            issued: Mutex::new(None),
        }
    }

    /// The token generated while resolving the owner, if any.
    pub fn issued(&self) -> Option<String> {
        self.issued.lock().ok().and_then(|slot| slot.clone())
    }
}

impl GuestTokenStore for RequestTokenStore {
    fn load(&self) -> Option<String> {
        self.incoming.clone()
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.issued.lock() {
            *slot = Some(token.to_string());
        }
    }
}

/// Raw `x-cart-session` header value, if present and readable.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The resolved owner of the cart this request operates on.
#[derive(Debug, Clone)]
pub struct CartOwner {
    pub user: Option<AuthUser>,
    pub owner: OwnerKey,
}

impl FromRequestParts<AppState> for CartOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(parts, state).await?;
        let store = RequestTokenStore::from_headers(&parts.headers);
        let owner = resolve_owner_key(user.as_ref().map(|u| u.user_id), &store);
        if store.issued().is_some() {
            tracing::debug!(owner = ?owner, "Issued new guest session");
        }

        Ok(CartOwner { user, owner })
    }
}

impl CartOwner {
    /// A cart store for this owner that collects its notices into the
    /// returned log.
    pub fn cart(&self, state: &AppState) -> (CartStore, Arc<NoticeLog>) {
        let log = Arc::new(NoticeLog::new());
        let cart = CartStore::new(self.owner.clone(), state.backend.clone(), log.clone());
        (cart, log)
    }

    /// Response headers echoing the guest token; empty for signed-in users.
    pub fn session_headers(&self) -> AppendHeaders<Vec<(HeaderName, String)>> {
        echo_headers(self.owner.session_token())
    }

    /// Wrap a handler error so the response still carries the session
    /// header.
    pub fn fail(&self, error: impl Into<AppError>) -> CartError {
        CartError {
            session_token: self.owner.session_token().map(str::to_string),
            error: error.into(),
        }
    }
}

fn echo_headers(token: Option<&str>) -> AppendHeaders<Vec<(HeaderName, String)>> {
    let headers = match token {
        Some(token) => vec![(HeaderName::from_static(SESSION_HEADER), token.to_string())],
        None => Vec::new(),
    };
    AppendHeaders(headers)
}

/// An [`AppError`] raised after the cart owner was resolved. A guest whose
/// first request fails still learns the token it was issued.
#[derive(Debug)]
pub struct CartError {
    session_token: Option<String>,
    error: AppError,
}

pub type CartResult<T> = Result<T, CartError>;

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        (echo_headers(self.session_token.as_deref()), self.error).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chimaek_core::identity::generate_session_token;

    use super::*;

    #[test]
    fn valid_header_token_is_reused() {
        let token = generate_session_token();
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_str(&token).unwrap());

        let store = RequestTokenStore::from_headers(&headers);
        let owner = resolve_owner_key(None, &store);

        assert_eq!(owner.session_token(), Some(token.as_str()));
        assert!(store.issued().is_none());
    }

    #[test]
    fn malformed_header_token_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("short"));

        let store = RequestTokenStore::from_headers(&headers);
        let owner = resolve_owner_key(None, &store);

        let issued = store.issued().expect("a token should be issued");
        assert_eq!(owner.session_token(), Some(issued.as_str()));
    }

    #[test]
    fn error_response_echoes_guest_token() {
        let owner = CartOwner {
            user: None,
            owner: OwnerKey::Guest {
                token: generate_session_token(),
            },
        };
        let expected = owner.owner.session_token().map(str::to_string);

        let response = owner
            .fail(chimaek_core::error::CoreError::Validation("cart is empty".into()))
            .into_response();

        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(
            response
                .headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            expected
        );
    }

    #[test]
    fn signed_in_caller_ignores_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            SESSION_HEADER,
            HeaderValue::from_str(&generate_session_token()).unwrap(),
        );

        let store = RequestTokenStore::from_headers(&headers);
        assert_eq!(resolve_owner_key(Some(3), &store), OwnerKey::User { id: 3 });
        assert!(store.issued().is_none());
    }
}
