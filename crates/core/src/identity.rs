//! Cart owner identity: authenticated user or guest session token.
//!
//! Every cart row is scoped by exactly one [`OwnerKey`]. Guest tokens are
//! generated once per client, persisted by whatever [`GuestTokenStore`] the
//! caller provides, and never rotated.

use std::fmt;
use std::sync::Mutex;

use uuid::Uuid;

use crate::types::DbId;

/// Minimum accepted length of a guest session token.
pub const MIN_SESSION_TOKEN_LEN: usize = 32;

/// Longest guest token accepted from a client before it is replaced.
pub const MAX_SESSION_TOKEN_LEN: usize = 128;

/// Identity scoping a set of cart lines and orders.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    User { id: DbId },
    Guest { token: String },
}

impl OwnerKey {
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            OwnerKey::User { id } => Some(*id),
            OwnerKey::Guest { .. } => None,
        }
    }

    pub fn session_token(&self) -> Option<&str> {
        match self {
            OwnerKey::User { .. } => None,
            OwnerKey::Guest { token } => Some(token),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, OwnerKey::Guest { .. })
    }
}

// Guest tokens are bearer secrets; keep them out of logs.
impl fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKey::User { id } => f.debug_struct("User").field("id", id).finish(),
            OwnerKey::Guest { token } => f
                .debug_struct("Guest")
                .field(
                    "token",
                    &format_args!("{}…", token.chars().take(6).collect::<String>()),
                )
                .finish(),
        }
    }
}

/// Local persistence slot for the guest session token.
pub trait GuestTokenStore: Send + Sync {
    /// The previously persisted token, if any.
    fn load(&self) -> Option<String>;

    /// Persist a newly generated token.
    fn save(&self, token: &str);
}

/// Process-local token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl GuestTokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token.to_string());
        }
    }
}

/// Generate a fresh guest session token.
///
/// Two v4 UUIDs, the second without hyphens: 68 characters carrying 244
/// random bits from the OS CSPRNG.
pub fn generate_session_token() -> String {
    let first = Uuid::new_v4().hyphenated().to_string();
    let second = Uuid::new_v4().simple().to_string();
    format!("{first}{second}")
}

/// Whether a token read back from a client is acceptable as-is.
pub fn is_valid_session_token(token: &str) -> bool {
    (MIN_SESSION_TOKEN_LEN..=MAX_SESSION_TOKEN_LEN).contains(&token.len())
        && token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Resolve the cart owner for the current caller.
///
/// Authenticated callers always resolve to [`OwnerKey::User`]. Guests reuse
/// the stored token when it is valid; otherwise a new token is generated and
/// saved before returning.
pub fn resolve_owner_key(user_id: Option<DbId>, store: &dyn GuestTokenStore) -> OwnerKey {
    if let Some(id) = user_id {
        return OwnerKey::User { id };
    }

    let token = match store.load() {
        Some(token) if is_valid_session_token(&token) => token,
        _ => {
            let token = generate_session_token();
            store.save(&token);
            tracing::debug!("Issued new guest session token");
            token
        }
    };

    OwnerKey::Guest { token }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn authenticated_caller_resolves_to_user() {
        let store = MemoryTokenStore::with_token(generate_session_token());
        assert_eq!(resolve_owner_key(Some(7), &store), OwnerKey::User { id: 7 });
    }

    #[test]
    fn authenticated_caller_does_not_touch_guest_slot() {
        let store = MemoryTokenStore::new();
        resolve_owner_key(Some(7), &store);
        assert!(store.load().is_none());
    }

    #[test]
    fn first_guest_call_generates_and_persists_token() {
        let store = MemoryTokenStore::new();
        let owner = resolve_owner_key(None, &store);

        let token = owner.session_token().expect("guest owner").to_string();
        assert!(token.len() >= MIN_SESSION_TOKEN_LEN);
        assert_eq!(store.load().as_deref(), Some(token.as_str()));
    }

    #[test]
    fn existing_token_is_reused() {
        let existing = generate_session_token();
        let store = MemoryTokenStore::with_token(existing.clone());

        let owner = resolve_owner_key(None, &store);
        assert_eq!(owner, OwnerKey::Guest { token: existing });
    }

    #[test]
    fn short_token_is_replaced() {
        let store = MemoryTokenStore::with_token("too-short");
        let owner = resolve_owner_key(None, &store);

        let token = owner.session_token().expect("guest owner");
        assert_ne!(token, "too-short");
        assert!(token.len() >= MIN_SESSION_TOKEN_LEN);
        assert_eq!(store.load().as_deref(), Some(token));
    }

    #[test]
    fn token_with_foreign_characters_is_replaced() {
        let bad = format!("{}'; --", "a".repeat(40));
        assert!(!is_valid_session_token(&bad));
    }

    #[test]
    fn generated_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 68);
        assert!(is_valid_session_token(&token));
    }

    #[test]
    fn ten_thousand_tokens_are_unique() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 10_000);
        assert!(tokens.iter().all(|t| t.len() >= MIN_SESSION_TOKEN_LEN));
    }

    #[test]
    fn debug_output_masks_guest_token() {
        let owner = OwnerKey::Guest {
            token: generate_session_token(),
        };
        let rendered = format!("{owner:?}");
        assert!(rendered.len() < 40, "debug output leaked token: {rendered}");
    }
}
