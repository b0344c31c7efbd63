//! Request authentication.
//!
//! Identity provisioning is an external concern; the gateway only needs to
//! map a bearer token to a known user id. The trait is the seam a real
//! session service would plug into.

use std::collections::HashMap;
use std::sync::RwLock;

use casedrop_types::UserId;

pub trait Authenticator: Send + Sync {
    /// Resolves a bearer token to a user id, or `None` if the token is not
    /// recognized.
    fn resolve(&self, token: &str) -> Option<UserId>;
}

/// Static token table loaded at startup.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl TokenRegistry {
    pub fn register(&self, token: impl Into<String>, user_id: impl Into<UserId>) {
        self.tokens
            .write()
            .expect("token lock poisoned")
            .insert(token.into(), user_id.into());
    }
}

impl Authenticator for TokenRegistry {
    fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens
            .read()
            .expect("token lock poisoned")
            .get(token)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_tokens_only() {
        let registry = TokenRegistry::default();
        registry.register("tok-alice", "u1");
        assert_eq!(registry.resolve("tok-alice").as_deref(), Some("u1"));
        assert_eq!(registry.resolve("tok-bob"), None);
    }
}
