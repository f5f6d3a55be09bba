//! Who is signed in.
//!
//! Checkout and cart persistence both require an authenticated user; this
//! trait is the seam where a real auth provider plugs in. Tests and the demo
//! use [`InMemoryIdentity`].

use crate::model::UserId;
use async_trait::async_trait;
use std::sync::Mutex;

/// Source of the current authenticated user, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Option<UserId>;
}

/// Trivial identity provider holding the signed-in user in memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    user: Mutex<Option<UserId>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        *self.user.lock().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn current_user(&self) -> Option<UserId> {
        self.user.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_and_out_round_trip() {
        let identity = InMemoryIdentity::new();
        assert_eq!(identity.current_user().await, None);

        identity.sign_in(UserId::new("u1"));
        assert_eq!(identity.current_user().await, Some(UserId::new("u1")));

        identity.sign_out();
        assert_eq!(identity.current_user().await, None);
    }
}
