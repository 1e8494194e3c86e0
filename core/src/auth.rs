//! Bearer-token sources.
//!
//! The client asks its `TokenSource` for a token while building each request
//! and never writes to it. Login and refresh flows live with the caller.

use std::sync::{Arc, RwLock};

pub trait TokenSource: Send + Sync {
    /// The token to send as `authorization: Bearer {token}`, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// Unauthenticated calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl TokenSource for NoAuth {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A token slot shared with whatever manages the session.
///
/// Clones share the same slot, so a login handler can `set` a token that
/// every subsequent call picks up.
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    slot: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.into());
    }

    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl TokenSource for SharedToken {
    fn bearer_token(&self) -> Option<String> {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
