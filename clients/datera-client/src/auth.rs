// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Session credential held by each connection

use std::fmt;
use std::time::Instant;

/// Current API key of one connection
///
/// The key is empty until the first successful login and is replaced
/// wholesale by every later login. It lives only in memory.
#[derive(Clone, Default)]
pub struct AuthToken {
    key: Option<String>,
    issued_at: Option<Instant>,
}

impl AuthToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key to send as `Auth-Token`, if logged in
    pub fn get(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Replace the key. An empty string clears it.
    pub fn set(&mut self, key: impl Into<String>) {
        let key = key.into();
        if key.is_empty() {
            self.clear();
        } else {
            self.key = Some(key);
            self.issued_at = Some(Instant::now());
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.issued_at = None;
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }

    /// When the current key was stored
    pub fn issued_at(&self) -> Option<Instant> {
        self.issued_at
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("key", &self.key.as_ref().map(|_| crate::REDACTED))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let mut token = AuthToken::new();
        assert!(token.is_empty());

        token.set("abc123");
        assert_eq!(token.get(), Some("abc123"));
        assert!(token.issued_at().is_some());

        token.set("");
        assert!(token.is_empty());
        assert!(token.issued_at().is_none());
    }

    #[test]
    fn test_debug_never_prints_key() {
        let mut token = AuthToken::new();
        token.set("super-secret");
        let out = format!("{:?}", token);
        assert!(!out.contains("super-secret"));
        assert!(out.contains("********"));
    }
}
