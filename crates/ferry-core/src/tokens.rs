//! Bearer token store.
//!
//! Tokens are 128 bits of OS randomness rendered as lowercase hex and mapped to an
//! absolute expiry instant. A token is valid strictly before that instant.
//!
//! Expired entries leave the map two ways: lazily, when [`TokenStore::validate`] finds
//! one, and eagerly through [`TokenStore::purge_expired`], which the reclaimer calls on a
//! fixed interval so abandoned tokens do not pile up.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::constants::{TOKEN_BYTES, TOKEN_FINGERPRINT_LEN};
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("System randomness unavailable: {0}")]
    Randomness(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::InternalWithSource {
            message: "Failed to generate token".to_string(),
            source: anyhow::Error::new(err),
        }
    }
}

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    fn generate() -> Result<Self, TokenError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::Randomness(e.to_string()))?;
        Ok(Token(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Short SHA-256 prefix identifying the token in logs without revealing it.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

// Debug must not leak the secret either.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.fingerprint()).finish()
    }
}

/// Fingerprint of an arbitrary presented token string.
pub fn fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(TOKEN_FINGERPRINT_LEN);
    hex
}

pub struct TokenStore {
    tokens: RwLock<HashMap<String, DateTime<Utc>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        // Out-of-range TTLs saturate to a century
        let ttl = TimeDelta::from_std(ttl).unwrap_or_else(|_| TimeDelta::days(36_500));
        Self {
            tokens: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Generate a fresh token and record it with expiry = now + TTL.
    pub async fn issue(&self) -> Result<(Token, DateTime<Utc>), TokenError> {
        let token = Token::generate()?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.tokens
            .write()
            .await
            .insert(token.as_str().to_string(), expires_at);

        Ok((token, expires_at))
    }

    /// True iff `token` is known and not yet expired. An expired entry is evicted.
    pub async fn validate(&self, token: &str) -> bool {
        let now = self.clock.now();

        {
            let tokens = self.tokens.read().await;
            match tokens.get(token) {
                None => return false,
                Some(expires_at) if now < *expires_at => return true,
                Some(_) => {}
            }
        }

        // Re-check under the write lock: another caller may already have evicted it.
        let mut tokens = self.tokens.write().await;
        if let Some(expires_at) = tokens.get(token).copied() {
            if now >= expires_at {
                tokens.remove(token);
                tracing::debug!(
                    token = %fingerprint(token),
                    expires_at = %expires_at,
                    "Evicted expired token on validation"
                );
            }
        }
        false
    }

    /// Remove every token whose expiry is at or before now. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, expires_at| now < *expires_at);
        before - tokens.len()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}
