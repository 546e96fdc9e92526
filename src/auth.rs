//! # Token Authentication
//!
//! When a registry requires tokens, every request must carry a credential
//! that a [`CredentialValidator`] accepts. [`TokenStore`] is a small in-memory
//! validator that issues random tokens and can expire them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Decides whether a request credential is acceptable.
pub trait CredentialValidator: Send + Sync {
    fn validate(&self, token: &str) -> bool;
}

impl<F> CredentialValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, token: &str) -> bool {
        self(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token: String,
    pub active: bool,
    pub expired_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A fresh active token of 32 hex characters.
    pub fn generate() -> Self {
        Self {
            token: Uuid::new_v4().simple().to_string(),
            active: true,
            expired_at: None,
        }
    }

    /// Deactivates the token and stamps the expiry time.
    pub fn expire(&mut self) -> &mut Self {
        self.active = false;
        self.expired_at = Some(Utc::now());
        self
    }
}

#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<Vec<Token>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Token {
        let token = Token::generate();
        self.tokens.write().push(token.clone());
        info!("API token issued");
        token
    }

    /// Expires a token, returning its new state. `None` if it is unknown.
    pub fn expire(&self, token: &str) -> Option<Token> {
        let mut tokens = self.tokens.write();
        let found = tokens.iter_mut().find(|t| t.token == token)?;
        found.expire();
        debug!(expired_at = ?found.expired_at, "API token expired");
        Some(found.clone())
    }

    pub fn get(&self, token: &str) -> Option<Token> {
        self.tokens
            .read()
            .iter()
            .find(|t| t.token == token)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialValidator for TokenStore {
    fn validate(&self, token: &str) -> bool {
        self.get(token).is_some_and(|t| t.active)
    }
}
