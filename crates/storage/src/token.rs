use std::sync::Arc;

use tracing::debug;

use crate::{errors::StorageError, kv_store::KeyValueStore};

pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Accessors for the single slot holding the current authentication token.
/// No validation, expiry or refresh happens here.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, AUTH_TOKEN_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get_auth_token(&self) -> Option<String> {
        self.store.get(&self.key).await
    }

    pub async fn set_auth_token(&self, token: &str) -> Result<(), StorageError> {
        debug!(event = "token_set", key = %self.key, "storing auth token");
        self.store.set(&self.key, token).await
    }

    pub async fn remove_auth_token(&self) -> Result<bool, StorageError> {
        debug!(event = "token_remove", key = %self.key, "removing auth token");
        self.store.remove(&self.key).await
    }

    /// True when a non-empty token is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.get_auth_token().await.is_some_and(|t| !t.is_empty())
    }
}
