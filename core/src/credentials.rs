//! Read-only access to the bearer token.
//!
//! # Design
//! The token lives in a key-value store owned by the host (a browser's local
//! storage in the original setting, a JSON file or an in-memory map here).
//! The transport only ever reads it, once per request, so a token swapped
//! by the host between two calls is picked up by the second one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Supplies the bearer token for authorized requests.
pub trait CredentialProvider: Send + Sync {
    /// Current token, or `None` when the caller is not signed in.
    fn bearer_token(&self) -> Option<SecretString>;
}

impl<T: CredentialProvider + ?Sized> CredentialProvider for Arc<T> {
    fn bearer_token(&self) -> Option<SecretString> {
        (**self).bearer_token()
    }
}

/// Never supplies a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }
}

/// A fixed token handed over at construction.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        non_empty(self.0.clone())
    }
}

/// String key-value storage readable by the client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Reads the token from `store` under [`TOKEN_KEY`] on every call.
#[derive(Debug, Clone)]
pub struct StoredToken<S> {
    store: S,
}

impl<S: KeyValueStore> StoredToken<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> CredentialProvider for StoredToken<S> {
    fn bearer_token(&self) -> Option<SecretString> {
        self.store.get(TOKEN_KEY).and_then(non_empty)
    }
}

fn non_empty(token: String) -> Option<SecretString> {
    if token.is_empty() {
        None
    } else {
        Some(SecretString::from(token))
    }
}

/// In-process store. The host writes it; the client only reads it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// Flat JSON object on disk, e.g. `{"token": "..."}`.
///
/// The file is re-read on every lookup. A missing or malformed file reads as
/// empty; only string values are returned.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "key-value store unreadable");
                return None;
            }
        };
        let entries: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "key-value store malformed");
                return None;
            }
        };
        entries.get(key)?.as_str().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn exposed(provider: &dyn CredentialProvider) -> Option<String> {
        provider
            .bearer_token()
            .map(|token| token.expose_secret().to_string())
    }

    #[test]
    fn stored_token_tracks_store_changes() {
        let store = Arc::new(MemoryStore::new());
        let provider = StoredToken::new(Arc::clone(&store));
        assert_eq!(exposed(&provider), None);

        store.set(TOKEN_KEY, "first");
        assert_eq!(exposed(&provider).as_deref(), Some("first"));

        store.set(TOKEN_KEY, "second");
        assert_eq!(exposed(&provider).as_deref(), Some("second"));

        store.remove(TOKEN_KEY);
        assert_eq!(exposed(&provider), None);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        assert_eq!(exposed(&StaticToken::new("")), None);
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "");
        assert_eq!(exposed(&StoredToken::new(store)), None);
    }

    #[test]
    fn static_and_none_providers() {
        assert_eq!(exposed(&StaticToken::new("abc")).as_deref(), Some("abc"));
        assert_eq!(exposed(&NoCredentials), None);
    }

    #[test]
    fn json_file_store_reads_string_values() {
        let path = std::env::temp_dir().join(format!("catalog-kv-{}.json", std::process::id()));
        fs::write(&path, r#"{"token":"from-disk","other":5}"#).unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("from-disk"));
        assert_eq!(store.get("other"), None);
        assert_eq!(store.get("missing"), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);

        fs::remove_file(&path).unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
    }
}
