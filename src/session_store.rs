//! Durable session token storage

use crate::session::SessionTokens;
use papaya::HashMap;
use std::collections::HashMap as StdHashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Storage key for the access token entry
pub const ACCESS_TOKEN_KEY: &str = "auth.access_token";

/// Storage key for the refresh token entry
pub const REFRESH_TOKEN_KEY: &str = "auth.refresh_token";

/// Key-value storage for the session token pair
///
/// The store holds at most one access token and one refresh token, each under
/// a fixed key. `set_tokens` replaces the pair and `clear` removes both
/// entries together. Reads used for attaching the `Authorization` header
/// observe completed writes: a request started after a renewal finishes sees
/// the new token, never a stale one.
pub trait SessionStore: Send + Sync {
    /// Get the stored access token
    fn access_token(&self) -> Option<String>;

    /// Get the stored refresh token
    fn refresh_token(&self) -> Option<String>;

    /// Replace the stored token pair
    fn set_tokens(&self, tokens: &SessionTokens);

    /// Remove both tokens
    fn clear(&self);
}

/// In-process store backed by a concurrent map
#[derive(Clone)]
pub struct MemoryStore {
    entries: Arc<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }
}

impl SessionStore for MemoryStore {
    fn access_token(&self) -> Option<String> {
        self.entries.pin().get(ACCESS_TOKEN_KEY).cloned()
    }

    fn refresh_token(&self) -> Option<String> {
        self.entries.pin().get(REFRESH_TOKEN_KEY).cloned()
    }

    fn set_tokens(&self, tokens: &SessionTokens) {
        let entries = self.entries.pin();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
    }

    fn clear(&self) {
        let entries = self.entries.pin();
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// File-backed store persisting the token pair as a small JSON document
///
/// Stands in for the durable client-side storage a browser build would use.
/// Entries are loaded best-effort on open (a missing or unreadable file means
/// an empty session) and written through on every mutation.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<StdHashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any previously persisted entries.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => StdHashMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &StdHashMap<String, String>) {
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(err) = std::fs::write(&self.path, raw) {
                    warn!(path = %self.path.display(), error = %err, "Failed to persist session store");
                }
            }
            Err(err) => warn!(error = %err, "Failed to serialize session store"),
        }
    }
}

impl SessionStore for FileStore {
    fn access_token(&self) -> Option<String> {
        self.entries.lock().unwrap().get(ACCESS_TOKEN_KEY).cloned()
    }

    fn refresh_token(&self) -> Option<String> {
        self.entries.lock().unwrap().get(REFRESH_TOKEN_KEY).cloned()
    }

    fn set_tokens(&self, tokens: &SessionTokens) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), tokens.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), tokens.refresh_token.clone());
        self.persist(&entries);
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        self.persist(&entries);
    }
}
