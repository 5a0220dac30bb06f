use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error as ThisError;
use tokio::time::{Duration, Instant};

/// Expiration applied by every `set`.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

// Upper bound for deadlines pushed out by `expire`, keeps `Instant` arithmetic from overflowing.
const MAX_EXPIRE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

#[derive(Debug, ThisError, PartialEq)]
pub enum StoreError {
    #[error("data doesn't exist")]
    KeyNotFound,
    #[error("data expired")]
    KeyExpired,
}

/// Remaining lifetime of a key, as reported by [`Store::ttl`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ttl {
    Never,
    Remaining(Duration),
}

/// The Store owns every key-value pair together with its optional expiration instant. The whole
/// table sits behind a single reader-writer lock: lookups share it, mutations take it exclusively.
///
/// Expired entries are never handed out. A reader that finds one drops its shared lock, takes the
/// exclusive one and checks the entry again before deleting it, since another task may have
/// refreshed or removed the key in between. Entries nobody reads again are collected by
/// [`Store::sweep`], driven by the [`Janitor`](crate::janitor::Janitor).
///
/// The store is cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct Store {
    inner: Arc<InnerStore>,
}

struct InnerStore {
    entries: RwLock<HashMap<Key, Entry>>,
    default_ttl: Option<Duration>,
}

type Key = String;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    /// An entry is dead from its expiration instant onward, inclusive.
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

impl Store {
    pub fn new() -> Store {
        Self::with_default_ttl(Some(DEFAULT_TTL))
    }

    /// Builds a store whose `set` applies `default_ttl`. `None` makes new entries live forever.
    pub fn with_default_ttl(default_ttl: Option<Duration>) -> Store {
        let inner = InnerStore {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn set(&self, key: String, value: String) {
        let expires_at = self.inner.default_ttl.map(|ttl| Instant::now() + ttl);
        let entry = Entry { value, expires_at };

        self.inner.entries.write().insert(key, entry);
    }

    pub fn get(&self, key: &str) -> Result<String, StoreError> {
        {
            let entries = self.inner.entries.read();
            match entries.get(key) {
                None => return Err(StoreError::KeyNotFound),
                Some(entry) if !entry.is_expired(Instant::now()) => return Ok(entry.value.clone()),
                Some(_) => {}
            }
        }

        self.remove_if_expired(key);
        Err(StoreError::KeyExpired)
    }

    /// Removes `key`, reporting whether it was present. Removing a missing key is not an error.
    pub fn del(&self, key: &str) -> bool {
        self.inner.entries.write().remove(key).is_some()
    }

    /// Whether `key` holds a live value. An expired entry counts as absent and is removed on the
    /// spot, exactly like `get` would.
    pub fn exists(&self, key: &str) -> bool {
        {
            let entries = self.inner.entries.read();
            match entries.get(key) {
                None => return false,
                Some(entry) if !entry.is_expired(Instant::now()) => return true,
                Some(_) => {}
            }
        }

        self.remove_if_expired(key);
        false
    }

    /// Moves the expiration of an existing key to `seconds` from now. Zero or negative values
    /// leave the key already expired. Never creates a key.
    pub fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError> {
        let mut entries = self.inner.entries.write();
        let entry = entries.get_mut(key).ok_or(StoreError::KeyNotFound)?;

        entry.expires_at = Some(deadline(Instant::now(), seconds));
        Ok(())
    }

    pub fn ttl(&self, key: &str) -> Result<Ttl, StoreError> {
        let expires_at = {
            let entries = self.inner.entries.read();
            let entry = entries.get(key).ok_or(StoreError::KeyNotFound)?;
            entry.expires_at
        };

        let now = Instant::now();
        match expires_at {
            None => Ok(Ttl::Never),
            Some(expires_at) if expires_at > now => Ok(Ttl::Remaining(expires_at - now)),
            Some(_) => {
                self.remove_if_expired(key);
                Err(StoreError::KeyNotFound)
            }
        }
    }

    /// Deletes every expired entry in a single pass under the exclusive lock and returns how many
    /// were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.inner.entries.write();

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of entries in the table, including expired ones not collected yet.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The shared lock was released before we got here, so the entry is checked again: it may
    // have been deleted, overwritten by `set` or pushed out by `expire` meanwhile.
    fn remove_if_expired(&self, key: &str) -> bool {
        let mut entries = self.inner.entries.write();

        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(Instant::now()));
        if expired {
            entries.remove(key);
        }

        expired
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn deadline(now: Instant, seconds: i64) -> Instant {
    let offset = Duration::from_secs(seconds.unsigned_abs());

    if seconds >= 0 {
        now + offset.min(MAX_EXPIRE)
    } else {
        now.checked_sub(offset).unwrap_or(now)
    }
}
