//! Credential persistence.
//!
//! The session is a handful of opaque strings under fixed keys. Backends
//! implement [`CredentialStore`]; [`Session`] layers the typed operations on
//! top and keeps the access / refresh pair consistent.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kitchen_models::{RestaurantSlug, TenantContext, Tokens};
use tracing::debug;

use crate::error::SdkError;

/// Storage key of the access token.
pub const ACCESS_KEY: &str = "access";
/// Storage key of the refresh token.
pub const REFRESH_KEY: &str = "refresh";
/// Storage key of the active restaurant id.
pub const TENANT_ID_KEY: &str = "active_restaurant_id";
/// Storage key of the active restaurant slug.
pub const TENANT_SLUG_KEY: &str = "active_restaurant_slug";

const SESSION_KEYS: [&str; 4] = [ACCESS_KEY, REFRESH_KEY, TENANT_ID_KEY, TENANT_SLUG_KEY];

// ---------------------------------------------------------------------------
// CredentialStore
// ---------------------------------------------------------------------------

/// Synchronous string key-value storage for session state.
pub trait CredentialStore: Send + Sync {
    /// Retrieve a value.
    fn get(&self, key: &str) -> Result<Option<String>, SdkError>;

    /// Store a value.
    fn set(&self, key: &str, value: &str) -> Result<(), SdkError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), SdkError>;

    /// Store several values. Backends that can should write them in one go.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), SdkError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Delete several values. Backends that can should delete them in one go.
    fn remove_many(&self, keys: &[&str]) -> Result<(), SdkError> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SdkError> {
        Ok(lock(&self.data).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SdkError> {
        lock(&self.data).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SdkError> {
        lock(&self.data).remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), SdkError> {
        let mut data = lock(&self.data);
        for (key, value) in entries {
            data.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), SdkError> {
        let mut data = lock(&self.data);
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

/// JSON file store, one object of string values.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never see a half-written session.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    const APP_DIR: &'static str = "kitchen";
    const SESSION_FILE: &'static str = "session.json";

    /// A store backed by the given file. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config dir>/kitchen/session.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        Some(
            dirs::config_dir()?
                .join(Self::APP_DIR)
                .join(Self::SESSION_FILE),
        )
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SdkError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            SdkError::Storage(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, data: &BTreeMap<String, String>) -> Result<(), SdkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), keys = data.len(), "session file written");
        Ok(())
    }

    fn update(
        &self,
        mutate: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), SdkError> {
        let _guard = lock(&self.write_lock);
        let mut data = self.load()?;
        mutate(&mut data);
        self.save(&data)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SdkError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SdkError> {
        self.update(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SdkError> {
        self.update(|data| {
            data.remove(key);
        })
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), SdkError> {
        self.update(|data| {
            for (key, value) in entries {
                data.insert(key.to_string(), value.to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), SdkError> {
        self.update(|data| {
            for key in keys {
                data.remove(*key);
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Typed view over a [`CredentialStore`].
///
/// The access and refresh tokens are written together on login and removed
/// together on logout or refresh failure; only a refresh overwrites the
/// access token alone.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    /// Wrap a store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// A session backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Stored access token.
    pub fn access_token(&self) -> Result<Option<String>, SdkError> {
        self.store.get(ACCESS_KEY)
    }

    /// Stored refresh token.
    pub fn refresh_token(&self) -> Result<Option<String>, SdkError> {
        self.store.get(REFRESH_KEY)
    }

    /// Whether a token pair is stored.
    pub fn is_authenticated(&self) -> Result<bool, SdkError> {
        Ok(self.access_token()?.is_some() && self.refresh_token()?.is_some())
    }

    /// Store a new token pair.
    pub fn set_tokens(&self, tokens: &Tokens) -> Result<(), SdkError> {
        self.store.set_many(&[
            (ACCESS_KEY, tokens.access.as_str()),
            (REFRESH_KEY, tokens.refresh.as_str()),
        ])
    }

    /// Replace the access token after a refresh.
    pub fn set_access_token(&self, access: &str) -> Result<(), SdkError> {
        self.store.set(ACCESS_KEY, access)
    }

    /// Forget both tokens and the active restaurant.
    pub fn clear(&self) -> Result<(), SdkError> {
        self.store.remove_many(&SESSION_KEYS)
    }

    /// Active restaurant id and slug.
    pub fn tenant(&self) -> Result<TenantContext, SdkError> {
        let restaurant_id = self
            .store
            .get(TENANT_ID_KEY)?
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        let restaurant_slug = self
            .store
            .get(TENANT_SLUG_KEY)?
            .and_then(|raw| RestaurantSlug::new(&raw).ok());
        Ok(TenantContext {
            restaurant_id,
            restaurant_slug,
        })
    }

    /// Active restaurant id.
    pub fn active_restaurant_id(&self) -> Result<Option<i64>, SdkError> {
        Ok(self.tenant()?.restaurant_id)
    }

    /// Active restaurant slug.
    pub fn active_restaurant_slug(&self) -> Result<Option<RestaurantSlug>, SdkError> {
        Ok(self.tenant()?.restaurant_slug)
    }

    /// Record the fields present in `tenant`; absent fields are left as is.
    pub fn set_tenant(&self, tenant: &TenantContext) -> Result<(), SdkError> {
        if let Some(id) = tenant.restaurant_id {
            self.set_active_restaurant_id(Some(id))?;
        }
        if let Some(slug) = &tenant.restaurant_slug {
            self.store.set(TENANT_SLUG_KEY, slug.as_str())?;
        }
        Ok(())
    }

    /// Set or forget the active restaurant id.
    pub fn set_active_restaurant_id(&self, id: Option<i64>) -> Result<(), SdkError> {
        match id {
            Some(id) => self.store.set(TENANT_ID_KEY, &id.to_string()),
            None => self.store.remove(TENANT_ID_KEY),
        }
    }

    /// Set the active restaurant slug. Blank slugs forget it.
    pub fn set_active_restaurant_slug(&self, slug: Option<&str>) -> Result<(), SdkError> {
        match slug.and_then(|s| RestaurantSlug::new(s).ok()) {
            Some(slug) => self.store.set(TENANT_SLUG_KEY, slug.as_str()),
            None => self.store.remove(TENANT_SLUG_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Tokens {
        Tokens {
            access: "a1".into(),
            refresh: "r1".into(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("kitchen-sdk-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn memory_store_operations() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn clear_removes_pair_and_tenant() {
        let session = Session::in_memory();
        session.set_tokens(&tokens()).unwrap();
        session.set_active_restaurant_id(Some(4)).unwrap();
        session.set_active_restaurant_slug(Some("Bistro")).unwrap();
        assert!(session.is_authenticated().unwrap());

        session.clear().unwrap();
        assert_eq!(session.access_token().unwrap(), None);
        assert_eq!(session.refresh_token().unwrap(), None);
        assert_eq!(session.tenant().unwrap(), TenantContext::default());
    }

    #[test]
    fn refresh_overwrites_access_only() {
        let session = Session::in_memory();
        session.set_tokens(&tokens()).unwrap();
        session.set_access_token("a2").unwrap();
        assert_eq!(session.access_token().unwrap().as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().unwrap().as_deref(), Some("r1"));
    }

    #[test]
    fn tenant_slug_is_normalized_and_blank_forgets() {
        let session = Session::in_memory();
        session.set_active_restaurant_slug(Some("  Chez-Louis ")).unwrap();
        assert_eq!(
            session.tenant().unwrap().restaurant_slug.unwrap().as_str(),
            "chez-louis"
        );
        session.set_active_restaurant_slug(Some("  ")).unwrap();
        assert!(session.tenant().unwrap().restaurant_slug.is_none());
    }

    #[test]
    fn set_tenant_keeps_absent_fields() {
        let session = Session::in_memory();
        session.set_active_restaurant_id(Some(3)).unwrap();
        session
            .set_tenant(&TenantContext {
                restaurant_id: None,
                restaurant_slug: Some(RestaurantSlug::new("bistro").unwrap()),
            })
            .unwrap();
        let tenant = session.tenant().unwrap();
        assert_eq!(tenant.restaurant_id, Some(3));
        assert_eq!(tenant.restaurant_slug.unwrap().as_str(), "bistro");
    }

    #[test]
    fn file_store_persists_across_instances() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        let first = Session::new(Arc::new(FileStore::new(&path)));
        first.set_tokens(&tokens()).unwrap();

        let second = Session::new(Arc::new(FileStore::new(&path)));
        assert_eq!(second.access_token().unwrap().as_deref(), Some("a1"));
        assert_eq!(second.refresh_token().unwrap().as_deref(), Some("r1"));

        second.clear().unwrap();
        assert!(!first.is_authenticated().unwrap());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get(ACCESS_KEY), Err(SdkError::Storage(_))));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.get(ACCESS_KEY).unwrap(), None);
    }
}
