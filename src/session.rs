//! Per-client sessions.
//!
//! Each signed-in client owns a [`Storefront`] of its own, keyed by an opaque
//! [`SessionId`] handed out on login or registration. Its documents live in a
//! [`ScopedStore`] namespaced by that id, so a session survives a restart when
//! the backend is durable. Requests without a known session get a throwaway
//! guest storefront.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::{AuthBackend, MockAuthBackend};
use crate::catalog::Catalog;
use crate::checkout::{MockOrderGateway, OrderGateway};
use crate::config::AppConfig;
use crate::storage::{FileStore, MemoryStore, ScopedStore, SharedStore};
use crate::storefront::Storefront;

/// Header carrying the session id in both directions.
pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self { Self(Uuid::new_v4()) }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.simple()) }
}

impl FromStr for SessionId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Uuid::parse_str(s.trim()).map(Self) }
}

pub type SessionHandle = Arc<Mutex<Storefront>>;

pub struct SessionManager {
    catalog: Arc<Catalog>,
    storage: SharedStore,
    auth: Arc<dyn AuthBackend>,
    orders: Arc<dyn OrderGateway>,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionManager {
    pub fn new(catalog: Arc<Catalog>, storage: SharedStore, auth: Arc<dyn AuthBackend>, orders: Arc<dyn OrderGateway>) -> Self {
        Self { catalog, storage, auth, orders, sessions: RwLock::new(HashMap::new()) }
    }

    /// Seeded catalog with mock services, persisted where `config` says.
    pub fn from_config(config: &AppConfig) -> Self {
        let storage: SharedStore = match &config.data_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "using file-backed storage");
                Arc::new(FileStore::new(dir))
            }
            None => {
                tracing::info!("using in-memory storage");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(
            Arc::new(Catalog::seeded()),
            storage,
            MockAuthBackend::shared(config.mock_delay),
            MockOrderGateway::shared(config.mock_delay),
        )
    }

    pub fn catalog(&self) -> &Arc<Catalog> { &self.catalog }

    pub fn active(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Session state for `id`. Unknown ids are looked up in storage and
    /// revived only if a signed-in user was persisted for them; anything
    /// else resolves to a fresh guest.
    pub fn resolve(&self, id: Option<SessionId>) -> SessionHandle {
        let Some(id) = id else { return self.guest() };
        if let Some(handle) = self.lookup(id) { return handle; }
        let storefront = self.open(id);
        if !storefront.auth().is_authenticated() { return self.guest(); }
        tracing::debug!(session = %id, "session restored from storage");
        self.insert(id, storefront)
    }

    /// Session to sign in on: the caller's live session, or a new one that is
    /// only kept once [`SessionManager::attach`] is called. The flag reports
    /// whether the session was already live.
    pub fn begin(&self, id: Option<SessionId>) -> (SessionId, SessionHandle, bool) {
        if let Some((id, handle)) = id.and_then(|id| Some((id, self.lookup(id)?))) {
            return (id, handle, true);
        }
        let id = SessionId::generate();
        (id, Arc::new(Mutex::new(self.open(id))), false)
    }

    pub fn attach(&self, id: SessionId, handle: SessionHandle) {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner).insert(id, handle);
        tracing::info!(session = %id, "session started");
    }

    pub fn end(&self, id: SessionId) {
        if self.sessions.write().unwrap_or_else(PoisonError::into_inner).remove(&id).is_some() {
            tracing::info!(session = %id, "session ended");
        }
    }

    fn lookup(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).get(&id).cloned()
    }

    fn insert(&self, id: SessionId, storefront: Storefront) -> SessionHandle {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions.entry(id).or_insert_with(|| Arc::new(Mutex::new(storefront))).clone()
    }

    fn open(&self, id: SessionId) -> Storefront {
        let storage: SharedStore = Arc::new(ScopedStore::new(self.storage.clone(), id.to_string()));
        Storefront::new(self.catalog.clone(), storage, self.auth.clone(), self.orders.clone())
    }

    fn guest(&self) -> SessionHandle {
        let storage: SharedStore = Arc::new(MemoryStore::new());
        Arc::new(Mutex::new(Storefront::new(self.catalog.clone(), storage, self.auth.clone(), self.orders.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ProductId;
    use std::time::Duration;

    fn manager(storage: SharedStore) -> SessionManager {
        SessionManager::new(
            Arc::new(Catalog::seeded()),
            storage,
            MockAuthBackend::shared(Duration::ZERO),
            MockOrderGateway::shared(Duration::ZERO),
        )
    }

    async fn sign_in(sessions: &SessionManager) -> SessionId {
        let (id, handle, live) = sessions.begin(None);
        assert!(!live);
        handle.lock().await.auth_mut().login("customer@example.com", "customer123").await.unwrap();
        sessions.attach(id, handle);
        id
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::generate();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!("not-a-session".parse::<SessionId>().is_err());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let sessions = manager(Arc::new(MemoryStore::new()));
        let id = sign_in(&sessions).await;
        sessions.resolve(Some(id)).lock().await.add_to_cart(ProductId::new(1), 2, || {}).unwrap();

        assert!(sessions.resolve(None).lock().await.user().is_none());
        assert!(sessions.resolve(Some(SessionId::generate())).lock().await.user().is_none());
        assert_eq!(sessions.active(), 1);

        let shop = sessions.resolve(Some(id));
        let shop = shop.lock().await;
        assert_eq!(shop.user().map(|u| u.email.as_str()), Some("customer@example.com"));
        assert_eq!(shop.cart().get_cart_item_count(), 2);
    }

    #[tokio::test]
    async fn test_session_restored_after_restart() {
        let storage: SharedStore = Arc::new(MemoryStore::new());
        let first = manager(storage.clone());
        let id = sign_in(&first).await;
        first.resolve(Some(id)).lock().await.add_to_cart(ProductId::new(5), 2, || {}).unwrap();

        let second = manager(storage);
        assert_eq!(second.active(), 0);
        assert_eq!(second.resolve(Some(id)).lock().await.cart().get_cart_item_count(), 2);
        assert_eq!(second.active(), 1);
    }

    #[tokio::test]
    async fn test_ended_session_resolves_to_guest() {
        let sessions = manager(Arc::new(MemoryStore::new()));
        let id = sign_in(&sessions).await;
        sessions.resolve(Some(id)).lock().await.auth_mut().logout();
        sessions.end(id);
        assert_eq!(sessions.active(), 0);
        assert!(sessions.resolve(Some(id)).lock().await.user().is_none());
    }
}
