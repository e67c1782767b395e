// context.rs - Owns the storage handle and everything loaded from it

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::auth::{AuthError, Session, SessionHolder, UserRegistry};
use crate::ledger::{LedgerError, LedgerStore};
use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Application state for one process: ledger, known users and the current
/// session, all backed by the same key-value store.
pub struct AppContext {
    storage: Arc<dyn KeyValueStore>,
    ledger: LedgerStore,
    users: UserRegistry,
    session: SessionHolder,
}

impl AppContext {
    /// Load every component from `storage`, defaulting when a key is absent
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Result<Self, LedgerError> {
        let ledger = LedgerStore::load(storage.clone())?;
        let users = UserRegistry::load(storage.clone())?;
        let session = SessionHolder::load(storage.clone())?;
        Ok(Self {
            storage,
            ledger,
            users,
            session,
        })
    }

    /// Open a directory-backed context
    pub fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let store = FileStore::open(dir)?;
        info!(dir = %store.dir().display(), "Opened data directory");
        Self::open(Arc::new(store))
    }

    /// Fresh context over an empty in-memory store
    pub fn in_memory() -> Result<Self, LedgerError> {
        Self::open(Arc::new(MemoryStore::new()))
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut LedgerStore {
        &mut self.ledger
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserRegistry {
        &mut self.users
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.current()
    }

    pub fn establish_session(&mut self, session: Session) -> Result<(), StorageError> {
        self.session.establish(session)
    }

    /// Route guard: the current session, or `NotAuthenticated`
    pub fn require_session(&self) -> Result<&Session, AuthError> {
        self.session.current().ok_or(AuthError::NotAuthenticated)
    }

    /// Ledger access for a logged-in user only
    pub fn require_ledger_mut(&mut self) -> Result<&mut LedgerStore, AuthError> {
        if !self.session.is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(&mut self.ledger)
    }

    pub fn logout(&mut self) -> Result<Option<Session>, StorageError> {
        self.session.clear()
    }

    pub fn flush(&self) -> Result<(), LedgerError> {
        self.ledger.flush()?;
        self.users.flush()?;
        self.session.flush()?;
        Ok(())
    }

    pub fn close(self) -> Result<(), LedgerError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_requires_session() {
        let mut ctx = AppContext::in_memory().unwrap();
        assert!(matches!(ctx.require_session(), Err(AuthError::NotAuthenticated)));
        assert!(ctx.require_ledger_mut().is_err());

        ctx.establish_session(Session {
            email: "a@b.com".into(),
            name: "Ada".into(),
        })
        .unwrap();
        assert_eq!(ctx.require_session().unwrap().email, "a@b.com");
        assert!(ctx.require_ledger_mut().is_ok());

        let previous = ctx.logout().unwrap();
        assert_eq!(previous.map(|s| s.name), Some("Ada".to_string()));
        assert!(ctx.require_session().is_err());
    }

    #[test]
    fn test_session_survives_reopen() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut ctx = AppContext::open(backing.clone()).unwrap();
        ctx.establish_session(Session {
            email: "a@b.com".into(),
            name: "Ada".into(),
        })
        .unwrap();
        ctx.close().unwrap();

        let reopened = AppContext::open(backing.clone()).unwrap();
        assert_eq!(reopened.session().map(|s| s.email.as_str()), Some("a@b.com"));

        let mut reopened = reopened;
        reopened.logout().unwrap();
        let again = AppContext::open(backing).unwrap();
        assert!(again.session().is_none());
    }
}
