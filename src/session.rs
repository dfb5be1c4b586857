//! Explicit session context. Created on successful login, torn down on
//! logout, and threaded into callers rather than held as global mutable
//! state. Each login advances an epoch; results of fetches issued under an
//! older epoch are discarded at apply time instead of being written into a
//! view that now belongs to someone else.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::ledger::LedgerClient;

/// What the connected identity is allowed to see and do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    Voter,
}

/// A connected identity. Valid until the next login or logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    address: String,
    role: Role,
    epoch: u64,
}

impl Session {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The epoch this session was issued under. Compare via
    /// [`SessionManager::apply`] before publishing fetched data.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Issues and invalidates sessions against the ledger.
pub struct SessionManager<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
    epoch: AtomicU64,
}

impl<'a, L: LedgerClient + ?Sized> SessionManager<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            epoch: AtomicU64::new(0),
        }
    }

    /// Log in with the connected wallet address plus credentials. Matching
    /// admin credentials yield an admin session; anything else yields a
    /// voter session, registering the identity on first login (idempotent).
    pub async fn login(&self, address: &str, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Error::Validation(
                "Username and password are required".into(),
            ));
        }
        if address.trim().is_empty() {
            return Err(Error::Validation("No wallet connected".into()));
        }

        let role = if self.ledger.verify_admin(username, password).await? {
            Role::Admin
        } else {
            // Registration failure does not block login; an unregistered
            // voter can still browse and may be authorized later.
            if let Err(err) = self.ledger.register_identity(address, username).await {
                warn!("Could not register {address}: {err}");
            }
            Role::Voter
        };

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Session opened for {address} as {role:?} (epoch {epoch})");
        Ok(Session {
            address: address.to_string(),
            role,
            epoch,
        })
    }

    /// Tear the current session down. Any still-in-flight fetch issued under
    /// it will be discarded at apply time.
    pub fn logout(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Session closed (epoch {epoch})");
    }

    /// Accept a fetched value only if the session that issued the fetch is
    /// still the current one.
    pub fn apply<T>(&self, session: &Session, value: T) -> Result<T> {
        if session.epoch != self.epoch.load(Ordering::SeqCst) {
            return Err(Error::StaleEpoch);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fake::FakeLedger;

    #[tokio::test]
    async fn admin_credentials_yield_admin_session() {
        let ledger = FakeLedger::new();
        let manager = SessionManager::new(&ledger);
        let session = manager.login("0xa1", "admin", "password").await.unwrap();
        assert_eq!(session.role(), Role::Admin);
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn other_credentials_yield_voter_session_and_register() {
        let ledger = FakeLedger::new();
        let manager = SessionManager::new(&ledger);
        let session = manager.login("0xa1", "ann", "hunter2").await.unwrap();
        assert_eq!(session.role(), Role::Voter);

        let identity = ledger.identity_info("0xa1").await.unwrap();
        assert!(identity.is_registered);
        assert_eq!(identity.username, "ann");

        // Logging in again is a no-op registration, not an error.
        let again = manager.login("0xa1", "ann", "hunter2").await.unwrap();
        assert_eq!(again.role(), Role::Voter);
        assert_eq!(ledger.registered_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_credentials_fail_validation() {
        let ledger = FakeLedger::new();
        let manager = SessionManager::new(&ledger);
        assert!(matches!(
            manager.login("0xa1", "", "pw").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            manager.login("", "ann", "pw").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn stale_epoch_results_are_discarded() {
        let ledger = FakeLedger::new();
        let manager = SessionManager::new(&ledger);
        let first = manager.login("0xa1", "ann", "pw").await.unwrap();

        // A fetch is issued under `first`, then the identity changes.
        let second = manager.login("0xb2", "ben", "pw").await.unwrap();

        let late_result = vec!["President".to_string()];
        assert!(matches!(
            manager.apply(&first, late_result.clone()),
            Err(Error::StaleEpoch)
        ));
        assert_eq!(manager.apply(&second, late_result).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn logout_invalidates_in_flight_fetches() {
        let ledger = FakeLedger::new();
        let manager = SessionManager::new(&ledger);
        let session = manager.login("0xa1", "ann", "pw").await.unwrap();
        manager.logout();
        let err = manager.apply(&session, ()).unwrap_err();
        assert!(matches!(err, Error::StaleEpoch));
        assert!(!err.is_user_visible());
    }
}
