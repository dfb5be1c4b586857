//! Directory read-models: identity enumeration merged with per-identity
//! status. Per-entry failures substitute a degraded fallback record rather
//! than dropping the entry or aborting the batch.

use futures::future::join_all;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::LedgerClient;
use crate::model::identity::Identity;

/// A merged directory of identities, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub entries: Vec<Identity>,
}

impl Directory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn authorized_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_authorized).count()
    }

    /// Case-insensitive substring filter over username and address, applied
    /// after the merge.
    pub fn filter(&self, term: &str) -> Vec<&Identity> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry.username.to_lowercase().contains(&term)
                    || entry.address.to_lowercase().contains(&term)
            })
            .collect()
    }
}

/// All registered users with their current status.
pub struct RegisteredUserDirectory<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient + ?Sized> RegisteredUserDirectory<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn fetch(&self) -> Result<Directory> {
        let users = self.ledger.registered_users().await?;
        let entries = join_all(users.into_iter().map(|user| async move {
            match self.ledger.identity_info(&user.address).await {
                Ok(identity) => identity,
                Err(err) => {
                    warn!("Status unavailable for {}: {err}", user.address);
                    Identity::degraded(user.address, user.username)
                }
            }
        }))
        .await;
        Ok(Directory { entries })
    }
}

/// The authorized voter roll with per-identity details.
pub struct VoterDirectory<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient + ?Sized> VoterDirectory<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    pub async fn fetch(&self) -> Result<Directory> {
        let addresses = self.ledger.authorized_voters().await?;
        let entries = join_all(addresses.into_iter().map(|address| async move {
            match self.ledger.identity_info(&address).await {
                Ok(identity) => identity,
                Err(err) => {
                    warn!("Status unavailable for {address}: {err}");
                    Identity::degraded(address, String::new())
                }
            }
        }))
        .await;
        Ok(Directory { entries })
    }
}
