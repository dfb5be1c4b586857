//! The interface to the external append-only ledger. The ledger itself is
//! not implemented here; consumers supply an implementation (typically a
//! wallet-backed RPC client) and this crate only ever talks through the
//! trait. Writes resolve once the ledger has confirmed the command, so a
//! returned `Ok` means durable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    candidate::Candidate,
    election::ElectionWindow,
    identity::{AdminContact, CapacityLimits, Identity},
    vote::VoteStatus,
};

/// A bare enumeration entry from the registered-user list. Full status comes
/// from a follow-up `identity_info` call per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub address: String,
    pub username: String,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    // Reads.
    async fn list_posts(&self) -> Result<Vec<String>>;
    async fn election_info(&self, post: &str) -> Result<ElectionWindow>;
    async fn list_candidates(&self) -> Result<Vec<Candidate>>;
    /// Addresses of all currently authorized voters.
    async fn authorized_voters(&self) -> Result<Vec<String>>;
    async fn registered_users(&self) -> Result<Vec<RegisteredUser>>;
    async fn identity_info(&self, address: &str) -> Result<Identity>;
    async fn vote_status(&self, address: &str, post: &str) -> Result<VoteStatus>;
    async fn verify_admin(&self, username: &str, password: &str) -> Result<bool>;
    async fn capacity_limits(&self) -> Result<CapacityLimits>;
    async fn admin_contact(&self) -> Result<AdminContact>;
    async fn admin_username(&self) -> Result<String>;

    // Writes. All two-phase at the ledger: submitted, then awaited until
    // confirmation. A rejection surfaces as `Error::Rejected` with the
    // ledger's reason.
    async fn schedule_election(
        &self,
        post: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<()>;
    async fn start_election(&self, post: &str) -> Result<()>;
    async fn end_election(&self, post: &str) -> Result<()>;
    async fn reset_election(&self, post: &str) -> Result<()>;
    async fn delete_election(&self, post: &str) -> Result<()>;
    async fn add_candidate(&self, name: &str, party: &str, image_ref: &str, post: &str)
        -> Result<()>;
    async fn delete_candidate(&self, id: u64) -> Result<()>;
    async fn register_identity(&self, address: &str, username: &str) -> Result<()>;
    async fn authorize_voter(&self, address: &str) -> Result<()>;
    async fn delete_identity(&self, address: &str) -> Result<()>;
    async fn cast_vote(&self, address: &str, candidate_id: u64) -> Result<()>;
    async fn update_admin_credentials(&self, username: &str, password: &str) -> Result<()>;
    async fn set_capacity_limits(&self, limits: CapacityLimits) -> Result<()>;
    async fn set_admin_contact(&self, contact: &AdminContact) -> Result<()>;
}
