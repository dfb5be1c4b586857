//! Lifecycle-command orchestration. Every command validates its
//! preconditions locally against the latest confirmed snapshot before any
//! remote write; a validation failure never reaches the ledger. On ledger
//! confirmation the affected read-model is re-fetched in full and returned,
//! so callers always publish ledger truth, never an optimistic patch.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::info;

use crate::aggregate::{ElectionAggregator, ElectionSnapshot};
use crate::eligibility::can_vote;
use crate::error::{Error, Result};
use crate::ledger::LedgerClient;
use crate::model::{
    election::ElectionState,
    identity::{AdminContact, CapacityLimits, Identity},
};

/// Validates and issues election lifecycle and management commands.
///
/// One commander per triggering control: while a command awaits
/// confirmation, a second submission through the same commander fails fast
/// instead of queueing, mirroring a disabled button.
pub struct LifecycleCommander<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag when the command resolves either way.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, L: LedgerClient + ?Sized> LifecycleCommander<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self {
            ledger,
            in_flight: AtomicBool::new(false),
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if self.in_flight.swap(true, Ordering::Acquire) {
            return Err(Error::Validation(
                "a command is already awaiting confirmation".into(),
            ));
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    async fn refresh(&self) -> Result<ElectionSnapshot> {
        ElectionAggregator::new(self.ledger).snapshot().await
    }

    fn state_of(snapshot: &ElectionSnapshot, post: &str) -> Option<ElectionState> {
        snapshot.window(post).map(|window| window.state)
    }

    /// Schedule (or re-schedule) an election for a post. Creates the post on
    /// first schedule.
    pub async fn schedule(
        &self,
        snapshot: &ElectionSnapshot,
        post: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ElectionSnapshot> {
        if post.trim().is_empty() {
            return Err(Error::Validation("Post name must not be empty".into()));
        }
        if start >= end {
            return Err(Error::Validation(
                "End time must be after start time".into(),
            ));
        }
        if Self::state_of(snapshot, post) == Some(ElectionState::Open) {
            return Err(Error::Validation(format!(
                "Election for {post} is already open"
            )));
        }
        let _guard = self.begin()?;
        self.ledger.schedule_election(post, start, end).await?;
        info!("Scheduled election for {post}");
        self.refresh().await
    }

    pub async fn start(&self, snapshot: &ElectionSnapshot, post: &str) -> Result<ElectionSnapshot> {
        match Self::state_of(snapshot, post) {
            Some(ElectionState::NotScheduled) => {}
            Some(state) => {
                return Err(Error::Validation(format!(
                    "Cannot start {post} from state {}",
                    state.label()
                )))
            }
            None => return Err(Error::Validation(format!("Unknown post {post}"))),
        }
        let _guard = self.begin()?;
        self.ledger.start_election(post).await?;
        info!("Started election for {post}");
        self.refresh().await
    }

    pub async fn end(&self, snapshot: &ElectionSnapshot, post: &str) -> Result<ElectionSnapshot> {
        if Self::state_of(snapshot, post) != Some(ElectionState::Open) {
            return Err(Error::Validation(format!("Election for {post} is not open")));
        }
        let _guard = self.begin()?;
        self.ledger.end_election(post).await?;
        info!("Ended election for {post}");
        self.refresh().await
    }

    /// Clear votes for a post. The post and its candidates remain.
    pub async fn reset(&self, snapshot: &ElectionSnapshot, post: &str) -> Result<ElectionSnapshot> {
        if Self::state_of(snapshot, post) != Some(ElectionState::Closed) {
            return Err(Error::Validation(format!(
                "Election for {post} must be closed before it can be reset"
            )));
        }
        let _guard = self.begin()?;
        self.ledger.reset_election(post).await?;
        info!("Reset election for {post}");
        self.refresh().await
    }

    /// Remove a post, its candidates, and all election metadata. Permitted
    /// from any state; destructive.
    pub async fn delete(&self, post: &str) -> Result<ElectionSnapshot> {
        let _guard = self.begin()?;
        self.ledger.delete_election(post).await?;
        info!("Deleted election for {post}");
        self.refresh().await
    }

    pub async fn add_candidate(
        &self,
        name: &str,
        party: &str,
        image_ref: &str,
        post: &str,
    ) -> Result<ElectionSnapshot> {
        if post.trim().is_empty() {
            return Err(Error::Validation("Target post must not be empty".into()));
        }
        if name.trim().is_empty() || party.trim().is_empty() {
            return Err(Error::Validation(
                "Candidate name and party are required".into(),
            ));
        }
        let _guard = self.begin()?;
        self.ledger.add_candidate(name, party, image_ref, post).await?;
        info!("Added candidate {name} to {post}");
        self.refresh().await
    }

    pub async fn delete_candidate(&self, id: u64) -> Result<ElectionSnapshot> {
        let _guard = self.begin()?;
        self.ledger.delete_candidate(id).await?;
        info!("Deleted candidate {id}");
        self.refresh().await
    }

    /// Grant an identity the right to vote.
    pub async fn authorize_voter(&self, address: &str) -> Result<Vec<Identity>> {
        if address.trim().is_empty() {
            return Err(Error::Validation("Voter address must not be empty".into()));
        }
        let _guard = self.begin()?;
        self.ledger.authorize_voter(address).await?;
        info!("Authorized voter {address}");
        self.refresh_identities().await
    }

    pub async fn delete_identity(&self, address: &str) -> Result<Vec<Identity>> {
        let _guard = self.begin()?;
        self.ledger.delete_identity(address).await?;
        info!("Deleted identity {address}");
        self.refresh_identities().await
    }

    /// Cast a vote for `candidate_id` as `address`. Eligibility is
    /// recomputed from a fresh snapshot right before submission; a stale
    /// prior answer is never trusted.
    pub async fn cast_vote(&self, address: &str, candidate_id: u64) -> Result<ElectionSnapshot> {
        let snapshot = self.refresh().await?;
        let post = snapshot
            .available()
            .flat_map(|view| view.candidates.iter())
            .find(|candidate| candidate.id == candidate_id)
            .map(|candidate| candidate.post.clone())
            .ok_or_else(|| Error::Validation(format!("Unknown candidate {candidate_id}")))?;
        let identity = self.ledger.identity_info(address).await?;
        let status = self.ledger.vote_status(address, &post).await?;
        if !can_vote(&identity, &post, &snapshot, &status) {
            return Err(Error::Validation(format!(
                "{address} is not currently eligible to vote for {post}"
            )));
        }
        let _guard = self.begin()?;
        self.ledger.cast_vote(address, candidate_id).await?;
        info!("Vote confirmed for post {post}");
        self.refresh().await
    }

    pub async fn update_admin_credentials(&self, username: &str, password: &str) -> Result<()> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(Error::Validation(
                "Both new username and password are required".into(),
            ));
        }
        let _guard = self.begin()?;
        self.ledger.update_admin_credentials(username, password).await?;
        info!("Admin credentials updated");
        Ok(())
    }

    /// Capacity limits may only change while no election is scheduled.
    pub async fn set_capacity_limits(
        &self,
        snapshot: &ElectionSnapshot,
        limits: CapacityLimits,
    ) -> Result<()> {
        if limits.max_candidates == 0 || limits.max_voters == 0 || limits.max_registered_users == 0
        {
            return Err(Error::Validation("Limits must be at least 1".into()));
        }
        let scheduled = snapshot
            .available()
            .any(|view| view.window.state != ElectionState::NotScheduled);
        if scheduled {
            return Err(Error::Validation(
                "Limits can only be changed while no election is scheduled".into(),
            ));
        }
        let _guard = self.begin()?;
        self.ledger.set_capacity_limits(limits).await?;
        info!("Capacity limits updated");
        Ok(())
    }

    pub async fn set_admin_contact(&self, contact: &AdminContact) -> Result<()> {
        if contact.email.trim().is_empty() || contact.phone.trim().is_empty() {
            return Err(Error::Validation(
                "Admin email and phone are required".into(),
            ));
        }
        let _guard = self.begin()?;
        self.ledger.set_admin_contact(contact).await?;
        info!("Admin contact updated");
        Ok(())
    }

    async fn refresh_identities(&self) -> Result<Vec<Identity>> {
        let users = self.ledger.registered_users().await?;
        let identities = join_all(users.into_iter().map(|user| async move {
            match self.ledger.identity_info(&user.address).await {
                Ok(identity) => identity,
                Err(_) => Identity::degraded(user.address, user.username),
            }
        }))
        .await;
        Ok(identities)
    }
}
