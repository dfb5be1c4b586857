//! Per-voter read-models: the connected identity's profile and its voting
//! history across posts.

use futures::future::join_all;
use log::warn;

use crate::error::Result;
use crate::ledger::LedgerClient;
use crate::model::{
    identity::{AdminContact, Identity},
    vote::VoterHistoryEntry,
};

pub struct VoterReadModel<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient + ?Sized> VoterReadModel<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// The connected identity's own record.
    pub async fn profile(&self, address: &str) -> Result<Identity> {
        self.ledger.identity_info(address).await
    }

    /// How voters reach the administrator for complaints and enquiries.
    pub async fn support_contact(&self) -> Result<AdminContact> {
        self.ledger.admin_contact().await
    }

    /// One entry per post: whether this identity voted there, resolved to
    /// the candidate when possible. Per-post status failures degrade to a
    /// not-voted entry instead of aborting the batch.
    pub async fn history(&self, address: &str) -> Result<Vec<VoterHistoryEntry>> {
        let posts = self.ledger.list_posts().await?;
        let candidates = self.ledger.list_candidates().await?;

        let entries = join_all(posts.into_iter().map(|post| {
            let candidates = &candidates;
            async move {
                match self.ledger.vote_status(address, &post).await {
                    Ok(status) => {
                        let candidate = status.candidate_id.and_then(|id| {
                            candidates.iter().find(|candidate| candidate.id == id).cloned()
                        });
                        VoterHistoryEntry {
                            post,
                            has_voted: status.has_voted,
                            candidate,
                        }
                    }
                    Err(err) => {
                        warn!("Vote status unavailable for {post}: {err}");
                        VoterHistoryEntry {
                            post,
                            has_voted: false,
                            candidate: None,
                        }
                    }
                }
            }
        }))
        .await;

        Ok(entries)
    }
}
