//! Read-model aggregation: fans reads out across the ledger and joins them
//! into consistent per-post view models. Nothing here mutates anything; a
//! refresh is always a full re-fetch because the ledger is the sole source
//! of truth.

use futures::future::join_all;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ledger::LedgerClient;
use crate::model::{
    candidate::Candidate,
    election::{ElectionView, ElectionWindow, PostView},
    identity::Identity,
    vote::{CandidateVotes, VoteBreakdown},
};

/// A consistent point-in-time aggregation, one entry per post in ledger
/// order. Posts whose fetch failed are carried as unavailable markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionSnapshot {
    pub posts: Vec<PostView>,
}

impl ElectionSnapshot {
    /// Iterate the posts that aggregated successfully.
    pub fn available(&self) -> impl Iterator<Item = &ElectionView> {
        self.posts.iter().filter_map(PostView::as_available)
    }

    /// The window for a post, if that post aggregated successfully.
    pub fn window(&self, post: &str) -> Option<&ElectionWindow> {
        self.available()
            .find(|view| view.post == post)
            .map(|view| &view.window)
    }
}

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub candidate_count: usize,
    pub authorized_count: usize,
    pub registered_count: usize,
    pub post_count: usize,
}

/// Produces [`ElectionSnapshot`]s and the other admin-side read-models.
pub struct ElectionAggregator<'a, L: LedgerClient + ?Sized> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient + ?Sized> ElectionAggregator<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// Aggregate every post into a view model. Post windows are fetched
    /// concurrently; a failing post degrades to `PostView::Unavailable`
    /// without aborting its siblings.
    pub async fn snapshot(&self) -> Result<ElectionSnapshot> {
        let posts = self.ledger.list_posts().await?;
        let candidates = self.ledger.list_candidates().await?;
        let authorized = self.ledger.authorized_voters().await?;

        let views = join_all(
            posts
                .iter()
                .map(|post| self.post_view(post, &candidates, &authorized)),
        )
        .await;

        Ok(ElectionSnapshot { posts: views })
    }

    async fn post_view(
        &self,
        post: &str,
        all_candidates: &[Candidate],
        authorized: &[String],
    ) -> PostView {
        let window = match self.ledger.election_info(post).await {
            Ok(window) => window,
            Err(err) => {
                warn!("Post {post} excluded from snapshot: {err}");
                return PostView::Unavailable {
                    post: post.to_string(),
                    reason: err.to_string(),
                };
            }
        };

        let mut candidates: Vec<Candidate> = all_candidates
            .iter()
            .filter(|candidate| candidate.post == post)
            .cloned()
            .collect();
        // Stable sort: candidates tied on votes keep registration order.
        candidates.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
        let total_votes = candidates.iter().map(|candidate| candidate.vote_count).sum();

        let turnout = self.turnout(post, authorized).await;

        PostView::Available(ElectionView {
            post: post.to_string(),
            window,
            candidates,
            total_votes,
            turnout,
        })
    }

    /// Voted / authorized for one post, from concurrent per-voter status
    /// fetches. A voter whose status cannot be fetched counts as not having
    /// voted rather than failing the post.
    async fn turnout(&self, post: &str, authorized: &[String]) -> f64 {
        if authorized.is_empty() {
            return 0.0;
        }
        let statuses = join_all(
            authorized
                .iter()
                .map(|address| self.ledger.vote_status(address, post)),
        )
        .await;
        let voted = statuses
            .iter()
            .filter(|status| match status {
                Ok(status) => status.has_voted,
                Err(err) => {
                    warn!("Vote status unavailable for one voter on {post}: {err}");
                    false
                }
            })
            .count();
        voted as f64 / authorized.len() as f64
    }

    /// Headline counts for the admin dashboard.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let (candidates, authorized, registered, posts) = futures::join!(
            self.ledger.list_candidates(),
            self.ledger.authorized_voters(),
            self.ledger.registered_users(),
            self.ledger.list_posts(),
        );
        Ok(AdminStats {
            candidate_count: candidates?.len(),
            authorized_count: authorized?.len(),
            registered_count: registered?.len(),
            post_count: posts?.len(),
        })
    }

    /// Group voters under the candidate they voted for, with summary
    /// turnout figures. Per-voter fetch failures degrade that voter only.
    pub async fn vote_breakdown(&self) -> Result<VoteBreakdown> {
        let candidates = self.ledger.list_candidates().await?;
        let users = self.ledger.registered_users().await?;

        let identities = join_all(users.iter().map(|user| async move {
            match self.ledger.identity_info(&user.address).await {
                Ok(identity) => identity,
                Err(err) => {
                    warn!("Identity info unavailable for {}: {err}", user.address);
                    Identity::degraded(user.address.clone(), user.username.clone())
                }
            }
        }))
        .await;

        // For each voter, which candidate (if any) they backed per post.
        let mut by_candidate: Vec<CandidateVotes> = candidates
            .iter()
            .map(|candidate| CandidateVotes {
                candidate: candidate.clone(),
                voters: Vec::new(),
            })
            .collect();
        let mut voted_addresses = std::collections::HashSet::new();

        let posts: Vec<String> = {
            let mut posts: Vec<String> =
                candidates.iter().map(|candidate| candidate.post.clone()).collect();
            posts.sort();
            posts.dedup();
            posts
        };

        // Every (identity, post) status behind a single join barrier.
        let statuses = join_all(identities.iter().flat_map(|identity| {
            posts.iter().map(move |post| async move {
                (identity, self.ledger.vote_status(&identity.address, post).await)
            })
        }))
        .await;

        for (identity, status) in statuses {
            if let Some(candidate_id) = status.ok().and_then(|status| status.candidate_id) {
                voted_addresses.insert(identity.address.clone());
                if let Some(entry) = by_candidate
                    .iter_mut()
                    .find(|entry| entry.candidate.id == candidate_id)
                {
                    entry.voters.push(identity.clone());
                }
            }
        }

        let total_authorized = identities.iter().filter(|id| id.is_authorized).count();
        let total_voted = voted_addresses.len();
        let turnout_percent = if total_authorized > 0 {
            ((total_voted as f64 / total_authorized as f64) * 100.0).round() as u32
        } else {
            0
        };

        Ok(VoteBreakdown {
            by_candidate,
            total_voted,
            total_authorized,
            turnout_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::Error;
    use crate::ledger::{fake::FakeLedger, MockLedgerClient};
    use crate::model::election::ElectionState;

    async fn seeded_ledger() -> FakeLedger {
        let ledger = FakeLedger::new();
        let now = Utc::now();
        ledger
            .schedule_election("President", now, now + Duration::hours(2))
            .await
            .unwrap();
        ledger
            .add_candidate("Alice", "Unity", "https://img/a", "President")
            .await
            .unwrap();
        ledger
            .add_candidate("Bob", "Progress", "https://img/b", "President")
            .await
            .unwrap();
        ledger
            .add_candidate("Carol", "Reform", "https://img/c", "President")
            .await
            .unwrap();
        for (address, name) in [("0xa1", "ann"), ("0xb2", "ben"), ("0xc3", "cam")] {
            ledger.register_identity(address, name).await.unwrap();
            ledger.authorize_voter(address).await.unwrap();
        }
        ledger.start_election("President").await.unwrap();
        ledger
    }

    #[tokio::test]
    async fn total_votes_is_sum_of_candidate_counts() {
        let ledger = seeded_ledger().await;
        ledger.cast_vote("0xa1", 1).await.unwrap();
        ledger.cast_vote("0xb2", 2).await.unwrap();
        ledger.cast_vote("0xc3", 1).await.unwrap();

        let snapshot = ElectionAggregator::new(&ledger).snapshot().await.unwrap();
        let view = snapshot.available().next().unwrap();
        let sum: u64 = view.candidates.iter().map(|c| c.vote_count).sum();
        assert_eq!(view.total_votes, sum);
        assert_eq!(view.total_votes, 3);
    }

    #[tokio::test]
    async fn ranking_is_stable_on_ties() {
        let ledger = seeded_ledger().await;
        // Bob overtakes; Alice and Carol stay tied at zero.
        ledger.cast_vote("0xa1", 2).await.unwrap();

        let snapshot = ElectionAggregator::new(&ledger).snapshot().await.unwrap();
        let view = snapshot.available().next().unwrap();
        let names: Vec<&str> = view.candidates.iter().map(|c| c.name.as_str()).collect();
        // Tied candidates keep registration order: Alice before Carol.
        assert_eq!(names, vec!["Bob", "Alice", "Carol"]);
    }

    #[tokio::test]
    async fn turnout_counts_voted_over_authorized() {
        let ledger = seeded_ledger().await;
        ledger.cast_vote("0xa1", 1).await.unwrap();
        ledger.cast_vote("0xb2", 3).await.unwrap();

        let snapshot = ElectionAggregator::new(&ledger).snapshot().await.unwrap();
        let view = snapshot.available().next().unwrap();
        assert!((view.turnout - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn turnout_is_zero_without_authorized_voters() {
        let ledger = FakeLedger::new();
        let now = Utc::now();
        ledger
            .schedule_election("Mayor", now, now + Duration::hours(1))
            .await
            .unwrap();

        let snapshot = ElectionAggregator::new(&ledger).snapshot().await.unwrap();
        let view = snapshot.available().next().unwrap();
        assert_eq!(view.turnout, 0.0);
    }

    #[tokio::test]
    async fn failing_post_degrades_without_aborting_siblings() {
        // This path logs the degradation, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["trustchain_client"], None, None);

        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_list_posts()
            .returning(|| Ok(vec!["President".into(), "Mayor".into()]));
        ledger.expect_list_candidates().returning(|| Ok(Vec::new()));
        ledger.expect_authorized_voters().returning(|| Ok(Vec::new()));
        ledger.expect_election_info().returning(|post| {
            if post == "Mayor" {
                Err(Error::Fetch("connection dropped".into()))
            } else {
                Ok(ElectionWindow {
                    state: ElectionState::Open,
                    start_time: Utc::now(),
                    end_time: Utc::now() + Duration::hours(1),
                })
            }
        });

        let snapshot = ElectionAggregator::new(&ledger).snapshot().await.unwrap();
        assert_eq!(snapshot.posts.len(), 2);
        assert!(matches!(snapshot.posts[0], PostView::Available(_)));
        assert!(matches!(
            snapshot.posts[1],
            PostView::Unavailable { ref post, .. } if post == "Mayor"
        ));
        // The degraded post is excluded from aggregate accessors.
        assert!(snapshot.window("Mayor").is_none());
        assert!(snapshot.window("President").is_some());
    }

    #[tokio::test]
    async fn admin_stats_counts_collections() {
        let ledger = seeded_ledger().await;
        let stats = ElectionAggregator::new(&ledger).admin_stats().await.unwrap();
        assert_eq!(stats.candidate_count, 3);
        assert_eq!(stats.authorized_count, 3);
        assert_eq!(stats.registered_count, 3);
        assert_eq!(stats.post_count, 1);
    }

    #[tokio::test]
    async fn breakdown_groups_voters_by_candidate() {
        let ledger = seeded_ledger().await;
        ledger.cast_vote("0xa1", 1).await.unwrap();
        ledger.cast_vote("0xb2", 1).await.unwrap();
        ledger.cast_vote("0xc3", 2).await.unwrap();

        let breakdown = ElectionAggregator::new(&ledger)
            .vote_breakdown()
            .await
            .unwrap();
        let alice = breakdown
            .by_candidate
            .iter()
            .find(|entry| entry.candidate.id == 1)
            .unwrap();
        assert_eq!(alice.voters.len(), 2);
        assert_eq!(breakdown.total_voted, 3);
        assert_eq!(breakdown.total_authorized, 3);
        assert_eq!(breakdown.turnout_percent, 100);
    }

    #[tokio::test]
    async fn breakdown_attributes_votes_across_posts() {
        let ledger = seeded_ledger().await;
        let now = Utc::now();
        ledger
            .schedule_election("Mayor", now, now + Duration::hours(2))
            .await
            .unwrap();
        ledger
            .add_candidate("Dave", "Reform", "", "Mayor")
            .await
            .unwrap();
        ledger.start_election("Mayor").await.unwrap();

        // One voter votes on both posts; another on one.
        ledger.cast_vote("0xa1", 1).await.unwrap();
        ledger.cast_vote("0xa1", 4).await.unwrap();
        ledger.cast_vote("0xb2", 4).await.unwrap();

        let breakdown = ElectionAggregator::new(&ledger)
            .vote_breakdown()
            .await
            .unwrap();
        let alice = breakdown
            .by_candidate
            .iter()
            .find(|entry| entry.candidate.id == 1)
            .unwrap();
        assert_eq!(alice.voters.len(), 1);
        let dave = breakdown
            .by_candidate
            .iter()
            .find(|entry| entry.candidate.id == 4)
            .unwrap();
        assert_eq!(dave.voters.len(), 2);
        // Voters counted once however many posts they voted on.
        assert_eq!(breakdown.total_voted, 2);
    }
}
