//! The vote-eligibility gate. Pure over a freshly fetched snapshot: the
//! answer must be recomputed after every mutation and never inferred from a
//! prior result, or a vote confirmed elsewhere could appear grantable again.

use crate::aggregate::ElectionSnapshot;
use crate::model::{identity::Identity, vote::VoteStatus};

/// May `identity` vote for `post` right now, given this snapshot and the
/// identity's freshly fetched vote status for the post.
pub fn can_vote(
    identity: &Identity,
    post: &str,
    snapshot: &ElectionSnapshot,
    status: &VoteStatus,
) -> bool {
    identity.is_authorized
        && snapshot.window(post).is_some_and(|window| window.is_open())
        && !status.has_voted
}
