use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::identity::Identity;

/// Whether and how an identity has voted for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    pub is_authorized: bool,
    pub has_voted: bool,
    /// Set iff `has_voted`.
    pub candidate_id: Option<u64>,
}

/// One line of a voter's personal history: per post, whom they voted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterHistoryEntry {
    pub post: String,
    pub has_voted: bool,
    /// Resolved candidate, when the vote could be matched to one.
    pub candidate: Option<Candidate>,
}

/// Voters grouped under the candidate they voted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVotes {
    pub candidate: Candidate,
    pub voters: Vec<Identity>,
}

/// Admin-side breakdown of who voted for whom, with summary figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteBreakdown {
    pub by_candidate: Vec<CandidateVotes>,
    /// Identities that have voted, across all posts.
    pub total_voted: usize,
    /// Identities currently authorized.
    pub total_authorized: usize,
    /// Rounded percentage, zero when nobody is authorized.
    pub turnout_percent: u32,
}
