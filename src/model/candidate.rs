use serde::{Deserialize, Serialize};

/// A candidate standing for exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Ledger-assigned unique id.
    pub id: u64,
    pub name: String,
    pub party: String,
    /// The post this candidate stands for.
    pub post: String,
    /// Portrait: either an external URL or a normalized `data:` payload.
    pub image_ref: String,
    /// Monotonic while the window is open; zeroed only by an explicit reset.
    pub vote_count: u64,
}
