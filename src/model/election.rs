use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::candidate::Candidate;

/// States in a post's election lifecycle, as coded on the ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ElectionState {
    /// No election in progress; scheduling and configuration allowed.
    NotScheduled = 0,
    /// Voting in progress.
    Open = 1,
    /// Voting finished; results final until reset or deletion.
    Closed = 2,
}

impl ElectionState {
    /// Human-readable status label, as used in the export workbook.
    pub fn label(self) -> &'static str {
        match self {
            Self::NotScheduled => "Not Scheduled",
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

/// A post's scheduling state and time bounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionWindow {
    pub state: ElectionState,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ElectionWindow {
    pub fn is_open(&self) -> bool {
        self.state == ElectionState::Open
    }
}

/// Derived per-post read-model: the window plus ranked candidates and
/// aggregate figures. Never stored; rebuilt from the ledger on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionView {
    pub post: String,
    pub window: ElectionWindow,
    /// Ranked by descending vote count; ties keep registration order.
    pub candidates: Vec<Candidate>,
    pub total_votes: u64,
    /// Voted / authorized, in `[0, 1]`. Zero when nobody is authorized.
    pub turnout: f64,
}

/// One entry per post in an aggregated snapshot. A post whose window fetch
/// failed is carried as `Unavailable` so siblings stay usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostView {
    Available(ElectionView),
    Unavailable { post: String, reason: String },
}

impl PostView {
    pub fn post(&self) -> &str {
        match self {
            Self::Available(view) => &view.post,
            Self::Unavailable { post, .. } => post,
        }
    }

    pub fn as_available(&self) -> Option<&ElectionView> {
        match self {
            Self::Available(view) => Some(view),
            Self::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels_match_export_table() {
        assert_eq!(ElectionState::NotScheduled.label(), "Not Scheduled");
        assert_eq!(ElectionState::Open.label(), "Open");
        assert_eq!(ElectionState::Closed.label(), "Closed");
    }

    #[test]
    fn state_codes_round_trip() {
        for (code, state) in [
            ("0", ElectionState::NotScheduled),
            ("1", ElectionState::Open),
            ("2", ElectionState::Closed),
        ] {
            let parsed: ElectionState = serde_json::from_str(code).unwrap();
            assert_eq!(parsed, state);
            assert_eq!(serde_json::to_string(&state).unwrap(), code);
        }
    }
}
