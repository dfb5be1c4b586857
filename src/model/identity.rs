use serde::{Deserialize, Serialize};

/// A voter or admin identity, keyed by its connected address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub address: String,
    pub username: String,
    pub is_registered: bool,
    pub is_authorized: bool,
}

impl Identity {
    /// Fallback record substituted when a per-identity status fetch fails:
    /// the entry stays listed but is treated as not yet authorized.
    pub fn degraded(address: String, username: String) -> Self {
        Self {
            address,
            username,
            is_registered: true,
            is_authorized: false,
        }
    }
}

/// System-wide capacity limits, editable only while no election is scheduled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLimits {
    pub max_candidates: u32,
    pub max_voters: u32,
    pub max_registered_users: u32,
}

/// Contact details voters use to reach the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminContact {
    pub email: String,
    pub phone: String,
}
