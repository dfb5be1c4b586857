use serde::Deserialize;

/// Application configuration. The embedding application deserializes this
/// from whatever config source it uses and passes it in; every field has a
/// sensible default so `Config::default()` works out of the box.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    portrait_max_dimension: u32,
    portrait_quality: f32,
    default_max_candidates: u32,
    default_max_voters: u32,
    default_max_registered_users: u32,
}

impl Config {
    /// Largest allowed side of a normalized candidate portrait, in pixels.
    pub fn portrait_max_dimension(&self) -> u32 {
        self.portrait_max_dimension
    }

    /// JPEG quality factor for normalized portraits, in `(0, 1]`.
    pub fn portrait_quality(&self) -> f32 {
        self.portrait_quality
    }

    /// Default capacity limit for candidates.
    pub fn default_max_candidates(&self) -> u32 {
        self.default_max_candidates
    }

    /// Default capacity limit for authorized voters.
    pub fn default_max_voters(&self) -> u32 {
        self.default_max_voters
    }

    /// Default capacity limit for registered users.
    pub fn default_max_registered_users(&self) -> u32 {
        self.default_max_registered_users
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portrait_max_dimension: 400,
            portrait_quality: 0.7,
            default_max_candidates: 10,
            default_max_voters: 100,
            default_max_registered_users: 200,
        }
    }
}
