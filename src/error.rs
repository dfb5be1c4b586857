use thiserror::Error;

/// Failure taxonomy for the client layer.
///
/// `Validation` never reaches the ledger; `Rejected` carries the ledger's
/// reason verbatim; `Fetch` is isolated to the item that failed; `StaleEpoch`
/// marks a result from a superseded session and is never user-visible.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Command rejected by ledger: {0}")]
    Rejected(String),
    #[error("Fetch failed: {0}")]
    Fetch(String),
    #[error("Result discarded: session epoch has moved on")]
    StaleEpoch,
    #[error("Invalid image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Whether this failure should surface to the user at all.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::StaleEpoch)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
