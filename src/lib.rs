//! Client-side core for a ledger-backed voting system: read-model
//! aggregation, vote-eligibility gating, and lifecycle-command
//! orchestration between an external append-only ledger and the
//! presentation layer.
//!
//! The ledger is consumed through [`ledger::LedgerClient`]; this crate
//! never implements it. All reads fan out concurrently and join before a
//! view model is published; all writes validate locally first, await ledger
//! confirmation, then re-fetch the affected read-model in full.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod export;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod portrait;
pub mod session;
pub mod voter;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
