//! Typed views of ledger state. Everything here is plain data; all network
//! access lives behind [`crate::ledger::LedgerClient`].

pub mod candidate;
pub mod election;
pub mod identity;
pub mod vote;
