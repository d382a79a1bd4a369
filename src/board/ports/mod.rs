//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod rank_store;

#[cfg(test)]
pub use rank_store::MockRankStore;
pub use rank_store::{RankStore, RankStoreError, RankStoreResult};
