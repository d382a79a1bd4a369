//! In-memory adapters for board ports.

mod rank_store;

pub use rank_store::InMemoryRankStore;
