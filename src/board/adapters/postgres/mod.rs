//! `PostgreSQL` adapters for board persistence.

mod models;
mod rank_store;
mod schema;

pub use rank_store::{BoardPgPool, DEFAULT_COMMIT_BUDGET, PostgresRankStore};
