//! Ranked task board.
//!
//! Tasks sit in a fixed set of columns and are ordered within each ranked
//! column by an integer rank. Moves are applied optimistically to a local
//! model and committed to durable storage; a failed commit rolls the model
//! back by re-reading the store. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
