//! Taskboard: ranked multi-column task ordering.
//!
//! This crate maintains a strict, user-visible ordering of work items across
//! a fixed set of board columns. It computes ranks for moves without
//! rewriting the whole board, applies moves optimistically, and reconciles
//! with durable storage by rolling back and re-reading on failure.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`board`]: Task ranking, column projection, and move coordination

pub mod board;
