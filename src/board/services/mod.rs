//! Application services for board moves and task intake.

mod config;
mod coordinator;
mod error;
mod intake;

pub use config::BoardConfig;
pub use coordinator::{BoardSnapshot, MoveOutcome, MovePhase, MoveRequest, OptimisticCoordinator};
pub use error::{BoardError, BoardResult};
pub use intake::{NewTaskRequest, TaskIntakeError, TaskIntakeResult, TaskIntakeService};
