//! Domain model for the ranked task board.
//!
//! The board domain covers task identity, the fixed column enumeration,
//! the per-column projection, and rank resolution for moves. Everything
//! here is synchronous and free of infrastructure concerns.

mod board;
mod column;
mod error;
mod gate;
mod ids;
mod placement;
mod status;
mod task;

pub use board::BoardModel;
pub use column::ColumnView;
pub use error::{BoardDomainError, BoardIntegrityError, ParseTaskStatusError, PlacementError};
pub use gate::{BacklogGate, GateRoute};
pub use ids::{Rank, TaskId};
pub use placement::{
    DEFAULT_RANK_STEP, MoveResolution, Placement, RankSpacing, ShiftedRank, resolve_move,
};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskPayload};
