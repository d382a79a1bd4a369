//! Shared world state for board move BDD scenarios.

use std::collections::HashMap;

use crate::helpers::{SwitchableStore, TestCoordinator};
use rstest::fixture;
use taskboard::board::{
    domain::{Task, TaskId},
    services::{BoardResult, MoveOutcome},
};

/// Scenario world for board move behaviour tests.
#[derive(Default)]
pub struct BoardMoveWorld {
    pub seeded: Vec<Task>,
    pub names: HashMap<String, TaskId>,
    pub store: Option<SwitchableStore>,
    pub board: Option<TestCoordinator>,
    pub last_move: Option<BoardResult<MoveOutcome>>,
}

impl BoardMoveWorld {
    /// Resolves a scenario task name to its identifier.
    pub fn id_of(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task name '{name}' in scenario"))
    }

    /// Resolves a scenario identifier back to its name.
    pub fn name_of(&self, id: TaskId) -> Option<&str> {
        self.names
            .iter()
            .find_map(|(name, known)| (*known == id).then_some(name.as_str()))
    }

    /// Returns the loaded coordinator.
    pub fn board(&self) -> Result<&TestCoordinator, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("board has not been loaded in scenario"))
    }

    /// Returns the backing store.
    pub fn store(&self) -> Result<&SwitchableStore, eyre::Report> {
        self.store
            .as_ref()
            .ok_or_else(|| eyre::eyre!("store has not been created in scenario"))
    }

    /// Returns the next deterministic creation timestamp offset.
    pub fn next_created(&self) -> i64 {
        i64::try_from(self.seeded.len()).unwrap_or(i64::MAX)
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardMoveWorld {
    BoardMoveWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
