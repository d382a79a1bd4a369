//! Board column enumeration.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column a task occupies on the board.
///
/// [`TaskStatus::Backlog`] is the unranked pseudo-column; every other status
/// is a ranked board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Unplaced tasks awaiting an explicit move onto the board.
    Backlog,
    /// Work that is ready to start.
    Todo,
    /// Work underway.
    InProgress,
    /// Work under verification.
    Testing,
    /// Finished work.
    Done,
}

impl TaskStatus {
    /// Every status in board order, backlog first.
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::Testing,
        Self::Done,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Testing => "testing",
            Self::Done => "done",
        }
    }

    /// Returns `true` for columns whose members are ordered by rank.
    #[must_use]
    pub const fn is_ranked(self) -> bool {
        !matches!(self, Self::Backlog)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "testing" => Ok(Self::Testing),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
