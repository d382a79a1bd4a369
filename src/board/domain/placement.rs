//! Rank computation for moves between and within board columns.
//!
//! New ranks are taken from the gap between the destination neighbours
//! (arithmetic midpoint, rounded toward the preceding neighbour). Head and
//! tail insertions step away from the extreme neighbour by a fixed stride.
//! Only when no integer gap remains is the whole destination column
//! renumbered at evenly spaced multiples of the stride.

use super::{BacklogGate, BoardDomainError, PlacementError, Rank, Task, TaskId, TaskStatus};
use crate::board::domain::column::ranked_order;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default distance between ranks at column extremities and after a
/// renumber.
pub const DEFAULT_RANK_STEP: i64 = 1024;

/// Stride used when a rank cannot be taken from a neighbour gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankSpacing {
    step: i64,
}

impl RankSpacing {
    /// Creates a spacing with the given positive stride.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidRankStep`] when `step` is not
    /// positive.
    pub const fn new(step: i64) -> Result<Self, BoardDomainError> {
        if step <= 0 {
            return Err(BoardDomainError::InvalidRankStep(step));
        }
        Ok(Self { step })
    }

    /// Returns the stride.
    #[must_use]
    pub const fn step(self) -> i64 {
        self.step
    }

    /// Rank given to the first task placed in an empty column.
    #[must_use]
    pub const fn baseline(self) -> Rank {
        Rank::new(self.step)
    }
}

impl Default for RankSpacing {
    fn default() -> Self {
        Self {
            step: DEFAULT_RANK_STEP,
        }
    }
}

/// Durable placement of one task: the `{id, status, rank}` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Task being placed.
    pub task_id: TaskId,
    /// Destination column.
    pub status: TaskStatus,
    /// Destination rank; `None` in the backlog.
    pub rank: Option<Rank>,
}

impl Placement {
    /// Captures the current placement of a task.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            status: task.status(),
            rank: task.rank(),
        }
    }
}

/// A sibling whose rank changes as part of a renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftedRank {
    /// Sibling task.
    pub task_id: TaskId,
    /// New rank for the sibling.
    pub rank: Rank,
}

/// Outcome of resolving a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResolution {
    updated: Placement,
    shifted: Vec<ShiftedRank>,
    no_op: bool,
}

impl MoveResolution {
    /// Creates a resolution that places only the moved task.
    #[must_use]
    pub const fn single(updated: Placement) -> Self {
        Self {
            updated,
            shifted: Vec::new(),
            no_op: false,
        }
    }

    /// Creates a resolution that leaves the task where it is.
    #[must_use]
    pub const fn unchanged(task: &Task) -> Self {
        Self {
            updated: Placement::of(task),
            shifted: Vec::new(),
            no_op: true,
        }
    }

    /// Returns the moved task's new placement.
    #[must_use]
    pub const fn updated(&self) -> &Placement {
        &self.updated
    }

    /// Returns siblings re-ranked by a renumber; empty otherwise.
    #[must_use]
    pub fn shifted(&self) -> &[ShiftedRank] {
        &self.shifted
    }

    /// Returns `true` when the move leaves the board unchanged.
    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        self.no_op
    }

    /// Returns the commit batch: the moved task first, then shifted siblings.
    #[must_use]
    pub fn placements(&self) -> Vec<Placement> {
        let siblings = self.shifted.iter().map(|shifted| Placement {
            task_id: shifted.task_id,
            status: self.updated.status,
            rank: Some(shifted.rank),
        });
        std::iter::once(self.updated).chain(siblings).collect()
    }
}

/// Computes the placement that puts `task` at `target_index` of
/// `target_status`.
///
/// `column` is the ordered destination column; the moved task is ignored
/// if present. `target_index` counts positions in that column without the
/// moved task. Backlog targets are routed through [`BacklogGate`] and never
/// receive a rank.
///
/// # Errors
///
/// Returns [`PlacementError::InvalidTargetIndex`] when `target_index`
/// exceeds the column length and [`PlacementError::RankSpaceExhausted`]
/// when even a renumber overflows the rank range.
pub fn resolve_move(
    task: &Task,
    target_status: TaskStatus,
    target_index: usize,
    column: &[Task],
    spacing: RankSpacing,
) -> Result<MoveResolution, PlacementError> {
    let siblings: Vec<&Task> = column
        .iter()
        .filter(|sibling| sibling.id() != task.id())
        .collect();
    if target_index > siblings.len() {
        return Err(PlacementError::InvalidTargetIndex {
            status: target_status,
            index: target_index,
            len: siblings.len(),
        });
    }

    if !target_status.is_ranked() {
        return Ok(BacklogGate::demote(task));
    }

    if is_current_position(task, target_status, target_index, &siblings) {
        return Ok(MoveResolution::unchanged(task));
    }

    let before = target_index
        .checked_sub(1)
        .and_then(|index| siblings.get(index).copied());
    let after = siblings.get(target_index).copied();

    if let Some(rank) = gap_rank(before, after, spacing) {
        return Ok(MoveResolution::single(Placement {
            task_id: task.id(),
            status: target_status,
            rank: Some(rank),
        }));
    }

    renumber(task, target_status, target_index, &siblings, spacing)
}

fn is_current_position(
    task: &Task,
    target_status: TaskStatus,
    target_index: usize,
    siblings: &[&Task],
) -> bool {
    if task.status() != target_status || task.rank().is_none() {
        return false;
    }
    let current_index = siblings
        .iter()
        .filter(|sibling| ranked_order(sibling, task) == Ordering::Less)
        .count();
    current_index == target_index
}

fn gap_rank(before: Option<&Task>, after: Option<&Task>, spacing: RankSpacing) -> Option<Rank> {
    let step = spacing.step();
    match (before, after) {
        (None, None) => Some(spacing.baseline()),
        (Some(lower), None) => lower
            .rank()
            .and_then(|rank| rank.value().checked_add(step))
            .map(Rank::new),
        (None, Some(upper)) => upper
            .rank()
            .and_then(|rank| rank.value().checked_sub(step))
            .map(Rank::new),
        (Some(lower), Some(upper)) => lower
            .rank()
            .zip(upper.rank())
            .and_then(|(low, high)| midpoint(low, high)),
    }
}

/// Returns an unused integer strictly between `low` and `high`, if any.
fn midpoint(low: Rank, high: Rank) -> Option<Rank> {
    let gap = high.value().checked_sub(low.value())?;
    if gap < 2 {
        return None;
    }
    low.value().checked_add(gap.div_euclid(2)).map(Rank::new)
}

fn renumber(
    task: &Task,
    target_status: TaskStatus,
    target_index: usize,
    siblings: &[&Task],
    spacing: RankSpacing,
) -> Result<MoveResolution, PlacementError> {
    let mut order: Vec<&Task> = siblings.to_vec();
    order.insert(target_index, task);

    let mut moved = None;
    let mut shifted = Vec::new();
    for (position, member) in order.iter().enumerate() {
        let rank = spaced_rank(position, spacing)
            .ok_or(PlacementError::RankSpaceExhausted(target_status))?;
        if member.id() == task.id() {
            moved = Some(Placement {
                task_id: task.id(),
                status: target_status,
                rank: Some(rank),
            });
        } else if member.rank() != Some(rank) {
            shifted.push(ShiftedRank {
                task_id: member.id(),
                rank,
            });
        }
    }

    let updated = moved.ok_or(PlacementError::RankSpaceExhausted(target_status))?;
    Ok(MoveResolution {
        updated,
        shifted,
        no_op: false,
    })
}

fn spaced_rank(position: usize, spacing: RankSpacing) -> Option<Rank> {
    let slot = i64::try_from(position).ok()?.checked_add(1)?;
    slot.checked_mul(spacing.step()).map(Rank::new)
}
