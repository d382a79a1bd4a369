//! Tunables for the optimistic move coordinator.

use crate::board::domain::{BoardDomainError, RankSpacing};
use std::time::Duration;

/// Configuration for board move coordination.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taskboard::board::services::BoardConfig;
///
/// let config = BoardConfig::default();
/// assert_eq!(config.spacing.step(), 1024);
/// assert_eq!(config.commit_timeout, Duration::from_secs(5));
///
/// let responsive = BoardConfig::responsive();
/// assert_eq!(responsive.commit_timeout, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// Stride used at column extremities and when renumbering.
    pub spacing: RankSpacing,
    /// Longest wait on a commit before the move is treated as failed.
    pub commit_timeout: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            spacing: RankSpacing::default(),
            commit_timeout: Duration::from_secs(5),
        }
    }
}

impl BoardConfig {
    /// Creates a configuration with a short commit timeout.
    ///
    /// Suited to interactive boards where a stuck move should snap back
    /// quickly.
    #[must_use]
    pub fn responsive() -> Self {
        Self {
            commit_timeout: Duration::from_secs(1),
            ..Self::default()
        }
    }

    /// Sets the rank stride.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidRankStep`] when `step` is not
    /// positive.
    pub const fn with_rank_step(mut self, step: i64) -> Result<Self, BoardDomainError> {
        match RankSpacing::new(step) {
            Ok(spacing) => {
                self.spacing = spacing;
                Ok(self)
            }
            Err(err) => Err(err),
        }
    }

    /// Sets the commit timeout.
    #[must_use]
    pub const fn with_commit_timeout(mut self, commit_timeout: Duration) -> Self {
        self.commit_timeout = commit_timeout;
        self
    }
}
