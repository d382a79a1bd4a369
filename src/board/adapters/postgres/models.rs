//! Diesel row models for board persistence.

use super::schema::board_tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for board tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = board_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BoardTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Column name.
    pub status: String,
    /// Within-column rank.
    pub rank: Option<i64>,
    /// Payload JSON.
    pub payload: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last placement timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for board tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = board_tasks)]
pub struct NewBoardTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Column name.
    pub status: String,
    /// Within-column rank.
    pub rank: Option<i64>,
    /// Payload JSON.
    pub payload: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last placement timestamp.
    pub updated_at: DateTime<Utc>,
}
