//! Diesel schema for board persistence.

diesel::table! {
    /// Board tasks with their column and within-column rank.
    board_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Column the task occupies.
        #[max_length = 32]
        status -> Varchar,
        /// Within-column rank; null in the backlog.
        rank -> Nullable<Int8>,
        /// Opaque descriptive payload.
        payload -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last placement timestamp.
        updated_at -> Timestamptz,
    }
}
