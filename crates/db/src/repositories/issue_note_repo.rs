//! Repository for the `issue_notes` table.
//!
//! Notes form the append-only progress trail of an issue. A `NULL`
//! author marks a system-generated note.

use sqlx::PgPool;

use communityfix_core::types::DbId;

use crate::models::issue::IssueNote;

/// Column list for `issue_notes` queries.
const COLUMNS: &str = "id, issue_id, author_id, note, created_at";

/// Provides append and read operations for issue notes.
pub struct IssueNoteRepo;

impl IssueNoteRepo {
    /// Append a note to an issue. `author_id` is `None` for
    /// system-generated notes.
    pub async fn add(
        pool: &PgPool,
        issue_id: DbId,
        author_id: Option<DbId>,
        note: &str,
    ) -> Result<IssueNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO issue_notes (issue_id, author_id, note)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueNote>(&query)
            .bind(issue_id)
            .bind(author_id)
            .bind(note)
            .fetch_one(pool)
            .await
    }

    /// List an issue's notes in insertion order.
    pub async fn list_for_issue(
        pool: &PgPool,
        issue_id: DbId,
    ) -> Result<Vec<IssueNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM issue_notes WHERE issue_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, IssueNote>(&query)
            .bind(issue_id)
            .fetch_all(pool)
            .await
    }
}
