//! Issue entity model, note model, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use communityfix_core::types::{DbId, Timestamp};

/// A row from the `issues` table, with the vote sets materialized from
/// `issue_votes`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Issue {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub priority: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Opaque image reference strings (paths/URLs), at most 5.
    pub images: Vec<String>,
    /// Evidence attached by the department when submitting verification.
    pub verification_images: Vec<String>,
    pub reporter_id: DbId,
    pub department_id: Option<DbId>,
    pub assigned_user_id: Option<DbId>,
    /// Derived: |upvotes| - |downvotes|, maintained by `IssueRepo::vote`.
    pub vote_score: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Ids of actors who upvoted, oldest vote first.
    pub upvotes: Vec<DbId>,
    /// Ids of actors who downvoted, oldest vote first.
    pub downvotes: Vec<DbId>,
}

/// A row from the `issue_notes` table. `author_id` is `None` for
/// system-authored notes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueNote {
    pub id: DbId,
    pub issue_id: DbId,
    pub author_id: Option<DbId>,
    pub note: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a new issue. Department assignment is resolved by
/// the caller (category routing) before this reaches the repository.
#[derive(Debug)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub images: Vec<String>,
    pub reporter_id: DbId,
    pub department_id: Option<DbId>,
}

/// DTO for the generic field update. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub images: Option<Vec<String>>,
    pub department_id: Option<DbId>,
    pub assigned_user_id: Option<DbId>,
}

/// Filter predicates for issue list queries. The visibility scope is
/// passed separately (it comes from policy, not user input).
#[derive(Debug, Default)]
pub struct IssueFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// Case-insensitive substring over title and description; already
    /// escaped via `communityfix_core::search::like_pattern`.
    pub search: Option<String>,
}

/// Query parameters for `GET /issues`.
#[derive(Debug, Deserialize)]
pub struct IssueListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
