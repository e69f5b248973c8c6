//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use communityfix_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub issue_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /issues/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub text: String,
}
