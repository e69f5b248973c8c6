//! Department entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use communityfix_core::types::{DbId, Timestamp};

/// A row from the `departments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    /// Display name from the closed set (`"Electrical"`, `"PWD"`, ...).
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub head_officer_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Department with its derived set of assigned issue ids, returned by the
/// single-department read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DepartmentDetail {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub head_officer_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Issue ids currently assigned to this department (derived, not
    /// authoritative).
    pub assigned_issue_ids: Vec<DbId>,
}

/// DTO for updating department contact metadata. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateDepartment {
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub head_officer_id: Option<DbId>,
    pub is_active: Option<bool>,
}
