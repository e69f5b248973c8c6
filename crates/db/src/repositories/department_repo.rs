//! Repository for the `departments` table.
//!
//! Departments are seeded by migration; the repository only reads and
//! applies rare contact-metadata updates.

use sqlx::PgPool;

use communityfix_core::types::DbId;

use crate::models::department::{Department, DepartmentDetail, UpdateDepartment};

/// Column list for `departments` queries.
const COLUMNS: &str = "id, name, description, contact_email, contact_phone, \
                        head_officer_id, is_active, created_at, updated_at";

/// Provides read and update operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// List all departments in seed order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY id");
        sqlx::query_as::<_, Department>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a department by ID, including its derived assigned-issue ids.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DepartmentDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, \
                ARRAY(SELECT i.id FROM issues i \
                      WHERE i.department_id = departments.id \
                      ORDER BY i.created_at DESC) AS assigned_issue_ids \
             FROM departments WHERE id = $1"
        );
        sqlx::query_as::<_, DepartmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a department record by its display name.
    ///
    /// A missing record for a name in the closed set is a deployment
    /// configuration error; callers surface it as an internal failure,
    /// never a user error.
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE name = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Update contact metadata / head officer. Only non-`None` fields in
    /// `input` are applied. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDepartment,
    ) -> Result<Option<Department>, sqlx::Error> {
        let query = format!(
            "UPDATE departments SET
                description = COALESCE($2, description),
                contact_email = COALESCE($3, contact_email),
                contact_phone = COALESCE($4, contact_phone),
                head_officer_id = COALESCE($5, head_officer_id),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(input.head_officer_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
