//! Handlers for the `/departments` directory.
//!
//! Departments are a closed, migration-seeded set; the write surface is
//! limited to admin contact-metadata updates.

use axum::extract::{Path, State};
use axum::Json;

use communityfix_core::error::CoreError;
use communityfix_core::types::DbId;
use communityfix_db::models::department::{Department, DepartmentDetail, UpdateDepartment};
use communityfix_db::repositories::DepartmentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/departments
///
/// Public directory: reporters need it to see who handles what.
pub async fn list_departments(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Department>>>> {
    let departments = DepartmentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: departments }))
}

/// GET /api/v1/departments/{id}
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DepartmentDetail>>> {
    let department = DepartmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "department",
            id,
        }))?;
    Ok(Json(DataResponse { data: department }))
}

/// PUT /api/v1/departments/{id} (admin)
///
/// Update contact metadata / head officer. Names are fixed by the seed.
pub async fn update_department(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDepartment>,
) -> AppResult<Json<DataResponse<Department>>> {
    let updated = DepartmentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "department",
            id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}
