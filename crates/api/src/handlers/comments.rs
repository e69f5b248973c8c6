//! Handlers for issue comments.
//!
//! Comments are an append-only discussion log, visible to exactly the
//! actors who can view the parent issue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use communityfix_core::comment::validate_text;
use communityfix_core::error::CoreError;
use communityfix_core::policy;
use communityfix_core::types::DbId;
use communityfix_db::models::comment::{Comment, CreateComment};
use communityfix_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::issues::{assigned_department, load_issue};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/issues/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let issue = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &issue).await?;
    policy::can_view(&user.actor(), issue.reporter_id, department)?;

    let comments = CommentRepo::list_for_issue(&state.pool, id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/issues/{id}/comments
///
/// Commenting requires view access to the issue.
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let issue = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &issue).await?;
    policy::can_view(&user.actor(), issue.reporter_id, department)?;

    validate_text(&input.text)?;

    let comment = CommentRepo::create(&state.pool, id, user.user_id, input.text.trim()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/comments/{id}
///
/// Admin or the comment's author.
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "comment",
            id,
        }))?;

    policy::can_delete_comment(&user.actor(), comment.author_id)?;

    CommentRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
