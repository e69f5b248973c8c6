//! Handlers for the `/issues` resource: reporting, lifecycle, voting,
//! notes, and verification review.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use communityfix_core::department::{Category, Department};
use communityfix_core::error::CoreError;
use communityfix_core::issue::{
    self, VoteType, DEFAULT_PRIORITY, STATUS_CLOSED, STATUS_IN_PROGRESS, STATUS_VERIFICATION,
};
use communityfix_core::policy;
use communityfix_core::search::{clamp_limit, clamp_offset, like_pattern, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use communityfix_core::types::DbId;
use communityfix_db::models::issue::{
    CreateIssue, Issue, IssueFilter, IssueListParams, IssueNote, UpdateIssue,
};
use communityfix_db::repositories::{DepartmentRepo, IssueNoteRepo, IssueRepo};
use communityfix_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /issues`.
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Request body for `PATCH /issues/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub images: Option<Vec<String>>,
    /// Explicit department reassignment (admin only).
    pub department_id: Option<DbId>,
    /// Officer assignment (admin only).
    pub assigned_user_id: Option<DbId>,
}

/// Request body for `PUT /issues/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub note: String,
}

/// Request body for `POST /issues/{id}/vote`.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: String,
}

/// Request body for `POST /issues/{id}/note`.
#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub note: String,
}

/// Request body for `POST /issues/{id}/verification`.
#[derive(Debug, Deserialize)]
pub struct SubmitVerificationRequest {
    pub images: Vec<String>,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/issues
///
/// Report a new issue (public accounts only). The owning department is
/// derived from the category's routing table; reporters never pick a
/// department directly.
pub async fn create_issue(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateIssueRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Issue>>)> {
    policy::can_create(&user.actor())?;

    issue::validate_title(&input.title)?;
    issue::validate_description(&input.description)?;
    issue::validate_images(&input.images)?;

    let category: Category = input.category.parse()?;

    let priority = input
        .priority
        .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
    issue::validate_priority(&priority)?;

    let department_id = resolve_department_id(&state.pool, category.department()).await?;

    let create = CreateIssue {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        category: category.name().to_string(),
        priority,
        address: input.address,
        lat: input.lat,
        lng: input.lng,
        images: input.images,
        reporter_id: user.user_id,
        department_id: Some(department_id),
    };

    let created = IssueRepo::create(&state.pool, &create).await?;
    tracing::info!(
        issue_id = created.id,
        category = %created.category,
        department = category.department().name(),
        "Issue reported and routed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/issues
///
/// Scoped listing: citizens see their own reports, officers their
/// department's queue, admins everything. Returns one page of items plus
/// the total count under the same predicate.
pub async fn list_issues(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<IssueListParams>,
) -> AppResult<Json<DataResponse<Page<Issue>>>> {
    let scope = policy::list_scope(&user.actor());

    let filter = IssueFilter {
        status: params.status,
        category: params.category,
        priority: params.priority,
        search: params.search.as_deref().and_then(like_pattern),
    };

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let total = IssueRepo::count(&state.pool, &filter, &scope).await?;
    let items = IssueRepo::list(&state.pool, &filter, &scope, limit, offset).await?;

    Ok(Json(DataResponse {
        data: Page { items, total },
    }))
}

/// GET /api/v1/issues/{id}
pub async fn get_issue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let issue = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &issue).await?;
    policy::can_view(&user.actor(), issue.reporter_id, department)?;

    Ok(Json(DataResponse { data: issue }))
}

/// PATCH /api/v1/issues/{id}
///
/// Generic field update. Reporters may edit content fields while the
/// issue is still open; admins may edit anything, including explicit
/// department and officer assignment. A category change without an
/// explicit department re-routes through the category table.
pub async fn update_issue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateIssueRequest>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let actor = user.actor();
    let existing = load_issue(&state.pool, id).await?;
    policy::can_update_fields(&actor, existing.reporter_id, &existing.status)?;

    if input.department_id.is_some() || input.assigned_user_id.is_some() {
        policy::can_assign_department(&actor)?;
    }

    if let Some(ref title) = input.title {
        issue::validate_title(title)?;
    }
    if let Some(ref description) = input.description {
        issue::validate_description(description)?;
    }
    if let Some(ref priority) = input.priority {
        issue::validate_priority(priority)?;
    }
    if let Some(ref images) = input.images {
        issue::validate_images(images)?;
    }

    // A category change re-routes the issue unless an explicit department
    // was provided in the same request (admin override wins).
    let mut department_id = input.department_id;
    let category = match input.category {
        Some(ref raw) => {
            let category: Category = raw.parse()?;
            if department_id.is_none() {
                department_id =
                    Some(resolve_department_id(&state.pool, category.department()).await?);
            }
            Some(category.name().to_string())
        }
        None => None,
    };

    let update = UpdateIssue {
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description.map(|d| d.trim().to_string()),
        category,
        priority: input.priority,
        address: input.address,
        lat: input.lat,
        lng: input.lng,
        images: input.images,
        department_id,
        assigned_user_id: input.assigned_user_id,
    };

    let updated = IssueRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/issues/{id}/status
///
/// Transition the issue's status. Requires an officer of the assigned
/// department (or admin), a legal transition, and a non-empty note; the
/// note is appended in the same transaction as the status change.
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let existing = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &existing).await?;
    policy::can_act_for_department(&user.actor(), department)?;

    issue::validate_status(&input.status)?;
    issue::validate_transition(&existing.status, &input.status)?;
    issue::validate_note(&input.note)?;

    let updated = IssueRepo::update_status(
        &state.pool,
        id,
        &input.status,
        Some(user.user_id),
        input.note.trim(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))?;

    tracing::info!(
        issue_id = id,
        from = %existing.status,
        to = %input.status,
        "Issue status changed"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/issues/{id}/vote
///
/// Cast, retract, or switch a vote. Toggle semantics: the same vote cast
/// twice retracts it; the opposite vote replaces it.
pub async fn vote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<VoteRequest>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let vote_type: VoteType = input.vote_type.parse()?;

    let updated = IssueRepo::vote(&state.pool, id, user.user_id, vote_type)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/issues/{id}/note
///
/// Append a department progress note without changing the status.
pub async fn add_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddNoteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<IssueNote>>)> {
    let existing = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &existing).await?;
    policy::can_act_for_department(&user.actor(), department)?;

    issue::validate_note(&input.note)?;

    let note = IssueNoteRepo::add(&state.pool, id, Some(user.user_id), input.note.trim()).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: note })))
}

/// GET /api/v1/issues/{id}/notes
pub async fn list_notes(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<IssueNote>>>> {
    let issue = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &issue).await?;
    policy::can_view(&user.actor(), issue.reporter_id, department)?;

    let notes = IssueNoteRepo::list_for_issue(&state.pool, id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// POST /api/v1/issues/{id}/verification
///
/// Department submits fix evidence: at least one image, from
/// `in_progress` or `resolved` only. Moves the issue to `verification`
/// and appends the optional note atomically.
pub async fn submit_verification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitVerificationRequest>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let existing = load_issue(&state.pool, id).await?;
    let department = assigned_department(&state.pool, &existing).await?;
    policy::can_act_for_department(&user.actor(), department)?;

    if !issue::can_enter_verification(&existing.status) {
        return Err(AppError::Core(CoreError::InvalidTransition {
            from: existing.status.clone(),
            to: STATUS_VERIFICATION.to_string(),
        }));
    }
    issue::validate_verification_images(&input.images)?;
    if let Some(ref note) = input.note {
        issue::validate_note(note)?;
    }

    let updated = IssueRepo::attach_verification(
        &state.pool,
        id,
        &input.images,
        user.user_id,
        input.note.as_deref().map(str::trim),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))?;

    tracing::info!(issue_id = id, "Verification evidence submitted");

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/issues/{id}/verification/confirm
///
/// The original reporter confirms the fix: `verification` -> `closed`,
/// with a system note.
pub async fn confirm_verification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Issue>>> {
    review_verification(
        &state,
        &user,
        id,
        STATUS_CLOSED,
        "Resolution confirmed by the reporter",
    )
    .await
}

/// POST /api/v1/issues/{id}/verification/reject
///
/// The original reporter rejects the fix: `verification` ->
/// `in_progress`, with a system note, so the department's queue shows the
/// issue again.
pub async fn reject_verification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Issue>>> {
    review_verification(
        &state,
        &user,
        id,
        STATUS_IN_PROGRESS,
        "Resolution rejected by the reporter; work reopened",
    )
    .await
}

/// DELETE /api/v1/issues/{id}
///
/// Admin or the original reporter. Votes, notes, and comments cascade.
pub async fn delete_issue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = load_issue(&state.pool, id).await?;
    policy::can_delete(&user.actor(), existing.reporter_id)?;

    let deleted = IssueRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "issue", id }));
    }
    tracing::info!(issue_id = id, "Issue deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch an issue or fail with a typed 404.
pub(crate) async fn load_issue(pool: &DbPool, id: DbId) -> AppResult<Issue> {
    IssueRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))
}

/// Resolve the issue's assigned department (if any) to the policy-layer
/// department type.
pub(crate) async fn assigned_department(
    pool: &DbPool,
    issue: &Issue,
) -> AppResult<Option<Department>> {
    let Some(department_id) = issue.department_id else {
        return Ok(None);
    };
    let record = DepartmentRepo::find_by_id(pool, department_id).await?;
    Ok(record.and_then(|d| Department::from_name(&d.name)))
}

/// Resolve a routed department to its seeded database id. A missing row
/// is a deployment error, not a user error.
async fn resolve_department_id(pool: &DbPool, department: Department) -> AppResult<DbId> {
    let record = DepartmentRepo::find_by_name(pool, department.name())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Department '{}' is not seeded",
                department.name()
            )))
        })?;
    Ok(record.id)
}

/// Shared reporter-review path for confirm and reject.
async fn review_verification(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    next_status: &str,
    system_note: &str,
) -> AppResult<Json<DataResponse<Issue>>> {
    let existing = load_issue(&state.pool, id).await?;
    policy::can_review_verification(&user.actor(), existing.reporter_id)?;

    if existing.status != STATUS_VERIFICATION {
        return Err(AppError::Core(CoreError::InvalidTransition {
            from: existing.status.clone(),
            to: next_status.to_string(),
        }));
    }

    // System note: author is NULL, not the reporter.
    let updated = IssueRepo::update_status(&state.pool, id, next_status, None, system_note)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "issue", id }))?;

    tracing::info!(issue_id = id, to = next_status, "Verification reviewed");

    Ok(Json(DataResponse { data: updated }))
}
