use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{comments, issues};
use crate::state::AppState;

/// Routes for `/issues`: reporting, lifecycle, votes, notes,
/// verification, and issue-scoped comments.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(issues::list_issues).post(issues::create_issue))
        .route(
            "/{id}",
            get(issues::get_issue)
                .patch(issues::update_issue)
                .delete(issues::delete_issue),
        )
        .route("/{id}/status", put(issues::update_status))
        .route("/{id}/vote", post(issues::vote))
        .route("/{id}/note", post(issues::add_note))
        .route("/{id}/notes", get(issues::list_notes))
        .route("/{id}/verification", post(issues::submit_verification))
        .route(
            "/{id}/verification/confirm",
            post(issues::confirm_verification),
        )
        .route(
            "/{id}/verification/reject",
            post(issues::reject_verification),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}
