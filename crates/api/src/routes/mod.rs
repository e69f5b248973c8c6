pub mod auth;
pub mod comments;
pub mod departments;
pub mod health;
pub mod issues;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register citizen account (public)
/// /auth/login                          login (public)
/// /auth/create-department-user         provision officer account (admin)
/// /auth/me                             own profile (auth)
/// /auth/password                       change own password (auth, PUT)
/// /auth/users                          list users (admin)
/// /auth/users/{id}                     deactivate user (admin, DELETE)
///
/// /issues                              list (scoped), create (public role)
/// /issues/{id}                         get, patch, delete
/// /issues/{id}/status                  transition status (PUT)
/// /issues/{id}/vote                    toggle vote (POST)
/// /issues/{id}/note                    append department note (POST)
/// /issues/{id}/notes                   list notes (GET)
/// /issues/{id}/verification            submit evidence (POST)
/// /issues/{id}/verification/confirm    reporter confirms (POST)
/// /issues/{id}/verification/reject     reporter rejects (POST)
/// /issues/{id}/comments                list, create
///
/// /comments/{id}                       delete (author or admin)
///
/// /departments                         list (public read)
/// /departments/{id}                    get, update (update: admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/issues", issues::router())
        .nest("/comments", comments::router())
        .nest("/departments", departments::router())
}
