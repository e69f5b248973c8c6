use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes for `/auth`: registration, login, profile, password change, and
/// admin user management.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/create-department-user",
            post(auth::create_department_user),
        )
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
        .route("/users", get(auth::list_users))
        .route("/users/{id}", delete(auth::deactivate_user))
}
