use axum::routing::get;
use axum::Router;

use crate::handlers::departments;
use crate::state::AppState;

/// Routes for the `/departments` directory.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(departments::list_departments))
        .route(
            "/{id}",
            get(departments::get_department).put(departments::update_department),
        )
}
