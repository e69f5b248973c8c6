//! HTTP-level integration tests for issue comments.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_user, delete_auth, get_auth, post_json_auth, token_for};
use sqlx::PgPool;

async fn report_issue(app: Router, token: &str) -> i64 {
    let body = serde_json::json!({
        "title": "Deep pothole",
        "description": "Needs filling.",
        "category": "Potholes",
    });
    let response = post_json_auth(app, "/api/v1/issues", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Comments append in order and are visible to the issue's audience.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_create_and_list(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let officer = create_user(&pool, "crew", "pwd").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    let body = serde_json::json!({ "text": "Any update on this?" });
    let response = post_json_auth(app.clone(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The assigned department's officer can discuss too.
    let body = serde_json::json!({ "text": "Crew scheduled for Monday." });
    let response = post_json_auth(app.clone(), &uri, &token_for(&officer), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "Any update on this?");
    assert_eq!(comments[1]["author_id"], officer.id);
}

/// Comment visibility follows issue visibility.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_commenting_requires_view_access(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let bob = create_user(&pool, "bob", "public").await;
    let app = common::build_test_app(pool);

    let issue_id = report_issue(app.clone(), &token_for(&alice)).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    let body = serde_json::json!({ "text": "Drive-by comment" });
    let response = post_json_auth(app.clone(), &uri, &token_for(&bob), body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &uri, &token_for(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Length and emptiness limits apply.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_validation(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    let body = serde_json::json!({ "text": "c".repeat(501) });
    let response = post_json_auth(app.clone(), &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "text": "   " });
    let response = post_json_auth(app, &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deletion is limited to the author and admins.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_deletion_rights(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let officer = create_user(&pool, "crew", "pwd").await;
    let admin = create_user(&pool, "boss", "admin").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    let uri = format!("/api/v1/issues/{issue_id}/comments");

    let body = serde_json::json!({ "text": "First" });
    let response = post_json_auth(app.clone(), &uri, &token, body).await;
    let first = body_json(response).await["data"]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "text": "Second" });
    let response = post_json_auth(app.clone(), &uri, &token, body).await;
    let second = body_json(response).await["data"]["id"].as_i64().unwrap();

    // The officer is neither author nor admin.
    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/comments/{first}"),
        &token_for(&officer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/comments/{first}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/comments/{second}"),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
