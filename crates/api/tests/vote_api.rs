//! HTTP-level integration tests for vote toggle semantics and score
//! bookkeeping.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_user, post_json_auth, token_for};
use sqlx::PgPool;

async fn report_issue(app: Router, token: &str) -> i64 {
    let body = serde_json::json!({
        "title": "Deep pothole",
        "description": "Dangerous for cyclists.",
        "category": "Potholes",
    });
    let response = post_json_auth(app, "/api/v1/issues", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn cast_vote(app: Router, issue_id: i64, token: &str, vote_type: &str) -> serde_json::Value {
    let body = serde_json::json!({ "vote_type": vote_type });
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{issue_id}/vote"),
        token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// First vote is recorded and counted.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upvote_adds(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    let issue = cast_vote(app, issue_id, &token, "upvote").await;

    assert_eq!(issue["vote_score"], 1);
    assert_eq!(issue["upvotes"].as_array().unwrap(), &[serde_json::json!(alice.id)]);
    assert!(issue["downvotes"].as_array().unwrap().is_empty());
}

/// Casting the same vote again retracts it (toggle is self-inverse).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_same_vote_retracts(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    cast_vote(app.clone(), issue_id, &token, "upvote").await;
    let issue = cast_vote(app, issue_id, &token, "upvote").await;

    assert_eq!(issue["vote_score"], 0);
    assert!(issue["upvotes"].as_array().unwrap().is_empty());
    assert!(issue["downvotes"].as_array().unwrap().is_empty());
}

/// Casting the opposite vote switches; the actor never holds both.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_opposite_vote_switches(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    cast_vote(app.clone(), issue_id, &token, "upvote").await;
    let issue = cast_vote(app, issue_id, &token, "downvote").await;

    assert_eq!(issue["vote_score"], -1);
    assert!(issue["upvotes"].as_array().unwrap().is_empty());
    assert_eq!(
        issue["downvotes"].as_array().unwrap(),
        &[serde_json::json!(alice.id)]
    );
}

/// Scores aggregate across voters; each holds at most one vote.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_score_aggregates_voters(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let bob = create_user(&pool, "bob", "public").await;
    let carol = create_user(&pool, "carol", "public").await;
    let app = common::build_test_app(pool);

    let issue_id = report_issue(app.clone(), &token_for(&alice)).await;
    cast_vote(app.clone(), issue_id, &token_for(&alice), "upvote").await;
    cast_vote(app.clone(), issue_id, &token_for(&bob), "upvote").await;
    let issue = cast_vote(app, issue_id, &token_for(&carol), "downvote").await;

    assert_eq!(issue["vote_score"], 1);
    assert_eq!(issue["upvotes"].as_array().unwrap().len(), 2);
    assert_eq!(issue["downvotes"].as_array().unwrap().len(), 1);
}

/// Unknown vote types are rejected before touching storage.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_vote_type(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);
    let token = token_for(&alice);

    let issue_id = report_issue(app.clone(), &token).await;
    let body = serde_json::json!({ "vote_type": "like" });
    let response = post_json_auth(
        app,
        &format!("/api/v1/issues/{issue_id}/vote"),
        &token,
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Voting requires authentication; missing issues are 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_vote_edge_cases(pool: PgPool) {
    let alice = create_user(&pool, "alice", "public").await;
    let app = common::build_test_app(pool);

    let response = common::post_json(
        app.clone(),
        "/api/v1/issues/1/vote",
        serde_json::json!({ "vote_type": "upvote" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "vote_type": "upvote" });
    let response = post_json_auth(app, "/api/v1/issues/999999/vote", &token_for(&alice), body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
