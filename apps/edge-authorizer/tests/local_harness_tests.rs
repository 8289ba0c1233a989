// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local HTTP harness routes.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use relational_edge_authorizer::{api::router, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

use common::*;

fn app_for(server: &MockServer) -> Router {
    let authorizer = authorizer_for(server, InMemorySource::new(cognito_profile()));
    router(AppState::new(Arc::new(authorizer)))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_authorize(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/authorize")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn authorize_returns_decision_for_gateway_event() {
    let server = start_user_pool().await;
    let token = sign(&access_claims(&server));

    let event = json!({
        "version": "2.0",
        "type": "REQUEST",
        "routeArn": "arn:aws:execute-api:eu-west-3:123456789012:api/$default/GET/wallets",
        "headers": {"authorization": format!("Bearer {token}")},
        "cookies": ["theme=dark"]
    });
    let response = app_for(&server).oneshot(post_authorize(event)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "isAuthorized": true,
            "context": {"sub": "u1", "scope": "read", "username": "alice"}
        })
    );
}

#[tokio::test]
async fn authorize_denial_is_still_200() {
    let server = start_user_pool().await;

    let response = app_for(&server)
        .oneshot(post_authorize(json!({"headers": {}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"isAuthorized": false, "context": {"reason": "missing_token"}})
    );
}

#[tokio::test]
async fn liveness_is_ok() {
    let server = start_user_pool().await;
    let request = Request::builder()
        .uri("/health/live")
        .body(Body::empty())
        .unwrap();

    let response = app_for(&server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn readiness_reflects_key_set_availability() {
    let server = start_user_pool().await;
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = app_for(&server).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["checks"]["jwks"], "ok");

    // No JWKS route mounted: the pool is unreachable.
    let empty = MockServer::start().await;
    let request = Request::builder()
        .uri("/health/ready")
        .body(Body::empty())
        .unwrap();
    let response = app_for(&empty).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "degraded");
}
