// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local HTTP harness.
//!
//! Serves the authorizer outside Lambda so it can be exercised with plain
//! HTTP clients. Not deployed behind API Gateway.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod authorize;
pub mod health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/authorize", post(authorize::authorize))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
