// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::auth::{AuthorizerRequest, Decision};
use crate::state::AppState;

/// Run the authorizer on a request description.
///
/// Always 200: denials are part of the decision body, exactly as the Lambda
/// would return them.
pub async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthorizerRequest>,
) -> Json<Decision> {
    Json(state.authorizer.handle(&request).await)
}
