// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Lambda authorizer for the HTTP API, validating Cognito access tokens.
//!
//! ## Auth Flow
//!
//! 1. Frontend signs the user in with Cognito
//! 2. Requests carry `Authorization: Bearer <access token>` or the
//!    `access_token` cookie
//! 3. The authorizer:
//!    - Resolves the user pool parameters (AppConfig, env fallback)
//!    - Fetches the pool JWKS via HTTPS
//!    - Verifies JWT signature, expiry and issuer
//!    - Checks `client_id` and `token_use`
//! 4. API Gateway receives `{ isAuthorized, context }`; `context` is exposed
//!    to integrations as `$context.authorizer.lambda.*`
//!
//! ## Security
//!
//! - Any verification or configuration failure denies (`jwt_invalid`)
//! - Failure details are logged, never returned to the gateway
//! - JWKS is cached with TTL; unknown key ids trigger a rate-limited refetch
//! - No clock skew tolerance: expired tokens are rejected immediately

pub mod authorizer;
pub mod claims;
pub mod decision;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod params;
pub mod verify;

pub use authorizer::{Authorizer, AuthorizerSettings};
pub use claims::AccessTokenClaims;
pub use decision::Decision;
pub use error::{AuthError, DenialReason};
pub use extractor::{token_from_request, AuthorizerRequest, COOKIE_NAME};
pub use jwks::JwksManager;
pub use params::{AuthServerParams, COGNITO_PROFILE};
