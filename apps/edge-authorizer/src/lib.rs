// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Edge Authorizer - API Gateway Lambda authorizer
//!
//! Authenticates requests at the edge of the HTTP API by validating the
//! Cognito access token carried in the `Authorization` header or the
//! `access_token` cookie.
//!
//! ## Modules
//!
//! - `appconfig` - AppConfig profile loading and process-lifetime cache
//! - `auth` - Token extraction, JWKS verification and the authorizer decision
//! - `api` - Local HTTP harness (Axum)
//! - `config` - Environment configuration

pub mod api;
pub mod appconfig;
pub mod auth;
pub mod config;
pub mod state;
