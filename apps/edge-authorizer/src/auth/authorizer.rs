// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorizer decision procedure.
//!
//! ```text
//! token_from_request ──none──▶ deny(missing_token)
//!        │
//!        ▼
//! auth_server_params (once per process) ─┐
//!        │                              │ any error
//!        ▼                              ├──────────▶ deny(jwt_invalid)
//! verify signature + exp + iss ─────────┘
//!        │
//!        ▼
//! client_id / token_use checks ──▶ deny(invalid_audience | not_access_token)
//!        │
//!        ▼
//! allow { sub, scope, username }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::claims::AccessTokenClaims;
use super::decision::Decision;
use super::error::{AuthError, DenialReason};
use super::extractor::{token_from_request, AuthorizerRequest};
use super::jwks::{JwksManager, DEFAULT_CACHE_TTL};
use super::params::{jwks_url, AuthServerParams, COGNITO_PROFILE};
use super::verify::verify_access_token;
use crate::appconfig::{ConfigCache, LoadOptions};

/// Static inputs of the authorizer, read once at startup.
#[derive(Debug, Clone)]
pub struct AuthorizerSettings {
    /// Section of the `cognito` profile to read (`ENVIRONMENT`)
    pub environment: String,
    /// Values used when the profile lacks a parameter (environment variables)
    pub fallback: AuthServerParams,
    /// Replaces `https://cognito-idp.<region>.amazonaws.com` when set
    pub issuer_base_url: Option<String>,
    pub jwks_cache_ttl: Duration,
}

impl AuthorizerSettings {
    pub fn new(environment: impl Into<String>, fallback: AuthServerParams) -> Self {
        Self {
            environment: environment.into(),
            fallback,
            issuer_base_url: None,
            jwks_cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_issuer_base_url(mut self, base: impl Into<String>) -> Self {
        self.issuer_base_url = Some(base.into());
        self
    }
}

/// Issuer string and the key-set fetcher bound to it.
struct IssuerContext {
    issuer: String,
    jwks: JwksManager,
}

/// Token authorizer.
///
/// Owns the per-process parameter and key-set state; the profile cache is
/// shared. A failed resolution leaves the cells empty so the next invocation
/// retries.
pub struct Authorizer {
    config: Arc<ConfigCache>,
    settings: AuthorizerSettings,
    params: OnceCell<AuthServerParams>,
    issuer: OnceCell<IssuerContext>,
}

impl Authorizer {
    pub fn new(config: Arc<ConfigCache>, settings: AuthorizerSettings) -> Self {
        Self {
            config,
            settings,
            params: OnceCell::new(),
            issuer: OnceCell::new(),
        }
    }

    /// Resolve the user pool parameters.
    ///
    /// Resolved at most once; concurrent first callers wait on the same
    /// resolution instead of starting their own.
    pub async fn auth_server_params(&self) -> Result<&AuthServerParams, AuthError> {
        self.params.get_or_try_init(|| self.resolve_params()).await
    }

    async fn resolve_params(&self) -> Result<AuthServerParams, AuthError> {
        let section = self
            .config
            .get_config_value(
                COGNITO_PROFILE,
                Some(&self.settings.environment),
                Some(Value::Object(Default::default())),
                &LoadOptions::default(),
            )
            .await?
            .unwrap_or(Value::Null);

        let params = AuthServerParams::from_profile_section(&section, &self.settings.fallback);
        info!(
            environment = %self.settings.environment,
            region = ?params.region,
            user_pool_id = ?params.user_pool_id,
            client_id_configured = params.client_id.is_some(),
            "Resolved authorization server parameters"
        );
        Ok(params)
    }

    async fn issuer_context(&self) -> Result<&IssuerContext, AuthError> {
        self.issuer
            .get_or_try_init(|| async {
                let params = self.auth_server_params().await?;
                let issuer = params.issuer(self.settings.issuer_base_url.as_deref())?;
                let jwks = JwksManager::new(jwks_url(&issuer)?.as_str())
                    .with_cache_ttl(self.settings.jwks_cache_ttl);
                debug!(%issuer, jwks_url = jwks.jwks_url(), "Key set fetcher ready");
                Ok::<_, AuthError>(IssuerContext { issuer, jwks })
            })
            .await
    }

    async fn verify(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let context = self.issuer_context().await?;
        verify_access_token(token, &context.jwks, &context.issuer).await
    }

    /// Authorize one request. Never fails: every error becomes a denial.
    pub async fn handle(&self, request: &AuthorizerRequest) -> Decision {
        let Some(token) = token_from_request(request) else {
            info!(reason = DenialReason::MissingToken.as_str(), "Request denied");
            return Decision::deny(DenialReason::MissingToken);
        };

        let outcome = self.verify(&token).await;
        if let Err(err) = &outcome {
            warn!(error = %err, code = err.error_code(), "Token verification failed");
        }

        let expected_client_id = self.params.get().and_then(|p| p.client_id.as_deref());
        let decision = Decision::from_outcome(&outcome, expected_client_id);

        match decision.reason() {
            Some(reason) => info!(reason, "Request denied"),
            None => debug!(sub = ?decision.context.get("sub"), "Request authorized"),
        }
        decision
    }

    /// Authorize a raw gateway event.
    ///
    /// An event that does not decode as a request description carries no
    /// usable token and is denied as `missing_token`.
    pub async fn handle_event(&self, event: Value) -> Decision {
        match serde_json::from_value::<AuthorizerRequest>(event) {
            Ok(request) => self.handle(&request).await,
            Err(e) => {
                warn!(error = %e, "Undecodable authorizer event");
                Decision::deny(DenialReason::MissingToken)
            }
        }
    }

    /// Readiness probe: parameters resolve and the key set is reachable.
    pub async fn check_key_set(&self) -> Result<(), AuthError> {
        let context = self.issuer_context().await?;
        if context.jwks.is_cached().await {
            return Ok(());
        }
        context.jwks.refresh().await
    }
}
