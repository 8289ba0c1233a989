// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization-server (Cognito user pool) parameters.
//!
//! Read from the `cognito` AppConfig profile, section named after the
//! environment:
//!
//! ```yaml
//! preprod:
//!   COGNITO_DOMAIN: auth.preprod.example.com
//!   CLIENT_ID: 1example23456789
//!   REGION: eu-west-3
//!   USER_POOL_ID: eu-west-3_AbCdEfGhI
//! ```
//!
//! Each field falls back to the environment variable of the same name.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::error::AuthError;

/// AppConfig profile holding the user pool settings.
pub const COGNITO_PROFILE: &str = "cognito";

pub const DOMAIN_KEY: &str = "COGNITO_DOMAIN";
pub const CLIENT_ID_KEY: &str = "CLIENT_ID";
pub const REGION_KEY: &str = "REGION";
pub const USER_POOL_ID_KEY: &str = "USER_POOL_ID";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthServerParams {
    /// Hosted UI domain (informational, not used for verification)
    pub domain: Option<String>,
    /// App client id expected in `client_id`
    pub client_id: Option<String>,
    pub region: Option<String>,
    pub user_pool_id: Option<String>,
}

impl AuthServerParams {
    /// Read the parameters from a key lookup (environment variables).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            domain: read(DOMAIN_KEY),
            client_id: read(CLIENT_ID_KEY),
            region: read(REGION_KEY),
            user_pool_id: read(USER_POOL_ID_KEY),
        }
    }

    /// Overlay a profile section on `fallback`. Missing or empty values in
    /// the section keep the fallback.
    pub fn from_profile_section(section: &Value, fallback: &AuthServerParams) -> Self {
        let pick = |key: &str, fallback: &Option<String>| {
            config_string(section, key).or_else(|| fallback.clone())
        };
        Self {
            domain: pick(DOMAIN_KEY, &fallback.domain),
            client_id: pick(CLIENT_ID_KEY, &fallback.client_id),
            region: pick(REGION_KEY, &fallback.region),
            user_pool_id: pick(USER_POOL_ID_KEY, &fallback.user_pool_id),
        }
    }

    /// Issuer URL: `https://cognito-idp.<region>.amazonaws.com/<userPoolId>`.
    ///
    /// `base_override` replaces the scheme+host part (local emulators).
    pub fn issuer(&self, base_override: Option<&str>) -> Result<String, AuthError> {
        let pool = self
            .user_pool_id
            .as_deref()
            .ok_or_else(|| AuthError::Configuration(format!("{USER_POOL_ID_KEY} is not set")))?;

        let base = match base_override {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let region = self
                    .region
                    .as_deref()
                    .ok_or_else(|| AuthError::Configuration(format!("{REGION_KEY} is not set")))?;
                format!("https://cognito-idp.{region}.amazonaws.com")
            }
        };

        let issuer = format!("{base}/{pool}");
        Url::parse(&issuer)
            .map_err(|e| AuthError::Configuration(format!("invalid issuer URL '{issuer}': {e}")))?;
        Ok(issuer)
    }
}

/// Key-set endpoint for an issuer.
pub fn jwks_url(issuer: &str) -> Result<Url, AuthError> {
    Url::parse(&format!("{issuer}/.well-known/jwks.json"))
        .map_err(|e| AuthError::Configuration(format!("invalid JWKS URL: {e}")))
}

fn config_string(section: &Value, key: &str) -> Option<String> {
    match section.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
