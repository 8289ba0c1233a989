// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`Settings`] snapshot taken
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ENVIRONMENT` | AppConfig environment and `cognito` profile section | `preprod` |
//! | `APP_NAME` | AppConfig application identifier | Required for AppConfig |
//! | `COGNITO_DOMAIN` | Hosted UI domain (fallback) | - |
//! | `CLIENT_ID` | Expected `client_id` claim (fallback) | - |
//! | `REGION` | User pool region (fallback) | - |
//! | `USER_POOL_ID` | User pool id (fallback) | - |
//! | `COGNITO_ISSUER_BASE_URL` | Replaces `https://cognito-idp.<region>.amazonaws.com` | - |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache lifetime | `600` |
//! | `LOCAL_HTTP_ADDR` | Serve the local HTTP harness instead of the Lambda runtime | - |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `json` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::time::Duration;

use crate::appconfig::ConfigIdentifiers;
use crate::auth::jwks::DEFAULT_CACHE_TTL;
use crate::auth::{AuthServerParams, AuthorizerSettings};

pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";
pub const APP_NAME_ENV: &str = "APP_NAME";
pub const ISSUER_BASE_URL_ENV: &str = "COGNITO_ISSUER_BASE_URL";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const LOCAL_HTTP_ADDR_ENV: &str = "LOCAL_HTTP_ADDR";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment used when `ENVIRONMENT` is unset or empty.
pub const DEFAULT_ENVIRONMENT: &str = "preprod";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, no ANSI, no timestamp (CloudWatch adds it)
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: String,
    pub app_name: Option<String>,
    /// Parameter values used when the `cognito` profile lacks them
    pub auth_fallback: AuthServerParams,
    pub issuer_base_url: Option<String>,
    pub jwks_cache_ttl: Duration,
    pub local_http_addr: Option<String>,
    pub log_format: LogFormat,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwks_cache_ttl = read(JWKS_CACHE_TTL_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL);

        Self {
            environment: read(ENVIRONMENT_ENV).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            app_name: read(APP_NAME_ENV),
            auth_fallback: AuthServerParams::from_lookup(&lookup),
            issuer_base_url: read(ISSUER_BASE_URL_ENV),
            jwks_cache_ttl,
            local_http_addr: read(LOCAL_HTTP_ADDR_ENV),
            log_format: read(LOG_FORMAT_ENV)
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }

    /// Default AppConfig identifiers for profile loads.
    pub fn config_identifiers(&self) -> ConfigIdentifiers {
        ConfigIdentifiers {
            app: self.app_name.clone(),
            env: Some(self.environment.clone()),
        }
    }

    pub fn authorizer_settings(&self) -> AuthorizerSettings {
        AuthorizerSettings {
            environment: self.environment.clone(),
            fallback: self.auth_fallback.clone(),
            issuer_base_url: self.issuer_base_url.clone(),
            jwks_cache_ttl: self.jwks_cache_ttl,
        }
    }
}
