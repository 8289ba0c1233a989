// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito access-token claims and the business checks applied to them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::error::DenialReason;

/// Claims read from a verified Cognito token.
///
/// Signature, `exp`, `nbf` and `iss` are validated by `jsonwebtoken` and are
/// not kept here. Everything is optional so that the business checks decide
/// what a missing claim means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (Cognito user id)
    #[serde(default, deserialize_with = "context_string")]
    pub sub: Option<String>,

    /// App client the token was issued to (access tokens carry no `aud`)
    #[serde(default)]
    pub client_id: Option<String>,

    /// `access` or `id`
    #[serde(default)]
    pub token_use: Option<String>,

    /// Space separated OAuth scopes
    #[serde(default, deserialize_with = "context_string")]
    pub scope: Option<String>,

    #[serde(default, deserialize_with = "context_string")]
    pub username: Option<String>,
}

/// Context claims only travel to the gateway as strings; any non-string JSON
/// value is rendered instead of failing the whole token.
fn context_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl AccessTokenClaims {
    /// Apply the audience and token-use checks.
    ///
    /// `expected_client_id` is the configured app client; when unset any
    /// non-empty `client_id` is accepted.
    pub fn check_policy(&self, expected_client_id: Option<&str>) -> Result<(), DenialReason> {
        let client_id = present(&self.client_id).ok_or(DenialReason::InvalidAudience)?;

        if let Some(expected) = expected_client_id.filter(|c| !c.is_empty()) {
            if client_id != expected {
                return Err(DenialReason::InvalidAudience);
            }
        }

        if let Some(token_use) = present(&self.token_use) {
            if token_use != "access" {
                return Err(DenialReason::NotAccessToken);
            }
        }

        Ok(())
    }

    pub fn sub_or_empty(&self) -> &str {
        self.sub.as_deref().unwrap_or_default()
    }

    pub fn scope_or_empty(&self) -> &str {
        self.scope.as_deref().unwrap_or_default()
    }

    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}
