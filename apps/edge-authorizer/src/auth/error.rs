// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors and the denial reasons exposed to the gateway.

use serde::Serialize;

use crate::appconfig::ConfigError;

/// Reason attached to a denied decision (`context.reason`).
///
/// This is the only failure detail the gateway ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No bearer header and no `access_token` cookie
    MissingToken,
    /// `client_id` claim missing or not the configured app client
    InvalidAudience,
    /// `token_use` claim present but not `access`
    NotAccessToken,
    /// Verification or configuration failure of any kind
    JwtInvalid,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::MissingToken => "missing_token",
            DenialReason::InvalidAudience => "invalid_audience",
            DenialReason::NotAccessToken => "not_access_token",
            DenialReason::JwtInvalid => "jwt_invalid",
        }
    }
}

/// Verification error type.
///
/// Variants are kept distinct for logging; they all collapse to
/// [`DenialReason::JwtInvalid`] at the decision boundary.
#[derive(Debug)]
pub enum AuthError {
    /// Token is malformed (bad segments, unsupported algorithm, missing claims)
    MalformedToken,
    /// Token signature is invalid
    InvalidSignature,
    /// Token has expired
    TokenExpired,
    /// Token is not yet valid
    TokenNotYetValid,
    /// Token issuer is not the user pool
    InvalidIssuer,
    /// JWKS fetch failed
    JwksFetchError(String),
    /// No matching key in JWKS
    NoMatchingKey,
    /// Authorization-server parameters could not be resolved
    Configuration(String),
    /// Internal error
    InternalError(String),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::JwksFetchError(_) => "jwks_fetch_error",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::Configuration(_) => "configuration_error",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Denial reason reported to the gateway.
    pub fn reason(&self) -> DenialReason {
        DenialReason::JwtInvalid
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            AuthError::InvalidIssuer => write!(f, "Token issuer is invalid"),
            AuthError::JwksFetchError(msg) => write!(f, "Failed to fetch JWKS: {msg}"),
            AuthError::NoMatchingKey => write!(f, "No matching key found in JWKS"),
            AuthError::Configuration(msg) => {
                write!(f, "Authorization server configuration unavailable: {msg}")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<ConfigError> for AuthError {
    fn from(err: ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            _ => AuthError::MalformedToken,
        }
    }
}
